use crate::models::{NewNote, Note, NotePatch, Visibility};
use crate::util::{from_local_input, to_local_input};
use chrono::{DateTime, TimeZone, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormError {
    TitleRequired,
    InvalidReminder,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::TitleRequired => write!(f, "Title is required."),
            FormError::InvalidReminder => write!(f, "Reminder is not a valid date and time."),
        }
    }
}

impl std::error::Error for FormError {}

/// Raw field values of the note form, as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NoteFormValues {
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    /// `YYYY-MM-DDTHH:MM` in the viewer's timezone, or empty.
    pub alert_at: String,
}

/// Validated form output.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NoteDraft {
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub alert_at: Option<DateTime<Utc>>,
}

impl NoteFormValues {
    /// Pre-fill from an existing note, showing the reminder in `tz`.
    pub(crate) fn from_note<Tz: TimeZone>(note: &Note, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            visibility: note.visibility,
            alert_at: note
                .alert_at
                .as_ref()
                .map(|ts| to_local_input(ts, tz))
                .unwrap_or_default(),
        }
    }

    pub(crate) fn validate<Tz: TimeZone>(&self, tz: &Tz) -> Result<NoteDraft, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::TitleRequired);
        }

        let alert_at = if self.alert_at.trim().is_empty() {
            None
        } else {
            Some(from_local_input(&self.alert_at, tz).ok_or(FormError::InvalidReminder)?)
        };

        Ok(NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            visibility: self.visibility,
            alert_at,
        })
    }
}

impl NoteDraft {
    pub(crate) fn into_new_note(self) -> NewNote {
        NewNote {
            title: self.title,
            content: self.content,
            visibility: self.visibility,
            server_id: 0,
            channel_id: 0,
            alert_at: self.alert_at,
        }
    }

    pub(crate) fn into_patch(self) -> NotePatch {
        NotePatch {
            title: Some(self.title),
            content: Some(self.content),
            visibility: Some(self.visibility),
            alert_at: self.alert_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).expect("offset")
    }

    #[test]
    fn test_blank_title_rejected() {
        let v = NoteFormValues {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(v.validate(&tz()), Err(FormError::TitleRequired));
    }

    #[test]
    fn test_groceries_defaults_to_private_without_reminder() {
        let v = NoteFormValues {
            title: "Groceries".to_string(),
            content: "milk\neggs".to_string(),
            ..Default::default()
        };
        let new = v.validate(&tz()).expect("valid").into_new_note();
        assert_eq!(new.title, "Groceries");
        assert_eq!(new.content, "milk\neggs");
        assert_eq!(new.visibility, Visibility::Private);
        assert_eq!((new.server_id, new.channel_id), (0, 0));
        assert!(new.alert_at.is_none());
    }

    #[test]
    fn test_invalid_reminder_rejected() {
        let v = NoteFormValues {
            title: "t".to_string(),
            alert_at: "soon".to_string(),
            ..Default::default()
        };
        assert_eq!(v.validate(&tz()), Err(FormError::InvalidReminder));
    }

    #[test]
    fn test_prefill_and_submit_preserves_reminder_minute() {
        let json = r#"{"id": "1", "title": "t", "createdAt": 0, "updatedAt": 0,
                       "alertAt": "2024-06-01T18:05:00Z"}"#;
        let note: Note = serde_json::from_str(json).expect("note");
        let values = NoteFormValues::from_note(&note, &tz());
        assert_eq!(values.alert_at, "2024-06-01T20:05");

        let patch = values.validate(&tz()).expect("valid").into_patch();
        assert_eq!(patch.alert_at, note.alert_at);
        assert_eq!(patch.title.as_deref(), Some("t"));
    }
}
