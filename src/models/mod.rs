use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Note visibility as stored by the backend (`"private"` / `"public"`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Visibility::Private => "Private",
            Visibility::Public => "Public",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "public" => Visibility::Public,
            _ => Visibility::Private,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "wire::timestamp")]
    pub updated_at: DateTime<Utc>,

    // Push payloads carry only the core fields; the scoping ids default to 0.
    #[serde(default)]
    pub server_id: u64,
    #[serde(default)]
    pub channel_id: u64,
    #[serde(default)]
    pub discord_user_id: u64,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(
        default,
        deserialize_with = "wire::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub alert_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteInvariantError {
    EmptyTitle,
    UpdatedBeforeCreated,
}

impl std::fmt::Display for NoteInvariantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteInvariantError::EmptyTitle => write!(f, "note title is empty"),
            NoteInvariantError::UpdatedBeforeCreated => {
                write!(f, "note updatedAt precedes createdAt")
            }
        }
    }
}

impl std::error::Error for NoteInvariantError {}

impl Note {
    pub fn validate(&self) -> Result<(), NoteInvariantError> {
        if self.title.trim().is_empty() {
            return Err(NoteInvariantError::EmptyTitle);
        }
        if self.updated_at < self.created_at {
            return Err(NoteInvariantError::UpdatedBeforeCreated);
        }
        Ok(())
    }

    pub fn was_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}

/// OAuth provider profile, as relayed by `/auth/exchange`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.username)
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(|a| format!("https://cdn.discordapp.com/avatars/{}/{}.png", self.id, a))
    }
}

/// Body of `POST /notes`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub server_id: u64,
    pub channel_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_at: Option<DateTime<Utc>>,
}

/// Body of `PUT /notes/{id}`; unset fields are left untouched server-side.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_at: Option<DateTime<Utc>>,
}

/// Decoders for the shapes the backend has been seen to emit.
mod wire {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Int(i64),
    }

    pub(super) fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match IdRepr::deserialize(d)? {
            IdRepr::Text(s) => s,
            IdRepr::Int(n) => n.to_string(),
        })
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TimestampRepr {
        Millis(i64),
        Text(String),
    }

    fn convert<E: serde::de::Error>(repr: TimestampRepr) -> Result<DateTime<Utc>, E> {
        match repr {
            TimestampRepr::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp out of range: {ms}"))),
            TimestampRepr::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| E::custom(format!("invalid timestamp {s:?}: {e}"))),
        }
    }

    pub(super) fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        convert(TimestampRepr::deserialize(d)?)
    }

    pub(super) fn opt_timestamp<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<TimestampRepr>::deserialize(d)? {
            Some(repr) => convert(repr).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_contract_deserialize_full() {
        let json = r#"{
            "id": "42",
            "title": "Groceries",
            "content": "milk\neggs",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T11:30:00Z",
            "serverId": 1,
            "channelId": 2,
            "discordUserId": 123456789012345678,
            "visibility": "public",
            "alertAt": "2024-05-02T08:00:00.000Z"
        }"#;
        let note: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(note.id, "42");
        assert_eq!(note.visibility, Visibility::Public);
        assert_eq!(note.discord_user_id, 123456789012345678);
        assert!(note.alert_at.is_some());
        assert!(note.was_edited());
        assert!(note.validate().is_ok());
    }

    #[test]
    fn test_note_push_shape_with_numeric_id_and_epoch_millis() {
        // The push channel serializes the entity directly: numeric id, epoch millis,
        // no scoping fields.
        let json = r#"{"id": 7, "title": "t", "content": "c",
                       "createdAt": 1714557600000, "updatedAt": 1714557600000}"#;
        let note: Note = serde_json::from_str(json).expect("push note should parse");
        assert_eq!(note.id, "7");
        assert_eq!(note.server_id, 0);
        assert_eq!(note.visibility, Visibility::Private);
        assert!(note.alert_at.is_none());
        assert!(!note.was_edited());
    }

    #[test]
    fn test_note_null_alert_at_is_none() {
        let json = r#"{"id": "1", "title": "t", "createdAt": 0, "updatedAt": 0, "alertAt": null}"#;
        let note: Note = serde_json::from_str(json).expect("should parse");
        assert!(note.alert_at.is_none());
        assert_eq!(note.content, "");
    }

    #[test]
    fn test_note_validate_rejects_empty_title() {
        let json = r#"{"id": "1", "title": "  ", "createdAt": 0, "updatedAt": 0}"#;
        let note: Note = serde_json::from_str(json).expect("should parse");
        assert_eq!(note.validate(), Err(NoteInvariantError::EmptyTitle));
    }

    #[test]
    fn test_note_validate_rejects_updated_before_created() {
        let json = r#"{"id": "1", "title": "t", "createdAt": 2000, "updatedAt": 1000}"#;
        let note: Note = serde_json::from_str(json).expect("should parse");
        assert_eq!(note.validate(), Err(NoteInvariantError::UpdatedBeforeCreated));
    }

    #[test]
    fn test_new_note_serialization_omits_missing_reminder() {
        let req = NewNote {
            title: "Groceries".to_string(),
            content: "milk\neggs".to_string(),
            visibility: Visibility::default(),
            server_id: 0,
            channel_id: 0,
            alert_at: None,
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["title"], "Groceries");
        assert_eq!(v["content"], "milk\neggs");
        assert_eq!(v["visibility"], "private");
        assert_eq!(v["serverId"], 0);
        assert_eq!(v["channelId"], 0);
        assert!(v.get("alertAt").is_none());
    }

    #[test]
    fn test_note_patch_only_sends_set_fields() {
        let patch = NotePatch {
            title: Some("new".to_string()),
            ..Default::default()
        };
        let v = serde_json::to_value(patch).expect("should serialize");
        assert_eq!(v, serde_json::json!({ "title": "new" }));
    }

    #[test]
    fn test_user_contract_deserialize() {
        let json = r#"{
            "id": "80351110224678912",
            "username": "nelly",
            "discriminator": "1337",
            "avatar": "8342729096ea3675442027381ff50dfe",
            "verified": true,
            "email": "nelly@discord.com",
            "global_name": "Nelly"
        }"#;
        let user: User = serde_json::from_str(json).expect("user should parse");
        assert_eq!(user.display_name(), "Nelly");
        assert_eq!(
            user.avatar_url().as_deref(),
            Some("https://cdn.discordapp.com/avatars/80351110224678912/8342729096ea3675442027381ff50dfe.png")
        );
    }

    #[test]
    fn test_user_display_name_falls_back_to_username() {
        let json = r#"{"id": "1", "username": "u", "discriminator": "0", "avatar": null}"#;
        let user: User = serde_json::from_str(json).expect("user should parse");
        assert_eq!(user.display_name(), "u");
        assert!(user.avatar_url().is_none());
    }

    #[test]
    fn test_visibility_parse_defaults_to_private() {
        assert_eq!(Visibility::parse("public"), Visibility::Public);
        assert_eq!(Visibility::parse("nonsense"), Visibility::Private);
    }
}
