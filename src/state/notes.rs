use crate::api::{ApiResult, NotesApi};
use crate::models::{NewNote, Note, NotePatch};

pub(crate) const LOAD_NOTES_ERROR: &str = "Failed to load notes. Please try again later.";
pub(crate) const LOAD_NOTE_ERROR: &str = "Failed to load note. Please try again later.";
pub(crate) const CREATE_NOTE_ERROR: &str = "Failed to create note. Please try again.";
pub(crate) const UPDATE_NOTE_ERROR: &str = "Failed to update note. Please try again.";
pub(crate) const DELETE_NOTE_ERROR: &str = "Failed to delete note. Please try again.";
pub(crate) const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this note?";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MergeOutcome {
    Replaced(usize),
    Appended,
}

/// Upsert by id: replace in place when present, append otherwise.
pub(crate) fn merge_note(notes: &mut Vec<Note>, incoming: Note) -> MergeOutcome {
    match notes.iter().position(|n| n.id == incoming.id) {
        Some(idx) => {
            notes[idx] = incoming;
            MergeOutcome::Replaced(idx)
        }
        None => {
            notes.push(incoming);
            MergeOutcome::Appended
        }
    }
}

/// Replace the entry with the same id; returns false if there was none.
pub(crate) fn replace_note(notes: &mut [Note], updated: Note) -> bool {
    match notes.iter_mut().find(|n| n.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

pub(crate) fn remove_note(notes: &mut Vec<Note>, id: &str) -> bool {
    let before = notes.len();
    notes.retain(|n| n.id != id);
    notes.len() != before
}

/// View model behind the note list.
///
/// `error` holds the first failure message and is cleared only by a later
/// successful operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NoteListState {
    pub notes: Vec<Note>,
    pub loading: bool,
    pub error: Option<String>,
}

impl NoteListState {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
    }

    pub(crate) fn loaded(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.succeed();
    }

    pub(crate) fn created(&mut self, note: Note) {
        self.notes.push(note);
        self.succeed();
    }

    pub(crate) fn updated(&mut self, note: Note) {
        if !replace_note(&mut self.notes, note.clone()) {
            tracing::debug!(id = %note.id, "updated note not in list; appending");
            self.notes.push(note);
        }
        self.succeed();
    }

    pub(crate) fn deleted(&mut self, id: &str) {
        remove_note(&mut self.notes, id);
        self.succeed();
    }

    pub(crate) fn pushed(&mut self, note: Note) -> MergeOutcome {
        merge_note(&mut self.notes, note)
    }

    pub(crate) fn failed(&mut self, message: &str) {
        self.loading = false;
        if self.error.is_none() {
            self.error = Some(message.to_string());
        }
    }

    fn succeed(&mut self) {
        self.loading = false;
        self.error = None;
    }
}

/// View model behind the single-note page. Same error rule as the list.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NoteDetailState {
    pub note: Option<Note>,
    pub loading: bool,
    pub error: Option<String>,
}

impl NoteDetailState {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
    }

    pub(crate) fn loaded(&mut self, note: Note) {
        self.note = Some(note);
        self.loading = false;
        self.error = None;
    }

    pub(crate) fn deleted(&mut self) {
        self.note = None;
        self.loading = false;
        self.error = None;
    }

    pub(crate) fn failed(&mut self, message: &str) {
        self.loading = false;
        if self.error.is_none() {
            self.error = Some(message.to_string());
        }
    }
}

// The helpers below are the request half of each list-view action; the
// page applies the outcome to its `NoteListState` if it is still mounted.

pub(crate) async fn fetch_user_notes(api: &impl NotesApi, user_id: &str) -> ApiResult<Vec<Note>> {
    api.list_user_notes(user_id).await.inspect_err(|e| {
        tracing::error!(error = %e, user_id, "failed to fetch notes");
    })
}

pub(crate) async fn fetch_note(api: &impl NotesApi, id: &str) -> ApiResult<Note> {
    api.get_note(id).await.inspect_err(|e| {
        tracing::error!(error = %e, id, "failed to fetch note");
    })
}

pub(crate) async fn submit_create(api: &impl NotesApi, note: &NewNote) -> ApiResult<Note> {
    api.create_note(note).await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to create note");
    })
}

pub(crate) async fn submit_update(
    api: &impl NotesApi,
    id: &str,
    patch: &NotePatch,
) -> ApiResult<Note> {
    api.update_note(id, patch).await.inspect_err(|e| {
        tracing::error!(error = %e, id, "failed to update note");
    })
}

/// Ask first; `None` means the user declined and nothing was sent.
/// `on_confirmed` runs after a "yes" and before the request goes out (the
/// page raises its loading flag there).
pub(crate) async fn confirm_and_delete(
    api: &impl NotesApi,
    id: &str,
    confirm: impl FnOnce() -> bool,
    on_confirmed: impl FnOnce(),
) -> Option<ApiResult<()>> {
    if !confirm() {
        return None;
    }
    on_confirmed();
    Some(api.delete_note(id).await.inspect_err(|e| {
        tracing::error!(error = %e, id, "failed to delete note");
    }))
}


#[cfg(test)]
mod tests {
    use super::fake::note;
    use super::*;

    #[test]
    fn test_merge_replaces_matching_id_and_keeps_length() {
        let mut notes = vec![note("1", "a"), note("2", "b"), note("3", "c")];
        let outcome = merge_note(&mut notes, note("2", "B!"));
        assert_eq!(outcome, MergeOutcome::Replaced(1));
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[1].title, "B!");
        assert_eq!(notes[0].title, "a");
        assert_eq!(notes[2].title, "c");
    }

    #[test]
    fn test_merge_appends_new_id() {
        let mut notes = vec![note("1", "a")];
        assert_eq!(merge_note(&mut notes, note("9", "z")), MergeOutcome::Appended);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].id, "9");
    }

    #[test]
    fn test_merge_into_empty_list() {
        let mut notes = vec![];
        merge_note(&mut notes, note("1", "a"));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_remove_note_reports_whether_removed() {
        let mut notes = vec![note("1", "a")];
        assert!(!remove_note(&mut notes, "2"));
        assert!(remove_note(&mut notes, "1"));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_failed_keeps_first_error_until_success() {
        let mut s = NoteListState::default();
        s.begin();
        s.failed(CREATE_NOTE_ERROR);
        s.begin();
        s.failed(DELETE_NOTE_ERROR);
        assert_eq!(s.error.as_deref(), Some(CREATE_NOTE_ERROR));
        assert!(!s.loading);

        s.begin();
        s.created(note("1", "a"));
        assert!(s.error.is_none());
        assert!(!s.loading);
    }

    #[test]
    fn test_updated_replaces_entry() {
        let mut s = NoteListState::default();
        s.loaded(vec![note("1", "a"), note("2", "b")]);
        s.updated(note("1", "A"));
        assert_eq!(s.notes.len(), 2);
        assert_eq!(s.notes[0].title, "A");
    }

    #[test]
    fn test_detail_state_clears_error_only_on_success() {
        let mut s = NoteDetailState::default();
        s.begin();
        s.failed(LOAD_NOTE_ERROR);
        s.failed(UPDATE_NOTE_ERROR);
        assert_eq!(s.error.as_deref(), Some(LOAD_NOTE_ERROR));

        s.loaded(note("4", "d"));
        assert!(s.error.is_none());
        assert_eq!(s.note.as_ref().map(|n| n.id.as_str()), Some("4"));

        s.deleted();
        assert!(s.note.is_none());
    }
}
