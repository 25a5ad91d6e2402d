pub mod guard;
pub mod layout;
pub mod note_card;
pub mod note_form;
pub mod ui;

pub use guard::{RequireAuth, RequireGuest};
pub use layout::AppLayout;
pub use note_card::NoteCard;
pub use note_form::NoteForm;
