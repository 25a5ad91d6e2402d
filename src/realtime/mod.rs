use crate::models::{Note, NoteInvariantError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FeedError {
    Connect(String),
    NotText,
    Malformed(String),
    Invalid(NoteInvariantError),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Connect(e) => write!(f, "could not open push channel: {e}"),
            FeedError::NotText => write!(f, "push frame is not text"),
            FeedError::Malformed(e) => write!(f, "push payload is not a note: {e}"),
            FeedError::Invalid(e) => write!(f, "push payload rejected: {e}"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Decode one push frame. Shape is checked by the typed decode, then the note
/// invariants are checked before anything reaches view state.
pub(crate) fn decode_note_payload(raw: &str) -> Result<Note, FeedError> {
    let note: Note =
        serde_json::from_str(raw).map_err(|e| FeedError::Malformed(e.to_string()))?;
    note.validate().map_err(FeedError::Invalid)?;
    Ok(note)
}

/// Holder for at most one live connection.
///
/// Each `begin` bumps the generation and hands back the previous connection
/// so the caller can close it before opening a new one. A close notification
/// only clears the slot when it comes from the connection currently held.
#[derive(Debug)]
pub(crate) struct FeedSlot<C> {
    generation: u64,
    current: Option<(u64, C)>,
}

impl<C> Default for FeedSlot<C> {
    fn default() -> Self {
        Self {
            generation: 0,
            current: None,
        }
    }
}

impl<C> FeedSlot<C> {
    pub(crate) fn begin(&mut self) -> (u64, Option<C>) {
        self.generation += 1;
        (self.generation, self.current.take().map(|(_, c)| c))
    }

    pub(crate) fn install(&mut self, generation: u64, conn: C) -> Option<C> {
        if generation != self.generation {
            // A newer `begin` already happened; this connection is stale.
            return Some(conn);
        }
        self.current.replace((generation, conn)).map(|(_, c)| c)
    }

    pub(crate) fn take(&mut self) -> Option<C> {
        self.current.take().map(|(_, c)| c)
    }

    pub(crate) fn release_if_current(&mut self, generation: u64) -> Option<C> {
        match &self.current {
            Some((g, _)) if *g == generation => self.take(),
            _ => None,
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.current.is_some()
    }
}

struct Connection {
    socket: WebSocket,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl Connection {
    fn close(self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);
        if let Err(e) = self.socket.close() {
            tracing::warn!(error = ?e, "closing push channel failed");
        }
    }
}

/// The app's single push-channel connection. Owned by `AppState`; views call
/// `connect` on mount and `disconnect` on cleanup.
#[derive(Clone, Default)]
pub(crate) struct RealtimeFeed {
    slot: Rc<RefCell<FeedSlot<Connection>>>,
}

impl RealtimeFeed {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Open the channel, closing any previous one first. Every valid note is
    /// handed to `on_note`; bad frames are logged and skipped.
    ///
    /// Returns the connection's generation for [`RealtimeFeed::disconnect_if`].
    pub(crate) fn connect(
        &self,
        url: &str,
        on_note: impl Fn(Note) + 'static,
    ) -> Result<u64, FeedError> {
        let (generation, previous) = self.slot.borrow_mut().begin();
        if let Some(prev) = previous {
            tracing::debug!("closing previous push channel before reconnecting");
            prev.close();
        }

        let socket = WebSocket::new(url).map_err(|e| FeedError::Connect(format!("{e:?}")))?;

        let url_for_log = url.to_string();
        let on_open = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            tracing::info!(url = %url_for_log, "push channel connected");
        });

        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            let decoded = ev
                .data()
                .as_string()
                .ok_or(FeedError::NotText)
                .and_then(|raw| decode_note_payload(&raw));
            match decoded {
                Ok(note) => on_note(note),
                Err(e) => tracing::warn!(error = %e, "dropping push payload"),
            }
        });

        let on_error = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            tracing::warn!("push channel error");
        });

        let weak_slot = Rc::downgrade(&self.slot);
        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
            tracing::info!(code = ev.code(), "push channel disconnected");
            let Some(slot) = weak_slot.upgrade() else {
                return;
            };
            let released = slot.borrow_mut().release_if_current(generation);
            if let Some(conn) = released {
                // The connection owns this closure; drop it after the handler returns.
                leptos::task::spawn_local(async move { drop(conn) });
            }
        });

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let conn = Connection {
            socket,
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        };

        let stale = self.slot.borrow_mut().install(generation, conn);
        if let Some(stale) = stale {
            stale.close();
        }
        Ok(generation)
    }

    /// Close whatever is connected (logout).
    pub(crate) fn disconnect(&self) {
        let conn = self.slot.borrow_mut().take();
        if let Some(conn) = conn {
            conn.close();
        }
    }

    /// Close the connection opened as `generation`, if it is still the live
    /// one. A view tearing down after a newer view connected leaves the newer
    /// socket alone.
    pub(crate) fn disconnect_if(&self, generation: u64) {
        let conn = self.slot.borrow_mut().release_if_current(generation);
        match conn {
            Some(conn) => conn.close(),
            None => tracing::debug!(generation, "push channel already replaced"),
        }
    }
}
