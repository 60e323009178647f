use std::fmt;

use tokio::sync::watch;

use crate::{Block, StreamBuffer, render};

/// Identity of one request/stream/render lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Rendered form of both sections at one point in the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PlanView {
    pub meal_plan: Vec<Block>,
    pub shopping_list: Vec<Block>,
}

/// Display state for the plan being generated.
///
/// Every update is tagged with the session it belongs to. Starting a new
/// session supersedes the previous one, and anything arriving for a session
/// that is no longer active is ignored, so a slow stream cannot bleed into a
/// newer plan. Consumers can [`subscribe`](PlanState::subscribe) to learn the
/// moment their session stops being active.
#[derive(Debug)]
pub struct PlanState {
    last_id: u64,
    active: watch::Sender<Option<SessionId>>,
    buffer: StreamBuffer,
    loading: bool,
    error: Option<String>,
}

impl Default for PlanState {
    fn default() -> Self {
        Self {
            last_id: 0,
            active: watch::channel(None).0,
            buffer: StreamBuffer::default(),
            loading: false,
            error: None,
        }
    }
}

impl PlanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch the active session. The value changes on every begin, finish,
    /// failure and clear.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionId>> {
        self.active.subscribe()
    }

    pub fn active(&self) -> Option<SessionId> {
        *self.active.borrow()
    }

    /// Start a new session, discarding previous text and error.
    pub fn begin(&mut self) -> SessionId {
        self.last_id += 1;
        let id = SessionId(self.last_id);

        if let Some(previous) = self.active.send_replace(Some(id)) {
            tracing::debug!(%previous, current = %id, "Superseding active session");
        }

        self.buffer.reset();
        self.loading = true;
        self.error = None;

        id
    }

    pub fn is_active(&self, session: SessionId) -> bool {
        self.active() == Some(session)
    }

    /// Append a chunk for `session`. Returns `false` when the session is stale
    /// and the chunk was dropped.
    pub fn apply_chunk(&mut self, session: SessionId, chunk: &str) -> bool {
        if !self.is_active(session) {
            tracing::debug!(%session, len = chunk.len(), "Dropping chunk from stale session");
            return false;
        }

        self.buffer.push(chunk);
        true
    }

    /// Mark `session` as complete.
    pub fn finish(&mut self, session: SessionId) -> bool {
        if !self.is_active(session) {
            return false;
        }

        self.active.send_replace(None);
        self.loading = false;
        true
    }

    /// Abort `session` with an error. Text received so far stays visible.
    pub fn fail(&mut self, session: SessionId, detail: impl fmt::Display) -> bool {
        if !self.is_active(session) {
            tracing::debug!(%session, %detail, "Ignoring failure from stale session");
            return false;
        }

        self.active.send_replace(None);
        self.loading = false;
        self.error = Some(user_error_message(detail));
        true
    }

    /// Empty both sections and abandon any running session.
    pub fn clear(&mut self) {
        self.active.send_replace(None);
        self.loading = false;
        self.buffer.reset();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn buffer(&self) -> &StreamBuffer {
        &self.buffer
    }

    pub fn meal_plan(&self) -> &str {
        self.buffer.meal_plan()
    }

    pub fn shopping_list(&self) -> &str {
        self.buffer.shopping_list()
    }

    pub fn has_content(&self) -> bool {
        !self.meal_plan().is_empty() || !self.shopping_list().is_empty()
    }

    /// Re-render both sections from the current buffer.
    pub fn view(&self) -> PlanView {
        PlanView {
            meal_plan: render(self.meal_plan()),
            shopping_list: render(self.shopping_list()),
        }
    }
}

pub fn user_error_message(detail: impl fmt::Display) -> String {
    format!(
        "An error occurred while generating the meal plan: {detail}. Please check your API key and try again."
    )
}
