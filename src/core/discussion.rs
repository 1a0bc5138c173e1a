//! # Discussion Log
//!
//! The ordered transcript of exchanges (one query + its response).
//!
//! ```text
//! Exchange lifecycle:
//!
//!   Pending ──► Answered(text)
//!      │
//!      └──────► Failed
//! ```
//!
//! The log is append-only. The only mutation besides `append` is resolving a
//! pending exchange in place, looked up by id in the *current* log. Both
//! mutations bump `revision` so observers (auto-scroll) can tell that the log
//! changed without diffing it.

use chrono::{DateTime, Local};
use log::{debug, warn};

/// Text shown for an exchange whose response has not arrived yet.
pub const PLACEHOLDER_RESPONSE: &str = "generating...";

/// Text shown for an exchange whose query failed, whatever the cause.
pub const ERROR_RESPONSE: &str = "server error: no response could be retrieved";

/// Response side of an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Pending,
    Answered(String),
    Failed,
}

impl Response {
    /// The text to display for this response.
    pub fn text(&self) -> &str {
        match self {
            Response::Pending => PLACEHOLDER_RESPONSE,
            Response::Answered(text) => text,
            Response::Failed => ERROR_RESPONSE,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Response::Pending)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub id: usize,
    pub query: String,
    pub response: Response,
    pub asked_at: DateTime<Local>,
}

/// Why a resolve was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    UnknownId(usize),
    AlreadyResolved(usize),
}

#[derive(Debug, Default)]
pub struct DiscussionLog {
    exchanges: Vec<Exchange>,
    revision: u64,
}

impl DiscussionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pending exchange and returns its id (the log length before the append).
    pub fn append_pending(&mut self, query: String) -> usize {
        let id = self.exchanges.len();
        debug!("Appending pending exchange {} ({} bytes)", id, query.len());
        self.exchanges.push(Exchange {
            id,
            query,
            response: Response::Pending,
            asked_at: Local::now(),
        });
        self.revision += 1;
        id
    }

    /// Replaces the pending response of exchange `id`.
    ///
    /// `Some(text)` becomes `Answered(text)` verbatim, `None` becomes `Failed`.
    /// The exchange keeps its id and position.
    pub fn resolve(&mut self, id: usize, answer: Option<String>) -> Result<(), ResolveError> {
        let Some(exchange) = self.exchanges.iter_mut().find(|e| e.id == id) else {
            warn!("Resolve for unknown exchange {}", id);
            return Err(ResolveError::UnknownId(id));
        };
        if !exchange.response.is_pending() {
            warn!("Exchange {} already resolved, ignoring", id);
            return Err(ResolveError::AlreadyResolved(id));
        }

        exchange.response = match answer {
            Some(text) => Response::Answered(text),
            None => Response::Failed,
        };
        self.revision += 1;
        Ok(())
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn latest(&self) -> Option<&Exchange> {
        self.exchanges.last()
    }

    /// The exchange currently awaiting a response, if any.
    pub fn pending(&self) -> Option<&Exchange> {
        self.exchanges.iter().find(|e| e.response.is_pending())
    }

    /// Incremented on every committed mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
