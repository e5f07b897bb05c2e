//! The single rendering target, guarded by a monotonic request sequence.
//!
//! Every presentation (live submission or history selection) starts with
//! [`ResultDisplay::begin`], which flips the display to pending and hands out
//! a [`RequestToken`]. Only the token issued most recently may settle the
//! display; older tokens are dropped, so a slow request can never overwrite
//! the result of one started after it.

use std::fmt;

use shared::domain::RequestSeq;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::{
    outcome::ClassificationOutcome,
    render::{render, DisplayFragment},
};

pub const PENDING_TEXT: &str = "AI Processing...";
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Idle,
    Pending {
        seq: RequestSeq,
    },
    Rendered {
        seq: RequestSeq,
        fragment: DisplayFragment,
    },
    Errored {
        seq: RequestSeq,
        fragment: DisplayFragment,
    },
}

impl UiState {
    pub fn is_pending(&self) -> bool {
        matches!(self, UiState::Pending { .. })
    }

    pub fn fragment(&self) -> Option<&DisplayFragment> {
        match self {
            UiState::Rendered { fragment, .. } | UiState::Errored { fragment, .. } => {
                Some(fragment)
            }
            UiState::Idle | UiState::Pending { .. } => None,
        }
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiState::Idle => Ok(()),
            UiState::Pending { .. } => f.write_str(PENDING_TEXT),
            UiState::Rendered { fragment, .. } | UiState::Errored { fragment, .. } => {
                write!(f, "{fragment}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    Pending {
        seq: RequestSeq,
    },
    Updated {
        seq: RequestSeq,
        fragment: DisplayFragment,
    },
    Superseded {
        seq: RequestSeq,
    },
}

/// Proof that a presentation was started. Consumed when it settles.
#[must_use = "a request token must be settled or the display stays pending"]
#[derive(Debug)]
pub struct RequestToken {
    seq: RequestSeq,
}

impl RequestToken {
    pub fn seq(&self) -> RequestSeq {
        self.seq
    }
}

struct DisplayInner {
    last_issued: u64,
    state: UiState,
}

pub struct ResultDisplay {
    inner: Mutex<DisplayInner>,
    events: broadcast::Sender<DisplayEvent>,
}

impl Default for ResultDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultDisplay {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(DisplayInner {
                last_issued: 0,
                state: UiState::Idle,
            }),
            events,
        }
    }

    /// Switches to the pending indicator, discarding whatever was shown.
    pub async fn begin(&self) -> RequestToken {
        let mut inner = self.inner.lock().await;
        inner.last_issued += 1;
        let seq = RequestSeq(inner.last_issued);
        inner.state = UiState::Pending { seq };
        let _ = self.events.send(DisplayEvent::Pending { seq });
        debug!(seq = seq.0, "display: pending");
        RequestToken { seq }
    }

    /// Renders `outcome` if `token` is still the latest one issued.
    /// Returns whether the display was updated.
    pub async fn settle(&self, token: RequestToken, outcome: &ClassificationOutcome) -> bool {
        let seq = token.seq;
        let mut inner = self.inner.lock().await;
        if seq.0 != inner.last_issued {
            debug!(
                seq = seq.0,
                latest = inner.last_issued,
                "display: dropping superseded outcome"
            );
            let _ = self.events.send(DisplayEvent::Superseded { seq });
            return false;
        }

        let fragment = render(outcome);
        inner.state = if fragment.is_failure() {
            UiState::Errored {
                seq,
                fragment: fragment.clone(),
            }
        } else {
            UiState::Rendered {
                seq,
                fragment: fragment.clone(),
            }
        };
        let _ = self.events.send(DisplayEvent::Updated { seq, fragment });
        true
    }

    pub async fn snapshot(&self) -> UiState {
        self.inner.lock().await.state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DisplayEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
