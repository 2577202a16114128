//! Recovery Coordinator
//!
//! Turns the interceptor's authentication-failure events into one modal and,
//! on confirmation, a single clean logout.

use crate::auth::SuppressionWindow;
use crate::event::ConsoleEvent;
use crate::history::HistoryDriver;
use crate::navigation::Navigator;
use crate::route::{join_base, same_route, strip_base};
use crate::session::SessionStore;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

/// State of the recovery modal (`{isOpen, message?}`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryModal {
    pub is_open: bool,
    pub message: Option<String>,
}

/// Single owner of the logout flow
pub struct RecoveryCoordinator {
    session: SessionStore,
    navigator: Arc<Navigator>,
    history: Arc<dyn HistoryDriver>,
    window: Arc<SuppressionWindow>,
    modal: watch::Sender<RecoveryModal>,
}

impl RecoveryCoordinator {
    pub fn new(
        session: SessionStore,
        navigator: Arc<Navigator>,
        history: Arc<dyn HistoryDriver>,
        window: Arc<SuppressionWindow>,
    ) -> Self {
        let (modal, _) = watch::channel(RecoveryModal::default());
        Self {
            session,
            navigator,
            history,
            window,
            modal,
        }
    }

    pub fn modal(&self) -> RecoveryModal {
        self.modal.borrow().clone()
    }

    pub fn subscribe_modal(&self) -> watch::Receiver<RecoveryModal> {
        self.modal.subscribe()
    }

    /// Open the modal for an authentication failure
    pub fn on_auth_error(&self, message: Option<String>) {
        info!(message = ?message, "Session no longer valid, asking user to log in again");
        self.modal.send_replace(RecoveryModal {
            is_open: true,
            message,
        });
    }

    /// The modal has been rendered: close the suppression window so a later
    /// failure can be shown again.
    pub fn modal_shown(&self) {
        if self.modal.borrow().is_open {
            self.window.close();
            debug!("Recovery modal shown, suppression window closed");
        }
    }

    /// Close the modal only; the session stays (the failure may have been transient)
    pub fn dismiss(&self) {
        self.close_modal();
        self.window.close();
    }

    /// Clear the session, reset navigation, close the modal and go to the root.
    ///
    /// Runs in that order so an in-flight fetch cannot repopulate a selection
    /// under the dead session. A repeated call finds nothing to do and issues
    /// no history navigation. Returns whether anything changed.
    pub fn on_logout(&self) -> bool {
        let session_cleared = self.session.clear();

        let navigation_reset = !self.navigator.state().is_initial();
        self.navigator.reset();

        let modal_closed = self.close_modal();
        self.window.close();

        let base = self.navigator.base_prefix();
        let current = self.history.current_path();
        let navigated = !same_route(strip_base(&current, base), "/");
        if navigated {
            self.history.push(&join_base(base, "/"));
        }

        let changed = session_cleared || navigation_reset || modal_closed || navigated;
        if changed {
            info!(session_cleared, navigation_reset, modal_closed, navigated, "Logged out");
        } else {
            debug!("Logout requested but already logged out");
        }
        changed
    }

    /// Dispatch a bus event
    pub fn handle(&self, event: &ConsoleEvent) {
        if let ConsoleEvent::AuthenticationFailed { message } = event {
            self.on_auth_error(message.clone());
        }
    }

    /// Consume bus events until the bus is dropped
    pub async fn run(&self, mut events: broadcast::Receiver<ConsoleEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Recovery coordinator lagged behind the event bus");
                    // an open window with no modal means the failure event was among the skipped
                    if self.window.is_open() && !self.modal.borrow().is_open {
                        self.on_auth_error(None);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn close_modal(&self) -> bool {
        self.modal.send_if_modified(|modal| {
            if !modal.is_open {
                return false;
            }
            *modal = RecoveryModal::default();
            true
        })
    }
}

impl std::fmt::Debug for RecoveryCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryCoordinator")
            .field("modal", &*self.modal.borrow())
            .field("window_open", &self.window.is_open())
            .finish()
    }
}
