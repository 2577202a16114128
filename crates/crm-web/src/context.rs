//! Console handle shared through Leptos context

use crate::api::GlooFetcher;
use crm_core::{Console, HeldLists, NavigationState, Notice, RecoveryModal, Session};
use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tokio::sync::watch;

/// The wired core plus the signals the views read
#[derive(Clone)]
pub struct ConsoleContext {
    pub console: Console,
    /// List and record loader sharing the console's interceptor and session store
    pub loader: GlooFetcher,
    pub nav: RwSignal<NavigationState>,
    /// Lead and deal lists held by the navigator, save patches included
    pub lists: RwSignal<HeldLists>,
    pub modal: RwSignal<RecoveryModal>,
    pub signed_in: RwSignal<bool>,
}

impl ConsoleContext {
    pub fn new(console: Console) -> Self {
        let loader = GlooFetcher::new(
            console.config.api_base_url.clone(),
            console.interceptor.clone(),
            console.session.clone(),
        );
        let nav = RwSignal::new(console.navigator.state());
        let lists = RwSignal::new(HeldLists::new());
        let modal = RwSignal::new(console.recovery.modal());
        let signed_in = RwSignal::new(console.session.is_valid());

        bridge(console.navigator.subscribe(), nav);
        bridge(console.navigator.subscribe_lists(), lists);
        bridge(console.recovery.subscribe_modal(), modal);

        Self {
            console,
            loader,
            nav,
            lists,
            modal,
            signed_in,
        }
    }

    /// Store a freshly verified session and resolve whatever path is open
    pub fn login(&self, session: Session) {
        if let Err(e) = self.console.session.set(&session) {
            warn!("Could not persist session: {e}");
            return;
        }
        log!("Logged in as {}", session.identity.username);
        self.signed_in.set(true);
        self.resolve_current();
    }

    /// The single logout path
    pub fn logout(&self) {
        self.console.recovery.on_logout();
        self.signed_in.set(false);
    }

    pub fn resolve_current(&self) {
        let navigator = self.console.navigator.clone();
        spawn_local(async move {
            navigator.resolve_current().await;
        });
    }

    pub fn on_history_change(&self) {
        let navigator = self.console.navigator.clone();
        spawn_local(async move {
            navigator.on_history_change().await;
        });
    }

    /// Fire-and-forget cross-navigation; failures surface as notices or the recovery modal
    pub fn cross_navigate(&self, kind: String, id: String) {
        let navigator = self.console.navigator.clone();
        let events = self.console.events.clone();
        spawn_local(async move {
            match navigator.cross_navigate(&kind, &id).await {
                Err(e) if e.is_transient() => {
                    warn!("Could not open {kind} {id}: {e}");
                    events.notice(Notice::error(format!("Could not open {kind} {id}: {e}")));
                }
                _ => {}
            }
        });
    }
}

/// Mirror a watch channel into a signal
fn bridge<T>(mut rx: watch::Receiver<T>, signal: RwSignal<T>)
where
    T: Clone + Send + Sync + 'static,
{
    spawn_local(async move {
        while rx.changed().await.is_ok() {
            let value = rx.borrow_and_update().clone();
            signal.set(value);
        }
    });
}

/// Hook to access the console context
pub fn use_console() -> ConsoleContext {
    expect_context::<ConsoleContext>()
}
