//! Toast notices fed by the console event bus

use crate::context::use_console;
use crm_core::{ConsoleEvent, Notice, NoticeLevel};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

/// Single toast notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: usize,
    pub message: String,
    pub level: NoticeLevel,
    pub auto_dismiss_ms: Option<u64>,
}

impl Toast {
    pub fn from_notice(id: usize, notice: Notice) -> Self {
        let auto_dismiss_ms = match notice.level {
            NoticeLevel::Error => Some(5000), // Errors stay longer
            _ => Some(3000),
        };
        Self {
            id,
            message: notice.message,
            level: notice.level,
            auto_dismiss_ms,
        }
    }

    fn icon(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Warning => "⚠️",
            NoticeLevel::Error => "❌",
        }
    }

    fn class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "toast-info",
            NoticeLevel::Warning => "toast-warning",
            NoticeLevel::Error => "toast-error",
        }
    }
}

/// Toast context for managing global toast state
#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<usize>,
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn show(&self, notice: Notice) {
        let id = self.next_id.get_untracked();
        self.next_id.update(|n| *n += 1);

        let toast = Toast::from_notice(id, notice);
        let auto_dismiss_ms = toast.auto_dismiss_ms;
        self.toasts.update(|toasts| toasts.push(toast));

        if let Some(ms) = auto_dismiss_ms {
            let toasts = self.toasts;
            set_timeout(
                move || toasts.update(|toasts| toasts.retain(|t| t.id != id)),
                Duration::from_millis(ms),
            );
        }
    }

    pub fn dismiss(&self, id: usize) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.get()
    }
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps the app root; every `Notice` on the bus becomes a toast
#[component]
pub fn ToastProvider(children: Children) -> impl IntoView {
    let toast_context = ToastContext::new();
    provide_context(toast_context);

    let mut events = use_console().console.events.subscribe();
    spawn_local(async move {
        loop {
            match events.recv().await {
                Ok(ConsoleEvent::Notice(notice)) => toast_context.show(notice),
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    view! {
        {children()}
        <ToastContainer />
    }
}

#[component]
fn ToastContainer() -> impl IntoView {
    let toast_context = expect_context::<ToastContext>();

    view! {
        <div class="toast-container">
            <For
                each=move || toast_context.toasts()
                key=|toast| toast.id
                children=move |toast| view! { <ToastItem toast=toast /> }
            />
        </div>
    }
}

#[component]
fn ToastItem(toast: Toast) -> impl IntoView {
    let toast_context = expect_context::<ToastContext>();
    let id = toast.id;
    let icon = toast.icon();
    let class = toast.class();

    view! {
        <div class=format!("toast {}", class)>
            <div class="toast-content">
                <span class="toast-icon">{icon}</span>
                <span class="toast-message">{toast.message}</span>
            </div>
            <button
                class="toast-close"
                on:click=move |_| toast_context.dismiss(id)
                aria-label="Dismiss"
            >
                "×"
            </button>
        </div>
    }
}
