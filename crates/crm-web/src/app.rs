//! Main Leptos App component
//!
//! Builds the console once, wires the browser seams into it and renders the
//! shell. History is driven by the navigator, not by a router.

use crate::api::GlooFetcher;
use crate::browser::{web_config, BrowserHistory, LocalStorage};
use crate::components::{
    Dashboard, EmptyState, Header, LoginForm, RecordView, RecoveryModal, SectionView, Sidebar,
    ToastProvider,
};
use crate::context::{use_console, ConsoleContext};
use crm_core::{Console, EntityKind, RecordFetcher, Section};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;

/// What the content area shows
#[derive(Debug, Clone, Copy, PartialEq)]
enum Page {
    Dashboard,
    List(EntityKind),
    Detail,
    Other(Section),
}

/// Main App component
#[component]
pub fn App() -> impl IntoView {
    let config = web_config();
    let api_base = config.api_base_url.clone();
    let console = Console::new(
        config,
        Arc::new(BrowserHistory),
        Arc::new(LocalStorage::default()),
        move |interceptor, session| {
            Arc::new(GlooFetcher::new(api_base, interceptor, session)) as Arc<dyn RecordFetcher>
        },
    );

    let recovery = console.recovery.clone();
    let auth_events = console.events.subscribe();
    spawn_local(async move { recovery.run(auth_events).await });

    let ctx = ConsoleContext::new(console);
    provide_context(ctx.clone());

    // Browser back/forward
    let popstate_ctx = ctx.clone();
    let _ = leptos::leptos_dom::helpers::window_event_listener(leptos::ev::popstate, move |_| {
        if popstate_ctx.signed_in.get_untracked() {
            popstate_ctx.on_history_change();
        }
    });

    // Cold start
    if ctx.signed_in.get_untracked() {
        ctx.resolve_current();
    }

    let signed_in = ctx.signed_in;

    view! {
        <ToastProvider>
            <Show when=move || signed_in.get() fallback=|| view! { <LoginForm /> }>
                <Shell />
            </Show>
            <RecoveryModal />
        </ToastProvider>
    }
}

#[component]
fn Shell() -> impl IntoView {
    // Mobile sidebar state
    let (sidebar_open, set_sidebar_open) = signal(false);

    view! {
        <div class="app">
            <Header sidebar_open set_sidebar_open />
            <div class="layout">
                <Sidebar sidebar_open set_sidebar_open />
                <main class="content">
                    <Content />
                </main>
            </div>
        </div>
    }
}

#[component]
fn Content() -> impl IntoView {
    let nav = use_console().nav;
    let page = Memo::new(move |_| {
        nav.with(|s| {
            if s.selected.is_some() {
                Page::Detail
            } else if s.active_section == Section::Dashboard {
                Page::Dashboard
            } else if let Some(kind) = s.active_section.entity_kind() {
                Page::List(kind)
            } else {
                Page::Other(s.active_section)
            }
        })
    });

    let detail = move || {
        nav.with(|s| s.selected.clone().map(|selected| (selected, s.is_nested_view)))
            .map(|(selected, nested)| view! { <RecordView selected nested /> })
    };

    view! {
        {move || match page.get() {
            Page::Dashboard => view! { <Dashboard /> }.into_any(),
            Page::List(kind) => view! { <SectionView kind /> }.into_any(),
            Page::Other(section) => view! { <EmptyState section /> }.into_any(),
            Page::Detail => view! { {detail} }.into_any(),
        }}
    }
}
