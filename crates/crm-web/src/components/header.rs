//! Header component

use crate::context::use_console;
use leptos::prelude::*;

/// Header with logo, search box, signed-in user and logout
#[component]
pub fn Header(
    sidebar_open: ReadSignal<bool>,
    set_sidebar_open: WriteSignal<bool>,
) -> impl IntoView {
    let ctx = use_console();
    let nav = ctx.nav;
    let navigator = ctx.console.navigator.clone();
    let user = ctx
        .console
        .session
        .get()
        .map(|s| s.identity.full_name)
        .unwrap_or_default();
    let logout_ctx = ctx.clone();

    view! {
        <header class="header">
            <button
                class="hamburger"
                on:click=move |_| set_sidebar_open.update(|v| *v = !*v)
                aria-label="Toggle sidebar"
                aria-expanded=move || sidebar_open.get().to_string()
            >
                <span class="hamburger-icon">"☰"</span>
            </button>

            <div class="header-content">
                <h1 class="logo">"CRM Console"</h1>
                <Show when=move || nav.with(|s| s.shows_list_header())>
                    <input
                        type="search"
                        class="search-input"
                        placeholder="Search..."
                        prop:value=move || nav.with(|s| s.search_term.clone())
                        on:input={
                            let navigator = navigator.clone();
                            move |e| navigator.set_search_term(event_target_value(&e))
                        }
                    />
                </Show>
            </div>

            <div class="header-user">
                <span class="header-user-name">{user}</span>
                <button class="btn btn-secondary" on:click=move |_| logout_ctx.logout()>
                    "Log out"
                </button>
            </div>
        </header>
    }
}
