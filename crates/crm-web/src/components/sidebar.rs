//! Sidebar menu of sections

use crate::context::use_console;
use crm_core::route::{join_base, section_path};
use crm_core::Section;
use leptos::prelude::*;

/// Sidebar with one entry per section
#[component]
pub fn Sidebar(
    sidebar_open: ReadSignal<bool>,
    set_sidebar_open: WriteSignal<bool>,
) -> impl IntoView {
    let ctx = use_console();
    let nav = ctx.nav;
    let base = ctx.console.config.base_prefix.clone();

    let items = Section::ALL
        .into_iter()
        .map(|section| {
            let navigator = ctx.console.navigator.clone();
            let href = join_base(&base, &section_path(section));
            view! {
                <li class="nav-item">
                    <a
                        href=href
                        class="sidebar-link"
                        class:active=move || nav.with(|s| s.active_section == section)
                        on:click=move |e| {
                            // Plain clicks go through the navigator; modified clicks open a tab
                            if !(e.ctrl_key() || e.meta_key() || e.shift_key()) {
                                e.prevent_default();
                                navigator.select_section(section);
                                set_sidebar_open.set(false);
                            }
                        }
                    >
                        <span class="sidebar-link-label">{section.label()}</span>
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <>
            // Backdrop overlay for mobile
            <Show when=move || sidebar_open.get()>
                <div
                    class="sidebar-backdrop"
                    on:click=move |_| set_sidebar_open.set(false)
                ></div>
            </Show>

            <aside class="sidebar" class:sidebar-open=move || sidebar_open.get()>
                <button
                    class="sidebar-close"
                    on:click=move |_| set_sidebar_open.set(false)
                    aria-label="Close sidebar"
                >
                    "✕"
                </button>

                <nav class="nav">
                    <ul class="nav-list">{items}</ul>
                </nav>
            </aside>
        </>
    }
}
