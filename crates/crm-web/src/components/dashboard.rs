//! Dashboard: shortcuts into every section

use crate::components::CrossLink;
use crate::context::use_console;
use crm_core::Section;
use leptos::prelude::*;

#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_console();
    let greeting = ctx
        .console
        .session
        .get()
        .map(|s| format!("Welcome back, {}", s.identity.full_name))
        .unwrap_or_else(|| "Welcome".to_string());

    let cards = Section::ALL
        .into_iter()
        .filter(|s| *s != Section::Dashboard)
        .map(|section| {
            let navigator = ctx.console.navigator.clone();
            view! {
                <button class="stats-card" on:click=move |_| navigator.select_section(section)>
                    <span class="stats-card-label">{section.label()}</span>
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="page dashboard-page">
            <div class="page-header">
                <h2>{greeting}</h2>
            </div>
            <div class="stats-grid">{cards}</div>
            <div class="detail-section">
                <h3>"Open a record"</h3>
                <CrossLink />
            </div>
        </div>
    }
}
