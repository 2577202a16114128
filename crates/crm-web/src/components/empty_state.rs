//! Placeholder for sections rendered by their own pages

use crate::components::CrossLink;
use crate::context::use_console;
use crm_core::Section;
use leptos::prelude::*;

/// Sections without a record list of their own (notes, tasks, ...)
#[component]
pub fn EmptyState(section: Section) -> impl IntoView {
    let navigator = use_console().console.navigator;
    let description = match section {
        Section::Notes | Section::Tasks | Section::CallLogs => {
            "Activity pages link to the records they belong to. Open one by id below."
        }
        Section::Reminders | Section::Todos | Section::Notifications => {
            "This page shows one item at a time and has no list header."
        }
        _ => "Nothing to show here yet.",
    };

    view! {
        <div class="empty-state">
            <h2 class="empty-state-title">{section.label()}</h2>
            <p class="empty-state-description">{description}</p>

            <CrossLink />

            <div class="empty-state-actions">
                <button
                    class="btn btn-primary"
                    on:click=move |_| navigator.select_section(Section::Dashboard)
                >
                    "Back to Dashboard"
                </button>
            </div>
        </div>
    }
}
