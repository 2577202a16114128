//! "Open linked record" form used by activity pages

use crate::context::use_console;
use crm_core::EntityKind;
use leptos::prelude::*;

#[component]
pub fn CrossLink() -> impl IntoView {
    let ctx = use_console();
    let (kind, set_kind) = signal(EntityKind::Deal.as_str().to_string());
    let (id, set_id) = signal(String::new());

    let options = EntityKind::ALL
        .into_iter()
        .map(|k| view! { <option value=k.as_str()>{k.label()}</option> })
        .collect_view();

    view! {
        <form
            class="cross-link"
            on:submit=move |e| {
                e.prevent_default();
                ctx.cross_navigate(kind.get_untracked(), id.get_untracked().trim().to_string());
            }
        >
            <select
                class="filter-select"
                prop:value=move || kind.get()
                on:change=move |e| set_kind.set(event_target_value(&e))
            >
                {options}
            </select>
            <input
                type="text"
                class="search-input"
                placeholder="Record id"
                prop:value=move || id.get()
                on:input=move |e| set_id.set(event_target_value(&e))
            />
            <button type="submit" class="btn btn-primary">"Open"</button>
        </form>
    }
}
