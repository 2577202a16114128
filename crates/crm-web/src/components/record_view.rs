//! Detail view of the selected record

use crate::context::use_console;
use crm_core::models::SelectedEntity;
use crm_core::RecordFetcher;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

/// Generic field table for whichever record is selected
#[component]
pub fn RecordView(selected: SelectedEntity, nested: bool) -> impl IntoView {
    let ctx = use_console();
    let kind = selected.kind;
    let record = selected.record;
    let id = record.id.clone();

    let back = {
        let navigator = ctx.console.navigator.clone();
        move |_| navigator.back(kind)
    };

    // Refetch and patch the open view and the held list
    let (reloading, set_reloading) = signal(false);
    let reload = {
        let ctx = ctx.clone();
        let id = id.clone();
        move |_| {
            let navigator = ctx.console.navigator.clone();
            let fetcher = ctx.loader.clone();
            let id = id.clone();
            set_reloading.set(true);
            spawn_local(async move {
                match fetcher.fetch_record(kind, &id).await {
                    Ok(record) => {
                        navigator.save(kind, record);
                    }
                    Err(e) => warn!("Reloading {kind} {id} failed: {e}"),
                }
                set_reloading.set(false);
            });
        }
    };

    let mut fields: Vec<(String, String)> = record
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), display_value(value)))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let rows = fields
        .into_iter()
        .map(|(key, value)| {
            view! {
                <div class="detail-item">
                    <span class="detail-label">{key}</span>
                    <span class="detail-value">{value}</span>
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="page record-page">
            <div class="page-header">
                <button class="btn btn-secondary" on:click=back>
                    "← " {kind.section().label()}
                </button>
                <h2>{record.title()}</h2>
                <span class="badge">{kind.label()}</span>
                {nested.then(|| view! { <span class="badge badge-muted">"Linked"</span> })}
                <div class="page-actions">
                    <button
                        class="btn btn-secondary"
                        disabled=move || reloading.get()
                        on:click=reload
                    >
                        "Reload"
                    </button>
                </div>
            </div>
            <div class="detail-section">
                <div class="detail-grid">
                    <div class="detail-item">
                        <span class="detail-label">"ID"</span>
                        <span class="detail-value">{id}</span>
                    </div>
                    {rows}
                </div>
            </div>
        </div>
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
