//! List view of an entity section

use crate::context::use_console;
use crm_core::{EntityKind, EntityRecord, Navigator};
use leptos::prelude::*;
use serde_json::Value;
use std::sync::Arc;

/// First page of `kind` records; a row click opens the detail view
#[component]
pub fn SectionView(kind: EntityKind) -> impl IntoView {
    let ctx = use_console();
    let nav = ctx.nav;
    let held = ctx.lists;
    let navigator = ctx.console.navigator.clone();

    let rows_resource = LocalResource::new({
        let fetcher = ctx.loader.clone();
        let navigator = navigator.clone();
        move || {
            let fetcher = fetcher.clone();
            let navigator = navigator.clone();
            async move {
                let result = fetcher.fetch_list(kind).await;
                if let Ok(records) = &result {
                    navigator.set_list(kind, records.clone());
                }
                result
            }
        }
    });

    let filtered = Memo::new(move |_| {
        let term = nav.with(|s| s.search_term.to_lowercase());
        rows_resource.get().map(|result| {
            result
                .as_ref()
                .map(|loaded| {
                    // held rows carry save patches; kinds not held render as loaded
                    let held_rows = if kind.is_list_backed() {
                        held.with(|lists| lists.get(&kind).cloned())
                    } else {
                        None
                    };
                    held_rows
                        .unwrap_or_else(|| loaded.clone())
                        .into_iter()
                        .filter(|r| term.is_empty() || matches_term(r, &term))
                        .collect::<Vec<_>>()
                })
                .map_err(|e| e.to_string())
        })
    });

    view! {
        <div class="page section-page">
            <div class="page-header">
                <h2>{kind.section().label()}</h2>
            </div>
            <Suspense fallback=|| view! { <div class="loading">"Loading..."</div> }>
                {move || {
                    let navigator = navigator.clone();
                    filtered
                        .get()
                        .map(|result| match result {
                            Ok(records) if records.is_empty() => {
                                view! { <div class="empty">"No records"</div> }.into_any()
                            }
                            Ok(records) => {
                                view! { <RecordTable kind records on_select=navigator /> }
                                    .into_any()
                            }
                            Err(message) => {
                                view! { <div class="error">{message}</div> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn RecordTable(
    kind: EntityKind,
    records: Vec<EntityRecord>,
    on_select: Arc<Navigator>,
) -> impl IntoView {
    let rows = records
        .into_iter()
        .map(|record| {
            let navigator = on_select.clone();
            let title = record.title();
            let id = record.id.clone();
            view! {
                <tr class="clickable" on:click=move |_| navigator.select_entity(kind, record.clone())>
                    <td>{id}</td>
                    <td>{title}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <table class="record-table">
            <thead>
                <tr>
                    <th>"ID"</th>
                    <th>{kind.label()}</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
}

fn matches_term(record: &EntityRecord, term: &str) -> bool {
    record.id.to_lowercase().contains(term)
        || record.fields.values().any(|value| match value {
            Value::String(s) => s.to_lowercase().contains(term),
            _ => false,
        })
}
