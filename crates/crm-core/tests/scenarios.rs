//! End-to-end navigation and recovery scenarios

mod common;

use common::{fixture, EverythingExists};
use crm_core::history::HistoryOp;
use crm_core::{
    ConsoleEvent, EntityKind, EntityRecord, EventBus, HistoryDriver, MemoryHistory, Navigator,
    Resolution, Section,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::Notify;

#[tokio::test]
async fn test_menu_row_then_browser_back() {
    let f = fixture("/");
    let nav = &f.console.navigator;
    nav.resolve_current().await;

    nav.select_section(Section::Leads);
    assert_eq!(f.history.current_path(), "/leads");
    assert_eq!(nav.state().active_section, Section::Leads);
    assert!(!nav.state().is_detail_view);

    nav.select_entity(EntityKind::Lead, EntityRecord::new("CRM-LEAD-1"));
    assert_eq!(f.history.current_path(), "/leads/CRM-LEAD-1");
    let state = nav.state();
    assert_eq!(state.selected_kind(), Some(EntityKind::Lead));
    assert_eq!(state.selected_id(), Some("CRM-LEAD-1"));
    assert!(state.is_detail_view);

    f.history.back();
    nav.on_history_change().await;
    assert_eq!(f.history.current_path(), "/leads");
    let state = nav.state();
    assert!(state.selected.is_none());
    assert!(!state.is_detail_view);
    assert_eq!(state.active_section, Section::Leads);
}

#[tokio::test]
async fn test_browser_forward_refetches_detail() {
    let f = fixture("/");
    f.fetcher.record(EntityKind::Lead, "CRM-LEAD-1");
    let nav = &f.console.navigator;

    nav.select_section(Section::Leads);
    nav.select_entity(EntityKind::Lead, EntityRecord::new("CRM-LEAD-1"));
    f.history.back();
    nav.on_history_change().await;

    f.history.forward();
    let resolution = nav.on_history_change().await;
    assert_eq!(
        resolution,
        Resolution::Detail {
            kind: EntityKind::Lead,
            id: "CRM-LEAD-1".to_string()
        }
    );
    let record = nav.state().selected.unwrap().record;
    assert_eq!(record.field("status"), Some(&serde_json::json!("Open")));
}

#[tokio::test]
async fn test_cross_navigate_from_note_while_lead_selected() {
    let f = fixture("/");
    f.fetcher.record(EntityKind::Deal, "D-100");
    let nav = &f.console.navigator;

    nav.select_entity(EntityKind::Lead, EntityRecord::new("CRM-LEAD-1"));
    nav.cross_navigate("CRM Deal", "D-100").await.unwrap();

    let state = nav.state();
    assert!(state.selected_for(EntityKind::Lead).is_none());
    assert_eq!(state.selected_kind(), Some(EntityKind::Deal));
    assert_eq!(state.selected_id(), Some("D-100"));
    assert!(state.is_nested_view);
    assert_eq!(state.active_section, Section::Deals);
    assert_eq!(f.history.current_path(), "/deals/D-100");

    // every request read the session through the store
    assert_eq!(
        f.fetcher.seen_auth.lock().as_slice(),
        &[Some("token key:secret".to_string())]
    );
}

#[tokio::test]
async fn test_dead_link_fallback() {
    let f = fixture("/deals/does-not-exist");
    let nav = &f.console.navigator;

    let resolution = nav.resolve_current().await;
    assert!(matches!(resolution, Resolution::ListFallback { kind: EntityKind::Deal, .. }));

    let state = nav.state();
    assert_eq!(state.active_section, Section::Deals);
    assert!(state.selected.is_none());
    assert_eq!(f.history.current_path(), "/deals");
    assert_eq!(f.history.len(), 1);
    assert_eq!(f.history.ops(), vec![HistoryOp::Replace("/deals".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn test_two_auth_errors_before_modal_renders_show_one_modal() {
    let f = fixture("/");
    f.fetcher.session_expired(EntityKind::Deal, "D-1");
    f.fetcher.session_expired(EntityKind::Contact, "C-1");
    let mut rx = f.console.events.subscribe();
    let nav = &f.console.navigator;

    let first = nav.cross_navigate("deal", "D-1").await.unwrap_err();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = nav.cross_navigate("contact", "C-1").await.unwrap_err();
    assert!(first.is_auth_failure());
    assert!(second.is_auth_failure());

    let event = rx.try_recv().unwrap();
    assert!(matches!(event, ConsoleEvent::AuthenticationFailed { .. }));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    let recovery = &f.console.recovery;
    recovery.handle(&event);
    recovery.modal_shown();
    let modal = recovery.modal();
    assert!(modal.is_open);
    assert_eq!(modal.message.as_deref(), Some("Session expired, please log in again"));

    nav.select_section(Section::Notes);
    assert!(recovery.on_logout());
    assert!(!f.console.session.is_valid());
    assert_eq!(f.storage.removals(), 1);
    assert_eq!(f.history.current_path(), "/");
    assert!(nav.state().is_initial());
    assert!(!recovery.modal().is_open);
}

#[tokio::test]
async fn test_auth_error_after_modal_shown_raises_again() {
    let f = fixture("/");
    f.fetcher.session_expired(EntityKind::Deal, "D-1");
    let mut rx = f.console.events.subscribe();
    let nav = &f.console.navigator;
    let recovery = &f.console.recovery;

    let _ = nav.cross_navigate("deal", "D-1").await;
    recovery.handle(&rx.try_recv().unwrap());
    recovery.modal_shown();

    let _ = nav.cross_navigate("deal", "D-1").await;
    assert!(matches!(rx.try_recv(), Ok(ConsoleEvent::AuthenticationFailed { .. })));
}

#[tokio::test]
async fn test_coordinator_run_loop_opens_modal() {
    let f = fixture("/deals/D-9");
    f.fetcher.session_expired(EntityKind::Deal, "D-9");
    let rx = f.console.events.subscribe();

    let resolution = f.console.navigator.resolve_current().await;
    match resolution {
        Resolution::ListFallback { error, .. } => assert!(error.is_auth_failure()),
        other => panic!("unexpected resolution {other:?}"),
    }
    assert_eq!(f.history.current_path(), "/deals");

    let recovery = f.console.recovery.clone();
    let mut modal = recovery.subscribe_modal();
    let changed = tokio::select! {
        _ = recovery.run(rx) => None,
        changed = modal.changed() => Some(changed),
    };

    assert!(matches!(changed, Some(Ok(()))));
    assert!(modal.borrow().is_open);
}

#[tokio::test]
async fn test_logout_twice_is_noop() {
    let f = fixture("/");
    let nav = &f.console.navigator;
    let recovery = &f.console.recovery;

    nav.select_entity(EntityKind::Organization, EntityRecord::new("Acme"));
    let pushes_before = f.history.push_count();

    assert!(recovery.on_logout());
    assert!(!recovery.on_logout());

    assert_eq!(f.storage.removals(), 1);
    assert_eq!(f.history.push_count(), pushes_before + 1);
    assert_eq!(f.history.current_path(), "/");
}

#[tokio::test]
async fn test_logout_discards_inflight_fetch() {
    let history = Arc::new(MemoryHistory::new("/"));
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(GatedFetcher::default());
    fetcher.gates.lock().insert("D-1".to_string(), gate.clone());
    let nav = Navigator::new(history.clone(), fetcher, EventBus::default(), "");

    tokio::join!(
        async {
            nav.cross_navigate("deal", "D-1").await.unwrap();
        },
        async {
            nav.reset();
            gate.notify_one();
        }
    );

    assert!(nav.state().is_initial());
    assert_eq!(history.push_count(), 0);
}

#[tokio::test]
async fn test_rapid_cross_navigation_latest_request_wins() {
    let history = Arc::new(MemoryHistory::new("/"));
    let fetcher = Arc::new(GatedFetcher::default());
    let first = Arc::new(Notify::new());
    let second = Arc::new(Notify::new());
    fetcher.gates.lock().insert("D-1".to_string(), first.clone());
    fetcher.gates.lock().insert("D-2".to_string(), second.clone());
    let nav = Navigator::new(history.clone(), fetcher, EventBus::default(), "");

    tokio::join!(
        async {
            nav.cross_navigate("deal", "D-1").await.unwrap();
        },
        async {
            nav.cross_navigate("deal", "D-2").await.unwrap();
        },
        async {
            // the older request answers last
            second.notify_one();
            tokio::task::yield_now().await;
            first.notify_one();
        }
    );

    assert_eq!(nav.state().selected_id(), Some("D-2"));
    assert_eq!(history.current_path(), "/deals/D-2");
    assert_eq!(history.push_count(), 1);
}

#[tokio::test]
async fn test_unknown_path_on_cold_start() {
    let history = Arc::new(MemoryHistory::new("/reports/weekly"));
    let nav = Navigator::new(history.clone(), Arc::new(EverythingExists), EventBus::default(), "");

    assert!(matches!(nav.resolve_current().await, Resolution::Redirected { .. }));
    assert!(nav.state().is_initial());
    assert_eq!(history.current_path(), "/");
    assert_eq!(history.len(), 1);
}

/// Answers once the test releases the record's gate
#[derive(Default)]
struct GatedFetcher {
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

#[async_trait::async_trait(?Send)]
impl crm_core::RecordFetcher for GatedFetcher {
    async fn fetch_record(
        &self,
        _kind: EntityKind,
        id: &str,
    ) -> Result<EntityRecord, crm_core::CoreError> {
        let gate = self.gates.lock().get(id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(EntityRecord::new(id))
    }
}
