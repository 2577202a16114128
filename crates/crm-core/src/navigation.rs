//! Navigation State Machine
//!
//! Owns the [`NavigationState`] and mirrors it into the host history after
//! every user-driven transition. Path-to-state resolution lives in
//! [`crate::resolver`] and never triggers the mirror.
//!
//! Every transition bumps a request generation; a record fetch only applies
//! its result if no newer transition happened while it was in flight.

use crate::api::RecordFetcher;
use crate::error::CoreError;
use crate::event::{EventBus, Notice};
use crate::history::HistoryDriver;
use crate::models::{EntityKind, EntityRecord, NavigationState, Section, SelectedEntity};
use crate::route::{join_base, same_route, state_to_path, strip_base};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

/// Lead and deal lists held for the list views
pub type HeldLists = HashMap<EntityKind, Vec<EntityRecord>>;

/// The navigation state machine
pub struct Navigator {
    pub(crate) state: watch::Sender<NavigationState>,

    /// Lead and deal lists held for the list views, patched on save
    lists: watch::Sender<HeldLists>,

    pub(crate) history: Arc<dyn HistoryDriver>,
    pub(crate) fetcher: Arc<dyn RecordFetcher>,
    events: EventBus,
    pub(crate) base_prefix: String,
    generation: AtomicU64,
}

impl Navigator {
    /// Create a navigator in the initial (dashboard) state.
    ///
    /// Call [`Navigator::resolve_current`] afterwards to derive the state from
    /// the path the app was opened at.
    pub fn new(
        history: Arc<dyn HistoryDriver>,
        fetcher: Arc<dyn RecordFetcher>,
        events: EventBus,
        base_prefix: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(NavigationState::default());
        let (lists, _) = watch::channel(HeldLists::new());
        Self {
            state,
            lists,
            history,
            fetcher,
            events,
            base_prefix: base_prefix.into(),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    pub fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    pub(crate) fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }

    /// Push the path of the current state unless the host already shows it
    fn mirror(&self) {
        let target = state_to_path(&self.state.borrow());
        let current = self.history.current_path();
        if same_route(strip_base(&current, &self.base_prefix), &target) {
            trace!(path = %target, "Mirror skipped, path unchanged");
            return;
        }
        let full = join_base(&self.base_prefix, &target);
        debug!(from = %current, to = %full, "Mirroring navigation state");
        self.history.push(&full);
    }

    // ===================
    // User-driven transitions (mirrored)
    // ===================

    /// Menu click: show a section's list (or the dashboard)
    pub fn select_section(&self, section: Section) {
        self.next_generation();
        self.state.send_modify(|s| {
            s.clear_selection();
            s.search_term.clear();
            s.active_section = section;
        });
        self.mirror();
    }

    /// Row click: open an already hydrated record.
    ///
    /// A record without an id is refused; its path would resolve to the list.
    pub fn select_entity(&self, kind: EntityKind, record: EntityRecord) {
        if record.id.trim().is_empty() {
            warn!(kind = %kind, "Selection of a record without an id");
            self.events
                .notice(Notice::warning(format!("This {} has no id yet", kind.label())));
            return;
        }
        self.next_generation();
        self.state.send_modify(|s| {
            s.selected = Some(SelectedEntity::new(kind, record));
            s.active_section = kind.section();
            s.is_detail_view = true;
            s.is_nested_view = false;
        });
        self.mirror();
    }

    /// Open a record referenced from an unrelated page, fetching it by id.
    ///
    /// The selection is cleared while the fetch is in flight. On failure the
    /// previous state comes back and the history is left alone.
    pub async fn cross_navigate(&self, kind: &str, id: &str) -> Result<(), CoreError> {
        let Some(entity_kind) = EntityKind::parse(kind) else {
            warn!(kind = %kind, id = %id, "Cross-navigation to unsupported kind");
            self.events
                .notice(Notice::warning(format!("Cannot open \"{kind}\" records from here")));
            return Err(CoreError::UnsupportedKind {
                kind: kind.to_string(),
            });
        };
        if id.trim().is_empty() {
            warn!(kind = %entity_kind, "Cross-navigation without a record id");
            self.events
                .notice(Notice::warning(format!("No {} to open", entity_kind.label())));
            return Err(CoreError::RecordNotFound {
                kind: entity_kind,
                id: id.to_string(),
            });
        }

        let generation = self.next_generation();
        let previous = self.state();
        self.state.send_modify(NavigationState::clear_selection);

        match self.fetcher.fetch_record(entity_kind, id).await {
            Ok(record) => {
                if !self.is_current(generation) {
                    debug!(kind = %entity_kind, id = %id, "Discarding stale cross-navigation result");
                    return Ok(());
                }
                self.state.send_modify(|s| {
                    s.selected = Some(SelectedEntity::new(entity_kind, record));
                    s.active_section = entity_kind.section();
                    s.is_detail_view = true;
                    s.is_nested_view = true;
                    s.search_term.clear();
                });
                self.mirror();
                Ok(())
            }
            Err(e) => {
                if self.is_current(generation) {
                    self.state.send_replace(previous);
                }
                if e.is_auth_failure() {
                    debug!(kind = %entity_kind, id = %id, "Cross-navigation stopped by authentication failure");
                } else {
                    warn!(kind = %entity_kind, id = %id, error = %e, "Cross-navigation fetch failed");
                }
                Err(e)
            }
        }
    }

    /// Explicit "back" affordance of a detail view: return to the kind's list
    pub fn back(&self, kind: EntityKind) {
        self.next_generation();
        self.state.send_modify(|s| {
            s.clear_selection();
            s.active_section = kind.section();
        });
        self.mirror();
    }

    /// A form saved `record`: refresh the open detail view and the held list.
    ///
    /// Returns whether anything displayed was updated.
    pub fn save(&self, kind: EntityKind, record: EntityRecord) -> bool {
        let detail_updated = self.state.send_if_modified(|s| match &mut s.selected {
            Some(selected) if selected.kind == kind && selected.record.id == record.id => {
                selected.record = record.clone();
                true
            }
            _ => false,
        });

        let list_updated = kind.is_list_backed()
            && self.lists.send_if_modified(|lists| {
                match lists
                    .get_mut(&kind)
                    .and_then(|list| list.iter_mut().find(|r| r.id == record.id))
                {
                    Some(entry) => {
                        *entry = record;
                        true
                    }
                    None => false,
                }
            });

        debug!(kind = %kind, detail_updated, list_updated, "Record saved");
        detail_updated || list_updated
    }

    /// Search box input; never changes the path
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.state.send_if_modified(|s| {
            if s.search_term == term {
                return false;
            }
            s.search_term = term;
            true
        });
        self.mirror();
    }

    // ===================
    // Held lists
    // ===================

    /// Hand the navigator the list a list view loaded
    pub fn set_list(&self, kind: EntityKind, records: Vec<EntityRecord>) {
        if !kind.is_list_backed() {
            debug!(kind = %kind, "Ignoring list for a kind that is not held locally");
            return;
        }
        self.lists.send_modify(|lists| {
            lists.insert(kind, records);
        });
    }

    pub fn list(&self, kind: EntityKind) -> Vec<EntityRecord> {
        self.lists.borrow().get(&kind).cloned().unwrap_or_default()
    }

    /// Receive every change to the held lists, including save patches
    pub fn subscribe_lists(&self) -> watch::Receiver<HeldLists> {
        self.lists.subscribe()
    }

    // ===================
    // Reset
    // ===================

    /// Back to the initial state with no held lists; in-flight fetches are
    /// discarded. Does not touch the history.
    pub fn reset(&self) {
        self.next_generation();
        self.state.send_if_modified(|s| {
            if s.is_initial() {
                return false;
            }
            *s = NavigationState::default();
            true
        });
        self.lists.send_if_modified(|lists| {
            if lists.is_empty() {
                return false;
            }
            lists.clear();
            true
        });
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("state", &*self.state.borrow())
            .field("base_prefix", &self.base_prefix)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}
