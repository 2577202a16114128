//! Detail Resolver (path -> state reconciliation)
//!
//! Runs on cold start and on back/forward. Resolution only ever *replaces*
//! history entries (corrections) and never feeds the state-to-path mirror.

use crate::error::CoreError;
use crate::models::{EntityKind, NavigationState, Section, SelectedEntity};
use crate::navigation::Navigator;
use crate::route::{join_base, parse_path, section_path, strip_base, Route};
use tracing::{debug, info, warn};

/// Outcome of resolving a path
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Root path
    Dashboard,
    /// Bare section list
    Section(Section),
    /// Record fetched and shown in its detail view
    Detail { kind: EntityKind, id: String },
    /// Record fetch failed; the kind's list is shown and the history corrected
    ListFallback { kind: EntityKind, error: CoreError },
    /// Unknown path; dashboard shown and the history corrected to the root
    Redirected { from: String },
    /// A newer transition happened while the fetch was in flight
    Superseded,
}

impl Navigator {
    /// Cold start: derive the state from the path the app was opened at
    pub async fn resolve_current(&self) -> Resolution {
        let path = self.history.current_path();
        self.resolve_path(&path).await
    }

    /// Back/forward: drop the previous selection, then re-resolve
    pub async fn on_history_change(&self) -> Resolution {
        self.next_generation();
        self.state.send_modify(NavigationState::clear_selection);
        self.resolve_current().await
    }

    /// Resolve a host path (base prefix included) into navigation state
    pub async fn resolve_path(&self, path: &str) -> Resolution {
        let generation = self.next_generation();
        let app_path = strip_base(path, &self.base_prefix);

        match parse_path(app_path) {
            Route::Detail { kind, id } => {
                let result = self.fetcher.fetch_record(kind, &id).await;
                if !self.is_current(generation) {
                    debug!(kind = %kind, id = %id, "Resolution superseded by a newer transition");
                    return Resolution::Superseded;
                }
                match result {
                    Ok(record) => {
                        self.state.send_modify(|s| {
                            if s.active_section != kind.section() {
                                s.search_term.clear();
                            }
                            s.selected = Some(SelectedEntity::new(kind, record));
                            s.active_section = kind.section();
                            s.is_detail_view = true;
                            s.is_nested_view = false;
                        });
                        debug!(kind = %kind, id = %id, "Resolved detail view");
                        Resolution::Detail { kind, id }
                    }
                    Err(error) => {
                        if error.is_auth_failure() {
                            info!(kind = %kind, id = %id, "Detail resolution hit an authentication failure, showing list");
                        } else {
                            warn!(kind = %kind, id = %id, error = %error, "Detail resolution failed, falling back to list");
                        }
                        self.show_section(kind.section());
                        let fallback = join_base(&self.base_prefix, &section_path(kind.section()));
                        self.history.replace(&fallback);
                        Resolution::ListFallback { kind, error }
                    }
                }
            }
            Route::Section(section) => {
                self.show_section(section);
                Resolution::Section(section)
            }
            Route::Dashboard => {
                self.show_section(Section::Dashboard);
                Resolution::Dashboard
            }
            Route::Unknown => {
                warn!(path = %path, "Unknown path, redirecting to dashboard");
                self.show_section(Section::Dashboard);
                self.history.replace(&join_base(&self.base_prefix, "/"));
                Resolution::Redirected {
                    from: path.to_string(),
                }
            }
        }
    }

    fn show_section(&self, section: Section) {
        self.state.send_modify(|s| {
            if s.active_section != section {
                s.search_term.clear();
            }
            s.clear_selection();
            s.active_section = section;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordFetcher;
    use crate::event::EventBus;
    use crate::history::{HistoryDriver, HistoryOp, MemoryHistory};
    use crate::models::EntityRecord;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct OnlyDeal;

    #[async_trait(?Send)]
    impl RecordFetcher for OnlyDeal {
        async fn fetch_record(&self, kind: EntityKind, id: &str) -> Result<EntityRecord, CoreError> {
            match (kind, id) {
                (EntityKind::Deal, "D-100") => Ok(EntityRecord::new("D-100")),
                _ => Err(CoreError::RecordNotFound {
                    kind,
                    id: id.to_string(),
                }),
            }
        }
    }

    fn navigator(path: &str, base: &str) -> (Navigator, Arc<MemoryHistory>) {
        let history = Arc::new(MemoryHistory::new(path));
        let nav = Navigator::new(history.clone(), Arc::new(OnlyDeal), EventBus::default(), base);
        (nav, history)
    }

    #[tokio::test]
    async fn test_cold_start_detail() {
        let (nav, history) = navigator("/deals/D-100", "");
        let resolution = nav.resolve_current().await;

        assert_eq!(
            resolution,
            Resolution::Detail {
                kind: EntityKind::Deal,
                id: "D-100".to_string()
            }
        );
        let state = nav.state();
        assert_eq!(state.active_section, Section::Deals);
        assert_eq!(state.selected_id(), Some("D-100"));
        assert!(state.is_detail_view);
        assert!(!state.is_nested_view);
        assert!(history.ops().is_empty());
    }

    #[tokio::test]
    async fn test_dead_link_falls_back_to_list_with_replace() {
        let (nav, history) = navigator("/deals/does-not-exist", "");
        let resolution = nav.resolve_current().await;

        assert!(matches!(
            resolution,
            Resolution::ListFallback {
                kind: EntityKind::Deal,
                error: CoreError::RecordNotFound { .. }
            }
        ));
        let state = nav.state();
        assert_eq!(state.active_section, Section::Deals);
        assert!(state.selected.is_none());
        assert!(!state.is_detail_view);
        assert_eq!(history.current_path(), "/deals");
        assert_eq!(history.len(), 1);
        assert_eq!(history.ops(), vec![HistoryOp::Replace("/deals".to_string())]);
    }

    #[tokio::test]
    async fn test_bare_section_and_dashboard() {
        let (nav, history) = navigator("/call-logs", "");
        assert_eq!(nav.resolve_current().await, Resolution::Section(Section::CallLogs));
        assert_eq!(nav.state().active_section, Section::CallLogs);

        assert_eq!(nav.resolve_path("/").await, Resolution::Dashboard);
        assert_eq!(nav.state().active_section, Section::Dashboard);
        assert!(history.ops().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_path_redirects_to_root() {
        let (nav, history) = navigator("/crm/settings/profile", "/crm");
        let resolution = nav.resolve_current().await;

        assert!(matches!(resolution, Resolution::Redirected { .. }));
        assert!(nav.state().is_initial());
        assert_eq!(history.ops(), vec![HistoryOp::Replace("/crm/".to_string())]);
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_base_prefix_is_stripped() {
        let (nav, _) = navigator("/crm/deals/D-100", "/crm");
        assert!(matches!(nav.resolve_current().await, Resolution::Detail { .. }));
    }

    #[tokio::test]
    async fn test_history_change_clears_selection_first() {
        let (nav, history) = navigator("/", "");
        nav.select_section(Section::Leads);
        nav.select_entity(EntityKind::Lead, EntityRecord::new("CRM-LEAD-1"));
        assert_eq!(history.current_path(), "/leads/CRM-LEAD-1");

        history.back();
        let resolution = nav.on_history_change().await;

        assert_eq!(resolution, Resolution::Section(Section::Leads));
        let state = nav.state();
        assert!(state.selected.is_none());
        assert!(!state.is_detail_view);
        assert_eq!(history.current_path(), "/leads");
    }

    #[tokio::test]
    async fn test_resolution_never_pushes() {
        let (nav, history) = navigator("/deals/D-100", "");
        nav.resolve_current().await;
        nav.resolve_path("/leads").await;
        nav.resolve_path("/nowhere").await;
        assert_eq!(history.push_count(), 0);
    }
}
