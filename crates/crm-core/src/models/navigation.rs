//! What the console is currently displaying

use super::entity::{EntityKind, EntityRecord, Section};
use serde::{Deserialize, Serialize};

/// The one entity currently opened in a detail view.
///
/// A single optional slot keeps the five entity selections mutually
/// exclusive: selecting one replaces whatever was there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedEntity {
    pub kind: EntityKind,
    pub record: EntityRecord,
}

impl SelectedEntity {
    pub fn new(kind: EntityKind, record: EntityRecord) -> Self {
        Self { kind, record }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }
}

/// In-memory navigation state mirrored into the host history
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationState {
    pub active_section: Section,
    pub selected: Option<SelectedEntity>,
    pub is_detail_view: bool,
    pub is_nested_view: bool,
    pub search_term: String,
}

impl NavigationState {
    /// Slot accessor: the record selected for `kind`, if that kind holds the selection
    pub fn selected_for(&self, kind: EntityKind) -> Option<&EntityRecord> {
        self.selected
            .as_ref()
            .filter(|s| s.kind == kind)
            .map(|s| &s.record)
    }

    pub fn selected_kind(&self) -> Option<EntityKind> {
        self.selected.as_ref().map(|s| s.kind)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.id())
    }

    /// Whether the list header (title, search, filters) is shown
    pub fn shows_list_header(&self) -> bool {
        self.active_section != Section::Dashboard
            && !self.is_detail_view
            && !self.active_section.has_inherent_detail_mode()
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::default()
    }

    /// Drop the selection and both view flags, keeping section and search
    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
        self.is_detail_view = false;
        self.is_nested_view = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = NavigationState::default();
        assert_eq!(state.active_section, Section::Dashboard);
        assert!(state.selected.is_none());
        assert!(!state.is_detail_view);
        assert!(!state.is_nested_view);
        assert!(state.is_initial());
        assert!(!state.shows_list_header());
    }

    #[test]
    fn test_selected_for_only_matches_owning_kind() {
        let state = NavigationState {
            active_section: Section::Deals,
            selected: Some(SelectedEntity::new(EntityKind::Deal, EntityRecord::new("D-100"))),
            is_detail_view: true,
            ..Default::default()
        };
        assert_eq!(state.selected_for(EntityKind::Deal).map(|r| r.id.as_str()), Some("D-100"));
        assert!(state.selected_for(EntityKind::Lead).is_none());
        assert_eq!(state.selected_kind(), Some(EntityKind::Deal));
    }

    #[test]
    fn test_list_header_policy() {
        let mut state = NavigationState {
            active_section: Section::Leads,
            ..Default::default()
        };
        assert!(state.shows_list_header());

        state.is_detail_view = true;
        assert!(!state.shows_list_header());

        let state = NavigationState {
            active_section: Section::Reminders,
            ..Default::default()
        };
        assert!(!state.shows_list_header());

        let state = NavigationState {
            active_section: Section::Notes,
            ..Default::default()
        };
        assert!(state.shows_list_header());
    }
}
