//! Entity kinds, menu sections and record payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The five record kinds that can be opened in a detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Lead,
    Deal,
    Contact,
    Organization,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Lead,
        EntityKind::Deal,
        EntityKind::Contact,
        EntityKind::Organization,
        EntityKind::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Lead => "lead",
            EntityKind::Deal => "deal",
            EntityKind::Contact => "contact",
            EntityKind::Organization => "organization",
            EntityKind::User => "user",
        }
    }

    /// Path segment used for both the list and the detail route
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Lead => "leads",
            EntityKind::Deal => "deals",
            EntityKind::Contact => "contacts",
            EntityKind::Organization => "organizations",
            EntityKind::User => "users",
        }
    }

    /// Document type name on the remote document store
    pub fn doctype(&self) -> &'static str {
        match self {
            EntityKind::Lead => "CRM Lead",
            EntityKind::Deal => "CRM Deal",
            EntityKind::Contact => "Contact",
            EntityKind::Organization => "CRM Organization",
            EntityKind::User => "User",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Lead => "Lead",
            EntityKind::Deal => "Deal",
            EntityKind::Contact => "Contact",
            EntityKind::Organization => "Organization",
            EntityKind::User => "User",
        }
    }

    /// Menu section that owns this kind's list view
    pub fn section(&self) -> Section {
        match self {
            EntityKind::Lead => Section::Leads,
            EntityKind::Deal => Section::Deals,
            EntityKind::Contact => Section::Contacts,
            EntityKind::Organization => Section::Organizations,
            EntityKind::User => Section::Users,
        }
    }

    /// Kinds whose list is held locally and patched on save
    pub fn is_list_backed(&self) -> bool {
        matches!(self, EntityKind::Lead | EntityKind::Deal)
    }

    pub fn from_plural(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.plural() == segment)
    }

    /// Parse a kind from whatever a peripheral page holds: singular,
    /// plural or document type, case-insensitive.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim();
        Self::ALL.into_iter().find(|k| {
            needle.eq_ignore_ascii_case(k.as_str())
                || needle.eq_ignore_ascii_case(k.plural())
                || needle.eq_ignore_ascii_case(k.doctype())
        })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Menu sections of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Dashboard,
    Leads,
    Deals,
    Contacts,
    Organizations,
    Users,
    Reminders,
    Todos,
    Notifications,
    Notes,
    Tasks,
    CallLogs,
    EmailTemplates,
}

impl Section {
    pub const ALL: [Section; 13] = [
        Section::Dashboard,
        Section::Leads,
        Section::Deals,
        Section::Contacts,
        Section::Organizations,
        Section::Users,
        Section::Reminders,
        Section::Todos,
        Section::Notifications,
        Section::Notes,
        Section::Tasks,
        Section::CallLogs,
        Section::EmailTemplates,
    ];

    /// Path segment; the dashboard lives at the root and has none
    pub fn slug(&self) -> Option<&'static str> {
        match self {
            Section::Dashboard => None,
            Section::Leads => Some("leads"),
            Section::Deals => Some("deals"),
            Section::Contacts => Some("contacts"),
            Section::Organizations => Some("organizations"),
            Section::Users => Some("users"),
            Section::Reminders => Some("reminders"),
            Section::Todos => Some("todos"),
            Section::Notifications => Some("notifications"),
            Section::Notes => Some("notes"),
            Section::Tasks => Some("tasks"),
            Section::CallLogs => Some("call-logs"),
            Section::EmailTemplates => Some("email-templates"),
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == Some(slug))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Leads => "Leads",
            Section::Deals => "Deals",
            Section::Contacts => "Contacts",
            Section::Organizations => "Organizations",
            Section::Users => "Users",
            Section::Reminders => "Reminders",
            Section::Todos => "Todos",
            Section::Notifications => "Notifications",
            Section::Notes => "Notes",
            Section::Tasks => "Tasks",
            Section::CallLogs => "Call Logs",
            Section::EmailTemplates => "Email Templates",
        }
    }

    /// Entity kind whose records this section lists, if any
    pub fn entity_kind(&self) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|k| k.section() == *self)
    }

    /// Single-pane pages with no list/detail split.
    ///
    /// Policy table rather than a rule: these pages render their own content
    /// in place and never show the list header.
    pub fn has_inherent_detail_mode(&self) -> bool {
        matches!(
            self,
            Section::Reminders | Section::Todos | Section::Notifications
        )
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record payload as returned by the document store.
///
/// Only the id is interpreted; every other field is carried through to the
/// views untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(alias = "name")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Best-effort display title for headers and breadcrumbs
    pub fn title(&self) -> String {
        ["title", "lead_name", "organization", "full_name", "first_name"]
            .iter()
            .find_map(|key| self.field(key).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.id.clone())
    }
}
