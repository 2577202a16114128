//! Data models for crm-console

pub mod entity;
pub mod navigation;
pub mod session;

pub use entity::{EntityKind, EntityRecord, Section};
pub use navigation::{NavigationState, SelectedEntity};
pub use session::{Credentials, Identity, RoleProfile, Session};
