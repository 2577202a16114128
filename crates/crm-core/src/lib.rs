//! crm-core - Core library for crm-console
//!
//! Navigation state machine, detail resolver, session store and the
//! authentication-failure recovery flow, independent of the host (browser
//! or CLI). Hosts plug in through [`HistoryDriver`], [`SessionStorage`] and
//! [`RecordFetcher`].

pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod event;
pub mod history;
pub mod models;
pub mod navigation;
pub mod recovery;
pub mod resolver;
pub mod route;
pub mod session;

pub use api::{ApiResponse, RecordFetcher};
pub use auth::{AuthInterceptor, SuppressionWindow};
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::CoreError;
pub use event::{ConsoleEvent, EventBus, Notice, NoticeLevel};
pub use history::{HistoryDriver, MemoryHistory};
pub use models::{EntityKind, EntityRecord, NavigationState, Section, Session};
pub use navigation::{HeldLists, Navigator};
pub use recovery::{RecoveryCoordinator, RecoveryModal};
pub use resolver::Resolution;
pub use session::{MemoryStorage, SessionStorage, SessionStore};
