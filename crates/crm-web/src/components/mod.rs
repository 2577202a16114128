//! Leptos UI components

mod cross_link;
mod dashboard;
mod empty_state;
mod header;
mod login_form;
mod record_view;
mod recovery_modal;
mod section_view;
mod sidebar;
mod toast;

pub use cross_link::CrossLink;
pub use dashboard::Dashboard;
pub use empty_state::EmptyState;
pub use header::Header;
pub use login_form::LoginForm;
pub use record_view::RecordView;
pub use recovery_modal::RecoveryModal;
pub use section_view::SectionView;
pub use sidebar::Sidebar;
pub use toast::{Toast, ToastContext, ToastProvider};
