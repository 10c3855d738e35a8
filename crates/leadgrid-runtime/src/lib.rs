pub mod api;
pub mod board;
pub mod cells;
pub mod columns;
pub mod config;
pub mod dashboard;
pub mod departments;
pub mod detail;
pub mod error;
pub mod gateway;
pub mod interaction;
pub mod navigation;
pub mod notify;
pub mod rest;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod whatsapp;

pub use api::{ApiClient, ApiRequest, ApiResponse, Method, TransportError};
pub use board::LeadBoard;
pub use cells::{
    ActionMenu, ClassificationEditor, ContactActions, DeleteOutcome, EditOutcome, EditorView,
    OptionView,
};
pub use columns::{department_columns, lead_columns};
pub use config::{Config, resolve_data_dir};
pub use dashboard::{Dashboard, StatCard, StatsRequest, StatsState};
pub use departments::{CreateOutcome, DepartmentAdmin};
pub use detail::{
    DetailLoader, DetailState, DetailTab, DetailView, Overview, TabLoader, TabState,
};
pub use error::{Error, Result};
pub use gateway::{MutationError, MutationResult, RowGateway};
pub use interaction::{Clipboard, Confirmer};
pub use navigation::{HistoryNavigator, Navigator, Route};
pub use notify::{Notification, NotificationKind, NotificationRelay, ToastQueue, ToastView};
pub use rest::{
    DepartmentGateway, Departments, LeadGateway, Leads, RestEntity, RestGateway, fetch_lead_stats,
    fetch_options,
};
pub use session::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use snapshot::{FetchTicket, SnapshotCache};
pub use store::{Action, AppState, Store, WhatsAppTarget, reduce};
pub use whatsapp::{MessageContent, SendOutcome, WhatsAppComposer, WhatsAppGateway};
