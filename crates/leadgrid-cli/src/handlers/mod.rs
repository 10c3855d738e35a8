mod context;

pub mod config;
pub mod dashboard;
pub mod departments;
pub mod leads_delete;
pub mod leads_export;
pub mod leads_list;
pub mod leads_show;
pub mod leads_update;

pub use context::HandlerContext;
