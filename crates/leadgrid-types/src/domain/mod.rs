pub mod department;
pub mod lead;
pub mod reference;
pub mod session;
pub mod stats;
pub mod whatsapp;

pub use department::*;
pub use lead::*;
pub use reference::*;
pub use session::*;
pub use stats::*;
pub use whatsapp::*;
