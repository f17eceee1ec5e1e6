pub mod error;
pub mod format;
pub mod providers;
pub mod types;

pub use error::*;
pub use format::*;
pub use providers::*;
pub use types::*;
