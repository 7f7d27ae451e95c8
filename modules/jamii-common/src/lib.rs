pub mod types;
pub mod lifecycle;
pub mod config;
pub mod error;

pub use types::*;
pub use lifecycle::Actor;
pub use config::Config;
pub use error::{JamiiError, Result};
