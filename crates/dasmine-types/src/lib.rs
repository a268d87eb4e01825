pub mod error;
pub mod event;
pub mod session;
pub mod timestamp;

pub use error::{Error, Result};
pub use event::*;
pub use session::*;
pub use timestamp::*;
