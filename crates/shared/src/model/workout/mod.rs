mod session;
pub use session::*;

mod log;
pub use log::*;
