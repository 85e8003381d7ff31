pub mod session;
pub mod target;

pub use session::Session;
pub use target::Target;
