//! CLI commands implementation

pub mod init;
pub mod query;
pub mod retrieve;
pub mod status;
pub mod view;

pub use init::*;
pub use query::*;
pub use retrieve::*;
pub use status::*;
pub use view::*;
