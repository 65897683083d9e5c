//! Systems: named units of metadata plus a component forest.

mod types;
mod version;

pub use types::*;
pub use version::*;
