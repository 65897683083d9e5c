//! Component trees.
//!
//! A system's build is described as a forest of components. Groups contribute
//! a directory segment and own ordered children; leaves carry a [`Kind`] that
//! decides what building and loading them means.
//!
//! # Submodules
//!
//! - [`form`] - the declarative form grammar and the tree factory
//! - [`kind`] - component kinds and the file-type keyed [`KindRegistry`]

pub mod form;
pub mod kind;
mod types;

pub use form::{Form, FormError, make_component};
pub use kind::{CompiledSource, Kind, KindRegistry, StaticFile};
pub use types::*;
