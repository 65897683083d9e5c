//! sysdef-lib: system definitions and their build pipeline.
//!
//! A *system* is a named unit of project metadata owning a forest of
//! *components*. Loading a system runs every component of every dependency,
//! then of the system itself, through generate → build → load:
//!
//! - [`component`]: component trees, kinds and the form grammar
//! - [`pipeline`]: the three phases and cache path derivation
//! - [`registry`]: system registration, lookup and dependency validation
//! - [`session`]: the state object tying it all together
//! - [`manifest`]: discovery and Lua evaluation of `*.sys.lua` files
//! - [`toolchain`]: the toolchain signature that keys the build cache

pub mod backend;
pub mod component;
pub mod config;
pub mod consts;
pub mod lock;
pub mod manifest;
pub mod pipeline;
pub mod platform;
pub mod registry;
pub mod session;
pub mod system;
pub mod toolchain;

#[cfg(test)]
mod util;

pub use session::Session;
