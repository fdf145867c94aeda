//! # Runtime Module
//!
//! Runtime components for the demo: initialization, identities and the poll loop.

pub mod identity;
pub mod initialization;
pub mod poller;

pub use identity::*;
pub use initialization::*;
pub use poller::*;
