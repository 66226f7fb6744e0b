#![deny(missing_docs)]
//! Dynamic runtime facade for typed-marshal.
//!
//! This crate dispatches on an element type known only at run time: a
//! [`Populator`] declares its element type as a [`TypeToken`], and
//! [`build_populator`] looks up the matching builder in the process-wide
//! [`Registry`].

mod buffer;
mod error;
mod populator;
mod registry;
mod token;

pub use buffer::{BulkBuffer, BulkElement};
pub use error::DynError;
pub use populator::Populator;
pub use registry::{Entry, Registry, build_populator};
pub use token::TypeToken;
