#![deny(missing_docs)]
//! typed-marshal core: compile-time element-type bridge and array builders
//! for reference-counted host runtimes.
//!
//! Native data (slices, exact-size ranges) is marshaled into fixed-length,
//! one-dimensional host arrays through the [`HostRuntime`] boundary. Scalar
//! element types are bulk-copied; text is boxed one object per slot with a
//! rollback that never leaves a slot in an indeterminate state.

mod array;
pub mod bridge;
mod error;
pub mod heap;
pub mod runtime;
mod sink;
mod slots;

/// Prelude exporting the most common traits.
pub mod prelude {
    pub use crate::{
        bridge::{HostBinding, Scalar},
        runtime::HostRuntime,
        sink::TextOutput,
    };
}

// Re-export Arrow crates so exported arrays can be consumed without a direct
// Arrow dependency.
#[cfg(feature = "arrow")]
pub use arrow_array;
#[cfg(feature = "arrow")]
pub use arrow_schema;

// Public re-exports for convenience
pub use crate::{
    array::{build_array, build_array_from_range},
    bridge::{ElementType, HostBinding, Layout, Scalar},
    error::MarshalError,
    heap::{Heap, HeapArray, HeapConfig, HeapObject, HeapRef, HeapStats, SlotState},
    runtime::HostRuntime,
    sink::{TextOutput, TextSink},
};
