//! Bridge from Rust element types to host-runtime array element types.
//!
//! This module provides a compile-time mapping from Rust value types to the
//! element-type tag a host array is allocated with, together with the fill
//! strategy for that tag's storage layout.
//!
//! - Core trait: [`HostBinding`] (Rust type → [`ElementType`] + fill strategy).
//! - Scalars: `i{8,16,32,64}`, `u{8,16,32,64}`, `f{32,64}` → bulk layout.
//! - Text: `String`, `&str`, `Box<str>`, `Cow<str>` and the byte strings
//!   `Vec<u8>` / `&[u8]` → boxed [`ElementType::Object`] layout.
//!
//! A type without a binding cannot be passed to the builders; the mistake is
//! caught at compile time.

use std::{borrow::Borrow, fmt};

use crate::{error::MarshalError, runtime::HostRuntime};

mod primitives;
pub(crate) mod strings;

pub use primitives::Scalar;

/// Storage layout of a host array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Elements stored inline and contiguously, written by bulk copy.
    Bulk,
    /// Each slot holds a reference to a separately allocated object.
    Boxed,
}

/// Element-type tag of a host array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Reference to a host object (used for text).
    Object,
}

impl ElementType {
    /// Every element type, bulk types first.
    pub const ALL: [ElementType; 11] = [
        ElementType::Int8,
        ElementType::Int16,
        ElementType::Int32,
        ElementType::Int64,
        ElementType::UInt8,
        ElementType::UInt16,
        ElementType::UInt32,
        ElementType::UInt64,
        ElementType::Float32,
        ElementType::Float64,
        ElementType::Object,
    ];

    /// Storage layout used for arrays of this element type.
    pub const fn layout(self) -> Layout {
        match self {
            ElementType::Object => Layout::Boxed,
            _ => Layout::Bulk,
        }
    }

    /// Short lowercase name, e.g. `int32` or `object`.
    pub const fn name(self) -> &'static str {
        match self {
            ElementType::Int8 => "int8",
            ElementType::Int16 => "int16",
            ElementType::Int32 => "int32",
            ElementType::Int64 => "int64",
            ElementType::UInt8 => "uint8",
            ElementType::UInt16 => "uint16",
            ElementType::UInt32 => "uint32",
            ElementType::UInt64 => "uint64",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
            ElementType::Object => "object",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binding from a Rust type to a host array element type.
///
/// Implementations provide a monomorphized mapping between a Rust value type
/// and the host array it is marshaled into, and the strategy that writes a
/// sequence of values into a freshly allocated array of that type.
pub trait HostBinding {
    /// The host element type corresponding to this Rust type.
    fn element_type() -> ElementType;

    /// Write `values` into `array`, index `0..len` in iteration order.
    ///
    /// `array` must have been allocated with [`HostBinding::element_type`] and
    /// the exact number of elements `values` yields. On error every boxed
    /// slot is left either committed or holding the empty sentinel; disposing
    /// of the array is the caller's job.
    fn fill<R, I, B>(rt: &R, array: &mut R::Array, values: I) -> Result<(), MarshalError>
    where
        R: HostRuntime + ?Sized,
        I: Iterator<Item = B>,
        B: Borrow<Self>;
}
