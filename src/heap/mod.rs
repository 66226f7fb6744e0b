//! In-process reference implementation of [`HostRuntime`].
//!
//! [`Heap`] models a reference-counted object runtime closely enough to check
//! the builders' ownership discipline: every reference handed out or given
//! back is counted, and the slot states of the last disposed array are kept
//! for inspection.

use std::{
    any::Any,
    collections::TryReserveError,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    bridge::{ElementType, Scalar},
    error::MarshalError,
    runtime::HostRuntime,
};

#[cfg(feature = "arrow")]
mod arrow;

/// A host object.
#[derive(Debug, PartialEq, Eq)]
pub enum HeapObject {
    /// The empty sentinel (a single shared instance per heap).
    Empty,
    /// A text object.
    Text(String),
}

/// One owned reference to a [`HeapObject`].
///
/// Not `Clone`: new references come from [`HostRuntime::acquire`] so the heap
/// can count them.
#[derive(Debug)]
pub struct HeapRef(Arc<HeapObject>);

impl HeapRef {
    /// The referenced object.
    pub fn object(&self) -> &HeapObject {
        &self.0
    }

    /// Text content, if this is a text object.
    pub fn as_text(&self) -> Option<&str> {
        match self.object() {
            HeapObject::Text(s) => Some(s),
            HeapObject::Empty => None,
        }
    }

    /// Whether this is a reference to the empty sentinel.
    pub fn is_empty_sentinel(&self) -> bool {
        matches!(self.object(), HeapObject::Empty)
    }

    /// Number of live references to the same object.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

/// Observable state of a boxed slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// No reference.
    Null,
    /// Reference to the empty sentinel.
    Empty,
    /// Reference to a text object with this content.
    Text(String),
}

impl SlotState {
    fn of(slot: &Option<HeapRef>) -> Self {
        match slot.as_ref().map(HeapRef::object) {
            None => SlotState::Null,
            Some(HeapObject::Empty) => SlotState::Empty,
            Some(HeapObject::Text(s)) => SlotState::Text(s.clone()),
        }
    }
}

enum Storage {
    // Holds a `Vec<T>` for the array's scalar type.
    Bulk(Box<dyn Any + Send + Sync>),
    Boxed(Vec<Option<HeapRef>>),
}

/// A one-dimensional array owned by a [`Heap`].
pub struct HeapArray {
    element_type: ElementType,
    len: usize,
    storage: Storage,
}

impl HeapArray {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element type the array was allocated with.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Inline values of a bulk array, when `T` is its element type.
    pub fn values<T: Scalar>(&self) -> Option<&[T]> {
        match &self.storage {
            Storage::Bulk(data) => data.downcast_ref::<Vec<T>>().map(Vec::as_slice),
            Storage::Boxed(_) => None,
        }
    }

    /// Slots of a boxed array.
    pub fn slots(&self) -> Option<&[Option<HeapRef>]> {
        match &self.storage {
            Storage::Boxed(slots) => Some(slots),
            Storage::Bulk(_) => None,
        }
    }

    /// Text held in slot `index`, if it holds a text object.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.slots()?.get(index)?.as_ref()?.as_text()
    }

    /// State of every slot of a boxed array.
    pub fn slot_states(&self) -> Option<Vec<SlotState>> {
        self.slots()
            .map(|slots| slots.iter().map(SlotState::of).collect())
    }
}

impl fmt::Debug for HeapArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapArray")
            .field("element_type", &self.element_type)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Limits and fault injection for a [`Heap`].
#[derive(Debug, Clone, Default)]
pub struct HeapConfig {
    max_elements: Option<usize>,
    fail_text_after: Option<usize>,
}

impl HeapConfig {
    /// Refuse allocations of more than `n` elements.
    #[must_use]
    pub fn max_elements(mut self, n: usize) -> Self {
        self.max_elements = Some(n);
        self
    }

    /// Let the first `n` text constructions succeed and fail every later one.
    #[must_use]
    pub fn fail_text_after(mut self, n: usize) -> Self {
        self.fail_text_after = Some(n);
        self
    }
}

/// Counters of a [`Heap`]'s allocation and reference traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Arrays successfully allocated.
    pub arrays_allocated: usize,
    /// Arrays disposed through [`HostRuntime::release_array`].
    pub arrays_released: usize,
    /// Text objects constructed (each one a new owned reference).
    pub texts_constructed: usize,
    /// References handed out by `acquire` and `empty`.
    pub references_acquired: usize,
    /// References given back by `release` (including array disposal).
    pub references_released: usize,
}

impl HeapStats {
    /// Owned references not yet released.
    pub fn live_references(&self) -> usize {
        (self.texts_constructed + self.references_acquired)
            .saturating_sub(self.references_released)
    }

    /// Arrays allocated and not yet disposed.
    pub fn live_arrays(&self) -> usize {
        self.arrays_allocated.saturating_sub(self.arrays_released)
    }
}

#[derive(Default)]
struct Counters {
    arrays_allocated: AtomicUsize,
    arrays_released: AtomicUsize,
    texts_constructed: AtomicUsize,
    text_attempts: AtomicUsize,
    references_acquired: AtomicUsize,
    references_released: AtomicUsize,
}

/// Reference-counted in-process object heap.
pub struct Heap {
    config: HeapConfig,
    sentinel: Arc<HeapObject>,
    counters: Counters,
    last_disposed: Mutex<Option<Vec<SlotState>>>,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// A heap without limits.
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// A heap with the given limits and fault injection.
    pub fn with_config(config: HeapConfig) -> Self {
        Self {
            config,
            sentinel: Arc::new(HeapObject::Empty),
            counters: Counters::default(),
            last_disposed: Mutex::new(None),
        }
    }

    /// Snapshot of the heap's counters.
    pub fn stats(&self) -> HeapStats {
        let c = &self.counters;
        HeapStats {
            arrays_allocated: c.arrays_allocated.load(Ordering::Relaxed),
            arrays_released: c.arrays_released.load(Ordering::Relaxed),
            texts_constructed: c.texts_constructed.load(Ordering::Relaxed),
            references_acquired: c.references_acquired.load(Ordering::Relaxed),
            references_released: c.references_released.load(Ordering::Relaxed),
        }
    }

    /// Slot states of the most recently disposed boxed array, captured just
    /// before its references were released.
    pub fn last_disposed(&self) -> Option<Vec<SlotState>> {
        self.last_disposed.lock().clone()
    }

    fn allocate_storage(
        &self,
        len: usize,
        element_type: ElementType,
    ) -> Result<Storage, TryReserveError> {
        fn bulk<T: Scalar>(len: usize) -> Result<Storage, TryReserveError> {
            let mut data: Vec<T> = Vec::new();
            data.try_reserve_exact(len)?;
            data.resize(len, T::default());
            Ok(Storage::Bulk(Box::new(data)))
        }

        match element_type {
            ElementType::Int8 => bulk::<i8>(len),
            ElementType::Int16 => bulk::<i16>(len),
            ElementType::Int32 => bulk::<i32>(len),
            ElementType::Int64 => bulk::<i64>(len),
            ElementType::UInt8 => bulk::<u8>(len),
            ElementType::UInt16 => bulk::<u16>(len),
            ElementType::UInt32 => bulk::<u32>(len),
            ElementType::UInt64 => bulk::<u64>(len),
            ElementType::Float32 => bulk::<f32>(len),
            ElementType::Float64 => bulk::<f64>(len),
            ElementType::Object => {
                let mut slots = Vec::new();
                slots.try_reserve_exact(len)?;
                slots.resize_with(len, || None);
                Ok(Storage::Boxed(slots))
            }
        }
    }
}

impl HostRuntime for Heap {
    type Array = HeapArray;
    type Object = HeapRef;

    fn allocate(&self, len: usize, element_type: ElementType) -> Result<HeapArray, MarshalError> {
        let refused = MarshalError::Allocation { len, element_type };
        if self.config.max_elements.is_some_and(|max| len > max) {
            return Err(refused);
        }
        let storage = self.allocate_storage(len, element_type).map_err(|_| refused)?;
        self.counters.arrays_allocated.fetch_add(1, Ordering::Relaxed);
        Ok(HeapArray {
            element_type,
            len,
            storage,
        })
    }

    fn array_len(&self, array: &HeapArray) -> usize {
        array.len
    }

    fn element_type(&self, array: &HeapArray) -> ElementType {
        array.element_type
    }

    fn bulk_mut<'a, T: Scalar>(&self, array: &'a mut HeapArray) -> Result<&'a mut [T], MarshalError> {
        let mismatch = MarshalError::layout_mismatch(T::element_type(), array.element_type);
        match &mut array.storage {
            Storage::Bulk(data) => data
                .downcast_mut::<Vec<T>>()
                .map(Vec::as_mut_slice)
                .ok_or(mismatch),
            Storage::Boxed(_) => Err(mismatch),
        }
    }

    fn slot_mut<'a>(
        &self,
        array: &'a mut HeapArray,
        index: usize,
    ) -> Result<&'a mut Option<HeapRef>, MarshalError> {
        let len = array.len;
        match &mut array.storage {
            Storage::Boxed(slots) => slots
                .get_mut(index)
                .ok_or(MarshalError::IndexOutOfBounds { index, len }),
            Storage::Bulk(_) => Err(MarshalError::layout_mismatch(
                ElementType::Object,
                array.element_type,
            )),
        }
    }

    fn make_text(&self, bytes: &[u8]) -> Result<HeapRef, MarshalError> {
        let attempt = self.counters.text_attempts.fetch_add(1, Ordering::Relaxed);
        if self.config.fail_text_after.is_some_and(|n| attempt >= n) {
            return Err(MarshalError::host("text construction refused"));
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| MarshalError::host(format!("invalid utf-8: {e}")))?;
        self.counters.texts_constructed.fetch_add(1, Ordering::Relaxed);
        Ok(HeapRef(Arc::new(HeapObject::Text(text.to_owned()))))
    }

    fn empty(&self) -> HeapRef {
        self.counters.references_acquired.fetch_add(1, Ordering::Relaxed);
        HeapRef(Arc::clone(&self.sentinel))
    }

    fn acquire(&self, object: &HeapRef) -> HeapRef {
        self.counters.references_acquired.fetch_add(1, Ordering::Relaxed);
        HeapRef(Arc::clone(&object.0))
    }

    fn release(&self, object: HeapRef) {
        self.counters.references_released.fetch_add(1, Ordering::Relaxed);
        drop(object);
    }

    fn release_array(&self, array: HeapArray) {
        if let Storage::Boxed(slots) = array.storage {
            *self.last_disposed.lock() = Some(slots.iter().map(SlotState::of).collect());
            for object in slots.into_iter().flatten() {
                self.release(object);
            }
        }
        self.counters.arrays_released.fetch_add(1, Ordering::Relaxed);
    }
}
