//! Registry mapping type tokens to array builders.

use std::{collections::HashMap, sync::OnceLock};

use typed_marshal::{ElementType, HostBinding, HostRuntime, Layout, TextSink};

use crate::{
    DynError,
    buffer::BulkElement,
    populator::Populator,
    token::TypeToken,
};

/// Builder registered for one native element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    token: TypeToken,
    element_type: ElementType,
}

impl Entry {
    fn of<T: HostBinding + 'static>() -> Self {
        Self {
            token: TypeToken::of::<T>(),
            element_type: T::element_type(),
        }
    }

    /// Token the entry is registered under.
    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// Element type of the arrays this entry builds.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Allocate an array of `populator.len()` elements and let the populator
    /// fill it.
    ///
    /// On failure the array is disposed of before the error is returned; for
    /// text, unwritten slots are first forced to the empty sentinel.
    pub fn populate<R, P>(&self, rt: &R, populator: &P) -> Result<R::Array, DynError>
    where
        R: HostRuntime + ?Sized,
        P: Populator + ?Sized,
    {
        match self.element_type {
            ElementType::Int8 => populate_bulk::<i8, R, P>(rt, populator),
            ElementType::Int16 => populate_bulk::<i16, R, P>(rt, populator),
            ElementType::Int32 => populate_bulk::<i32, R, P>(rt, populator),
            ElementType::Int64 => populate_bulk::<i64, R, P>(rt, populator),
            ElementType::UInt8 => populate_bulk::<u8, R, P>(rt, populator),
            ElementType::UInt16 => populate_bulk::<u16, R, P>(rt, populator),
            ElementType::UInt32 => populate_bulk::<u32, R, P>(rt, populator),
            ElementType::UInt64 => populate_bulk::<u64, R, P>(rt, populator),
            ElementType::Float32 => populate_bulk::<f32, R, P>(rt, populator),
            ElementType::Float64 => populate_bulk::<f64, R, P>(rt, populator),
            ElementType::Object => populate_text(rt, populator),
        }
    }
}

fn populate_bulk<T, R, P>(rt: &R, populator: &P) -> Result<R::Array, DynError>
where
    T: BulkElement,
    R: HostRuntime + ?Sized,
    P: Populator + ?Sized,
{
    let mut array = rt.allocate(populator.len(), T::element_type())?;
    let filled = rt
        .bulk_mut::<T>(&mut array)
        .map_err(DynError::from)
        .and_then(|data| populator.insert_into_buffer(T::wrap(data)));
    finish(rt, array, filled)
}

fn populate_text<R, P>(rt: &R, populator: &P) -> Result<R::Array, DynError>
where
    R: HostRuntime + ?Sized,
    P: Populator + ?Sized,
{
    let mut array = rt.allocate(populator.len(), ElementType::Object)?;
    let filled = fill_text(rt, &mut array, populator);
    finish(rt, array, filled)
}

fn fill_text<R, P>(rt: &R, array: &mut R::Array, populator: &P) -> Result<(), DynError>
where
    R: HostRuntime + ?Sized,
    P: Populator + ?Sized,
{
    let mut sink = TextSink::new(rt, array)?;
    if let Err(err) = populator.insert_and_forget(&mut sink) {
        sink.rollback();
        return Err(err);
    }
    sink.finish()?;
    Ok(())
}

fn finish<R>(rt: &R, array: R::Array, filled: Result<(), DynError>) -> Result<R::Array, DynError>
where
    R: HostRuntime + ?Sized,
{
    match filled {
        Ok(()) => Ok(array),
        Err(err) => {
            tracing::warn!(
                element_type = %rt.element_type(&array),
                len = rt.array_len(&array),
                error = %err,
                "disposing array after populator failure"
            );
            rt.release_array(array);
            Err(err)
        }
    }
}

/// Immutable map from type token to [`Entry`], one entry per supported
/// native element type.
#[derive(Debug)]
pub struct Registry {
    entries: HashMap<TypeToken, Entry>,
}

impl Registry {
    fn new() -> Self {
        let entries = [
            Entry::of::<u8>(),
            Entry::of::<i8>(),
            Entry::of::<u16>(),
            Entry::of::<i16>(),
            Entry::of::<u32>(),
            Entry::of::<i32>(),
            Entry::of::<u64>(),
            Entry::of::<i64>(),
            Entry::of::<f32>(),
            Entry::of::<f64>(),
            Entry::of::<String>(),
        ];
        Self {
            entries: entries.into_iter().map(|e| (e.token, e)).collect(),
        }
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let registry = Registry::new();
            tracing::debug!(entries = registry.len(), "built populator registry");
            registry
        })
    }

    /// Entry registered for `token`.
    ///
    /// # Errors
    /// `UnsupportedType` when no entry exists.
    pub fn lookup(&self, token: TypeToken) -> Result<&Entry, DynError> {
        self.entries.get(&token).ok_or(DynError::UnsupportedType {
            type_name: token.type_name(),
        })
    }

    /// Whether an entry exists for `token`.
    pub fn contains(&self, token: TypeToken) -> bool {
        self.entries.contains_key(&token)
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the registered entries (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.values()
    }

    /// Entries whose arrays use `layout`.
    pub fn entries_with_layout(&self, layout: Layout) -> impl Iterator<Item = &Entry> + '_ {
        self.iter()
            .filter(move |e| e.element_type.layout() == layout)
    }
}

/// Build an array from a populator whose element type is known only at run
/// time.
///
/// Looks up the populator's type token in [`Registry::global`] and runs the
/// matching entry. An unregistered token fails with
/// [`DynError::UnsupportedType`] before anything is allocated.
pub fn build_populator<R, P>(rt: &R, populator: &P) -> Result<R::Array, DynError>
where
    R: HostRuntime + ?Sized,
    P: Populator + ?Sized,
{
    Registry::global()
        .lookup(populator.type_token())?
        .populate(rt, populator)
}
