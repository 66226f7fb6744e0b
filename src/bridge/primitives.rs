//! Scalar bindings (integers and floats) written by bulk copy.

use std::borrow::Borrow;

use super::{ElementType, HostBinding};
use crate::{error::MarshalError, runtime::HostRuntime};

mod sealed {
    pub trait Sealed {}
}

/// Arithmetic element type stored inline in a bulk-layout array.
///
/// Sealed: the set of bulk element types is fixed by the host runtime.
pub trait Scalar: HostBinding + sealed::Sealed + Copy + Default + Send + Sync + 'static {}

fn fill_bulk<T, R, I, B>(rt: &R, array: &mut R::Array, values: I) -> Result<(), MarshalError>
where
    T: Scalar,
    R: HostRuntime + ?Sized,
    I: Iterator<Item = B>,
    B: Borrow<T>,
{
    let mut values = values;
    let data = rt.bulk_mut::<T>(array)?;
    let expected = data.len();
    let mut written = 0;
    for (dst, v) in data.iter_mut().zip(values.by_ref()) {
        *dst = *v.borrow();
        written += 1;
    }
    if written < expected {
        return Err(MarshalError::LengthMismatch {
            expected,
            got: written,
        });
    }
    let extra = values.count();
    if extra > 0 {
        return Err(MarshalError::LengthMismatch {
            expected,
            got: expected + extra,
        });
    }
    Ok(())
}

macro_rules! impl_scalar_binding {
    ($rust:ty, $et:expr) => {
        impl sealed::Sealed for $rust {}
        impl Scalar for $rust {}

        impl HostBinding for $rust {
            fn element_type() -> ElementType {
                $et
            }
            fn fill<R, I, B>(rt: &R, array: &mut R::Array, values: I) -> Result<(), MarshalError>
            where
                R: HostRuntime + ?Sized,
                I: Iterator<Item = B>,
                B: Borrow<Self>,
            {
                fill_bulk::<$rust, R, I, B>(rt, array, values)
            }
        }
    };
}

impl_scalar_binding!(i8, ElementType::Int8);
impl_scalar_binding!(i16, ElementType::Int16);
impl_scalar_binding!(i32, ElementType::Int32);
impl_scalar_binding!(i64, ElementType::Int64);
impl_scalar_binding!(u8, ElementType::UInt8);
impl_scalar_binding!(u16, ElementType::UInt16);
impl_scalar_binding!(u32, ElementType::UInt32);
impl_scalar_binding!(u64, ElementType::UInt64);
impl_scalar_binding!(f32, ElementType::Float32);
impl_scalar_binding!(f64, ElementType::Float64);
