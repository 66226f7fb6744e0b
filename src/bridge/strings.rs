//! Text bindings, marshaled into boxed object slots.

use std::borrow::{Borrow, Cow};

use super::{ElementType, HostBinding};
use crate::{error::MarshalError, runtime::HostRuntime, slots};

/// Raw bytes a text element hands to the host's text constructor.
pub(crate) trait TextBytes {
    fn text_bytes(&self) -> &[u8];
}

macro_rules! impl_text_binding {
    (<$lt:lifetime> $rust:ty, |$v:ident| $bytes:expr) => {
        impl_text_binding!(@impl [$lt] $rust, |$v| $bytes);
    };
    ($rust:ty, |$v:ident| $bytes:expr) => {
        impl_text_binding!(@impl [] $rust, |$v| $bytes);
    };
    (@impl [$($lt:lifetime)?] $rust:ty, |$v:ident| $bytes:expr) => {
        impl$(<$lt>)? TextBytes for $rust {
            fn text_bytes(&self) -> &[u8] {
                let $v = self;
                $bytes
            }
        }

        impl$(<$lt>)? HostBinding for $rust {
            fn element_type() -> ElementType {
                ElementType::Object
            }
            fn fill<R, I, B>(rt: &R, array: &mut R::Array, values: I) -> Result<(), MarshalError>
            where
                R: HostRuntime + ?Sized,
                I: Iterator<Item = B>,
                B: Borrow<Self>,
            {
                slots::fill_boxed::<Self, R, I, B>(rt, array, values)
            }
        }
    };
}

impl_text_binding!(String, |v| v.as_bytes());
impl_text_binding!(<'a> &'a str, |v| v.as_bytes());
impl_text_binding!(Box<str>, |v| v.as_bytes());
impl_text_binding!(<'a> Cow<'a, str>, |v| v.as_bytes());

// Byte strings: UTF-8 is validated by the host when the object is built.
impl_text_binding!(Vec<u8>, |v| v.as_slice());
impl_text_binding!(<'a> &'a [u8], |v| v);
