// A host runtime that stores text as plain strings, checked against the
// builders through the public trait only.
use typed_marshal::{ElementType, HostRuntime, MarshalError, Scalar, build_array};

struct Plain;

struct PlainArray {
    element_type: ElementType,
    slots: Vec<Option<String>>,
}

impl HostRuntime for Plain {
    type Array = PlainArray;
    type Object = String;

    fn allocate(&self, len: usize, element_type: ElementType) -> Result<PlainArray, MarshalError> {
        Ok(PlainArray {
            element_type,
            slots: vec![None; len],
        })
    }

    fn array_len(&self, array: &PlainArray) -> usize {
        array.slots.len()
    }

    fn element_type(&self, array: &PlainArray) -> ElementType {
        array.element_type
    }

    fn bulk_mut<'a, T: Scalar>(&self, array: &'a mut PlainArray) -> Result<&'a mut [T], MarshalError> {
        Err(MarshalError::layout_mismatch(T::element_type(), array.element_type))
    }

    fn slot_mut<'a>(
        &self,
        array: &'a mut PlainArray,
        index: usize,
    ) -> Result<&'a mut Option<String>, MarshalError> {
        let len = array.slots.len();
        array
            .slots
            .get_mut(index)
            .ok_or(MarshalError::IndexOutOfBounds { index, len })
    }

    fn make_text(&self, bytes: &[u8]) -> Result<String, MarshalError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| MarshalError::host(e.to_string()))
    }

    fn empty(&self) -> String {
        String::new()
    }

    fn acquire(&self, object: &String) -> String {
        object.clone()
    }

    fn release(&self, object: String) {
        drop(object);
    }

    fn release_array(&self, array: PlainArray) {
        drop(array);
    }
}

fn main() {
    let array = build_array(&Plain, &["a", "b"]).unwrap();
    assert_eq!(array.slots, vec![Some("a".to_string()), Some("b".to_string())]);
    assert!(build_array(&Plain, &[1i64]).is_err());
}
