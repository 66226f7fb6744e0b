use typed_marshal::prelude::*;
use typed_marshal::{ElementType, Heap};

fn element_type_of<T: HostBinding>(_: &[T]) -> ElementType {
    T::element_type()
}

fn main() {
    let heap = Heap::new();
    let values = [1.0f32, 2.0];
    assert_eq!(element_type_of(&values), ElementType::Float32);
    let array = typed_marshal::build_array(&heap, &values).unwrap();
    heap.release_array(array);
}
