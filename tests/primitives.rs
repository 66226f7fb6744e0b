use typed_marshal::{
    ElementType, Heap, HostBinding, HostRuntime, Layout, MarshalError, build_array,
    build_array_from_range,
};

#[test]
fn element_types_of_scalars() {
    assert_eq!(<i8 as HostBinding>::element_type(), ElementType::Int8);
    assert_eq!(<i16 as HostBinding>::element_type(), ElementType::Int16);
    assert_eq!(<i32 as HostBinding>::element_type(), ElementType::Int32);
    assert_eq!(<i64 as HostBinding>::element_type(), ElementType::Int64);
    assert_eq!(<u8 as HostBinding>::element_type(), ElementType::UInt8);
    assert_eq!(<u16 as HostBinding>::element_type(), ElementType::UInt16);
    assert_eq!(<u32 as HostBinding>::element_type(), ElementType::UInt32);
    assert_eq!(<u64 as HostBinding>::element_type(), ElementType::UInt64);
    assert_eq!(<f32 as HostBinding>::element_type(), ElementType::Float32);
    assert_eq!(<f64 as HostBinding>::element_type(), ElementType::Float64);
}

#[test]
fn layouts() {
    for et in ElementType::ALL {
        let expected = if et == ElementType::Object {
            Layout::Boxed
        } else {
            Layout::Bulk
        };
        assert_eq!(et.layout(), expected, "{et}");
    }
    assert_eq!(ElementType::UInt16.to_string(), "uint16");
}

#[test]
fn int32_container() {
    let heap = Heap::new();
    let array = build_array(&heap, &[1i32, 2, 3]).unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array.element_type(), ElementType::Int32);
    assert_eq!(array.values::<i32>(), Some(&[1, 2, 3][..]));
    // Wrong type view is refused.
    assert_eq!(array.values::<u32>(), None);
    assert!(array.slots().is_none());
}

macro_rules! check_scalar {
    ($heap:expr, $rust:ty, $values:expr) => {{
        let values: Vec<$rust> = $values;
        let array = build_array($heap, &values).unwrap();
        assert_eq!(array.len(), values.len());
        assert_eq!(array.element_type(), <$rust as HostBinding>::element_type());
        assert_eq!(array.values::<$rust>(), Some(values.as_slice()));
        $heap.release_array(array);
    }};
}

#[test]
fn every_scalar_type() {
    let heap = Heap::new();
    check_scalar!(&heap, i8, vec![i8::MIN, -1, 0, i8::MAX]);
    check_scalar!(&heap, i16, vec![i16::MIN, 7, i16::MAX]);
    check_scalar!(&heap, i32, vec![-5, 0, 5]);
    check_scalar!(&heap, i64, vec![i64::MIN, i64::MAX]);
    check_scalar!(&heap, u8, vec![0, 128, 255]);
    check_scalar!(&heap, u16, vec![u16::MAX]);
    check_scalar!(&heap, u32, vec![1, 2, 3, 4]);
    check_scalar!(&heap, u64, vec![u64::MAX, 0]);
    check_scalar!(&heap, f32, vec![1.5, -0.25]);
    check_scalar!(&heap, f64, vec![f64::MIN_POSITIVE, 1e300, -2.5]);

    let stats = heap.stats();
    assert_eq!(stats.arrays_allocated, 10);
    assert_eq!(stats.live_arrays(), 0);
}

#[test]
fn container_and_range_agree() {
    let heap = Heap::new();
    let data: Vec<u64> = (0..100).map(|i| i * i).collect();
    let from_container = build_array(&heap, &data).unwrap();
    let from_range = build_array_from_range(&heap, data.iter().copied()).unwrap();
    assert_eq!(from_container.len(), from_range.len());
    assert_eq!(from_container.values::<u64>(), from_range.values::<u64>());

    let from_std_range = build_array_from_range(&heap, 0i16..4).unwrap();
    assert_eq!(from_std_range.values::<i16>(), Some(&[0, 1, 2, 3][..]));
}

#[test]
fn empty_sources_build_empty_arrays() {
    let heap = Heap::new();
    let array = build_array::<_, f32>(&heap, &[]).unwrap();
    assert!(array.is_empty());
    assert_eq!(array.element_type(), ElementType::Float32);

    let array = build_array_from_range(&heap, std::iter::empty::<i64>()).unwrap();
    assert_eq!(array.len(), 0);
    assert_eq!(array.values::<i64>(), Some(&[][..]));
}

// An iterator that reports more items than it yields.
struct ShortRange {
    claimed: usize,
    left: usize,
}

impl Iterator for ShortRange {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.left == 0 {
            return None;
        }
        self.left -= 1;
        Some(self.left as u32)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.claimed, Some(self.claimed))
    }
}

impl ExactSizeIterator for ShortRange {}

#[test]
fn short_range_is_a_length_mismatch() {
    let heap = Heap::new();
    let err = build_array_from_range(&heap, ShortRange { claimed: 5, left: 3 }).unwrap_err();
    assert_eq!(err, MarshalError::LengthMismatch { expected: 5, got: 3 });

    let stats = heap.stats();
    assert_eq!(stats.arrays_allocated, 1);
    assert_eq!(stats.arrays_released, 1);
}

#[test]
fn allocation_failure_propagates() {
    let heap = Heap::with_config(typed_marshal::HeapConfig::default().max_elements(2));
    let err = build_array(&heap, &[1u8, 2, 3]).unwrap_err();
    assert_eq!(
        err,
        MarshalError::Allocation {
            len: 3,
            element_type: ElementType::UInt8,
        }
    );
    assert_eq!(heap.stats().arrays_allocated, 0);
    assert_eq!(
        err.to_string(),
        "failed to allocate array of 3 uint8 elements"
    );
}

// An iterator that reports fewer items than it yields.
struct LongRange {
    claimed: usize,
    inner: std::ops::Range<u32>,
}

impl Iterator for LongRange {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.claimed, Some(self.claimed))
    }
}

impl ExactSizeIterator for LongRange {}

#[test]
fn long_range_reports_every_produced_item() {
    let heap = Heap::new();
    let source = LongRange {
        claimed: 2,
        inner: 0..5,
    };
    let err = build_array_from_range(&heap, source).unwrap_err();
    assert_eq!(err, MarshalError::LengthMismatch { expected: 2, got: 5 });

    let stats = heap.stats();
    assert_eq!(stats.arrays_allocated, 1);
    assert_eq!(stats.arrays_released, 1);
    assert_eq!(stats.live_references(), 0);
}
