use std::fmt::Write as _;

use typed_marshal::{
    ElementType, Heap, HeapConfig, HostRuntime, MarshalError, SlotState, TextOutput, TextSink,
};

#[test]
fn push_fills_slots_in_order() {
    let heap = Heap::new();
    let mut array = heap.allocate(3, ElementType::Object).unwrap();
    let mut sink = TextSink::new(&heap, &mut array).unwrap();
    assert_eq!(sink.len(), 3);
    sink.push("first").unwrap();
    sink.push("second").unwrap();
    assert_eq!(sink.position(), 2);
    assert_eq!(sink.remaining(), 1);
    sink.push("third").unwrap();
    sink.finish().unwrap();

    assert_eq!(array.text(0), Some("first"));
    assert_eq!(array.text(1), Some("second"));
    assert_eq!(array.text(2), Some("third"));
    heap.release_array(array);
    assert_eq!(heap.stats().live_references(), 0);
}

#[test]
fn pending_value_is_converted_on_advance() {
    let heap = Heap::new();
    let mut array = heap.allocate(2, ElementType::Object).unwrap();
    let mut sink = TextSink::new(&heap, &mut array).unwrap();
    for i in 0..2 {
        let pending = sink.pending_mut();
        pending.clear();
        write!(pending, "item-{i}").unwrap();
        // Nothing is built until the cursor advances.
        assert_eq!(heap.stats().texts_constructed, i);
        sink.advance().unwrap();
    }
    sink.finish().unwrap();
    assert_eq!(array.text(1), Some("item-1"));
}

#[test]
fn advancing_past_the_end_is_refused() {
    let heap = Heap::new();
    let mut array = heap.allocate(1, ElementType::Object).unwrap();
    let mut sink = TextSink::new(&heap, &mut array).unwrap();
    sink.push("fits").unwrap();
    assert_eq!(sink.push("spills"), Err(MarshalError::CursorOverflow { len: 1 }));
    sink.finish().unwrap();
    assert_eq!(array.slot_states(), Some(vec![SlotState::Text("fits".into())]));
    assert_eq!(heap.stats().texts_constructed, 1);
}

#[test]
fn finish_before_the_end_rolls_back() {
    let heap = Heap::new();
    let mut array = heap.allocate(3, ElementType::Object).unwrap();
    let mut sink = TextSink::new(&heap, &mut array).unwrap();
    sink.push("only").unwrap();
    let err = sink.finish().unwrap_err();
    assert_eq!(err, MarshalError::LengthMismatch { expected: 3, got: 1 });
    assert_eq!(
        array.slot_states(),
        Some(vec![
            SlotState::Text("only".into()),
            SlotState::Empty,
            SlotState::Empty,
        ])
    );
    heap.release_array(array);
    assert_eq!(heap.stats().live_references(), 0);
}

#[test]
fn failed_advance_keeps_cursor() {
    let heap = Heap::with_config(HeapConfig::default().fail_text_after(1));
    let mut array = heap.allocate(2, ElementType::Object).unwrap();
    let mut sink = TextSink::new(&heap, &mut array).unwrap();
    sink.push("kept").unwrap();
    let err = sink.push("lost").unwrap_err();
    assert!(matches!(err, MarshalError::Construction { index: 1, .. }));
    assert_eq!(sink.position(), 1);
    sink.rollback();
    assert_eq!(
        array.slot_states(),
        Some(vec![SlotState::Text("kept".into()), SlotState::Empty])
    );
}

#[test]
fn sink_over_bulk_array_is_refused() {
    let heap = Heap::new();
    let mut array = heap.allocate(2, ElementType::Int64).unwrap();
    let err = TextSink::new(&heap, &mut array).err().unwrap();
    assert_eq!(
        err,
        MarshalError::LayoutMismatch {
            expected: ElementType::Object,
            actual: ElementType::Int64,
        }
    );
}

#[test]
fn usable_as_trait_object() {
    fn produce(out: &mut dyn TextOutput) -> Result<(), MarshalError> {
        for word in ["x", "y"] {
            out.push(word)?;
        }
        Ok(())
    }

    let heap = Heap::new();
    let mut array = heap.allocate(2, ElementType::Object).unwrap();
    let mut sink = TextSink::new(&heap, &mut array).unwrap();
    produce(&mut sink).unwrap();
    sink.finish().unwrap();
    assert_eq!(array.text(0), Some("x"));
    assert_eq!(array.text(1), Some("y"));
}
