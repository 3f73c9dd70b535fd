#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use packsnap_decoder::{Extension, Unpacker, Value};

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Nil,
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
    Ext(i8, Vec<u8>),
    Array(Vec<FuzzValue>),
    Map(Vec<(FuzzValue, FuzzValue)>),
}

impl From<&FuzzValue> for Value {
    fn from(v: &FuzzValue) -> Self {
        match v {
            FuzzValue::Nil => Value::Nil,
            FuzzValue::Bool(b) => Value::Bool(*b),
            FuzzValue::Unsigned(n) => Value::from(*n),
            FuzzValue::Signed(n) => Value::from(*n),
            // NaN never compares equal; normalise it away.
            FuzzValue::F32(f) if f.is_nan() => Value::Nil,
            FuzzValue::F64(f) if f.is_nan() => Value::Nil,
            FuzzValue::F32(f) => Value::from(*f),
            FuzzValue::F64(f) => Value::from(*f),
            FuzzValue::Str(s) => Value::str(s),
            FuzzValue::Bin(b) => Value::Bin(b.clone()),
            FuzzValue::Ext(t, d) => Value::Ext(Extension::new(*t, d.clone())),
            FuzzValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            FuzzValue::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (Value::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// Fuzz target: fixture writer → decoder.
//
// Any value the writer produces must decode back to an equal value,
// consuming exactly its bytes.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(fuzz_value) = FuzzValue::arbitrary(&mut u) else {
        return;
    };
    let value = Value::from(&fuzz_value);
    let bytes = packsnap_tests::encode(&value);

    let mut unpacker = Unpacker::new();
    unpacker.feed(&bytes).unwrap();
    match unpacker.read() {
        Ok(decoded) => {
            assert_eq!(decoded, value);
            assert!(unpacker.buffer().is_empty());
        }
        // Deeply nested input may legitimately exceed the default limit.
        Err(e) => assert!(e.is_fatal(), "unexpected error: {e}"),
    }
});
