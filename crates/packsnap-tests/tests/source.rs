//! Source-backed unpackers.
//!
//! With a backing source the unpacker pulls on underrun instead of
//! failing right away. Chunk boundaries are invisible to the caller, fed
//! bytes are decoded before pulled ones, and source failures come through
//! unchanged.

use std::collections::VecDeque;
use std::io::{self, Cursor};

use packsnap_decoder::{ByteSource, DecodeError, ReaderSource, Unpacker, UnpackerConfig, Value};
use packsnap_tests::encode_all;

/// Hands out pre-cut chunks, one per `fill`, then reports end of data.
struct Chunked {
    chunks: VecDeque<Vec<u8>>,
}

impl Chunked {
    fn new(bytes: &[u8], sizes: &[usize]) -> Self {
        let mut chunks = VecDeque::new();
        let mut rest = bytes;
        let mut sizes = sizes.iter().cycle();
        while !rest.is_empty() {
            let n = (*sizes.next().unwrap()).clamp(1, rest.len());
            let (head, tail) = rest.split_at(n);
            chunks.push_back(head.to_vec());
            rest = tail;
        }
        Self { chunks }
    }
}

impl ByteSource for Chunked {
    fn fill(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(dst.len());
        dst[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.chunks.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

/// Yields its bytes, then fails.
struct FailsAfter {
    bytes: Cursor<Vec<u8>>,
}

impl ByteSource for FailsAfter {
    fn fill(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        match io::Read::read(&mut self.bytes, dst)? {
            0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away")),
            n => Ok(n),
        }
    }
}

fn sample() -> Vec<Value> {
    vec![
        Value::Map(vec![
            (Value::str("name"), Value::str("packsnap")),
            (Value::str("sizes"), Value::from(vec![1u32, 300, 70_000])),
        ]),
        Value::Bin((0..=255).collect()),
        Value::from(-123_456_789i64),
        Value::from(0.1f32),
    ]
}

fn drain(unpacker: &mut Unpacker) -> Vec<Value> {
    unpacker.values().collect::<Result<_, _>>().unwrap()
}

#[test]
fn chunk_sizes_are_invisible() {
    let values = sample();
    let bytes = encode_all(&values);

    let cases: [&[usize]; 5] = [&[1], &[2, 3], &[7], &[64], &[1, 100, 5]];
    for sizes in cases {
        let source = Chunked::new(&bytes, sizes);
        let mut unpacker = Unpacker::with_source(source, UnpackerConfig::default()).unwrap();
        assert_eq!(drain(&mut unpacker), values, "chunk sizes {sizes:?}");
    }
}

#[test]
fn small_read_chunk_size() {
    let values = sample();
    let config = UnpackerConfig {
        read_chunk_size: 1,
        ..UnpackerConfig::default()
    };
    let source = ReaderSource::new(Cursor::new(encode_all(&values)));
    let mut unpacker = Unpacker::with_source(source, config).unwrap();
    assert_eq!(drain(&mut unpacker), values);
}

#[test]
fn fed_bytes_come_first() {
    let source = ReaderSource::new(Cursor::new(vec![0x02]));
    let mut unpacker = Unpacker::with_source(source, UnpackerConfig::default()).unwrap();
    unpacker.feed(&[0x01]).unwrap();
    assert_eq!(drain(&mut unpacker), vec![Value::from(1u8), Value::from(2u8)]);
}

#[test]
fn fed_prefix_completed_by_source() {
    // The array header is fed, its elements come from the source.
    let source = ReaderSource::new(Cursor::new(vec![0x01, 0x02]));
    let mut unpacker = Unpacker::with_source(source, UnpackerConfig::default()).unwrap();
    unpacker.feed(&[0x92]).unwrap();
    assert_eq!(unpacker.read().unwrap(), Value::from(vec![1u8, 2]));
}

#[test]
fn exhausted_source_leaves_partial_value_buffered() {
    let source = ReaderSource::new(Cursor::new(vec![0x93, 0x01]));
    let mut unpacker = Unpacker::with_source(source, UnpackerConfig::default()).unwrap();
    assert!(matches!(
        unpacker.read(),
        Err(DecodeError::IncompleteData { needed: 3, available: 2 })
    ));

    // Later bytes can still be fed by hand.
    unpacker.feed(&[0x02, 0x03]).unwrap();
    assert_eq!(unpacker.read().unwrap(), Value::from(vec![1u8, 2, 3]));
}

#[test]
fn source_failure_is_reported() {
    let source = FailsAfter {
        bytes: Cursor::new(vec![0x01, 0x92, 0x01]),
    };
    let mut unpacker = Unpacker::with_source(source, UnpackerConfig::default()).unwrap();
    assert_eq!(unpacker.read().unwrap(), Value::from(1u8));

    let err = unpacker.read().unwrap_err();
    assert!(!err.is_incomplete());
    match err {
        DecodeError::Source(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected a source error, got {other:?}"),
    }
    // The partial array is still there.
    assert_eq!(unpacker.buffer().as_slice(), &[0x92, 0x01]);
}

#[test]
fn source_failure_ends_each_with_error() {
    let source = FailsAfter {
        bytes: Cursor::new(vec![0x01, 0x02]),
    };
    let mut unpacker = Unpacker::with_source(source, UnpackerConfig::default()).unwrap();
    let mut seen = Vec::new();
    let err = unpacker.each(|v| seen.push(v)).unwrap_err();
    assert_eq!(seen, vec![Value::from(1u8), Value::from(2u8)]);
    assert!(matches!(err, DecodeError::Source(_)));
}

#[test]
fn pull_respects_buffer_limit() {
    let config = UnpackerConfig {
        max_buffer_size: Some(4),
        read_chunk_size: 64,
        ..UnpackerConfig::default()
    };
    // str8 of 10 bytes needs 12 buffered at once.
    let mut bytes = vec![0xd9, 10];
    bytes.extend_from_slice(b"0123456789");
    let source = ReaderSource::new(Cursor::new(bytes));
    let mut unpacker = Unpacker::with_source(source, config).unwrap();
    assert!(matches!(
        unpacker.read(),
        Err(DecodeError::BufferLimitExceeded { limit: 4, .. })
    ));
    assert!(unpacker.buffer().available() <= 4);
}

#[test]
fn explicit_pull() {
    use packsnap_decoder::Pull;

    let source = ReaderSource::new(Cursor::new(vec![0xc0, 0xc0, 0xc0]));
    let config = UnpackerConfig {
        read_chunk_size: 2,
        ..UnpackerConfig::default()
    };
    let mut unpacker = Unpacker::with_source(source, config).unwrap();
    let buffer = unpacker.buffer_mut();
    assert!(buffer.has_source());
    assert_eq!(buffer.pull_from_source().unwrap(), Pull::Filled(2));
    assert_eq!(buffer.pull_from_source().unwrap(), Pull::Filled(1));
    assert_eq!(buffer.pull_from_source().unwrap(), Pull::EndOfData);
    assert_eq!(buffer.available(), 3);
}
