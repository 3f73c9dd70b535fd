#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use packsnap_decoder::{Unpacker, Value};

#[derive(Debug, Arbitrary)]
struct Input {
    bytes: Vec<u8>,
    cuts: Vec<u16>,
}

fn drain(unpacker: &mut Unpacker, out: &mut Vec<Value>) -> bool {
    for value in unpacker.values() {
        match value {
            Ok(v) => out.push(v),
            Err(_) => return false,
        }
    }
    true
}

// Fuzz target: feeding the same bytes in arbitrary pieces.
//
// Whatever a single feed decodes before its first fatal error, a chunked
// feed must decode identically.
fuzz_target!(|input: Input| {
    let mut whole = Unpacker::new();
    if whole.feed(&input.bytes).is_err() {
        return;
    }
    let mut expected = Vec::new();
    let whole_ok = drain(&mut whole, &mut expected);

    let mut chunked = Unpacker::new();
    let mut seen = Vec::new();
    let mut chunked_ok = true;
    let mut rest = input.bytes.as_slice();
    let mut cuts = input.cuts.iter();
    while !rest.is_empty() && chunked_ok {
        let n = cuts
            .next()
            .map_or(rest.len(), |&c| usize::from(c) % rest.len() + 1);
        let (piece, tail) = rest.split_at(n);
        rest = tail;
        if chunked.feed(piece).is_err() {
            return;
        }
        chunked_ok = drain(&mut chunked, &mut seen);
    }

    assert_eq!(whole_ok, chunked_ok);
    assert_eq!(expected, seen);
});
