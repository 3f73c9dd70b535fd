#![no_main]

use libfuzzer_sys::fuzz_target;
use packsnap_decoder::{Unpacker, UnpackerConfig};

// Fuzz target: decode arbitrary bytes as a stream of values.
//
// Reads until the first error. Catches bugs in:
// - Tag dispatch (every byte value, including the unassigned 0xc1)
// - Length/count fields claiming more than is present
// - Frame stack bookkeeping and the depth limit
// - Preallocation from hostile counts
//
// Every error must leave the cursor where it was.
fuzz_target!(|data: &[u8]| {
    let config = UnpackerConfig::with_max_stack_depth(32);
    let Ok(mut unpacker) = Unpacker::with_config(config) else {
        return;
    };
    if unpacker.feed(data).is_err() {
        return;
    }
    loop {
        let before = unpacker.buffer().consumed();
        if unpacker.read().is_err() {
            assert_eq!(unpacker.buffer().consumed(), before);
            break;
        }
    }
});
