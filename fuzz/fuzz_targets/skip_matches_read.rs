#![no_main]

use libfuzzer_sys::fuzz_target;
use packsnap_decoder::Unpacker;

// Fuzz target: skip and read agree on arbitrary input.
//
// Both walk the same bytes with the same checks, so they must succeed or
// fail together and consume the same number of bytes.
fuzz_target!(|data: &[u8]| {
    let mut reader = Unpacker::new();
    let mut skipper = Unpacker::new();
    if reader.feed(data).is_err() || skipper.feed(data).is_err() {
        return;
    }
    loop {
        let read = reader.read();
        let skipped = skipper.skip();
        assert_eq!(read.is_ok(), skipped.is_ok());
        assert_eq!(reader.buffer().consumed(), skipper.buffer().consumed());
        if read.is_err() {
            break;
        }
    }
});
