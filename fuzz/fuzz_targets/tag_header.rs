#![no_main]

use libfuzzer_sys::fuzz_target;
use packsnap_wire::{Header, Tag};

// Fuzz target: header parsing on raw slices.
//
// `Header::read_from` must either fail or report a size that fits the
// input, and `Tag::byte` must invert `Tag::parse`.
fuzz_target!(|data: &[u8]| {
    if let Some(&first) = data.first() {
        if let Ok(tag) = Tag::parse(first) {
            assert_eq!(tag.byte(), first);
        }
    }
    if let Ok(header) = Header::read_from(data) {
        assert!(header.size() <= data.len());
        assert_eq!(header.size(), header.tag.header_size());
    }
});
