//! Fuzz target for the escape decoder.
//!
//! Feeds arbitrary bytes split at an input-chosen point and checks that
//! the decoder never panics and decodes the same events however the
//! stream is split.

#![no_main]

use gridscope::input::EscapeDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, bytes)) = data.split_first() else {
        return;
    };
    let whole = EscapeDecoder::new().decode(bytes);

    let mut decoder = EscapeDecoder::new();
    let mut events = Vec::new();
    let cut = usize::from(split).min(bytes.len());
    for chunk in [&bytes[..cut], &bytes[cut..]] {
        decoder.feed(chunk, &mut |event| events.push(event));
    }

    assert_eq!(whole, events, "split at {cut} changed the decoded events");
});
