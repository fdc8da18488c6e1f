#![no_main]

use libfuzzer_sys::fuzz_target;

use shelfmark::normalize::normalize;

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let text = String::from_utf8_lossy(data).to_string();

    // Normalization should never panic regardless of input, and running it
    // twice must give the same result as running it once
    let once = normalize(&text);
    let twice = normalize(once.as_str());
    assert_eq!(once.as_str(), twice.as_str());
});
