#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parsing must never panic; an accepted net must serialize again.
        if let Ok(net) = mindoo_net::net::Net::parse(s, "fuzz.ll_net") {
            let _ = net.to_text();
        }
    }
});
