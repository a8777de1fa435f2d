#![no_main]
use libfuzzer_sys::fuzz_target;
use mindoo_asp::symbol::Symbol;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(symbol) = Symbol::parse(s) {
            let again = Symbol::parse(&symbol.to_string()).expect("rendered symbol must parse");
            assert_eq!(again, symbol);
        }
    }
});
