#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate rmcfix;

use std::io::Cursor;
use rmcfix::RmcParser;

fuzz_target!(|data: &[u8]| {
    let _ = rmcfix::parse_line(data);

    let parser = RmcParser::new(Cursor::new(data)).limit(None);
    for _ in parser {
        ();
    }
});
