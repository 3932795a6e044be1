//! Writing active fixes out, one per line.

use std::io::{self, Write};

use crate::diag::Diagnostics;
use crate::parser::RmcParser;

/// Writes every active fix produced by `parser` to `out` as
/// `HH:MM:SS, <lat>, <long>`. Void fixes are dropped.
///
/// Returns the number of fixes written.
pub fn write_active_fixes<R, D, W>(parser: RmcParser<R, D>, out: &mut W) -> io::Result<usize>
where
    R: io::BufRead,
    D: Diagnostics,
    W: Write,
{
    let mut written = 0;
    for sentence in parser {
        let sentence = sentence?;
        if !sentence.is_active() {
            debug!("dropping void fix at {}", sentence.time_of_fix);
            continue;
        }
        writeln!(out, "{}", sentence)?;
        written += 1;
    }
    Ok(written)
}
