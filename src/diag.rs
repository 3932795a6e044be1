//! Sinks that get told about lines the parser had to skip.

use crate::err::ParseError;

/// Receives every line that was rejected by the validator or the decoder.
pub trait Diagnostics {
    /// Called once per skipped line with the reason it was skipped.
    fn rejected(&mut self, _line: &[u8], _err: &ParseError) {}
}

/// Drops all diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {}

impl<'a, D: Diagnostics + ?Sized> Diagnostics for &'a mut D {
    #[inline]
    fn rejected(&mut self, line: &[u8], err: &ParseError) {
        (**self).rejected(line, err)
    }
}

/// Logs every rejected line with `warn!` and counts them.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    rejected: usize,
}

impl LogDiagnostics {
    pub fn new() -> Self {
        LogDiagnostics::default()
    }

    /// Number of lines rejected so far.
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }
}

impl Diagnostics for LogDiagnostics {
    fn rejected(&mut self, line: &[u8], err: &ParseError) {
        self.rejected += 1;
        warn!(
            "skipping line {:?}: {}",
            String::from_utf8_lossy(line).trim_end(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RmcParser;
    use std::io::Cursor;

    #[derive(Default)]
    struct Collect(Vec<(Vec<u8>, String)>);

    impl Diagnostics for Collect {
        fn rejected(&mut self, line: &[u8], err: &ParseError) {
            self.0.push((line.to_vec(), err.to_string()));
        }
    }

    #[test]
    fn no_diagnostics_is_silent() {
        let input = Cursor::new(&b"garbage\n$GPRMC*00\n"[..]);
        let mut parser = RmcParser::new(input);
        assert!(parser.next().is_none());
        assert_eq!(parser.lines_read(), 2);
    }

    #[test]
    fn sink_sees_each_rejected_line() {
        let input = Cursor::new(&b"garbage\r\n$GPRMC*00\r\n"[..]);
        let mut parser = RmcParser::with_diagnostics(input, Collect::default());
        assert!(parser.next().is_none());
        assert_eq!(parser.diagnostics().0.len(), 2);
        let sink = parser.into_diagnostics();
        assert_eq!(sink.0[0].0, b"garbage\r\n");
        assert!(sink.0[0].1.contains("\"$\""), "{}", sink.0[0].1);
        assert!(sink.0[1].1.contains("checksum"), "{}", sink.0[1].1);
    }

    #[test]
    fn log_diagnostics_counts() {
        let mut diag = LogDiagnostics::new();
        let mut parser = RmcParser::with_diagnostics(Cursor::new(&b""[..]), &mut diag);
        assert!(parser.process_line(b"$GPGGA,1*00").is_none());
        assert!(parser.process_line(b"\r\n").is_none());
        drop(parser);
        assert_eq!(diag.rejected_count(), 2);
    }
}
