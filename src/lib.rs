//! A parser for the *RMC* sentence of the *NMEA 0183* protocol.
//!
//! Every line is validated on its own (framing and checksum) and then decoded
//! into an [RmcSentence](parser/struct.RmcSentence.html). Lines that fail
//! either step are handed to a [Diagnostics](diag/trait.Diagnostics.html)
//! sink and skipped.

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate arrayvec;
extern crate chrono;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

pub mod diag;
pub mod err;
#[macro_use]
mod macros;
pub mod lexer;
pub mod parser;
pub mod report;

pub use crate::diag::{Diagnostics, LogDiagnostics, NoDiagnostics};
pub use crate::err::{CoordinateParseError, ParseError, ValidationError};
pub use crate::parser::{decode_rmc, parse_line, ReceiverStatus, RmcParser, RmcSentence};
