//! This module provides a decoder for the *RMC* sentence of the *NMEA 0183*
//! protocol and a parser that drives it over a stream of lines.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::{fmt, io, iter};

use crate::diag::{Diagnostics, NoDiagnostics};
use crate::err::{CoordinateParseError, ParseError};
use crate::lexer;

const LAT_SPLIT: usize = 2;
const ABS_MAX_LAT: f64 = 90.0;
const LONG_SPLIT: usize = 3;
const ABS_MAX_LONG: f64 = 180.0;
/// Two digit years below this are in the 2000s, the rest in the 1900s.
const YEAR_PIVOT: u8 = 80;
/// Number of lines a parser reads unless told otherwise.
pub const DEFAULT_LINE_LIMIT: usize = 100;

/// The cardinal directions.
#[derive(Debug)]
enum CardDir {
    North,
    South,
    East,
    West,
}

impl CardDir {
    #[inline]
    fn get_sign(&self) -> f64 {
        match self {
            CardDir::North | CardDir::East => 1.0,
            CardDir::South | CardDir::West => -1.0,
        }
    }

    fn latitude(field: &[u8]) -> Result<Self, ParseError> {
        match field {
            b"N" => Ok(CardDir::North),
            b"S" => Ok(CardDir::South),
            s => Err(ParseError::InvalidDir(String::from_utf8_lossy(s).into_owned())),
        }
    }

    fn longitude(field: &[u8]) -> Result<Self, ParseError> {
        match field {
            b"E" => Ok(CardDir::East),
            b"W" => Ok(CardDir::West),
            s => Err(ParseError::InvalidDir(String::from_utf8_lossy(s).into_owned())),
        }
    }
}

/// Status of the receiver at the time of the fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverStatus {
    /// `A`, the fix is valid.
    Active,
    /// `V`, the receiver has no fix.
    Void,
}

impl ReceiverStatus {
    #[inline]
    fn try_from_field(field: &[u8]) -> Result<Self, ParseError> {
        match field {
            b"A" => Ok(ReceiverStatus::Active),
            b"V" => Ok(ReceiverStatus::Void),
            s => Err(ParseError::InvalidStatus(s.first().map_or(' ', |&c| c as char))),
        }
    }
}

/// This represents a correct RMC sentence and can be created by
/// [decode_rmc](fn.decode_rmc.html) or an [RmcParser](struct.RmcParser.html).
#[derive(Debug, Clone, PartialEq)]
pub struct RmcSentence {
    /// Talker id contained in the header of every sentence.
    pub talker_id: [u8; 2],
    /// Date and time of the fix in UTC.
    pub time_of_fix: DateTime<Utc>,
    /// Whether the receiver had a valid fix.
    pub receiver_status: ReceiverStatus,
    /// Latitude in decimal degrees.
    /// A positive value indicates that the coordinate is in the northern hemisphere.
    /// A negative value indicates that the coordinate is in the southern hemisphere.
    pub lat: f64,
    /// Longitude in decimal degrees.
    /// A positive value indicates that the coordinate is in the eastern hemisphere.
    /// A negative value indicates that the coordinate is in the western hemisphere.
    pub long: f64,
}

impl RmcSentence {
    /// `true` if the sentence carries an active fix.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.receiver_status == ReceiverStatus::Active
    }
}

impl fmt::Display for RmcSentence {
    /// Formats the fix as `HH:MM:SS, <lat>, <long>`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, {:.6}, {:.6}",
            self.time_of_fix.format("%H:%M:%S"),
            self.lat,
            self.long
        )
    }
}

/// Validate a raw line and decode it as an RMC sentence.
pub fn parse_line(line: &[u8]) -> Result<RmcSentence, ParseError> {
    decode_rmc(lexer::validate(line)?)
}

/// Decode a sentence that has already been validated and whose `*HH` suffix
/// has been removed, e.g. by [lexer::validate](../lexer/fn.validate.html).
///
/// ```text
///  $--RMC,hhmmss.ss,A,ddmm.mm,a,dddmm.mm,a,x.x,x.x,ddmmyy,x.x,a
/// ```
///
/// Only the fields that are decoded have to be ASCII, the ignored ones may
/// hold any bytes.
pub fn decode_rmc<S: AsRef<[u8]> + ?Sized>(sentence: &S) -> Result<RmcSentence, ParseError> {
    let fields = lexer::split_fields(sentence.as_ref())?;
    let mut fields = fields.iter().cloned();

    let talker_id = parse_header(expect_field!(fields, "message id")?)?;

    // Parse utc
    let utc = parse_utc(expect_field!(fields, "time", non_empty)?)?;

    let receiver_status =
        ReceiverStatus::try_from_field(expect_field!(fields, "status", non_empty)?)?;

    // Parse latitude, the hemisphere follows in its own field
    let lat = expect_field!(fields, "latitude", non_empty)?;
    let lat_dir = CardDir::latitude(expect_field!(fields, "latitude direction", non_empty)?)?;
    let lat = parse_coord(lat, &lat_dir, LAT_SPLIT)?;

    // Parse longitude
    let long = expect_field!(fields, "longitude", non_empty)?;
    let long_dir = CardDir::longitude(expect_field!(fields, "longitude direction", non_empty)?)?;
    let long = parse_coord(long, &long_dir, LONG_SPLIT)?;

    // Speed over ground and track angle are not needed
    expect_field!(fields, "speed over ground")?;
    expect_field!(fields, "track angle")?;

    let date = parse_date(expect_field!(fields, "date", non_empty)?)?;
    // Magnetic variation and everything after it is ignored

    let sentence = RmcSentence {
        talker_id,
        time_of_fix: Utc.from_utc_datetime(&date.and_time(utc)),
        receiver_status,
        lat,
        long,
    };
    check_fix(&sentence)?;
    trace!("decoded {:?}", sentence);
    Ok(sentence)
}

/// Checks the message id `$ttRMC` and returns the talker id.
fn parse_header(field: &[u8]) -> Result<[u8; 2], ParseError> {
    if field.len() != 6 || field[0] != b'$' || &field[3..] != b"RMC" {
        return Err(ParseError::UnexpectedSentenceType);
    }
    if !field[1..3].iter().all(u8::is_ascii_uppercase) {
        return Err(ParseError::UnexpectedSentenceType);
    }
    Ok([field[1], field[2]])
}

/// Converts a field of the format `hhmmss` or `hhmmss.sss` to a time.
/// A second of `60` is a leap second.
fn parse_utc(field: &[u8]) -> Result<NaiveTime, ParseError> {
    let digit = |i: usize| {
        field
            .get(i..)
            .and_then(|s| lexer::parse_two_digits(s, 10))
            .ok_or(ParseError::InvalidField("time"))
    };
    let (hour, min, sec) = (digit(0)?, digit(2)?, digit(4)?);

    let nano = match &field[6..] {
        [] => 0,
        [b'.', frac @ ..] => parse_fraction(frac).ok_or(ParseError::InvalidField("time"))?,
        _ => return Err(ParseError::InvalidField("time")),
    };

    // chrono represents a leap second as second 59 with an overflowing fraction
    let (sec, nano) = match sec {
        60 => (59, 1_000_000_000 + nano),
        s => (u32::from(s), nano),
    };
    NaiveTime::from_hms_nano_opt(u32::from(hour), u32::from(min), sec, nano)
        .ok_or(ParseError::InvalidDateTime("time of day out of range"))
}

/// Converts the digits after a decimal point into nanoseconds.
/// Digits beyond nanosecond precision are dropped.
fn parse_fraction(frac: &[u8]) -> Option<u32> {
    if frac.is_empty() {
        return Some(0);
    }
    let kept = &frac[..frac.len().min(9)];
    if !frac.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = lexer::parse_digits(kept, 10)?;
    Some(value * 10u32.pow((9 - kept.len()) as u32))
}

/// Converts a field of the format `ddmmyy` to a date.
fn parse_date(field: &[u8]) -> Result<NaiveDate, ParseError> {
    if field.len() != 6 {
        return Err(ParseError::InvalidField("date"));
    }
    let digit = |i: usize| lexer::parse_two_digits(&field[i..], 10).ok_or(ParseError::InvalidField("date"));
    let (day, month, year) = (digit(0)?, digit(2)?, digit(4)?);

    let year = if year < YEAR_PIVOT {
        2000 + i32::from(year)
    } else {
        1900 + i32::from(year)
    };
    NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
        .ok_or(ParseError::InvalidDateTime("date does not exist"))
}

/// Parse `coord` as a f64 representing a coordinate in decimal degrees.
/// `dir` will be converted to 1 or -1 to be multiplied with the degrees.
/// `deg_split` is the number of digits that make up the degrees.
fn parse_coord(coord: &[u8], dir: &CardDir, deg_split: usize) -> Result<f64, CoordinateParseError> {
    // This check is needed to ensure we don't panic
    if deg_split > coord.len() {
        return Err(CoordinateParseError::InvalidInput(
            "the field is too short for a coordinate",
        ));
    }

    let (deg, dec_min) = coord.split_at(deg_split);
    let degrees = match lexer::parse_digits(deg, 10) {
        Some(d) => f64::from(d),
        None => return Err(CoordinateParseError::Degrees(deg_split)),
    };
    let minutes = decimal_minutes(dec_min)?;
    if minutes >= 60.0 {
        return Err(CoordinateParseError::InvalidInput(
            "minutes must be below 60",
        ));
    }
    let dec_deg = degrees + minutes / 60.0;
    Ok(dec_deg * dir.get_sign())
}

/// Accumulates `mm.mmmm` digit by digit, the first digit counting tens of
/// minutes.
fn decimal_minutes(dec_min: &[u8]) -> Result<f64, CoordinateParseError> {
    let mut minutes = 0.0;
    let mut weight = 10.0;
    let mut seen_dot = false;
    for &c in dec_min {
        if c == b'.' {
            if seen_dot {
                return Err(CoordinateParseError::InvalidInput(
                    "more than one decimal point",
                ));
            }
            seen_dot = true;
            continue;
        }
        let d = match (c as char).to_digit(10) {
            Some(d) => d,
            None => return Err(CoordinateParseError::DecimalMin(c)),
        };
        minutes += f64::from(d) * weight;
        weight /= 10.0;
    }
    Ok(minutes)
}

/// Semantic checks that run once every field has been decoded.
fn check_fix(sentence: &RmcSentence) -> Result<(), ParseError> {
    // unreachable through decode_rmc, years start at 1980
    if sentence.time_of_fix.timestamp() == 0 && sentence.time_of_fix.timestamp_subsec_nanos() == 0 {
        return Err(ParseError::ZeroTime);
    }
    if sentence.lat.abs() > ABS_MAX_LAT {
        return Err(CoordinateParseError::InvalidCoord(sentence.lat, ABS_MAX_LAT).into());
    }
    if sentence.long.abs() > ABS_MAX_LONG {
        return Err(CoordinateParseError::InvalidCoord(sentence.long, ABS_MAX_LONG).into());
    }
    Ok(())
}

/// Validate and decode a single line, reporting any failure to `diag`.
fn process_line<D: Diagnostics>(line: &[u8], diag: &mut D) -> Option<RmcSentence> {
    match parse_line(line) {
        Ok(sentence) => Some(sentence),
        Err(e) => {
            diag.rejected(line, &e);
            None
        }
    }
}

/// The parser for the `NMEA 0183` protocol that parses only RMC sentences.
///
/// Lines that fail validation or decoding are reported to the
/// [Diagnostics](../diag/trait.Diagnostics.html) sink and skipped.
/// Iterating yields every decoded sentence, active or void.
#[derive(Debug)]
pub struct RmcParser<R, D = NoDiagnostics> {
    input: R,
    buf: Vec<u8>,
    diag: D,
    limit: Option<usize>,
    lines_read: usize,
    done: bool,
}

impl<R: io::BufRead> RmcParser<R> {
    /// Create a new parser that parses `input` without reporting
    /// rejected lines.
    pub fn new(input: R) -> Self {
        RmcParser::with_diagnostics(input, NoDiagnostics)
    }
}

impl<R: io::BufRead, D: Diagnostics> RmcParser<R, D> {
    /// Create a new parser that reports rejected lines to `diag`.
    pub fn with_diagnostics(input: R, diag: D) -> Self {
        RmcParser {
            input,
            buf: Vec::new(),
            diag,
            limit: Some(DEFAULT_LINE_LIMIT),
            lines_read: 0,
            done: false,
        }
    }

    /// Stop after `limit` lines have been read. `None` reads until EOF.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Number of lines read so far, including rejected ones.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// The sink rejected lines are reported to.
    pub fn diagnostics(&self) -> &D {
        &self.diag
    }

    /// Consumes the parser and hands back its sink.
    pub fn into_diagnostics(self) -> D {
        self.diag
    }

    /// Validate and decode a single line that did not come from the input.
    /// It does not count towards the line limit.
    pub fn process_line(&mut self, line: &[u8]) -> Option<RmcSentence> {
        process_line(line, &mut self.diag)
    }

    /// Read lines until one decodes.
    /// Returns `None` on EOF, once the line limit is reached, or after an
    /// I/O error has been returned. Once it returned `None` it always will.
    pub fn read_sentence(&mut self) -> Option<Result<RmcSentence, io::Error>> {
        if self.done {
            return None;
        }
        loop {
            if let Some(limit) = self.limit {
                if self.lines_read >= limit {
                    debug!("line limit of {} reached", limit);
                    self.done = true;
                    return None;
                }
            }

            self.buf.clear();
            let read = self.input.read_until(b'\n', &mut self.buf);
            // an i/o error is reported once, then the parser is done
            self.done = read.is_err();
            if try_some!(read) == 0 {
                self.done = true;
                return None;
            }
            self.lines_read += 1;

            if let Some(sentence) = process_line(&self.buf, &mut self.diag) {
                return Some(Ok(sentence));
            }
        }
    }
}

impl<R: io::BufRead, D: Diagnostics> Iterator for RmcParser<R, D> {
    type Item = Result<RmcSentence, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_sentence()
    }
}

impl<R: io::BufRead, D: Diagnostics> iter::FusedIterator for RmcParser<R, D> {}
