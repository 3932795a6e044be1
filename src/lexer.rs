//! Framing, checksum and tokenization of single *NMEA 0183* lines.

use arrayvec::ArrayVec;

use crate::err::{ParseError, ValidationError};

/// Maximum number of comma separated fields a sentence may be split into.
pub const FIELD_CAPACITY: usize = 32;
/// Length of the `*HH` checksum suffix.
const CHECKSUM_SUFFIX_LENGTH: usize = 3;
/// Shortest possible frame: `$*HH`.
const MIN_FRAME_LENGTH: usize = 1 + CHECKSUM_SUFFIX_LENGTH;

/// Fields of a sentence in positional order.
pub type Fields<'a> = ArrayVec<[&'a [u8]; FIELD_CAPACITY]>;

/// Interprets the first two bytes of `text` as a number in `base`.
///
/// Returns `None` if `text` is shorter than two bytes or if either byte is
/// not a digit in `base`.
#[inline]
pub fn parse_two_digits(text: &[u8], base: u32) -> Option<u8> {
    if text.len() < 2 {
        return None;
    }
    // two digits never exceed 255 for bases up to 16
    parse_digits(&text[..2], base).map(|v| v as u8)
}

/// Interprets all of `text` as a number in `base`.
/// An empty slice is not a number.
pub fn parse_digits(text: &[u8], base: u32) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    text.iter().try_fold(0u32, |acc, &c| {
        let d = (c as char).to_digit(base)?;
        acc.checked_mul(base)?.checked_add(d)
    })
}

/// XOR of all bytes in `payload`.
#[inline]
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |sum, &c| sum ^ c)
}

/// Strips a trailing `\n` or `\r\n` from `line`.
#[inline]
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = match line.last() {
        Some(b'\n') => &line[..line.len() - 1],
        _ => line,
    };
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}

/// Checks that `line` is framed as `$...*HH` followed by an optional line
/// ending and that `HH` matches the XOR of all bytes between `$` and `*`.
///
/// On success the sentence without its checksum suffix and line ending is
/// returned. The leading `$` is kept.
pub fn validate(line: &[u8]) -> Result<&[u8], ValidationError> {
    let line = trim_line_ending(line);
    match line.first() {
        None => return Err(ValidationError::Empty),
        Some(&b'$') => (),
        Some(&c) => return Err(ValidationError::MissingStart(c)),
    }
    if line.len() < MIN_FRAME_LENGTH {
        return Err(ValidationError::TooShort(line.len()));
    }

    let star = line.len() - CHECKSUM_SUFFIX_LENGTH;
    if line[star] != b'*' {
        return Err(ValidationError::MissingChecksumDelimiter(line[star]));
    }

    let digits = &line[star + 1..];
    let found = match parse_two_digits(digits, 16) {
        Some(v) => v,
        None => return Err(ValidationError::InvalidChecksumDigits(digits[0], digits[1])),
    };

    let expected = checksum(&line[1..star]);
    if expected != found {
        return Err((expected, found).into());
    }

    Ok(&line[..star])
}

/// Returns `true` if `line` passes [validate](fn.validate.html).
#[inline]
pub fn is_nmea_line(line: &[u8]) -> bool {
    validate(line).is_ok()
}

/// Splits a validated sentence on `,`.
/// Empty fields are kept so that every field stays at its position.
pub fn split_fields(sentence: &[u8]) -> Result<Fields<'_>, ParseError> {
    let mut fields = Fields::new();
    for field in sentence.split(|&c| c == b',') {
        if let Err(e) = fields.try_push(field) {
            return Err((e.simplify(), FIELD_CAPACITY).into());
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &[u8] =
        b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n";

    #[test]
    fn two_digits() {
        assert_eq!(parse_two_digits(b"12", 10), Some(12));
        assert_eq!(parse_two_digits(b"6A", 16), Some(0x6a));
        assert_eq!(parse_two_digits(b"6a", 16), Some(0x6a));
        assert_eq!(parse_two_digits(b"ff", 16), Some(255));
        // only the first two bytes are consumed
        assert_eq!(parse_two_digits(b"2303", 10), Some(23));
    }

    #[test]
    fn two_digits_rejects() {
        assert_eq!(parse_two_digits(b"", 10), None);
        assert_eq!(parse_two_digits(b"1", 10), None);
        assert_eq!(parse_two_digits(b"1A", 10), None);
        assert_eq!(parse_two_digits(b"G0", 16), None);
        assert_eq!(parse_two_digits(b" 1", 10), None);
        assert_eq!(parse_two_digits(b"-1", 10), None);
    }

    #[test]
    fn digits() {
        assert_eq!(parse_digits(b"011", 10), Some(11));
        assert_eq!(parse_digits(b"180", 10), Some(180));
        assert_eq!(parse_digits(b"01a", 10), None);
        assert_eq!(parse_digits(b"", 10), None);
    }

    #[test]
    fn canonical_sentence_is_valid() {
        assert_eq!(
            validate(CANONICAL),
            Ok(&b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W"[..])
        );
        assert!(is_nmea_line(CANONICAL));
    }

    #[test]
    fn line_endings() {
        let bare = &CANONICAL[..CANONICAL.len() - 2];
        let lf = [bare, b"\n"].concat();
        assert!(is_nmea_line(bare));
        assert!(is_nmea_line(&lf));
        assert_eq!(validate(bare), validate(CANONICAL));
    }

    #[test]
    fn lowercase_checksum() {
        assert!(is_nmea_line(
            b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6a\r\n"
        ));
    }

    #[test]
    fn missing_dollar() {
        assert_eq!(
            validate(&CANONICAL[1..]),
            Err(ValidationError::MissingStart(b'G'))
        );
        for line in &[&b"!AIVDM*00"[..], b"GPRMC*6A\r\n", b" $GPRMC*6A", b"\r\n*"] {
            assert!(!is_nmea_line(line));
        }
    }

    #[test]
    fn empty_and_short_lines() {
        assert_eq!(validate(b""), Err(ValidationError::Empty));
        assert_eq!(validate(b"\r\n"), Err(ValidationError::Empty));
        assert_eq!(validate(b"\n"), Err(ValidationError::Empty));
        assert_eq!(validate(b"$"), Err(ValidationError::TooShort(1)));
        assert_eq!(validate(b"$*0\r\n"), Err(ValidationError::TooShort(3)));
        assert_eq!(validate(b"$*00"), Ok(&b"$"[..]));
    }

    #[test]
    fn no_asterisk() {
        assert_matches!(
            validate(b"$GPRMC,123519,A\r\n"),
            Err(ValidationError::MissingChecksumDelimiter(b'9'))
        );
        assert_matches!(
            validate(b"$GPRMC,123519,A*6\r\n"),
            Err(ValidationError::MissingChecksumDelimiter(_))
        );
    }

    #[test]
    fn malformed_checksum_digits() {
        assert_eq!(
            validate(b"$GPRMC*G1\r\n"),
            Err(ValidationError::InvalidChecksumDigits(b'G', b'1'))
        );
        assert_matches!(
            validate(b"$GPRMC* 1"),
            Err(ValidationError::InvalidChecksumDigits(_, _))
        );
    }

    #[test]
    fn altered_checksum() {
        let mut line = CANONICAL.to_vec();
        let pos = line.len() - 3;
        line[pos] = b'B';
        assert_eq!(
            validate(&line),
            Err(ValidationError::InvalidChecksum(0x6a, 0x6b))
        );
    }

    #[test]
    fn single_bit_corruption() {
        let star = CANONICAL.len() - 5;
        for pos in 1..star {
            for bit in 0..8 {
                let mut line = CANONICAL.to_vec();
                line[pos] ^= 1 << bit;
                assert!(!is_nmea_line(&line), "pos {} bit {}", pos, bit);
            }
        }
    }

    #[test]
    fn computed_checksum_round_trip() {
        let payload = b"GPRMC,000000,V,,,,,,,010100,,";
        let line = format!(
            "${}*{:02X}\r\n",
            std::str::from_utf8(payload).unwrap(),
            checksum(payload)
        );
        assert!(is_nmea_line(line.as_bytes()));
    }

    #[test]
    fn fields_keep_positions() {
        let fields = split_fields(b"$GPRMC,,V,,").unwrap();
        let expected: [&[u8]; 5] = [b"$GPRMC", b"", b"V", b"", b""];
        assert_eq!(fields.as_slice(), &expected[..]);
    }

    #[test]
    fn field_overflow() {
        let sentence = ",".repeat(FIELD_CAPACITY);
        assert_matches!(
            split_fields(sentence.as_bytes()),
            Err(ParseError::FieldOverflow(_, FIELD_CAPACITY))
        );
        let sentence = ",".repeat(FIELD_CAPACITY - 1);
        assert_eq!(split_fields(sentence.as_bytes()).unwrap().len(), FIELD_CAPACITY);
    }
}
