use arrayvec::CapacityError;

quick_error! {
    #[derive(Debug)]
    pub enum ParseError {
        Validation(err: ValidationError) {
            from()
            description("Invalid sentence frame")
            display("Sentence rejected by the validator: {}", err)
            cause(err)
        }
        UnexpectedSentenceType {
            description("Sentence type has wrong format")
            display("Encountered unexpected sentence type")
        }
        MissingField(field: &'static str) {
            description("Missing field")
            display("Sentence ended or was empty where the {} field was expected", field)
        }
        InvalidField(field: &'static str) {
            description("Invalid field")
            display("Could not decode the digits of the {} field", field)
        }
        InvalidStatus(c: char) {
            description("Invalid receiver status")
            display("Expected receiver status \"A\" or \"V\", found \"{}\"", c)
        }
        InvalidDir(dir: String) {
            description("Invalid cardinal direction")
            display("Encountered invalid cardinal direction \"{}\"", dir)
        }
        InvalidDateTime(msg: &'static str) {
            description("Invalid date or time")
            display("Invalid time of fix: {}", msg)
        }
        ZeroTime {
            description("Time of fix is zero")
            display("Time of fix is the Unix epoch")
        }
        Coordinate(err: CoordinateParseError) {
            from()
            description("Coordinate parsing error")
            display("Could not parse field as coordinate: {}", err)
            cause(err)
        }
        FieldOverflow(err: CapacityError, capacity: usize) {
            description("Too many fields")
            display("Tried to split more than {} fields out of the sentence: {}", capacity, err)
            cause(err)
        }
    }
}

// Quick error can't handle from for tuples
impl From<(CapacityError, usize)> for ParseError {
    fn from((e, cap): (CapacityError, usize)) -> Self {
        ParseError::FieldOverflow(e, cap)
    }
}

quick_error! {
    #[derive(Debug, PartialEq)]
    pub enum ValidationError {
        Empty {
            description("Empty line")
            display("Encountered an empty line")
        }
        TooShort(len: usize) {
            description("Line too short")
            display("Line of {} bytes is too short to hold \"$*HH\"", len)
        }
        MissingStart(c: u8) {
            description("Missing start delimiter")
            display("Expected \"$\" at the start of the line, found \"{}\"", *c as char)
        }
        MissingChecksumDelimiter(c: u8) {
            description("Missing checksum delimiter")
            display("Expected \"*\" before the checksum, found \"{}\"", *c as char)
        }
        InvalidChecksumDigits(hi: u8, lo: u8) {
            description("Invalid checksum digits")
            display("Checksum \"{}{}\" is not a two digit hex number", *hi as char, *lo as char)
        }
        InvalidChecksum(expected: u8, found: u8) {
            description("Invalid checksum")
            display("Expected checksum \"{:02X}\", found checksum \"{:02X}\"", expected, found)
        }
    }
}

// Quick error can't handle from for tuples
impl From<(u8, u8)> for ValidationError {
    fn from((expected, found): (u8, u8)) -> Self {
        ValidationError::InvalidChecksum(expected, found)
    }
}

quick_error! {
    #[derive(Debug, PartialEq)]
    pub enum CoordinateParseError {
        InvalidInput(msg: &'static str) {
            description("Invalid input")
            display("Invalid input: {}", msg)
        }
        Degrees(width: usize) {
            description("Invalid degrees")
            display("Expected {} decimal digits of degrees", width)
        }
        DecimalMin(c: u8) {
            description("Invalid decimal minutes")
            display("Encountered invalid character \"{}\" in the minutes", *c as char)
        }
        InvalidCoord(val: f64, max: f64) {
            description("Invalid coordinate")
            display("Invalid coordinate: {} should be between {} and {}", val, max*-1.0, max)
        }
    }
}
