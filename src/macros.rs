#[macro_export]
macro_rules! try_some {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => return Some(Err(From::from(e))),
        }
    };
}

/// Takes the next field out of a positional field iterator.
///
/// `expect_field!(fields, name)` fails with `ParseError::MissingField(name)`
/// if the sentence ended. `expect_field!(fields, name, non_empty)` also fails
/// if the field is present but empty.
#[macro_export]
macro_rules! expect_field {
    ($fields:expr, $name:expr) => {
        match $fields.next() {
            Some(f) => Ok(f),
            None => Err(ParseError::MissingField($name)),
        }
    };
    ($fields:expr, $name:expr, non_empty) => {
        match $fields.next() {
            Some(f) if !f.is_empty() => Ok(f),
            _ => Err(ParseError::MissingField($name)),
        }
    };
}
