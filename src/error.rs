use thiserror::Error;

/// A 1-based line number and 0-based column, identifying where in the input
/// an error or a token boundary occurred.
///
/// `column` counts bytes since the start of the current line (or since the
/// start of the buffer, if no line feed has been seen yet in this reader's
/// lifetime); it resets to `0` immediately after a line feed is consumed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u64,
    pub column: u64,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// An error produced while advancing a [`Reader`](crate::Reader) through
/// malformed input.
///
/// This is a closed set: every variant corresponds to exactly one grammar
/// violation described by RFC 8259 (plus the comment extension). It does not
/// cover typed-accessor failures (converting an already-tokenized value
/// slice to `i32`, `f64`, etc.) — those use their own small error types in
/// [`crate::number`], the same way the teacher parser this crate is modeled
/// on keeps "the text isn't valid JSON" and "the value doesn't convert"
/// as separate error families.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    /// Object nesting exceeded the configured maximum depth.
    #[error("object nesting exceeds the maximum depth at {0}")]
    ObjectDepthTooLarge(Position),

    /// Array nesting exceeded the configured maximum depth.
    #[error("array nesting exceeds the maximum depth at {0}")]
    ArrayDepthTooLarge(Position),

    /// A `}` was found while inside an array.
    #[error("found `}}` while inside an array at {0}")]
    ObjectEndWithinArray(Position),

    /// A `]` was found while inside an object.
    #[error("found `]` while inside an object at {0}")]
    ArrayEndWithinObject(Position),

    /// Inside an object, expected `}` or a property name but found something
    /// else.
    #[error("expected `}}` or a property name at {0}")]
    ExpectedStartOfPropertyNotFound(Position),

    /// After a comma inside an object, expected a property name but found
    /// something else.
    #[error("expected a property name or a value at {0}")]
    ExpectedStartOfPropertyOrValueNotFound(Position),

    /// After a property name, expected a `:` followed by a value but the
    /// value was missing.
    #[error("expected a value after the property name at {0}")]
    ExpectedValueAfterPropertyNameNotFound(Position),

    /// A property name was not followed by `:`.
    #[error("expected `:` after the property name at {0}")]
    ExpectedSeparaterAfterPropertyNameNotFound(Position),

    /// A value was expected but the next byte does not start any valid
    /// token.
    #[error("expected the start of a value at {0}")]
    ExpectedStartOfValueNotFound(Position),

    /// A number's integer part is missing a digit (e.g. `-` not followed by
    /// a digit).
    #[error("expected a digit at {0}")]
    ExpectedDigitNotFound(Position),

    /// The buffer ended before a required digit was seen, and the reader
    /// was told this is the final block.
    #[error("expected a digit but reached the end of data at {0}")]
    ExpectedDigitNotFoundEndOfData(Position),

    /// A number's fractional part (`.`) is missing its digits.
    #[error("expected a digit after the decimal point at {0}")]
    ExpectedNextDigitComponentNotFound(Position),

    /// A number's exponent (`e`/`E`) is missing its digits.
    #[error("expected a digit in the exponent at {0}")]
    ExpectedNextDigitEValueNotFound(Position),

    /// A number inside a container was not followed by a legal delimiter
    /// byte.
    #[error("expected a delimiter after the number at {0}")]
    ExpectedEndOfDigitNotFound(Position),

    /// The literal `true` was expected but the bytes didn't match.
    #[error("expected literal `true` at {0}")]
    ExpectedTrue(Position),

    /// The literal `false` was expected but the bytes didn't match.
    #[error("expected literal `false` at {0}")]
    ExpectedFalse(Position),

    /// The literal `null` was expected but the bytes didn't match.
    #[error("expected literal `null` at {0}")]
    ExpectedNull(Position),

    /// A string's closing `"` was never found in the final block.
    #[error("unterminated string starting at {0}")]
    EndOfStringNotFound(Position),

    /// A `/* ... */` comment's closing `*/` was never found in the final
    /// block.
    #[error("unterminated comment starting at {0}")]
    EndOfCommentNotFound(Position),

    /// A string contains an unescaped control byte, or an escape sequence
    /// that is neither one of `"\/bfnrt` nor a valid `\uXXXX`.
    #[error("invalid character `{byte:#04x}` within string at {position}")]
    InvalidCharacterWithinString { byte: u8, position: Position },

    /// The input contains a byte that cannot start any token (e.g. a raw
    /// control character outside a string, or `/` with comments disabled).
    #[error("found invalid character `{byte:#04x}` at {position}")]
    FoundInvalidCharacter { byte: u8, position: Position },

    /// The final block ended in the middle of a document (an unclosed
    /// container, or a dangling comma).
    #[error("unexpected end of JSON text at {0}")]
    InvalidEndOfJson(Position),

    /// The final block contains trailing, non-whitespace, non-comment bytes
    /// after a complete single top-level scalar or container.
    #[error("expected end of input after a single JSON value at {0}")]
    ExpectedEndAfterSingleJson(Position),
}

impl ReaderError {
    /// The position at which this error was detected.
    pub fn position(&self) -> Position {
        match self {
            ReaderError::ObjectDepthTooLarge(p)
            | ReaderError::ArrayDepthTooLarge(p)
            | ReaderError::ObjectEndWithinArray(p)
            | ReaderError::ArrayEndWithinObject(p)
            | ReaderError::ExpectedStartOfPropertyNotFound(p)
            | ReaderError::ExpectedStartOfPropertyOrValueNotFound(p)
            | ReaderError::ExpectedValueAfterPropertyNameNotFound(p)
            | ReaderError::ExpectedSeparaterAfterPropertyNameNotFound(p)
            | ReaderError::ExpectedStartOfValueNotFound(p)
            | ReaderError::ExpectedDigitNotFound(p)
            | ReaderError::ExpectedDigitNotFoundEndOfData(p)
            | ReaderError::ExpectedNextDigitComponentNotFound(p)
            | ReaderError::ExpectedNextDigitEValueNotFound(p)
            | ReaderError::ExpectedEndOfDigitNotFound(p)
            | ReaderError::ExpectedTrue(p)
            | ReaderError::ExpectedFalse(p)
            | ReaderError::ExpectedNull(p)
            | ReaderError::EndOfStringNotFound(p)
            | ReaderError::EndOfCommentNotFound(p)
            | ReaderError::InvalidEndOfJson(p)
            | ReaderError::ExpectedEndAfterSingleJson(p) => *p,
            ReaderError::InvalidCharacterWithinString { position, .. }
            | ReaderError::FoundInvalidCharacter { position, .. } => *position,
        }
    }
}
