//! # slicejson
//!
//! A forward-only, pull-based, zero-copy UTF-8 JSON tokenizer.
//!
//! [`Reader`] scans a byte buffer and emits one token at a time via
//! [`Reader::advance()`](Reader::advance()). It never allocates for token
//! payloads: every [`value_slice()`](Reader::value_slice()) aliases the
//! input buffer. Parsing is strict RFC 8259 by default, with an optional
//! C-style comment extension (see [`CommentMode`]).
//!
//! ## Examples
//!
//! ### Parsing a complete buffer
//!
//! When the whole document is already in memory, construct a `Reader` with
//! `is_final_block = true` and drive it until `advance()` returns `Ok(false)`.
//!
//! ```
//! use slicejson::{Reader, TokenKind};
//!
//! let json = r#"{"name": "Elvis"}"#.as_bytes();
//! let mut reader = Reader::new(json, true);
//!
//! while reader.advance().unwrap() {
//!     match reader.token_kind() {
//!         TokenKind::PropertyName => println!("key: {}", reader.as_str().unwrap()),
//!         TokenKind::String => println!("value: {}", reader.as_str().unwrap()),
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ### Incremental parsing across buffer refills
//!
//! A `Reader` never owns its buffer, so resuming across a refill means
//! taking a [`ParseState`] snapshot and constructing a fresh `Reader` over
//! the next segment. `advance()` returns `Ok(false)` without erroring
//! whenever it runs out of bytes mid-token and `is_final_block` is `false`.
//!
//! ```
//! use slicejson::Reader;
//!
//! let first = br#"{"x":"#;
//! let mut reader = Reader::new(first, false);
//! while reader.advance().unwrap() {}
//! let state = reader.state();
//!
//! let second = br#"1}"#;
//! let mut reader = Reader::resume(second, true, state);
//! let mut tokens = 0;
//! while reader.advance().unwrap() {
//!     tokens += 1;
//! }
//! assert_eq!(tokens, 2); // Number, EndObject
//! ```
//!
//! ### Comments
//!
//! RFC 8259 has no comments, but [`CommentMode::AllowComments`] and
//! [`CommentMode::SkipComments`] layer a common `//`/`/* */` extension on
//! top of strict parsing.
//!
//! ```
//! use slicejson::{CommentMode, Reader, ReaderOptionsBuilder, TokenKind};
//!
//! let options = ReaderOptionsBuilder::default()
//!     .with_comments(CommentMode::AllowComments)
//!     .build();
//! let mut reader = Reader::with_options(b"[1, /*c*/ 2]", true, options);
//!
//! let mut kinds = Vec::new();
//! while reader.advance().unwrap() {
//!     kinds.push(reader.token_kind());
//! }
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::StartArray,
//!         TokenKind::Number,
//!         TokenKind::Comment,
//!         TokenKind::Number,
//!         TokenKind::EndArray,
//!     ]
//! );
//! ```

mod error;
mod number;
mod options;
mod reader;
mod stack;
mod state;
mod token;

pub use error::{Position, ReaderError};
pub use number::{
    InvalidDecimalValueError, InvalidFloatValueError, InvalidIntValueError,
    InvalidStringValueError, JsonNumber,
};
pub use options::{CommentMode, ReaderOptions, ReaderOptionsBuilder, BITMASK_CAPACITY};
pub use reader::Reader;
pub use state::ParseState;
pub use token::TokenKind;
