use std::ops::ControlFlow;

use rust_decimal::Decimal;

use crate::error::{Position, ReaderError};
use crate::number::{
    self, InvalidDecimalValueError, InvalidFloatValueError, InvalidIntValueError,
    InvalidStringValueError, JsonNumber,
};
use crate::options::{CommentMode, ReaderOptions};
use crate::stack::ContainerStack;
use crate::state::ParseState;
use crate::token::TokenKind;

/// Bytes that legally terminate a JSON number (§4.4 of the design notes): a
/// comma, a container closer, whitespace, or the start of a comment.
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b',' | b'}' | b']' | b' ' | b'\t' | b'\r' | b'\n' | b'/'
    )
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Intermediate result of a scan that might need more input before it can
/// decide anything. `Incomplete` never mutates the reader; see the "rollback
/// vs. throw" design note — recognizers compute prospective results in
/// locals and only touch `self` once they're certain of success.
enum Step<T> {
    Incomplete,
    Value(T),
}

/// What an attempt at `advance()` produced: either it needs more input (and
/// `self` is untouched), or it has a fully-formed token ready to commit.
enum Attempt {
    Incomplete,
    Done(Commit),
}

/// What the dispatcher should do on the *next* `advance()`, when this one
/// was interrupted by a comment. Kept separate from the public, closed-set
/// [`TokenKind`] (§3 of the design notes says that enum must not grow
/// internal-only variants) — this is the "separate one-slot register"
/// alternative the design notes call out explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Resume {
    /// Re-enter `step()`'s normal dispatch with `token_kind` set back to
    /// the given kind.
    Token(TokenKind),
    /// Re-enter expecting a property name after a comma inside an object,
    /// with no close allowed (a trailing comma is still an error).
    PropertyAfterComma,
    /// Re-enter expecting a value after a comma inside an array. Distinct
    /// from `Token(TokenKind::PropertyName)` so a truncated document here
    /// is reported as `InvalidEndOfJson`, not
    /// `ExpectedValueAfterPropertyNameNotFound` (which is specific to the
    /// "after a real property name" case).
    ValueAfterComma,
}

struct Commit {
    pos: usize,
    line: u64,
    column: u64,
    token_kind: TokenKind,
    value_start: usize,
    value_end: usize,
    /// Set when this commit is a [`TokenKind::Comment`] produced by
    /// interrupting some other expectation; describes how to resume
    /// dispatch on the next `advance()`.
    pending_restore: Option<Resume>,
}

impl Commit {
    fn simple(pos: usize, line: u64, column: u64, token_kind: TokenKind, at: usize) -> Self {
        Commit {
            pos,
            line,
            column,
            token_kind,
            value_start: at,
            value_end: at,
            pending_restore: None,
        }
    }
}

/// A forward-only, pull-based, zero-copy UTF-8 JSON tokenizer.
///
/// A `Reader` borrows a byte buffer and walks it one token at a time via
/// [`advance()`](Reader::advance()). It never allocates for token payloads:
/// [`value_slice()`](Reader::value_slice()) always aliases the input
/// buffer. If the buffer ends mid-token and the caller has not marked the
/// block as final, `advance()` rewinds to the last committed token and
/// returns `false` so the caller can retry with a larger buffer — or, more
/// commonly, take a [`ParseState`] snapshot via [`state()`](Reader::state())
/// and construct a fresh `Reader` with [`Reader::resume()`] over the next
/// buffer segment.
///
/// ```
/// use slicejson::{Reader, TokenKind};
///
/// let mut reader = Reader::new(br#"{"a":1,"b":[true,null]}"#, true);
/// let mut kinds = Vec::new();
/// while reader.advance().unwrap() {
///     kinds.push(reader.token_kind());
/// }
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::StartObject,
///         TokenKind::PropertyName,
///         TokenKind::Number,
///         TokenKind::PropertyName,
///         TokenKind::StartArray,
///         TokenKind::True,
///         TokenKind::Null,
///         TokenKind::EndArray,
///         TokenKind::EndObject,
///     ]
/// );
/// ```
pub struct Reader<'a> {
    buffer: &'a [u8],
    pos: usize,
    token_start: usize,
    token_end: usize,
    token_kind: TokenKind,
    pending_resume: Option<Resume>,
    stack: ContainerStack,
    max_depth: usize,
    comments: CommentMode,
    line_number: u64,
    column: u64,
    is_final_block: bool,
    is_single_value: bool,
}

impl<'a> Reader<'a> {
    /// Create a reader over `buffer` with default options. `is_final_block`
    /// tells the reader whether more bytes might follow: if `true`, a
    /// truncated token at the end of `buffer` is a hard error instead of a
    /// rollback.
    pub fn new(buffer: &'a [u8], is_final_block: bool) -> Self {
        Self::with_options(buffer, is_final_block, ReaderOptions::default())
    }

    /// Create a reader over `buffer` with the given options.
    pub fn with_options(buffer: &'a [u8], is_final_block: bool, options: ReaderOptions) -> Self {
        Reader {
            buffer,
            pos: 0,
            token_start: 0,
            token_end: 0,
            token_kind: TokenKind::None,
            pending_resume: None,
            stack: ContainerStack::new(),
            max_depth: options.max_depth,
            comments: options.comments,
            line_number: 1,
            column: 0,
            is_final_block,
            is_single_value: true,
        }
    }

    /// Resume parsing `buffer` (a new, unrelated segment of bytes — not the
    /// unconsumed tail of any previous buffer) from a [`ParseState`]
    /// snapshot taken from an earlier `Reader`, using default options.
    pub fn resume(buffer: &'a [u8], is_final_block: bool, state: ParseState) -> Self {
        Self::resume_with_options(buffer, is_final_block, state, ReaderOptions::default())
    }

    /// Resume parsing with the given options. The options must match those
    /// used to produce `state` (in particular `max_depth`, since the
    /// snapshot's container stack was built under it).
    pub fn resume_with_options(
        buffer: &'a [u8],
        is_final_block: bool,
        state: ParseState,
        options: ReaderOptions,
    ) -> Self {
        Reader {
            buffer,
            pos: 0,
            token_start: 0,
            token_end: 0,
            token_kind: state.token_kind,
            pending_resume: state.pending_resume,
            stack: state.stack,
            max_depth: options.max_depth,
            comments: options.comments,
            line_number: state.line_number,
            column: state.column,
            is_final_block,
            is_single_value: state.is_single_value,
        }
    }

    /// Export a resumable snapshot of this reader's parse state. Does not
    /// include the buffer, the cursor into it, or the current token's
    /// value slice — the caller supplies a fresh buffer on the next call to
    /// [`Reader::resume()`].
    pub fn state(&self) -> ParseState {
        ParseState {
            stack: self.stack.clone(),
            token_kind: self.token_kind,
            pending_resume: self.pending_resume,
            line_number: self.line_number,
            column: self.column,
            is_single_value: self.is_single_value,
        }
    }

    /// The kind of the most recently produced token.
    pub fn token_kind(&self) -> TokenKind {
        self.token_kind
    }

    /// The byte offset of the start of the current token (for strings,
    /// property names, and comments: the byte right after the opening
    /// delimiter).
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Bytes of `buffer` accepted so far in this reader's lifetime.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// The current container nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// The maximum container nesting depth before the reader spills onto a
    /// heap-allocated stack.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the maximum container nesting depth.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Change the comment handling mode.
    pub fn set_comments(&mut self, comments: CommentMode) {
        self.comments = comments;
    }

    /// `true` if nesting has ever spilled past the 64-level bitmask onto
    /// the heap.
    pub fn uses_heap(&self) -> bool {
        self.stack.uses_heap()
    }

    /// The 1-based line number at the start of the current token.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// The 0-based column at the start of the current token.
    pub fn column(&self) -> u64 {
        self.column
    }

    /// `true` if this reader was told no further bytes will be supplied.
    pub fn is_final_block(&self) -> bool {
        self.is_final_block
    }

    /// The byte slice backing [`TokenKind::PropertyName`],
    /// [`TokenKind::String`], [`TokenKind::Number`], and
    /// [`TokenKind::Comment`] tokens. Empty for every other token kind.
    /// Escape sequences inside strings are validated but not decoded — the
    /// slice is the raw, still-escaped bytes between the quotes.
    pub fn value_slice(&self) -> &'a [u8] {
        if self.token_kind.has_value() {
            &self.buffer[self.token_start..self.token_end]
        } else {
            &[]
        }
    }

    /// Decode the current value slice as UTF-8.
    pub fn as_str(&self) -> Result<&'a str, InvalidStringValueError> {
        number::str_from_slice(self.value_slice())
    }

    /// Parse the current value slice as a 32-bit integer.
    pub fn as_i32(&self) -> Result<i32, InvalidIntValueError> {
        number::i32_from_slice(self.value_slice())
    }

    /// Parse the current value slice as a 64-bit integer.
    pub fn as_i64(&self) -> Result<i64, InvalidIntValueError> {
        number::i64_from_slice(self.value_slice())
    }

    /// Parse the current value slice as a 32-bit float.
    pub fn as_f32(&self) -> Result<f32, InvalidFloatValueError> {
        number::f32_from_slice(self.value_slice())
    }

    /// Parse the current value slice as a 64-bit float.
    pub fn as_f64(&self) -> Result<f64, InvalidFloatValueError> {
        number::f64_from_slice(self.value_slice())
    }

    /// Parse the current value slice as an exact base-10 [`Decimal`].
    pub fn as_decimal(&self) -> Result<Decimal, InvalidDecimalValueError> {
        number::decimal_from_slice(self.value_slice())
    }

    /// Convert the current value slice to the narrowest lossless numeric
    /// representation (§4.8). Prefer a dedicated accessor if you need a
    /// stable type across documents.
    pub fn as_number(&self) -> Result<JsonNumber, InvalidFloatValueError> {
        number::number_from_slice(self.value_slice())
    }

    fn position(&self, line: u64, column: u64) -> Position {
        Position { line, column }
    }

    /// Advance to the next token. Returns `Ok(true)` if a token was
    /// produced (inspect it via [`token_kind()`](Reader::token_kind()) and
    /// friends), `Ok(false)` if the buffer ended before a full token could
    /// be recognized (rolling the reader back to its state before this
    /// call) or — when [`is_final_block()`](Reader::is_final_block()) is
    /// `true` — if the document has been fully and validly consumed.
    pub fn advance(&mut self) -> Result<bool, ReaderError> {
        let attempt = match self.pending_resume.take() {
            Some(Resume::Token(kind)) => {
                self.token_kind = kind;
                self.step()?
            }
            Some(Resume::PropertyAfterComma) => {
                let (pos, line, col) =
                    self.skip_whitespace(self.pos, self.line_number, self.column);
                match self.maybe_comment(pos, line, col, Resume::PropertyAfterComma)? {
                    ControlFlow::Break(attempt) => attempt,
                    ControlFlow::Continue((pos, line, col)) => {
                        self.property_after_comma(pos, line, col)?
                    }
                }
            }
            Some(Resume::ValueAfterComma) => {
                let (pos, line, col) =
                    self.skip_whitespace(self.pos, self.line_number, self.column);
                match self.maybe_comment(pos, line, col, Resume::ValueAfterComma)? {
                    ControlFlow::Break(attempt) => attempt,
                    ControlFlow::Continue((pos, line, col)) => {
                        self.expect_value(pos, line, col, false)?
                    }
                }
            }
            None => self.step()?,
        };

        match attempt {
            Attempt::Incomplete => {
                self.pending_resume = None;
                Ok(false)
            }
            Attempt::Done(commit) => {
                self.pos = commit.pos;
                self.line_number = commit.line;
                self.column = commit.column;
                self.token_kind = commit.token_kind;
                self.token_start = commit.value_start;
                self.token_end = commit.value_end;
                self.pending_resume = commit.pending_restore;
                Ok(true)
            }
        }
    }

    /// Skip the value of the current token:
    /// - on [`TokenKind::PropertyName`], advances once onto the property's
    ///   value;
    /// - on [`TokenKind::StartObject`]/[`TokenKind::StartArray`], advances
    ///   repeatedly until the matching close has been read.
    ///
    /// Returns `Ok(true)` once positioned on the matching close (or, for
    /// any other starting token kind, immediately). Returns `Ok(false)` if
    /// the buffer ran out first — note that resuming a `skip()` that was
    /// interrupted this way across a new `Reader`/buffer is not supported;
    /// retry with a larger buffer for the same reader, or drive
    /// [`advance()`](Reader::advance()) and track `depth()` directly if you
    /// need a skip that survives a buffer refill.
    pub fn skip(&mut self) -> Result<bool, ReaderError> {
        if self.token_kind == TokenKind::PropertyName && !self.advance()? {
            return Ok(false);
        }
        if matches!(
            self.token_kind,
            TokenKind::StartObject | TokenKind::StartArray
        ) {
            let depth0 = self.depth();
            loop {
                if !self.advance()? {
                    return Ok(false);
                }
                if self.depth() < depth0 {
                    break;
                }
            }
        }
        Ok(true)
    }

    fn step(&mut self) -> Result<Attempt, ReaderError> {
        let (pos, line, col) = self.skip_whitespace(self.pos, self.line_number, self.column);
        let (pos, line, col) =
            match self.maybe_comment(pos, line, col, Resume::Token(self.token_kind))? {
                ControlFlow::Break(attempt) => return Ok(attempt),
                ControlFlow::Continue(coords) => coords,
            };

        match self.token_kind {
            TokenKind::None => self.read_first_token(pos, line, col),
            TokenKind::StartObject => self.expect_property_or_close(pos, line, col),
            TokenKind::StartArray => self.expect_value_or_close(pos, line, col),
            TokenKind::PropertyName => self.expect_value(pos, line, col, true),
            _ => self.consume_next(pos, line, col),
        }
    }

    /// Check for a comment at `pos` and handle it per the current
    /// `CommentMode`. Called anywhere a token (or the whitespace before
    /// one) may start — including mid-`step()`, after a comma has already
    /// been consumed — so a comment is recognized no matter what expression
    /// it interrupts.
    ///
    /// `Continue` means no comment intervened (or, under `SkipComments`,
    /// one or more were silently skipped): the caller proceeds with the
    /// returned coordinates. `Break` means this call to `advance()` is
    /// finished: either the comment is incomplete and needs more input, or
    /// (`AllowComments`) it is surfaced as a `TokenKind::Comment` token,
    /// with `resume` recorded so the interrupted expectation picks back up
    /// on the next call.
    fn maybe_comment(
        &mut self,
        pos: usize,
        line: u64,
        col: u64,
        resume: Resume,
    ) -> Result<ControlFlow<Attempt, (usize, u64, u64)>, ReaderError> {
        if self.comments == CommentMode::AllowComments && self.buffer.get(pos) == Some(&b'/') {
            return match self.scan_comment(pos, line, col)? {
                Step::Incomplete => Ok(ControlFlow::Break(Attempt::Incomplete)),
                Step::Value(scan) => Ok(ControlFlow::Break(Attempt::Done(Commit {
                    pos: scan.pos,
                    line: scan.line,
                    column: scan.column,
                    token_kind: TokenKind::Comment,
                    value_start: scan.content_start,
                    value_end: scan.content_end,
                    pending_restore: Some(resume),
                }))),
            };
        }

        if self.comments == CommentMode::SkipComments {
            let (mut pos, mut line, mut col) = (pos, line, col);
            while self.buffer.get(pos) == Some(&b'/') {
                match self.scan_comment(pos, line, col)? {
                    Step::Incomplete => return Ok(ControlFlow::Break(Attempt::Incomplete)),
                    Step::Value(scan) => {
                        pos = scan.pos;
                        line = scan.line;
                        col = scan.column;
                    }
                }
                let skipped = self.skip_whitespace(pos, line, col);
                pos = skipped.0;
                line = skipped.1;
                col = skipped.2;
            }
            return Ok(ControlFlow::Continue((pos, line, col)));
        }

        Ok(ControlFlow::Continue((pos, line, col)))
    }

    fn skip_whitespace(&self, mut pos: usize, mut line: u64, mut col: u64) -> (usize, u64, u64) {
        while let Some(&b) = self.buffer.get(pos) {
            match b {
                b'\n' => {
                    pos += 1;
                    line += 1;
                    col = 0;
                }
                b' ' | b'\t' | b'\r' => {
                    pos += 1;
                    col += 1;
                }
                _ => break,
            }
        }
        (pos, line, col)
    }

    /// `None` state: read the very first token of the document.
    fn read_first_token(&mut self, pos: usize, line: u64, col: u64) -> Result<Attempt, ReaderError> {
        let b = match self.buffer.get(pos) {
            Some(&b) => b,
            None => {
                return if self.is_final_block {
                    Err(ReaderError::InvalidEndOfJson(self.position(line, col)))
                } else {
                    Ok(Attempt::Incomplete)
                };
            }
        };

        match b {
            b'{' => {
                if !self.stack.push(true, self.max_depth) {
                    return Err(ReaderError::ObjectDepthTooLarge(self.position(line, col)));
                }
                self.is_single_value = false;
                Ok(Attempt::Done(Commit::simple(
                    pos + 1,
                    line,
                    col + 1,
                    TokenKind::StartObject,
                    pos,
                )))
            }
            b'[' => {
                if !self.stack.push(false, self.max_depth) {
                    return Err(ReaderError::ArrayDepthTooLarge(self.position(line, col)));
                }
                self.is_single_value = false;
                Ok(Attempt::Done(Commit::simple(
                    pos + 1,
                    line,
                    col + 1,
                    TokenKind::StartArray,
                    pos,
                )))
            }
            _ => match self.scan_scalar(pos, line, col, false)? {
                Step::Incomplete => Ok(Attempt::Incomplete),
                Step::Value(commit) => self.finish_top_level(commit),
            },
        }
    }

    /// After a complete top-level scalar, verify there is nothing illegal
    /// trailing it (§4.1: "after the scalar, any trailing non-whitespace
    /// that is not a comment is an error"). A trailing comment is left for
    /// the ordinary dispatch on the *next* call so it is still surfaced as
    /// a real token under `AllowComments`.
    fn finish_top_level(&mut self, commit: Commit) -> Result<Attempt, ReaderError> {
        let (pos, line, col) = self.skip_whitespace(commit.pos, commit.line, commit.column);
        match self.buffer.get(pos) {
            None => {
                if self.is_final_block {
                    self.is_single_value = true;
                    Ok(Attempt::Done(commit))
                } else {
                    Ok(Attempt::Incomplete)
                }
            }
            Some(b'/') if self.comments != CommentMode::Default => {
                self.is_single_value = true;
                Ok(Attempt::Done(commit))
            }
            Some(_) => Err(ReaderError::ExpectedEndAfterSingleJson(
                self.position(line, col),
            )),
        }
    }

    /// `StartObject` state: expect `}` or a property name.
    fn expect_property_or_close(
        &mut self,
        pos: usize,
        line: u64,
        col: u64,
    ) -> Result<Attempt, ReaderError> {
        match self.buffer.get(pos) {
            Some(b'}') => self.close_object(pos, line, col),
            Some(b'"') => match self.scan_property_name(pos, line, col)? {
                Step::Incomplete => Ok(Attempt::Incomplete),
                Step::Value(commit) => Ok(Attempt::Done(commit)),
            },
            Some(_) => Err(ReaderError::ExpectedStartOfPropertyNotFound(
                self.position(line, col),
            )),
            None => {
                if self.is_final_block {
                    Err(ReaderError::InvalidEndOfJson(self.position(line, col)))
                } else {
                    Ok(Attempt::Incomplete)
                }
            }
        }
    }

    /// After a comma inside an object: expect a property name. Unlike
    /// `expect_property_or_close`, a closing `}` is not allowed here — a
    /// trailing comma is still a syntax error.
    fn property_after_comma(&mut self, pos: usize, line: u64, col: u64) -> Result<Attempt, ReaderError> {
        match self.buffer.get(pos) {
            Some(b'"') => match self.scan_property_name(pos, line, col)? {
                Step::Incomplete => Ok(Attempt::Incomplete),
                Step::Value(commit) => Ok(Attempt::Done(commit)),
            },
            Some(_) => Err(ReaderError::ExpectedStartOfPropertyOrValueNotFound(
                self.position(line, col),
            )),
            None => {
                if self.is_final_block {
                    Err(ReaderError::InvalidEndOfJson(self.position(line, col)))
                } else {
                    Ok(Attempt::Incomplete)
                }
            }
        }
    }

    /// `StartArray` state: expect `]` or a value.
    fn expect_value_or_close(
        &mut self,
        pos: usize,
        line: u64,
        col: u64,
    ) -> Result<Attempt, ReaderError> {
        if self.buffer.get(pos) == Some(&b']') {
            return self.close_array(pos, line, col);
        }
        self.expect_value(pos, line, col, false)
    }

    /// `PropertyName` state, and the "expect a value" half of `StartArray`
    /// and post-comma dispatch: expect any value, erroring on EOF or a
    /// byte that cannot start one. Always called from within a container,
    /// so the number recognizer always requires an explicit delimiter.
    /// `after_property_name` distinguishes "the document ended right after
    /// `"key":`" (a more specific error) from the same truncation after an
    /// array's `[` or `,`.
    fn expect_value(
        &mut self,
        pos: usize,
        line: u64,
        col: u64,
        after_property_name: bool,
    ) -> Result<Attempt, ReaderError> {
        match self.buffer.get(pos) {
            Some(&b'{') => {
                if !self.stack.push(true, self.max_depth) {
                    return Err(ReaderError::ObjectDepthTooLarge(self.position(line, col)));
                }
                Ok(Attempt::Done(Commit::simple(
                    pos + 1,
                    line,
                    col + 1,
                    TokenKind::StartObject,
                    pos,
                )))
            }
            Some(&b'[') => {
                if !self.stack.push(false, self.max_depth) {
                    return Err(ReaderError::ArrayDepthTooLarge(self.position(line, col)));
                }
                Ok(Attempt::Done(Commit::simple(
                    pos + 1,
                    line,
                    col + 1,
                    TokenKind::StartArray,
                    pos,
                )))
            }
            Some(_) => match self.scan_scalar(pos, line, col, true)? {
                Step::Incomplete => Ok(Attempt::Incomplete),
                Step::Value(commit) => Ok(Attempt::Done(commit)),
            },
            None => {
                if self.is_final_block {
                    if after_property_name {
                        Err(ReaderError::ExpectedValueAfterPropertyNameNotFound(
                            self.position(line, col),
                        ))
                    } else {
                        Err(ReaderError::InvalidEndOfJson(self.position(line, col)))
                    }
                } else {
                    Ok(Attempt::Incomplete)
                }
            }
        }
    }

    /// After a scalar or `End*` token: expect a comma, a matching closer,
    /// or (at depth 0) the end of the document.
    fn consume_next(&mut self, pos: usize, line: u64, col: u64) -> Result<Attempt, ReaderError> {
        if self.depth() == 0 {
            // Comments are intercepted earlier in `step()`, so any byte
            // reaching this point is either genuinely trailing garbage or
            // the buffer has simply run out (done, if this is the final
            // block; needs more input otherwise — `advance()` reports both
            // as `false` and the caller tells them apart via
            // `is_final_block()`).
            return match self.buffer.get(pos) {
                None => Ok(Attempt::Incomplete),
                Some(_) => Err(ReaderError::ExpectedEndAfterSingleJson(
                    self.position(line, col),
                )),
            };
        }

        let in_object = self.stack.in_object();
        match self.buffer.get(pos) {
            Some(b',') => {
                let (pos, line, col) = self.skip_whitespace(pos + 1, line, col + 1);
                if in_object {
                    match self.maybe_comment(pos, line, col, Resume::PropertyAfterComma)? {
                        ControlFlow::Break(attempt) => Ok(attempt),
                        ControlFlow::Continue((pos, line, col)) => {
                            self.property_after_comma(pos, line, col)
                        }
                    }
                } else {
                    match self.maybe_comment(pos, line, col, Resume::ValueAfterComma)? {
                        ControlFlow::Break(attempt) => Ok(attempt),
                        ControlFlow::Continue((pos, line, col)) => {
                            self.expect_value(pos, line, col, false)
                        }
                    }
                }
            }
            // Route to `close_object`/`close_array` even when the closer
            // doesn't match the innermost container: that's what surfaces
            // `ObjectEndWithinArray`/`ArrayEndWithinObject` instead of the
            // generic `FoundInvalidCharacter`.
            Some(b'}') => self.close_object(pos, line, col),
            Some(b']') => self.close_array(pos, line, col),
            Some(&b) => Err(ReaderError::FoundInvalidCharacter {
                byte: b,
                position: self.position(line, col),
            }),
            None => {
                if self.is_final_block {
                    Err(ReaderError::InvalidEndOfJson(self.position(line, col)))
                } else {
                    Ok(Attempt::Incomplete)
                }
            }
        }
    }

    fn close_object(&mut self, pos: usize, line: u64, col: u64) -> Result<Attempt, ReaderError> {
        if !self.stack.in_object() {
            return Err(ReaderError::ObjectEndWithinArray(self.position(line, col)));
        }
        self.stack.pop(true);
        Ok(Attempt::Done(Commit::simple(
            pos + 1,
            line,
            col + 1,
            TokenKind::EndObject,
            pos,
        )))
    }

    fn close_array(&mut self, pos: usize, line: u64, col: u64) -> Result<Attempt, ReaderError> {
        if self.stack.in_object() {
            return Err(ReaderError::ArrayEndWithinObject(self.position(line, col)));
        }
        self.stack.pop(false);
        Ok(Attempt::Done(Commit::simple(
            pos + 1,
            line,
            col + 1,
            TokenKind::EndArray,
            pos,
        )))
    }

    /// Dispatch to the right scalar recognizer (string, number, or literal)
    /// based on the leading byte. Precondition: `buffer[pos]` is present
    /// (callers already handled the EOF case).
    fn scan_scalar(
        &self,
        pos: usize,
        line: u64,
        col: u64,
        in_container: bool,
    ) -> Result<Step<Commit>, ReaderError> {
        match self.buffer[pos] {
            b'"' => match self.scan_string(pos, line, col)? {
                Step::Incomplete => Ok(Step::Incomplete),
                Step::Value(s) => Ok(Step::Value(Commit {
                    pos: s.pos,
                    line: s.line,
                    column: s.column,
                    token_kind: TokenKind::String,
                    value_start: s.content_start,
                    value_end: s.content_end,
                    pending_restore: None,
                })),
            },
            b'-' | b'0'..=b'9' => match self.scan_number(pos, line, col, in_container)? {
                Step::Incomplete => Ok(Step::Incomplete),
                Step::Value((end, end_col)) => Ok(Step::Value(Commit {
                    pos: end,
                    line,
                    column: end_col,
                    token_kind: TokenKind::Number,
                    value_start: pos,
                    value_end: end,
                    pending_restore: None,
                })),
            },
            b't' => self.scan_literal(pos, line, col, b"true", TokenKind::True, ReaderError::ExpectedTrue),
            b'f' => {
                self.scan_literal(pos, line, col, b"false", TokenKind::False, ReaderError::ExpectedFalse)
            }
            b'n' => self.scan_literal(pos, line, col, b"null", TokenKind::Null, ReaderError::ExpectedNull),
            b if b < 0x20 => Err(ReaderError::FoundInvalidCharacter {
                byte: b,
                position: self.position(line, col),
            }),
            _ => Err(ReaderError::ExpectedStartOfValueNotFound(
                self.position(line, col),
            )),
        }
    }

    fn scan_literal(
        &self,
        pos: usize,
        line: u64,
        col: u64,
        literal: &'static [u8],
        kind: TokenKind,
        err: fn(Position) -> ReaderError,
    ) -> Result<Step<Commit>, ReaderError> {
        let available = self.buffer.len().saturating_sub(pos).min(literal.len());
        if self.buffer[pos..pos + available] != literal[..available] {
            return Err(err(self.position(line, col)));
        }
        if available < literal.len() {
            return if self.is_final_block {
                Err(err(self.position(line, col)))
            } else {
                Ok(Step::Incomplete)
            };
        }
        let end = pos + literal.len();
        Ok(Step::Value(Commit {
            pos: end,
            line,
            column: col + literal.len() as u64,
            token_kind: kind,
            value_start: pos,
            value_end: end,
            pending_restore: None,
        }))
    }

    fn scan_number(
        &self,
        start: usize,
        line: u64,
        start_col: u64,
        in_container: bool,
    ) -> Result<Step<(usize, u64)>, ReaderError> {
        let buf = self.buffer;
        let at = |i: usize| Position {
            line,
            column: start_col + (i - start) as u64,
        };
        let mut i = start;

        if buf.get(i) == Some(&b'-') {
            i += 1;
        }

        i = match buf.get(i) {
            Some(b'0') => i + 1,
            Some(b'1'..=b'9') => {
                let mut j = i + 1;
                while matches!(buf.get(j), Some(b'0'..=b'9')) {
                    j += 1;
                }
                j
            }
            Some(_) => return Err(ReaderError::ExpectedDigitNotFound(at(i))),
            None => {
                return if self.is_final_block {
                    Err(ReaderError::ExpectedDigitNotFoundEndOfData(at(i)))
                } else {
                    Ok(Step::Incomplete)
                };
            }
        };

        if buf.get(i) == Some(&b'.') {
            let frac_start = i + 1;
            let mut j = frac_start;
            while matches!(buf.get(j), Some(b'0'..=b'9')) {
                j += 1;
            }
            if j == frac_start {
                return if buf.get(frac_start).is_none() && !self.is_final_block {
                    Ok(Step::Incomplete)
                } else {
                    Err(ReaderError::ExpectedNextDigitComponentNotFound(at(j)))
                };
            }
            i = j;
        }

        if matches!(buf.get(i), Some(b'e') | Some(b'E')) {
            let mut j = i + 1;
            if matches!(buf.get(j), Some(b'+') | Some(b'-')) {
                j += 1;
            }
            let exp_start = j;
            while matches!(buf.get(j), Some(b'0'..=b'9')) {
                j += 1;
            }
            if j == exp_start {
                return if buf.get(exp_start).is_none() && !self.is_final_block {
                    Ok(Step::Incomplete)
                } else {
                    Err(ReaderError::ExpectedNextDigitEValueNotFound(at(j)))
                };
            }
            i = j;
        }

        match buf.get(i) {
            Some(&b) if is_delimiter(b) => {}
            None => {
                if in_container {
                    return if self.is_final_block {
                        Err(ReaderError::ExpectedEndOfDigitNotFound(at(i)))
                    } else {
                        Ok(Step::Incomplete)
                    };
                }
                if !self.is_final_block {
                    return Ok(Step::Incomplete);
                }
            }
            Some(_) => return Err(ReaderError::ExpectedEndOfDigitNotFound(at(i))),
        }

        Ok(Step::Value((i, start_col + (i - start) as u64)))
    }

    fn scan_property_name(
        &mut self,
        quote_pos: usize,
        line: u64,
        col: u64,
    ) -> Result<Step<Commit>, ReaderError> {
        let string = match self.scan_string(quote_pos, line, col)? {
            Step::Incomplete => return Ok(Step::Incomplete),
            Step::Value(s) => s,
        };

        let (pos, line2, col2) = self.skip_whitespace(string.pos, string.line, string.column);
        match self.buffer.get(pos) {
            Some(b':') => Ok(Step::Value(Commit {
                pos: pos + 1,
                line: line2,
                column: col2 + 1,
                token_kind: TokenKind::PropertyName,
                value_start: string.content_start,
                value_end: string.content_end,
                pending_restore: None,
            })),
            Some(_) => Err(ReaderError::ExpectedSeparaterAfterPropertyNameNotFound(
                self.position(line2, col2),
            )),
            None => {
                if self.is_final_block {
                    Err(ReaderError::ExpectedSeparaterAfterPropertyNameNotFound(
                        self.position(line2, col2),
                    ))
                } else {
                    Ok(Step::Incomplete)
                }
            }
        }
    }

    /// Scan a string's content, starting at the opening `"`. See §4.3: a
    /// `memchr`-accelerated search for the next quote or backslash finds
    /// the fast path (no escapes) in one pass; a backslash hands off to
    /// escape validation, which never misinterprets an escaped quote as a
    /// closing one because escapes are always consumed as a whole unit
    /// before the scan continues.
    fn scan_string(
        &self,
        quote_pos: usize,
        line: u64,
        col: u64,
    ) -> Result<Step<StringScan>, ReaderError> {
        let buf = self.buffer;
        let content_start = quote_pos + 1;
        let mut cursor = content_start;
        let mut line = line;
        let mut col = col + 1; // account for the opening quote

        loop {
            match memchr::memchr2(b'"', b'\\', &buf[cursor..]) {
                None => {
                    if let Some(bad) = buf[cursor..].iter().position(|&b| b < 0x20) {
                        return Err(ReaderError::InvalidCharacterWithinString {
                            byte: buf[cursor + bad],
                            position: Position {
                                line,
                                column: col + bad as u64,
                            },
                        });
                    }
                    return if self.is_final_block {
                        Err(ReaderError::EndOfStringNotFound(Position { line, column: col }))
                    } else {
                        Ok(Step::Incomplete)
                    };
                }
                Some(off) => {
                    let idx = cursor + off;
                    if let Some(bad) = buf[cursor..idx].iter().position(|&b| b < 0x20) {
                        return Err(ReaderError::InvalidCharacterWithinString {
                            byte: buf[cursor + bad],
                            position: Position {
                                line,
                                column: col + bad as u64,
                            },
                        });
                    }
                    col += (idx - cursor) as u64;

                    if buf[idx] == b'"' {
                        return Ok(Step::Value(StringScan {
                            content_start,
                            content_end: idx,
                            pos: idx + 1,
                            line,
                            column: col + 1,
                        }));
                    }

                    // backslash: validate and consume the whole escape.
                    match buf.get(idx + 1) {
                        None => {
                            return if self.is_final_block {
                                Err(ReaderError::EndOfStringNotFound(Position { line, column: col }))
                            } else {
                                Ok(Step::Incomplete)
                            };
                        }
                        Some(b'"') | Some(b'\\') | Some(b'/') | Some(b'b') | Some(b'f')
                        | Some(b'r') | Some(b't') => {
                            cursor = idx + 2;
                            col += 2;
                        }
                        Some(b'n') => {
                            cursor = idx + 2;
                            line += 1;
                            col = 0;
                        }
                        Some(b'u') => {
                            if idx + 6 > buf.len() {
                                return if self.is_final_block {
                                    Err(ReaderError::EndOfStringNotFound(Position {
                                        line,
                                        column: col,
                                    }))
                                } else {
                                    Ok(Step::Incomplete)
                                };
                            }
                            for k in 0..4 {
                                let b = buf[idx + 2 + k];
                                if !b.is_ascii_hexdigit() {
                                    return Err(ReaderError::InvalidCharacterWithinString {
                                        byte: b,
                                        position: Position {
                                            line,
                                            column: col + 2 + k as u64,
                                        },
                                    });
                                }
                            }
                            cursor = idx + 6;
                            col += 6;
                        }
                        Some(&other) => {
                            return Err(ReaderError::InvalidCharacterWithinString {
                                byte: other,
                                position: Position {
                                    line,
                                    column: col + 1,
                                },
                            });
                        }
                    }
                }
            }
        }
    }

    fn scan_comment(
        &self,
        start: usize,
        line: u64,
        col: u64,
    ) -> Result<Step<CommentScan>, ReaderError> {
        let buf = self.buffer;
        match buf.get(start + 1) {
            None => {
                if self.is_final_block {
                    Err(ReaderError::ExpectedStartOfValueNotFound(
                        self.position(line, col),
                    ))
                } else {
                    Ok(Step::Incomplete)
                }
            }
            Some(b'/') => {
                let content_start = start + 2;
                match memchr::memchr(b'\n', &buf[content_start..]) {
                    Some(off) => {
                        let nl = content_start + off;
                        Ok(Step::Value(CommentScan {
                            content_start,
                            content_end: nl,
                            pos: nl + 1,
                            line: line + 1,
                            column: 0,
                        }))
                    }
                    None => {
                        if self.is_final_block {
                            Ok(Step::Value(CommentScan {
                                content_start,
                                content_end: buf.len(),
                                pos: buf.len(),
                                line,
                                column: col + (buf.len() - content_start) as u64,
                            }))
                        } else {
                            Ok(Step::Incomplete)
                        }
                    }
                }
            }
            Some(b'*') => {
                let content_start = start + 2;
                match find_star_slash(&buf[content_start..]) {
                    Some(off) => {
                        let star = content_start + off;
                        let (end_line, end_col) =
                            count_newlines(&buf[content_start..star], line, col);
                        Ok(Step::Value(CommentScan {
                            content_start,
                            content_end: star,
                            pos: star + 2,
                            line: end_line,
                            column: end_col + 2,
                        }))
                    }
                    None => {
                        if self.is_final_block {
                            Err(ReaderError::EndOfCommentNotFound(self.position(line, col)))
                        } else {
                            Ok(Step::Incomplete)
                        }
                    }
                }
            }
            Some(_) => Err(ReaderError::ExpectedStartOfValueNotFound(
                self.position(line, col),
            )),
        }
    }
}

struct StringScan {
    content_start: usize,
    content_end: usize,
    pos: usize,
    line: u64,
    column: u64,
}

struct CommentScan {
    content_start: usize,
    content_end: usize,
    pos: usize,
    line: u64,
    column: u64,
}

fn find_star_slash(hay: &[u8]) -> Option<usize> {
    let mut i = 0;
    while let Some(off) = memchr::memchr(b'*', &hay[i..]) {
        let idx = i + off;
        if hay.get(idx + 1) == Some(&b'/') {
            return Some(idx);
        }
        i = idx + 1;
    }
    None
}

fn count_newlines(slice: &[u8], mut line: u64, mut col: u64) -> (u64, u64) {
    for &b in slice {
        if b == b'\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}
