/// The default capacity of the branchless container-depth bitmask. Nesting
/// at or below this depth never touches the spillover stack.
pub const BITMASK_CAPACITY: usize = 64;

/// Controls how the [`Reader`](crate::Reader) treats `//` and `/* */`
/// comments, which are not part of RFC 8259 but are a common extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CommentMode {
    /// Strict RFC 8259: a `/` where a value or a delimiter is expected is a
    /// syntax error.
    #[default]
    Default,

    /// Comments are surfaced as [`TokenKind::Comment`](crate::TokenKind::Comment)
    /// tokens.
    AllowComments,

    /// Comments are recognized and silently discarded; the reader behaves
    /// as if they were not present in the input.
    SkipComments,
}

/// Options for a [`Reader`](super::Reader). Use
/// [`ReaderOptionsBuilder`] to create instances of this struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReaderOptions {
    pub(super) max_depth: usize,
    pub(super) comments: CommentMode,
}

impl Default for ReaderOptions {
    /// Returns the default reader options: strict RFC 8259, 64-level
    /// container depth before the reader needs to spill to the heap.
    fn default() -> Self {
        Self {
            max_depth: BITMASK_CAPACITY,
            comments: CommentMode::Default,
        }
    }
}

impl ReaderOptions {
    /// Returns the maximum container nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the comment handling mode.
    pub fn comments(&self) -> CommentMode {
        self.comments
    }
}

/// A builder for [`ReaderOptions`].
///
/// ```rust
/// use slicejson::{Reader, ReaderOptionsBuilder};
///
/// let options = ReaderOptionsBuilder::default()
///     .with_max_depth(16)
///     .build();
/// let mut reader = Reader::with_options(b"[1,2,3]", true, options);
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReaderOptionsBuilder {
    options: ReaderOptions,
}

impl ReaderOptionsBuilder {
    /// Set the maximum container nesting depth. Depths at or below
    /// [`BITMASK_CAPACITY`] are tracked in a single machine word; deeper
    /// nesting spills onto a heap-allocated stack.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Set the comment handling mode.
    ///
    /// ```rust
    /// use slicejson::{CommentMode, Reader, ReaderOptionsBuilder, TokenKind};
    ///
    /// let options = ReaderOptionsBuilder::default()
    ///     .with_comments(CommentMode::AllowComments)
    ///     .build();
    /// let mut reader = Reader::with_options(b"[1, /*c*/ 2]", true, options);
    ///
    /// assert!(reader.advance().unwrap());
    /// assert_eq!(reader.token_kind(), TokenKind::StartArray);
    /// assert!(reader.advance().unwrap());
    /// assert_eq!(reader.token_kind(), TokenKind::Number);
    /// assert!(reader.advance().unwrap());
    /// assert_eq!(reader.token_kind(), TokenKind::Comment);
    /// ```
    pub fn with_comments(mut self, comments: CommentMode) -> Self {
        self.options.comments = comments;
        self
    }

    /// Create a new [`ReaderOptions`] object.
    pub fn build(self) -> ReaderOptions {
        self.options
    }
}
