/// The kind of the token most recently produced by [`Reader::advance()`](crate::Reader::advance()).
///
/// Every variant except the structural markers carries its payload in
/// [`Reader::value_slice()`](crate::Reader::value_slice()) — call one of the
/// typed accessors in [`crate::number`] or [`Reader::as_str()`](crate::Reader::as_str())
/// to interpret it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// No token has been read yet. This is the state of a freshly
    /// constructed [`Reader`](crate::Reader).
    None,

    /// `{`
    StartObject,

    /// `}`
    EndObject,

    /// `[`
    StartArray,

    /// `]`
    EndArray,

    /// An object member name. Call
    /// [`Reader::as_str()`](crate::Reader::as_str()) to get the name.
    PropertyName,

    /// A JSON string value. Call
    /// [`Reader::as_str()`](crate::Reader::as_str()) to get the value.
    String,

    /// A JSON number. Use one of the typed accessors
    /// ([`Reader::as_i32()`](crate::Reader::as_i32()),
    /// [`Reader::as_i64()`](crate::Reader::as_i64()),
    /// [`Reader::as_f64()`](crate::Reader::as_f64()),
    /// [`Reader::as_decimal()`](crate::Reader::as_decimal()), or
    /// [`Reader::as_number()`](crate::Reader::as_number())) to get the value.
    Number,

    /// The literal `true`.
    True,

    /// The literal `false`.
    False,

    /// The literal `null`.
    Null,

    /// A `//` or `/* */` comment. Only produced when the reader was
    /// constructed with [`CommentMode::AllowComments`](crate::CommentMode::AllowComments).
    /// Call [`Reader::as_str()`](crate::Reader::as_str()) to get the comment
    /// text.
    Comment,
}

impl TokenKind {
    /// Returns `true` if a token of this kind carries a payload in
    /// [`Reader::value_slice()`](crate::Reader::value_slice()).
    pub fn has_value(self) -> bool {
        matches!(
            self,
            TokenKind::PropertyName | TokenKind::String | TokenKind::Number | TokenKind::Comment
        )
    }
}
