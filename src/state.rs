use crate::reader::Resume;
use crate::stack::ContainerStack;
use crate::token::TokenKind;

/// An opaque snapshot of everything a [`Reader`](crate::Reader) needs to
/// resume parsing once the caller has a new buffer segment.
///
/// A snapshot deliberately excludes the buffer itself and the byte cursor
/// into it — those belong to the caller, who supplies a fresh `&[u8]` (and,
/// for the bookkeeping fields below, a rebuilt `Reader`) on the next call.
/// See §3/§8 invariant 4 of the design notes: splitting an input at any byte
/// boundary and reparsing across two readers joined by a snapshot must
/// produce the identical token sequence as parsing the whole buffer at
/// once.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseState {
    pub(crate) stack: ContainerStack,
    pub(crate) token_kind: TokenKind,
    pub(crate) pending_resume: Option<Resume>,
    pub(crate) line_number: u64,
    pub(crate) column: u64,
    pub(crate) is_single_value: bool,
}

impl ParseState {
    /// The container nesting depth at the point this snapshot was taken.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }
}
