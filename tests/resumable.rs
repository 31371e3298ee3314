use slicejson::{Reader, TokenKind};

/// Parse `json` in one shot (no splitting) for comparison against a split
/// parse of the same document.
fn parse_whole(json: &[u8]) -> Vec<(TokenKind, Vec<u8>)> {
    let mut reader = Reader::new(json, true);
    let mut out = Vec::new();
    while reader.advance().unwrap() {
        out.push((reader.token_kind(), reader.value_slice().to_vec()));
    }
    out
}

/// Parse `json` by splitting it at `at` and resuming across the split via
/// [`Reader::state()`]/[`Reader::resume()`].
///
/// The caller owns the buffer, so on a rollback it is responsible for
/// carrying forward whatever tail of `first` the reader did not consume
/// (`reader.consumed()..`) alongside the next segment — a fresh `Reader`
/// over the bare tail of `json` after `at` would silently drop those bytes.
fn parse_split(json: &[u8], at: usize) -> Vec<(TokenKind, Vec<u8>)> {
    let (first, second) = json.split_at(at);

    let mut out = Vec::new();
    let mut reader = Reader::new(first, false);
    while reader.advance().unwrap() {
        out.push((reader.token_kind(), reader.value_slice().to_vec()));
    }
    let state = reader.state();
    let leftover = &first[reader.consumed()..];

    let mut combined = Vec::with_capacity(leftover.len() + second.len());
    combined.extend_from_slice(leftover);
    combined.extend_from_slice(second);

    let mut reader = Reader::resume(&combined, true, state);
    while reader.advance().unwrap() {
        out.push((reader.token_kind(), reader.value_slice().to_vec()));
    }
    out
}

#[test]
fn splitting_at_every_byte_boundary_reproduces_the_whole_parse() {
    let json = br#"{"x":1,"arr":[true,false,null,"hi there"],"nested":{"y":-3.5e2}}"#;
    let expected = parse_whole(json);

    for at in 0..=json.len() {
        let actual = parse_split(json, at);
        assert_eq!(
            actual, expected,
            "split at byte {at} produced a different token sequence"
        );
    }
}

#[test]
fn resume_after_property_name_with_no_value_yet() {
    let mut reader = Reader::new(br#"{"x":"#, false);
    while reader.advance().unwrap() {}
    let state = reader.state();
    assert_eq!(state.depth(), 1);

    let mut reader = Reader::resume(b"1}", true, state);
    let mut kinds = Vec::new();
    while reader.advance().unwrap() {
        kinds.push(reader.token_kind());
    }
    assert_eq!(kinds, vec![TokenKind::Number, TokenKind::EndObject]);
}

/// A rollback never consumes anything, so the caller must carry forward
/// `first[consumed..]` — which, for a split landing mid-token, is the
/// partial token itself — alongside the next segment.
fn with_leftover(first: &[u8], consumed: usize, next: &[u8]) -> Vec<u8> {
    let mut combined = Vec::with_capacity(first.len() - consumed + next.len());
    combined.extend_from_slice(&first[consumed..]);
    combined.extend_from_slice(next);
    combined
}

#[test]
fn resume_mid_string() {
    let first = br#"{"greeting":"hello, "#;
    let mut reader = Reader::new(first, false);
    while reader.advance().unwrap() {}
    let combined = with_leftover(first, reader.consumed(), br#"world"}"#);
    let mut reader = Reader::resume(&combined, true, reader.state());

    assert!(reader.advance().unwrap());
    assert_eq!(reader.token_kind(), TokenKind::String);
    assert_eq!(reader.as_str().unwrap(), "hello, world");
    assert!(reader.advance().unwrap());
    assert_eq!(reader.token_kind(), TokenKind::EndObject);
}

#[test]
fn resume_mid_literal() {
    let first = b"[tr";
    let mut reader = Reader::new(first, false);
    while reader.advance().unwrap() {}
    let combined = with_leftover(first, reader.consumed(), b"ue]");
    let mut reader = Reader::resume(&combined, true, reader.state());

    let mut kinds = Vec::new();
    while reader.advance().unwrap() {
        kinds.push(reader.token_kind());
    }
    assert_eq!(kinds, vec![TokenKind::True, TokenKind::EndArray]);
}

#[test]
fn resume_mid_number() {
    let first = b"[12.";
    let mut reader = Reader::new(first, false);
    while reader.advance().unwrap() {}
    let combined = with_leftover(first, reader.consumed(), b"5]");
    let mut reader = Reader::resume(&combined, true, reader.state());

    assert!(reader.advance().unwrap());
    assert_eq!(reader.token_kind(), TokenKind::Number);
    assert_eq!(reader.as_f64().unwrap(), 12.5);
}
