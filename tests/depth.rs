use slicejson::{Reader, ReaderError, ReaderOptionsBuilder, TokenKind};

/// `{"a":{"a":{...1...}}}` nested `depth` levels deep.
fn nested_object(depth: usize) -> Vec<u8> {
    let mut json = Vec::new();
    for _ in 0..depth {
        json.extend_from_slice(b"{\"a\":");
    }
    json.push(b'1');
    for _ in 0..depth {
        json.push(b'}');
    }
    json
}

#[test]
fn depth_64_documents_never_spill_to_the_heap() {
    let json = nested_object(64);
    let mut reader = Reader::new(&json, true);
    while reader.advance().unwrap() {
        assert!(!reader.uses_heap());
    }
    assert_eq!(reader.depth(), 0);
}

#[test]
fn depth_65_plus_spills_but_still_parses_with_a_raised_max_depth() {
    let json = nested_object(70);
    let options = ReaderOptionsBuilder::default().with_max_depth(70).build();
    let mut reader = Reader::with_options(&json, true, options);

    let mut max_seen_depth = 0;
    let mut spilled = false;
    while reader.advance().unwrap() {
        max_seen_depth = max_seen_depth.max(reader.depth());
        spilled |= reader.uses_heap();
    }
    assert_eq!(max_seen_depth, 70);
    assert!(spilled);
    assert_eq!(reader.depth(), 0);
}

#[test]
fn default_max_depth_rejects_depth_beyond_64() {
    let json = nested_object(70);
    let mut reader = Reader::new(&json, true);
    let mut last_err = None;
    loop {
        match reader.advance() {
            Ok(true) => continue,
            Ok(false) => break,
            Err(e) => {
                last_err = Some(e);
                break;
            }
        }
    }
    assert!(matches!(
        last_err,
        Some(ReaderError::ObjectDepthTooLarge(_))
    ));
}

#[test]
fn skip_works_across_the_bitmask_spillover_boundary() {
    let json = nested_object(70);
    let options = ReaderOptionsBuilder::default().with_max_depth(70).build();
    let mut reader = Reader::with_options(&json, true, options);

    assert!(reader.advance().unwrap()); // outer StartObject, depth 1
    assert!(reader.advance().unwrap()); // PropertyName "a"
    assert!(reader.skip().unwrap());
    // `skip()` on a property name lands on the matching end of *that
    // property's value* (the second-level object), one level short of
    // depth 0.
    assert_eq!(reader.token_kind(), TokenKind::EndObject);
    assert_eq!(reader.depth(), 1);
    assert!(reader.advance().unwrap());
    assert_eq!(reader.token_kind(), TokenKind::EndObject);
    assert_eq!(reader.depth(), 0);
}
