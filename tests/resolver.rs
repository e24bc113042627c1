//! End-to-end resolution scenarios: raw JSON payload in, locations out.

use readalong::index::TimingIndex;
use readalong::policy::{DEFAULT_SYNC_POLICY, SyncPolicy};
use readalong::raw::parse_raw_words;
use readalong::resolver::resolve;

#[test]
fn resolves_words_from_a_single_paragraph_payload() -> anyhow::Result<()> {
    let payload = r#"[
        {"word": "go", "start": 0.0, "end": 0.3},
        {"word": "to", "start": 0.3, "end": 0.5},
        {"word": "sleep", "start": 0.5, "end": 1.0}
    ]"#;
    let raw = parse_raw_words(payload.as_bytes())?;
    let index = TimingIndex::build(&raw, &DEFAULT_SYNC_POLICY);

    let loc = resolve(0.4, &index, &DEFAULT_SYNC_POLICY).unwrap();
    assert_eq!(loc.word_text, "to");

    let loc = resolve(0.5, &index, &DEFAULT_SYNC_POLICY).unwrap();
    assert_eq!(loc.word_text, "sleep");

    // Past the end of the transcript: nearest-boundary fallback.
    let loc = resolve(5.0, &index, &DEFAULT_SYNC_POLICY).unwrap();
    assert_eq!(loc.word_text, "sleep");
    assert_eq!(loc.paragraph_index, 0);
    Ok(())
}

#[test]
fn crosses_a_paragraph_boundary_during_inter_paragraph_silence() -> anyhow::Result<()> {
    let payload = r#"[
        {"word": "first", "start": 9.0, "end": 9.4},
        {"word": "half", "start": 9.4, "end": 9.8},
        {"word": "second", "start": 10.2, "end": 10.6},
        {"word": "half", "start": 10.6, "end": 11.0}
    ]"#;
    let policy = SyncPolicy {
        words_per_paragraph: 2,
        ..DEFAULT_SYNC_POLICY
    };
    let raw = parse_raw_words(payload.as_bytes())?;
    let index = TimingIndex::build(&raw, &policy);

    // 9.95s: the first paragraph's last word ended 0.15s ago and the next
    // paragraph starts 0.25s ahead, so resolution looks across the boundary.
    let loc = resolve(9.95, &index, &policy).unwrap();
    assert_eq!(loc.paragraph_index, 1);
    assert_eq!(loc.word_index, 0);
    assert_eq!(loc.word_text, "second");
    Ok(())
}

#[test]
fn empty_payload_degrades_without_errors() -> anyhow::Result<()> {
    let raw = parse_raw_words("[]".as_bytes())?;
    let index = TimingIndex::build(&raw, &DEFAULT_SYNC_POLICY);

    assert!(index.is_empty());
    assert_eq!(resolve(0.0, &index, &DEFAULT_SYNC_POLICY), None);
    assert_eq!(resolve(42.0, &index, &DEFAULT_SYNC_POLICY), None);
    Ok(())
}

#[test]
fn repaired_payload_is_fully_navigable() -> anyhow::Result<()> {
    // Timing holes everywhere: missing starts, missing ends, an inverted
    // range. The index repairs them all and resolution still works.
    let payload = r#"[
        {"punctuated_word": "Hello,", "end": 0.4},
        {"word": "there"},
        {"word": "friend", "start": 1.9, "end": 0.2},
        {"word": ""},
        {"word": "bye", "start": 2.5, "end": 3.0}
    ]"#;
    let raw = parse_raw_words(payload.as_bytes())?;
    let index = TimingIndex::build(&raw, &DEFAULT_SYNC_POLICY);

    // The empty-text record is dropped; everything else is kept.
    assert_eq!(index.paragraph(0).unwrap().words.len(), 4);

    let loc = resolve(0.2, &index, &DEFAULT_SYNC_POLICY).unwrap();
    assert_eq!(loc.word_text, "Hello,");

    // "there" inherited start 0.4 and the default 0.3s duration.
    let loc = resolve(0.5, &index, &DEFAULT_SYNC_POLICY).unwrap();
    assert_eq!(loc.word_text, "there");

    let loc = resolve(2.7, &index, &DEFAULT_SYNC_POLICY).unwrap();
    assert_eq!(loc.word_text, "bye");
    Ok(())
}

#[test]
fn resolution_is_a_pure_function_of_time() -> anyhow::Result<()> {
    let payload = r#"[
        {"word": "a", "start": 0.0, "end": 0.5},
        {"word": "b", "start": 0.7, "end": 1.2},
        {"word": "c", "start": 1.4, "end": 2.0}
    ]"#;
    let raw = parse_raw_words(payload.as_bytes())?;
    let index = TimingIndex::build(&raw, &DEFAULT_SYNC_POLICY);

    let mut t = 0.0f32;
    while t < 3.0 {
        assert_eq!(
            resolve(t, &index, &DEFAULT_SYNC_POLICY),
            resolve(t, &index, &DEFAULT_SYNC_POLICY),
            "resolution diverged at t={t}"
        );
        t += 0.05;
    }
    Ok(())
}
