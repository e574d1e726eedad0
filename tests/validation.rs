//! Validation of fixture documents: valid samples pass, each bad sample
//! reports its rule's message.
//!
//! Fixtures live in `tests/fixtures/` and go through the real codec, so these
//! tests exercise parse + validate end-to-end.

use anyhow::{Context, Result};
use atomfeed::check::check_address;
use atomfeed::{codec, Feed, TimeStr, Validate, ValidationError};

const VALID_FIXTURES: [&str; 3] = [
    "atom_1.0_all.xml",
    "atom_1.0_prefix.xml",
    "atom_1.0_latin1.xml",
];

fn load(name: &str) -> Result<Feed> {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read fixture {name}"))?;
    codec::from_bytes(&bytes).with_context(|| format!("Failed to parse fixture {name}"))
}

fn validation_error(name: &str) -> Result<ValidationError> {
    let feed = load(name)?;
    match feed.validate() {
        Ok(()) => anyhow::bail!("{name} validated successfully but should not have"),
        Err(err) => Ok(err),
    }
}

fn count(err: &ValidationError, issue: &str) -> usize {
    err.issues().iter().filter(|i| i.as_str() == issue).count()
}

// ============================================================================
// Valid documents
// ============================================================================

#[test]
fn test_valid_fixtures_pass() -> Result<()> {
    for name in VALID_FIXTURES {
        let feed = load(name)?;
        if let Err(err) = feed.validate() {
            anyhow::bail!("Validation error ({name}): {err}");
        }
    }
    Ok(())
}

// ============================================================================
// Feed rules
// ============================================================================

#[test]
fn test_missing_author_coverage() -> Result<()> {
    let err = validation_error("bad_atom_author.xml")?;
    // Two entries lack an author, still one issue
    assert_eq!(
        count(&err, "Author must be present in Feed or in every Entry."),
        1
    );
    assert_eq!(err.issues().len(), 1);
    Ok(())
}

#[test]
fn test_empty_feed_id() -> Result<()> {
    let err = validation_error("bad_atom_id.xml")?;
    assert!(err.to_string().contains("Feed.ID can't be empty"));
    Ok(())
}

#[test]
fn test_duplicate_alternate_links() -> Result<()> {
    let err = validation_error("bad_atom_link.xml")?;
    // Three alternates, one issue
    assert_eq!(
        count(&err, "Only one Feed.Link with rel=\"alternate\" can exist."),
        1
    );
    Ok(())
}

#[test]
fn test_empty_feed_title() -> Result<()> {
    let err = validation_error("bad_atom_title.xml")?;
    assert_eq!(err.issues(), ["Feed.Title can't be empty."]);
    Ok(())
}

#[test]
fn test_missing_feed_updated_reported_twice() -> Result<()> {
    let err = validation_error("bad_atom_updated.xml")?;
    assert_eq!(count(&err, "Feed.Updated can't be empty."), 2);
    assert_eq!(err.issues().len(), 2);
    Ok(())
}

// ============================================================================
// Leaf rules
// ============================================================================

#[test]
fn test_summary_type_checked_content_type_free() -> Result<()> {
    let err = validation_error("bad_atom_text.xml")?;
    // Only the summary is reported, the content accepts any media type
    assert_eq!(
        err.issues(),
        ["Text.Type must be either: text, html or xhtml."]
    );
    Ok(())
}

#[test]
fn test_bad_url_message_passed_through() -> Result<()> {
    let err = validation_error("bad_atom_url.xml")?;
    assert!(err.to_string().contains("invalid URL escape"));
    Ok(())
}

#[test]
fn test_bad_time_message_passed_through() -> Result<()> {
    let err = validation_error("bad_atom_time.xml")?;
    let expected = TimeStr::from("2006-11-04 09:11:03")
        .parse()
        .expect_err("fixture timestamp must be invalid")
        .to_string();
    assert_eq!(err.issues(), [expected]);
    Ok(())
}

#[test]
fn test_bad_email_message_passed_through() -> Result<()> {
    let err = validation_error("bad_atom_email.xml")?;
    let expected = check_address("not-an-email")
        .expect_err("fixture address must be invalid")
        .to_string();
    assert!(err.to_string().contains(&expected));
    Ok(())
}

// ============================================================================
// Source feeds
// ============================================================================

#[test]
fn test_source_entries_rejected_and_source_validated() -> Result<()> {
    let err = validation_error("bad_atom_source.xml")?;
    assert_eq!(
        err.issues(),
        [
            "Entry.Source can't contain any entries.",
            "Feed.Title can't be empty.",
        ]
    );
    Ok(())
}

#[test]
fn test_entry_validated_standalone() -> Result<()> {
    let feed = load("bad_atom_source.xml")?;
    let entry = &feed.entries[0];
    assert!(entry.validate().is_err());

    let mut fixed = entry.clone();
    if let Some(source) = fixed.source.as_mut() {
        source.feed.entries.clear();
        source.feed.title = "Origin".to_string();
    }
    assert_eq!(fixed.validate(), Ok(()));
    Ok(())
}

// ============================================================================
// Report rendering
// ============================================================================

#[test]
fn test_report_has_header_and_one_line_per_issue() -> Result<()> {
    let err = validation_error("bad_atom_updated.xml")?;
    let rendered = err.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "An Atom validation error occurred:");
    assert_eq!(lines[1], "- Feed.Updated can't be empty.");
    assert_eq!(lines[2], "- Feed.Updated can't be empty.");
    assert!(rendered.ends_with('\n'));
    Ok(())
}
