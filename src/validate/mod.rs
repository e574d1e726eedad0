//! Conformance checks for the Atom object graph.
//!
//! Every entity implements [`Validate`]. A validator never stops at the first
//! problem: it collects its own issues, merges the outcomes of the entities it
//! contains, and reports everything in one [`ValidationError`]. Validation is a
//! pure walk over the graph and never mutates it.
//!
//! # Example
//!
//! ```
//! use atomfeed::{Feed, Validate};
//!
//! let feed = Feed::default();
//! let err = feed.validate().unwrap_err();
//! assert!(err.to_string().contains("Feed.ID can't be empty."));
//! ```

mod issues;

pub use issues::ValidationError;

use issues::Issues;

use crate::check::{check_address, check_uri_reference};
use crate::model::{
    Category, Common, Entry, Feed, Generator, Link, Person, Text, TimeStr,
};

const AUTHOR_COVERAGE: &str = "Author must be present in Feed or in every Entry.";
const DUPLICATE_ALTERNATE: &str = "Only one Feed.Link with rel=\"alternate\" can exist.";
const INVALID_TEXT_TYPE: &str = "Text.Type must be either: text, html or xhtml.";

/// Checks an entity against the structural rules of RFC 4287.
pub trait Validate {
    /// Returns `Ok(())` when conformant, otherwise every issue found.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// How a [`Text`] construct is being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Title, subtitle, summary or rights: `type` must be text, html or xhtml.
    Text,
    /// Entry content: `type` may also be any MIME type.
    Content,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn check_optional_uri(issues: &mut Issues, value: &Option<String>) {
    if let Some(uri) = non_empty(value) {
        if let Err(e) = check_uri_reference(uri) {
            issues.add_err(&e);
        }
    }
}

/// Validates each link in order. A second `rel="alternate"` link records the
/// duplicate issue once; further alternates add nothing.
fn check_links(issues: &mut Issues, links: &[Link]) {
    let mut alternates = 0usize;
    for link in links {
        issues.merge(link.validate());

        if link.is_alternate() {
            alternates += 1;
            if alternates == 2 {
                issues.add(DUPLICATE_ALTERNATE);
            }
        }
    }
}

impl Validate for Common {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();
        check_optional_uri(&mut issues, &self.base);
        issues.finish()
    }
}

impl Text {
    /// Validates the construct for the given use.
    pub fn validate_as(&self, mode: TextMode) -> Result<(), ValidationError> {
        let mut issues = Issues::new();

        issues.merge(self.common.validate());

        if mode == TextMode::Text {
            if let Some(text_type) = non_empty(&self.text_type) {
                if !matches!(text_type, "text" | "html" | "xhtml") {
                    issues.add(INVALID_TEXT_TYPE);
                }
            }
        }

        check_optional_uri(&mut issues, &self.src);

        issues.finish()
    }
}

impl Validate for Text {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_as(TextMode::Text)
    }
}

impl Validate for Person {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();

        issues.merge(self.common.validate());
        check_optional_uri(&mut issues, &self.uri);

        if let Some(email) = non_empty(&self.email) {
            if let Err(e) = check_address(email) {
                issues.add_err(&e);
            }
        }

        issues.finish()
    }
}

impl Validate for TimeStr {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();
        if let Err(e) = self.parse() {
            issues.add_err(&e);
        }
        issues.finish()
    }
}

impl Validate for Category {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();
        issues.merge(self.common.validate());
        check_optional_uri(&mut issues, &self.scheme);
        issues.finish()
    }
}

impl Validate for Generator {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();
        issues.merge(self.common.validate());
        check_optional_uri(&mut issues, &self.uri);
        issues.finish()
    }
}

impl Validate for Link {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();

        issues.merge(self.common.validate());

        // href is mandatory, checked even when empty
        if let Err(e) = check_uri_reference(&self.href) {
            issues.add_err(&e);
        }

        issues.finish()
    }
}

impl Validate for Entry {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();

        issues.merge(self.common.validate());

        for author in &self.authors {
            issues.merge(author.validate());
        }

        for category in &self.categories {
            issues.merge(category.validate());
        }

        if let Some(content) = &self.content {
            issues.merge(content.validate_as(TextMode::Content));
        }

        for contributor in &self.contributors {
            issues.merge(contributor.validate());
        }

        if self.id.is_empty() {
            issues.add("Entry.ID can't be empty.");
        }

        check_links(&mut issues, &self.links);

        if let Some(published) = self.published.as_ref().filter(|p| !p.is_empty()) {
            issues.merge(published.validate());
        }

        if let Some(source) = &self.source {
            if !source.feed.entries.is_empty() {
                issues.add("Entry.Source can't contain any entries.");
            }
            issues.merge(source.feed.validate());
        }

        if let Some(summary) = &self.summary {
            issues.merge(summary.validate_as(TextMode::Text));
        }

        if self.title.is_empty() {
            issues.add("Entry.Title can't be empty.");
        }

        if self.updated.is_empty() {
            issues.add("Entry.Updated can't be empty.");
        } else {
            issues.merge(self.updated.validate());
        }

        issues.finish()
    }
}

impl Validate for Feed {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();

        issues.merge(self.common.validate());

        for author in &self.authors {
            issues.merge(author.validate());
        }

        // Reported once, however many entries lack an author
        if self.authors.is_empty() && self.entries.iter().any(|e| e.authors.is_empty()) {
            issues.add(AUTHOR_COVERAGE);
        }

        for category in &self.categories {
            issues.merge(category.validate());
        }

        for contributor in &self.contributors {
            issues.merge(contributor.validate());
        }

        if let Some(generator) = &self.generator {
            issues.merge(generator.validate());
        }

        check_optional_uri(&mut issues, &self.icon);

        if self.id.is_empty() {
            issues.add("Feed.ID can't be empty.");
        }

        check_links(&mut issues, &self.links);

        check_optional_uri(&mut issues, &self.logo);

        if self.title.is_empty() {
            issues.add("Feed.Title can't be empty.");
        }

        // Two independent checks, so an empty value is reported twice.
        // Consumers count on this.
        if self.updated.is_empty() {
            issues.add("Feed.Updated can't be empty.");
        }
        if self.updated.is_empty() {
            issues.add("Feed.Updated can't be empty.");
        } else {
            issues.merge(self.updated.validate());
        }

        for entry in &self.entries {
            issues.merge(entry.validate());
        }

        let outcome = issues.finish();
        if let Err(err) = &outcome {
            tracing::debug!(
                feed_id = %self.id,
                issues = err.issues().len(),
                "Feed failed validation"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;

    fn valid_entry() -> Entry {
        Entry {
            id: "urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a".to_string(),
            title: "Atom-Powered Robots Run Amok".to_string(),
            updated: TimeStr::from("2003-12-13T18:30:02Z"),
            authors: vec![Person {
                name: "John Doe".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn valid_feed() -> Feed {
        Feed {
            id: "urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6".to_string(),
            title: "Example Feed".to_string(),
            updated: TimeStr::from("2003-12-13T18:30:02Z"),
            entries: vec![valid_entry()],
            ..Default::default()
        }
    }

    fn alternate(href: &str) -> Link {
        Link {
            href: href.to_string(),
            rel: Some("alternate".to_string()),
            ..Default::default()
        }
    }

    fn issues_of(outcome: Result<(), ValidationError>) -> Vec<String> {
        outcome.err().map(ValidationError::into_issues).unwrap_or_default()
    }

    #[test]
    fn test_valid_feed_passes() {
        assert_eq!(valid_feed().validate(), Ok(()));
    }

    #[test]
    fn test_empty_feed_reports_in_field_order() {
        assert_eq!(
            issues_of(Feed::default().validate()),
            vec![
                "Feed.ID can't be empty.",
                "Feed.Title can't be empty.",
                "Feed.Updated can't be empty.",
                "Feed.Updated can't be empty.",
            ]
        );
    }

    #[test]
    fn test_empty_entry_reports_in_field_order() {
        assert_eq!(
            issues_of(Entry::default().validate()),
            vec![
                "Entry.ID can't be empty.",
                "Entry.Title can't be empty.",
                "Entry.Updated can't be empty.",
            ]
        );
    }

    #[test]
    fn test_feed_author_satisfies_coverage() {
        let mut feed = valid_feed();
        feed.entries[0].authors.clear();
        feed.authors.push(Person {
            name: "Jane Doe".to_string(),
            ..Default::default()
        });
        assert_eq!(feed.validate(), Ok(()));
    }

    #[test]
    fn test_author_coverage_reported_once() {
        let mut feed = valid_feed();
        let mut orphan = valid_entry();
        orphan.authors.clear();
        feed.entries = vec![orphan.clone(), valid_entry(), orphan];

        let issues = issues_of(feed.validate());
        assert_eq!(issues, vec![AUTHOR_COVERAGE]);
    }

    #[test]
    fn test_feed_without_entries_needs_no_author() {
        let mut feed = valid_feed();
        feed.entries.clear();
        assert_eq!(feed.validate(), Ok(()));
    }

    #[test]
    fn test_single_alternate_allowed() {
        let mut feed = valid_feed();
        feed.links = vec![
            alternate("http://example.org/"),
            Link {
                href: "http://example.org/feed".to_string(),
                rel: Some("self".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(feed.validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_alternate_in_entry() {
        let mut entry = valid_entry();
        entry.links = vec![alternate("/a"), alternate("/b")];
        assert_eq!(issues_of(entry.validate()), vec![DUPLICATE_ALTERNATE]);
    }

    #[test]
    fn test_many_alternates_reported_once() {
        let mut feed = valid_feed();
        feed.links = vec![alternate("/a"), alternate("/b"), alternate("/c")];
        assert_eq!(issues_of(feed.validate()), vec![DUPLICATE_ALTERNATE]);
    }

    #[test]
    fn test_summary_type_checked_but_content_type_free() {
        let bogus = Text {
            text_type: Some("invalid".to_string()),
            body: "hello".to_string(),
            ..Default::default()
        };

        let mut entry = valid_entry();
        entry.content = Some(bogus.clone());
        assert_eq!(entry.validate(), Ok(()));

        entry.summary = Some(bogus);
        assert_eq!(issues_of(entry.validate()), vec![INVALID_TEXT_TYPE]);
    }

    #[test]
    fn test_text_modes() {
        let media = Text {
            text_type: Some("image/svg+xml".to_string()),
            src: Some("http://example.org/logo.svg".to_string()),
            ..Default::default()
        };
        assert!(media.validate_as(TextMode::Content).is_ok());
        assert!(media.validate_as(TextMode::Text).is_err());

        for kind in ["text", "html", "xhtml"] {
            let text = Text {
                text_type: Some(kind.to_string()),
                ..Default::default()
            };
            assert_eq!(text.validate(), Ok(()));
        }
    }

    #[test]
    fn test_text_src_checked_in_content_mode() {
        let content = Text {
            src: Some("http://example.org/%zz".to_string()),
            ..Default::default()
        };
        let issues = issues_of(content.validate_as(TextMode::Content));
        assert_eq!(issues, vec!["invalid URL escape \"%zz\""]);
    }

    #[test]
    fn test_common_base_checked_everywhere() {
        let bad = Common {
            base: Some("http://example.org/a b".to_string()),
            lang: Some("en".to_string()),
        };

        let mut feed = valid_feed();
        feed.common = bad.clone();
        feed.categories.push(Category {
            common: bad.clone(),
            term: "rust".to_string(),
            ..Default::default()
        });
        feed.entries[0].common = bad;

        assert_eq!(issues_of(feed.validate()).len(), 3);
    }

    #[test]
    fn test_link_href_is_mandatory_uri() {
        let link = Link {
            href: "http://exa mple.org/".to_string(),
            ..Default::default()
        };
        assert!(link.validate().is_err());

        let empty = Link::default();
        assert_eq!(empty.validate(), Ok(()));
    }

    #[test]
    fn test_person_checks() {
        let person = Person {
            name: "John".to_string(),
            uri: Some("http://john.doe/%g1".to_string()),
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        let issues = issues_of(person.validate());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0], "invalid URL escape \"%g1\"");
        assert_eq!(
            issues[1],
            check_address("not-an-email").unwrap_err().to_string()
        );
    }

    #[test]
    fn test_empty_optional_fields_are_unset() {
        let person = Person {
            name: "John".to_string(),
            uri: Some(String::new()),
            email: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(person.validate(), Ok(()));
    }

    #[test]
    fn test_time_issue_is_parser_message() {
        let time = TimeStr::from("2003-12-13");
        let expected = time.parse().unwrap_err().to_string();
        assert_eq!(issues_of(time.validate()), vec![expected]);
    }

    #[test]
    fn test_published_checked_when_set() {
        let mut entry = valid_entry();
        entry.published = Some(TimeStr::from("not a time"));
        assert_eq!(issues_of(entry.validate()).len(), 1);

        entry.published = Some(TimeStr::default());
        assert_eq!(entry.validate(), Ok(()));
    }

    #[test]
    fn test_generator_and_feed_uris() {
        let mut feed = valid_feed();
        feed.generator = Some(Generator {
            uri: Some("http://example.org/%".to_string()),
            text: "Example Toolkit".to_string(),
            ..Default::default()
        });
        feed.icon = Some("http://example.org/icon^.png".to_string());
        feed.logo = Some("/logo.png".to_string());

        let issues = issues_of(feed.validate());
        assert_eq!(
            issues,
            vec![
                "invalid URL escape \"%\"",
                "invalid character '^' in URL",
            ]
        );
    }

    #[test]
    fn test_source_with_entries_is_rejected_and_recursed() {
        let mut source_feed = valid_feed();
        source_feed.title.clear();

        let mut entry = valid_entry();
        entry.source = Some(Source { feed: source_feed });

        assert_eq!(
            issues_of(entry.validate()),
            vec![
                "Entry.Source can't contain any entries.",
                "Feed.Title can't be empty.",
            ]
        );
    }

    #[test]
    fn test_source_without_entries_passes() {
        let mut source_feed = valid_feed();
        source_feed.entries.clear();

        let mut entry = valid_entry();
        entry.source = Some(Source { feed: source_feed });
        assert_eq!(entry.validate(), Ok(()));
    }

    #[test]
    fn test_entry_issues_bubble_up_to_feed() {
        let mut feed = valid_feed();
        feed.entries[0].id.clear();
        feed.entries[0].updated = TimeStr::default();

        assert_eq!(
            issues_of(feed.validate()),
            vec!["Entry.ID can't be empty.", "Entry.Updated can't be empty."]
        );
    }
}
