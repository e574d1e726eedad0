//! Typed representation of an Atom document.
//!
//! The structures follow [RFC 4287](https://www.rfc-editor.org/rfc/rfc4287).
//! They carry no behaviour beyond their shape: parsing and rendering live in
//! [`crate::codec`], conformance checks in [`crate::validate`].
//!
//! Optional scalar fields are `Option<String>`. Required ones (`id`, `title`,
//! `updated`, `name`, `term`, `href`) are plain strings where the empty string
//! means the value is missing, so a document lacking them still parses and
//! validation can report every gap at once.

mod time;

pub use time::TimeStr;

/// XML namespace for Atom documents.
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Attributes every Atom element may carry (`xml:base`, `xml:lang`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Common {
    /// Base URI for resolving relative references. Must be a valid URI
    /// reference when set.
    pub base: Option<String>,
    pub lang: Option<String>,
}

/// A human-readable text construct, also used for entry content.
///
/// `body` holds the raw inner markup exactly as it appeared in the document:
/// escaped text for `text`/`html`, an XHTML `div` for `xhtml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub common: Common,
    /// `text`, `html` or `xhtml`. Entry content may also carry a MIME type.
    pub text_type: Option<String>,
    /// Out-of-line content reference (entry content only).
    pub src: Option<String>,
    pub body: String,
}

/// A foreign element preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extension {
    /// Qualified name as written in the document, e.g. `media:thumbnail`.
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Raw inner markup.
    pub xml: String,
}

/// An author or contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub common: Common,
    pub name: String,
    pub uri: Option<String>,
    pub email: Option<String>,
    pub extensions: Vec<Extension>,
}

/// A classification tag on a feed or entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub common: Common,
    pub term: String,
    pub scheme: Option<String>,
    pub label: Option<String>,
}

/// The agent that produced the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generator {
    pub common: Common,
    pub uri: Option<String>,
    pub version: Option<String>,
    pub text: String,
}

/// A reference from a feed or entry to a web resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub common: Common,
    pub href: String,
    pub rel: Option<String>,
    pub media_type: Option<String>,
    pub hreflang: Option<String>,
    pub title: Option<String>,
    pub length: Option<String>,
}

impl Link {
    /// Whether this is the `rel="alternate"` link of its element.
    pub fn is_alternate(&self) -> bool {
        self.rel.as_deref() == Some("alternate")
    }
}

/// Metadata of the feed an entry was copied from.
///
/// The embedded feed is a value copy and must not contain entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub feed: Feed,
}

/// A single item of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub common: Common,
    /// Prefixed namespace declarations (`xmlns:media`, ...) written on this
    /// element, so extension elements keep their bindings.
    pub namespaces: Vec<(String, String)>,

    pub authors: Vec<Person>,
    pub categories: Vec<Category>,
    pub content: Option<Text>,
    pub contributors: Vec<Person>,
    pub id: String,
    pub links: Vec<Link>,
    pub published: Option<TimeStr>,
    pub rights: Option<String>,
    pub source: Option<Source>,
    pub summary: Option<Text>,
    pub title: String,
    pub updated: TimeStr,

    pub extensions: Vec<Extension>,
}

/// The document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub common: Common,
    /// See [`Entry::namespaces`].
    pub namespaces: Vec<(String, String)>,

    pub authors: Vec<Person>,
    pub categories: Vec<Category>,
    pub contributors: Vec<Person>,
    pub generator: Option<Generator>,
    pub icon: Option<String>,
    pub id: String,
    pub links: Vec<Link>,
    pub logo: Option<String>,
    pub rights: Option<String>,
    pub subtitle: Option<String>,
    pub title: String,
    pub updated: TimeStr,

    pub entries: Vec<Entry>,

    pub extensions: Vec<Extension>,
}
