//! XML codec for Atom documents.
//!
//! - **Reading**: bytes → [`Feed`] or [`Entry`], honouring the encoding named
//!   in the XML declaration or signalled by a byte order mark
//! - **Writing**: [`Feed`] or [`Entry`] → indented UTF-8 XML
//!
//! Parsing is lenient about content: a document missing its `id` or carrying
//! a malformed timestamp still parses, and [`crate::Validate`] reports the
//! problems. Only XML that is not well-formed fails here.
//!
//! # Example
//!
//! ```
//! use atomfeed::codec;
//!
//! let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
//!   <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
//!   <title>Example Feed</title>
//!   <updated>2003-12-13T18:30:02Z</updated>
//! </feed>"#;
//!
//! let feed = codec::from_str(xml).unwrap();
//! assert_eq!(feed.title, "Example Feed");
//!
//! let rendered = codec::to_string(&feed).unwrap();
//! assert_eq!(codec::from_str(&rendered).unwrap(), feed);
//! ```

mod reader;
mod writer;

pub use reader::Document;

use quick_xml::encoding::EncodingError;
use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use std::io::Write;
use thiserror::Error;

use crate::config::Config;
use crate::model::{Entry, Feed};
use reader::AtomReader;
use writer::AtomWriter;

/// Errors that can occur while reading or writing an Atom document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The XML is not well-formed.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute is malformed or duplicated.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] AttrError),

    /// Character data contains an unknown entity or bad character reference.
    #[error("XML escape error: {0}")]
    Escape(#[from] EscapeError),

    /// Bytes cannot be decoded with the document's encoding.
    #[error("XML encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Writing to the output failed.
    #[error("Failed to write XML: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized output is not valid UTF-8.
    #[error("Generated XML contains invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The input holds no element at all.
    #[error("Document has no root element")]
    MissingRoot,

    /// The root element is neither `feed` nor `entry`.
    #[error("Expected <feed> or <entry> root element, found <{0}>")]
    UnexpectedRoot(String),

    /// The root element is of the other kind than requested.
    #[error("Expected <{expected}> root element, found <{found}>")]
    WrongRoot {
        expected: &'static str,
        found: &'static str,
    },

    /// The input ended inside an open element.
    #[error("Unexpected end of document")]
    UnexpectedEof,

    /// SEC-003: Nested `<source>` elements exceed the configured depth.
    #[error("Source nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// Parses a document whose root is either `<feed>` or `<entry>`.
pub fn parse_document(bytes: &[u8], config: &Config) -> Result<Document, CodecError> {
    let document = AtomReader::new(bytes, config).read_document()?;
    match &document {
        Document::Feed(feed) => tracing::debug!(
            id = %feed.id,
            entries = feed.entries.len(),
            "Parsed Atom feed"
        ),
        Document::Entry(entry) => tracing::debug!(id = %entry.id, "Parsed Atom entry"),
    }
    Ok(document)
}

/// Parses a `<feed>` document with default settings.
pub fn from_bytes(bytes: &[u8]) -> Result<Feed, CodecError> {
    from_bytes_with_config(bytes, &Config::default())
}

pub fn from_bytes_with_config(bytes: &[u8], config: &Config) -> Result<Feed, CodecError> {
    match parse_document(bytes, config)? {
        Document::Feed(feed) => Ok(feed),
        Document::Entry(_) => Err(CodecError::WrongRoot {
            expected: "feed",
            found: "entry",
        }),
    }
}

/// Parses a `<feed>` document held in a string.
pub fn from_str(xml: &str) -> Result<Feed, CodecError> {
    from_bytes(xml.as_bytes())
}

/// Parses a standalone `<entry>` document.
pub fn entry_from_bytes(bytes: &[u8]) -> Result<Entry, CodecError> {
    entry_from_bytes_with_config(bytes, &Config::default())
}

pub fn entry_from_bytes_with_config(bytes: &[u8], config: &Config) -> Result<Entry, CodecError> {
    match parse_document(bytes, config)? {
        Document::Entry(entry) => Ok(entry),
        Document::Feed(_) => Err(CodecError::WrongRoot {
            expected: "entry",
            found: "feed",
        }),
    }
}

/// Writes `feed` as a complete XML document to `out`.
pub fn to_writer<W: Write>(out: W, feed: &Feed) -> Result<W, CodecError> {
    to_writer_with_config(out, feed, &Config::default())
}

pub fn to_writer_with_config<W: Write>(
    out: W,
    feed: &Feed,
    config: &Config,
) -> Result<W, CodecError> {
    let mut writer = AtomWriter::new(out, config);
    writer.write_feed_document(feed)?;
    Ok(writer.into_inner())
}

pub fn to_vec(feed: &Feed) -> Result<Vec<u8>, CodecError> {
    to_writer(Vec::new(), feed)
}

pub fn to_string(feed: &Feed) -> Result<String, CodecError> {
    to_string_with_config(feed, &Config::default())
}

pub fn to_string_with_config(feed: &Feed, config: &Config) -> Result<String, CodecError> {
    let bytes = to_writer_with_config(Vec::new(), feed, config)?;
    Ok(String::from_utf8(bytes)?)
}

/// Renders a standalone `<entry>` document.
pub fn entry_to_string(entry: &Entry) -> Result<String, CodecError> {
    entry_to_string_with_config(entry, &Config::default())
}

pub fn entry_to_string_with_config(entry: &Entry, config: &Config) -> Result<String, CodecError> {
    let mut writer = AtomWriter::new(Vec::new(), config);
    writer.write_entry_document(entry)?;
    Ok(String::from_utf8(writer.into_inner())?)
}
