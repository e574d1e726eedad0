//! Typed model, XML codec and conformance validator for the Atom Syndication
//! Format ([RFC 4287](https://www.rfc-editor.org/rfc/rfc4287)).
//!
//! - [`model`] - the feed/entry object graph
//! - [`codec`] - reading and writing Atom XML with `quick-xml`
//! - [`validate`] - structural conformance checks, reporting every issue at once
//! - [`check`] - URI reference and mail address syntax checks
//! - [`config`] - codec settings
//!
//! # Example
//!
//! ```
//! use atomfeed::{codec, Validate};
//!
//! let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom">
//!   <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
//!   <title>Example Feed</title>
//!   <updated>2003-12-13T18:30:02Z</updated>
//!   <author><name>John Doe</name></author>
//! </feed>"#;
//!
//! let feed = codec::from_bytes(xml).unwrap();
//! assert!(feed.validate().is_ok());
//! ```

pub mod check;
pub mod codec;
pub mod config;
pub mod model;
pub mod validate;

pub use codec::{CodecError, Document};
pub use config::{Config, ConfigError};
pub use model::{
    Category, Common, Entry, Extension, Feed, Generator, Link, Person, Source, Text, TimeStr,
    ATOM_NAMESPACE,
};
pub use validate::{TextMode, Validate, ValidationError};
