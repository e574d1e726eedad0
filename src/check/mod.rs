//! Syntax checkers used by the validation engine.
//!
//! - **URI references**: absolute URIs and relative references per RFC 3986
//! - **Mail addresses**: RFC 5322 address syntax
//!
//! Timestamps are checked through [`crate::TimeStr::parse`].

mod email;
mod uri;

pub use email::check_address;
pub use uri::{check_uri_reference, UriError};
