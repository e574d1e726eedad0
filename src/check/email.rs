use email_address::EmailAddress;
use std::str::FromStr;

/// Checks that `address` is a syntactically valid RFC 5322 mail address.
///
/// The parser's own error is returned untouched; its message becomes the
/// validation issue text.
pub fn check_address(address: &str) -> Result<(), email_address::Error> {
    EmailAddress::from_str(address).map(|_| ())
}
