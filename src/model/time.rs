use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use std::fmt;

/// A timestamp kept as it appeared in the document.
///
/// The string is only interpreted on demand, so an unparseable value survives
/// a parse/serialize round trip and is reported by validation instead of
/// failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TimeStr(String);

impl TimeStr {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Formats `time` as RFC 3339 with whole seconds, `Z` for UTC.
    pub fn from_datetime<Tz>(time: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(time.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Parses the stored value as RFC 3339.
    pub fn parse(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TimeStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TimeStr {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TimeStr {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<Tz> From<DateTime<Tz>> for TimeStr
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    fn from(time: DateTime<Tz>) -> Self {
        Self::from_datetime(&time)
    }
}

impl TryFrom<&TimeStr> for DateTime<FixedOffset> {
    type Error = chrono::ParseError;

    fn try_from(value: &TimeStr) -> Result<Self, Self::Error> {
        value.parse()
    }
}
