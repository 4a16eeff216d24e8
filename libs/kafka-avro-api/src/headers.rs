use std::fmt;
use std::str::FromStr;

use crate::message::MessageHeaders;

/// Well-known header names.
///
/// Convenience constants only: header maps accept any string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderName {
    Action,
    Authentication,
    CorrelationId,
    Expiry,
    ReplyTo,
    Type,
}

impl HeaderName {
    pub const ALL: [HeaderName; 6] = [
        HeaderName::Action,
        HeaderName::Authentication,
        HeaderName::CorrelationId,
        HeaderName::Expiry,
        HeaderName::ReplyTo,
        HeaderName::Type,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderName::Action => "Action",
            HeaderName::Authentication => "Authentication",
            HeaderName::CorrelationId => "Correlation-Id",
            HeaderName::Expiry => "Expiry",
            HeaderName::ReplyTo => "Reply-To",
            HeaderName::Type => "Type",
        }
    }
}

impl AsRef<str> for HeaderName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `Action` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Look up `name` across several header maps.
///
/// Maps are scanned in order and the first one containing the key wins, so
/// headers accumulated along a message chain shadow later ones. The raw bytes
/// are decoded as UTF-8; invalid sequences are replaced, not rejected.
pub fn header_value(headers: &[&MessageHeaders], name: impl AsRef<str>) -> Option<String> {
    let name = name.as_ref();
    headers
        .iter()
        .find_map(|map| map.get(name))
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
}

/// Single-map form of [`header_value`].
pub fn header_value_in(headers: &MessageHeaders, name: impl AsRef<str>) -> Option<String> {
    header_value(&[headers], name)
}
