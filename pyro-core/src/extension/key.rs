//! Two-part handler identity

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A dotted handler reference that could not be split into `source.TypeName`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid handler reference '{0}': expected 'source.TypeName'")]
pub struct InvalidHandlerKey(pub String);

/// Identity of a handler type: the source that declared it plus its type name
///
/// Profiles name their owning handler as a dotted `source.TypeName` string.
/// That string is parsed once, when the profile is built, and only the
/// structured key travels further.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerKey {
    source: String,
    type_name: String,
}

impl HandlerKey {
    pub fn new(source: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            type_name: type_name.into(),
        }
    }

    /// Parse a dotted `source.TypeName` reference
    pub fn parse(dotted: &str) -> Result<Self, InvalidHandlerKey> {
        let invalid = || InvalidHandlerKey(dotted.to_string());
        let (source, type_name) = dotted.split_once('.').ok_or_else(invalid)?;
        if !is_valid_segment(source) || !is_valid_segment(type_name) {
            return Err(invalid());
        }
        Ok(Self::new(source, type_name))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.source, self.type_name)
    }
}

impl FromStr for HandlerKey {
    type Err = InvalidHandlerKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A key segment is non-empty and free of dots and whitespace
pub(crate) fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.chars().any(|c| c == '.' || c.is_whitespace())
}
