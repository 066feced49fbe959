//! Flag and alternative-choice tokens.

use std::fmt;

use crate::error::{CatalogError, Section};

/// Delimiter used to join flags into a single feature-selector argument.
pub const FEATURE_DELIMITER: char = ',';

/// One optional capability, identified by an opaque non-empty name.
///
/// A plain flag never contains [`FEATURE_DELIMITER`]; bundles of co-required
/// flags are expressed as a [`Choice`] inside an alternative group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flag(String);

impl Flag {
    pub(crate) fn parse(raw: &str, section: Section) -> Result<Self, CatalogError> {
        if raw.is_empty() {
            return Err(CatalogError::EmptyFlag { section });
        }
        if raw.contains(FEATURE_DELIMITER) {
            return Err(CatalogError::DelimiterInFlag { flag: raw.to_owned(), section });
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Flag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One member of an alternative group.
///
/// A choice is either a single flag (`"backend-a"`) or a bundle of
/// co-required flags written with the delimiter (`"backend-b,extra"`). The
/// raw text is kept verbatim and substituted as one atomic token; the
/// component flags are only used for validation and for splitting the final
/// feature argument back into a flag set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Choice {
    raw: String,
    flags: Vec<Flag>,
}

impl Choice {
    pub(crate) fn parse(raw: &str, section: Section) -> Result<Self, CatalogError> {
        if raw.is_empty() {
            return Err(CatalogError::EmptyFlag { section });
        }
        let flags = raw
            .split(FEATURE_DELIMITER)
            .map(|part| {
                if part.is_empty() {
                    Err(CatalogError::EmptyFlag { section })
                } else {
                    Ok(Flag(part.to_owned()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { raw: raw.to_owned(), flags })
    }

    /// The choice exactly as written in the catalog.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Component flags; a single-flag choice yields one element.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
