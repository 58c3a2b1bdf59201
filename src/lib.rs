//! BCP-47 language tags backed by CLDR data: parsing, canonicalization,
//! likely-subtag maximization and minimization, parent-locale fallback,
//! locale matching and plural rules.
//!
//! ```
//! use locale_core::{LanguageTag, LocaleRegistry};
//!
//! let registry = LocaleRegistry::with_bundled_data()?;
//! let tag = LanguageTag::parse("EN_us")?;
//! assert_eq!(tag.canonicalize(&registry).as_str(), "en-US");
//! assert_eq!(tag.maximize(&registry).as_str(), "en-Latn-US");
//! # Ok::<(), locale_core::Error>(())
//! ```

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

mod canonical;
mod grammar;
mod language_tag;
mod likely;
mod locale_data;
mod matcher;
mod plural;
mod registry;
mod subtags;
mod tag_builder;

pub use grammar::Field;
pub use language_tag::{LanguageTag, ParseOptions};
pub use locale_data::{LocaleData, LocaleDataProvider, ParentLocaleEntry, PluralRuleEntry};
pub use matcher::{LocaleMatch, LocaleMatcher, MatcherKind};
pub use plural::{
    PluralCategory, PluralCategorySet, PluralOperands, PluralRuleType, PluralRules,
};
pub use registry::{AliasKind, LocaleRegistry, RegistryConfig};
pub use subtags::{SubtagMap, SubtagOrder, SubtagSet};
pub use tag_builder::TagBuilder;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Format(String),
    InvalidField { field: Field, value: String },
    ReadOnly(String),
    OutOfRange { index: usize, len: usize },
    Data(String),
    PluralRule(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(text) => write!(f, "invalid language tag: \"{text}\""),
            Self::InvalidField { field, value } => {
                write!(f, "invalid {} subtag: \"{value}\"", field.name())
            }
            Self::ReadOnly(what) => write!(f, "cannot modify read-only {what}"),
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for collection of length {len}")
            }
            Self::Data(msg) => write!(f, "locale data error: {msg}"),
            Self::PluralRule(msg) => write!(f, "plural rule error: {msg}"),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests;
