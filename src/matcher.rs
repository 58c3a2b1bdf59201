use super::*;
use crate::grammar::unicode_extension_runs;
use crate::registry::truncate_last_subtag;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Lookup,
    #[default]
    BestFit,
}

/// Result of matching a requested locale list against the available locales.
/// `extension` is the `-u-...` text that was stripped from the winning
/// request, empty when it carried none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleMatch {
    pub locale: String,
    pub extension: String,
}

#[derive(Debug, Clone, Copy)]
pub struct LocaleMatcher<'a> {
    registry: &'a LocaleRegistry,
}

impl<'a> LocaleMatcher<'a> {
    pub fn new(registry: &'a LocaleRegistry) -> Self {
        Self { registry }
    }

    /// Splits `tag` into its text without `u` extension runs and the
    /// removed runs themselves. Other extensions and the private-use block
    /// are kept in place.
    pub fn split_unicode_extensions(tag: &str) -> Result<(String, String)> {
        let tag = tag.trim().replace('_', "-");
        let lowered = tag.to_ascii_lowercase();
        let private_at = if lowered.starts_with("x-") {
            0
        } else {
            lowered.find("-x-").unwrap_or(lowered.len())
        };

        let mut stripped = String::with_capacity(tag.len());
        let mut extension = String::new();
        let mut cursor = 0usize;
        for (start, end) in unicode_extension_runs(&lowered[..private_at])? {
            stripped.push_str(&tag[cursor..start]);
            extension.push_str(&tag[start..end]);
            cursor = end;
        }
        stripped.push_str(&tag[cursor..]);
        Ok((stripped, extension))
    }

    pub fn remove_unicode_extensions(tag: &str) -> Result<String> {
        Self::split_unicode_extensions(tag).map(|(stripped, _)| stripped)
    }

    /// Finds `candidate` in `available`, dropping trailing subtags until an
    /// entry matches. Comparison ignores case; the available spelling is
    /// returned.
    pub fn best_available_locale<S: AsRef<str>>(
        &self,
        available: &[S],
        candidate: &str,
    ) -> Option<String> {
        let mut candidate = candidate.trim().replace('_', "-");
        loop {
            if candidate.is_empty() {
                return None;
            }
            let found = available.iter().find(|locale| {
                locale
                    .as_ref()
                    .trim()
                    .replace('_', "-")
                    .eq_ignore_ascii_case(&candidate)
            });
            if let Some(found) = found {
                trace!(candidate = %candidate, found = found.as_ref(), "available locale hit");
                return Some(found.as_ref().to_string());
            }
            candidate = truncate_last_subtag(&candidate)?.to_string();
        }
    }

    /// Picks the best available locale for `requested`.
    ///
    /// An empty request list stands for the configured default locale. When
    /// nothing matches, the first available locale is used, and with no
    /// available locales at all the default locale itself is returned.
    pub fn resolve<S, R>(&self, available: &[S], requested: &[R], kind: MatcherKind) -> LocaleMatch
    where
        S: AsRef<str>,
        R: AsRef<str>,
    {
        let found = if requested.is_empty() {
            self.match_requested(available, [self.registry.default_locale()], kind)
        } else {
            self.match_requested(available, requested.iter().map(AsRef::as_ref), kind)
                .or_else(|| {
                    self.match_requested(available, [self.registry.default_locale()], kind)
                })
        };
        if let Some(found) = found {
            debug!(locale = %found.locale, extension = %found.extension, "resolved locale");
            return found;
        }

        let locale = available
            .first()
            .map(|locale| locale.as_ref().to_string())
            .unwrap_or_else(|| self.registry.default_locale().to_string());
        debug!(locale = %locale, "no requested locale available; using fallback");
        LocaleMatch {
            locale,
            extension: String::new(),
        }
    }

    /// The requested locales that have an available match, in request order.
    pub fn lookup_supported_locales<S, R>(&self, available: &[S], requested: &[R]) -> Vec<String>
    where
        S: AsRef<str>,
        R: AsRef<str>,
    {
        requested
            .iter()
            .map(AsRef::as_ref)
            .filter(|locale| {
                let stripped = Self::remove_unicode_extensions(locale)
                    .unwrap_or_else(|_| locale.to_string());
                self.best_available_locale(available, &stripped).is_some()
            })
            .map(str::to_string)
            .collect()
    }

    /// Same result as [`LocaleMatcher::lookup_supported_locales`].
    pub fn best_fit_supported_locales<S, R>(&self, available: &[S], requested: &[R]) -> Vec<String>
    where
        S: AsRef<str>,
        R: AsRef<str>,
    {
        self.lookup_supported_locales(available, requested)
    }

    pub fn supported_locales<S, R>(
        &self,
        available: &[S],
        requested: &[R],
        kind: MatcherKind,
    ) -> Vec<String>
    where
        S: AsRef<str>,
        R: AsRef<str>,
    {
        match kind {
            MatcherKind::Lookup => self.lookup_supported_locales(available, requested),
            MatcherKind::BestFit => self.best_fit_supported_locales(available, requested),
        }
    }

    fn match_requested<'r, S: AsRef<str>>(
        &self,
        available: &[S],
        requested: impl IntoIterator<Item = &'r str>,
        kind: MatcherKind,
    ) -> Option<LocaleMatch> {
        for locale in requested {
            let (stripped, extension) = Self::split_unicode_extensions(locale)
                .unwrap_or_else(|_| (locale.to_string(), String::new()));
            let found = self.best_available_locale(available, &stripped).or_else(|| {
                if kind == MatcherKind::BestFit {
                    self.best_fit_fallback(available, &stripped)
                } else {
                    None
                }
            });
            if let Some(locale) = found {
                return Some(LocaleMatch { locale, extension });
            }
        }
        None
    }

    /// Retries with the maximized form, then with its script removed.
    fn best_fit_fallback<S: AsRef<str>>(&self, available: &[S], stripped: &str) -> Option<String> {
        let tag = LanguageTag::parse(stripped).ok()?;
        let maximal = self.registry.maximize(&tag);
        if let Some(found) = self.best_available_locale(available, maximal.as_str()) {
            return Some(found);
        }
        maximal.script()?;
        let mut builder = TagBuilder::from_tag(&maximal);
        builder.set_script(None).ok()?;
        self.best_available_locale(available, builder.as_read_only().as_str())
    }
}
