use super::*;
use crate::registry::{cache_key, read_lock, write_lock};

#[derive(Debug, Clone, PartialEq, Eq)]
struct BaseFields {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl BaseFields {
    fn of(tag: &LanguageTag) -> Self {
        Self {
            language: tag.language().to_string(),
            script: tag.script().map(str::to_string),
            region: tag.region().map(str::to_string),
        }
    }

    fn is_und(&self) -> bool {
        self.language.is_empty() || self.language == "und"
    }

    /// Lookup keys from most to least specific.
    fn lookup_keys(&self) -> Vec<String> {
        let language = if self.is_und() { "und" } else { &self.language };
        let mut keys = Vec::with_capacity(6);
        if let (Some(script), Some(region)) = (&self.script, &self.region) {
            keys.push(format!("{language}-{script}-{region}"));
        }
        if let Some(region) = &self.region {
            keys.push(format!("{language}-{region}"));
        }
        if let Some(script) = &self.script {
            keys.push(format!("{language}-{script}"));
        }
        keys.push(language.to_string());
        if let Some(script) = &self.script {
            keys.push(format!("und-{script}"));
        }
        keys.push("und".to_string());
        keys
    }

    /// Fills only the empty fields from `likely`.
    fn filled_from(&self, likely: &LanguageTag) -> Self {
        Self {
            language: if self.is_und() {
                likely.language().to_string()
            } else {
                self.language.clone()
            },
            script: self
                .script
                .clone()
                .or_else(|| likely.script().map(str::to_string)),
            region: self
                .region
                .clone()
                .or_else(|| likely.region().map(str::to_string)),
        }
    }
}

impl LocaleRegistry {
    /// Adds likely script and region subtags (and a language for `und`) to the
    /// canonical form of `tag`. Subtags already present are never replaced.
    pub fn maximize(&self, tag: &Arc<LanguageTag>) -> Arc<LanguageTag> {
        let canonical = self.canonicalize(tag);
        let key = cache_key(canonical.as_str());
        if let Some(cached) = read_lock(&self.maximal_cache).get(&key) {
            return Arc::clone(cached);
        }

        let base = BaseFields::of(&canonical);
        let maximal = self.likely_fields(&base);
        let result = if maximal == base {
            Arc::clone(&canonical)
        } else {
            with_base(&canonical, &maximal)
        };

        let mut cache = write_lock(&self.maximal_cache);
        Arc::clone(cache.entry(key).or_insert(result))
    }

    /// Removes subtags that [`LocaleRegistry::maximize`] would add back.
    /// Variants and extensions of `tag` are kept.
    pub fn minimize(&self, tag: &Arc<LanguageTag>) -> Arc<LanguageTag> {
        let canonical = self.canonicalize(tag);
        let key = cache_key(canonical.as_str());
        let cached = read_lock(&self.minimal_cache).get(&key).cloned();
        let result = match cached {
            Some(cached) => cached,
            None => {
                let maximal = BaseFields::of(&self.maximize(&canonical));
                let candidates = [
                    BaseFields {
                        language: maximal.language.clone(),
                        script: None,
                        region: None,
                    },
                    BaseFields {
                        language: maximal.language.clone(),
                        script: None,
                        region: maximal.region.clone(),
                    },
                    BaseFields {
                        language: maximal.language.clone(),
                        script: maximal.script.clone(),
                        region: None,
                    },
                ];
                let minimal = candidates
                    .into_iter()
                    .find(|candidate| self.likely_fields(candidate) == maximal)
                    .unwrap_or_else(|| maximal.clone());

                let result = if BaseFields::of(&canonical) == minimal {
                    Arc::clone(&canonical)
                } else {
                    with_base(&canonical, &minimal)
                };
                let mut cache = write_lock(&self.minimal_cache);
                Arc::clone(cache.entry(key).or_insert(result))
            }
        };

        if result.as_str() == tag.as_str() {
            Arc::clone(tag)
        } else {
            result
        }
    }

    fn likely_fields(&self, base: &BaseFields) -> BaseFields {
        base.lookup_keys()
            .iter()
            .find_map(|key| self.likely_subtags(key))
            .map(|likely| base.filled_from(&likely))
            .unwrap_or_else(|| base.clone())
    }
}

/// Rebuilds `tag` with new language, script and region, keeping variants and
/// extensions.
fn with_base(tag: &LanguageTag, base: &BaseFields) -> Arc<LanguageTag> {
    let mut parts = tag.parts().clone();
    parts.language = base.language.clone();
    parts.script = base.script.clone();
    parts.region = base.region.clone();
    Arc::new(LanguageTag::from_parts(parts))
}
