use super::*;
use crate::language_tag::TagParts;
use crate::registry::{cache_key, read_lock, write_lock};
use tracing::trace;

impl LocaleRegistry {
    /// Canonical form of `tag` after sorting and alias replacement.
    ///
    /// Returns `tag` itself when it is already canonical.
    pub fn canonicalize(&self, tag: &Arc<LanguageTag>) -> Arc<LanguageTag> {
        let key = cache_key(tag.as_str());
        if let Some(cached) = read_lock(&self.canonical_cache).get(&key) {
            trace!(key = %key, "canonical cache hit");
            if cached.as_str() == tag.as_str() {
                return Arc::clone(tag);
            }
            return Arc::clone(cached);
        }

        let parts = self.canonical_parts(tag.parts());
        let canonical = LanguageTag::from_parts(parts);
        let result = if canonical == **tag {
            Arc::clone(tag)
        } else {
            Arc::new(canonical)
        };

        let mut cache = write_lock(&self.canonical_cache);
        cache.insert(key, Arc::clone(&result));
        cache
            .entry(cache_key(result.as_str()))
            .or_insert_with(|| Arc::clone(&result));
        trace!(source = %tag, canonical = %result, "canonical cache insert");
        result
    }

    fn canonical_parts(&self, source: &TagParts) -> TagParts {
        let mut parts = source.clone();

        parts.variants = parts.variants.to_sorted();
        parts.attributes = parts.attributes.to_sorted();
        parts.u_extensions = parts.u_extensions.to_sorted();
        parts.t_extensions = parts.t_extensions.to_sorted();
        parts.singletons = parts.singletons.to_sorted();

        self.canonicalize_language(&mut parts);

        if let Some(script) = parts.script.take() {
            parts.script = Some(self.resolve_alias(&AliasKind::Script, &script));
        }

        self.canonicalize_variants(&mut parts);

        if let Some(region) = parts.region.take() {
            parts.region = Some(self.canonical_region(&region, &parts.language));
        }

        if parts.language.is_empty() {
            parts.language = "und".to_string();
        }

        if let Some(tlang) = parts.tlang.take() {
            let tlang = self.canonicalize(&Arc::new(*tlang));
            parts.tlang = Some(Box::new(LanguageTag::clone(&tlang)));
        }

        for map in [&mut parts.u_extensions, &mut parts.t_extensions] {
            for (key, value) in map.values_mut() {
                if value.is_empty() {
                    continue;
                }
                let kind = AliasKind::ExtensionKey(key.to_string());
                if let Some(replacement) = self.lookup_alias(&kind, value) {
                    *value = replacement.to_ascii_lowercase();
                }
            }
        }

        parts
    }

    fn canonicalize_language(&self, parts: &mut TagParts) {
        let language = parts.language.clone();
        if let Some(replacement) = self.lookup_alias(&AliasKind::Language, &language) {
            apply_language_replacement(parts, &replacement);
            return;
        }

        if let Some(region) = parts.region.clone() {
            let compound = format!("{language}-{region}");
            if let Some(replacement) = self.lookup_alias(&AliasKind::Language, &compound) {
                parts.script = None;
                apply_language_replacement(parts, &replacement);
                return;
            }
        }

        let first_variant = parts.variants.iter().next().map(str::to_string);
        if let Some(variant) = first_variant {
            let compound = format!("{language}-{variant}");
            if let Some(replacement) = self.lookup_alias(&AliasKind::Language, &compound) {
                parts.variants.retain(|existing| *existing != variant);
                apply_language_replacement(parts, &replacement);
            }
        }
    }

    fn canonicalize_variants(&self, parts: &mut TagParts) {
        let mut variants = parts.variants.emptied();
        for variant in parts.variants.iter() {
            match self.lookup_alias(&AliasKind::Variant, variant) {
                Some(replacement) if replacement.len() < 4 => {
                    parts.language = replacement.to_ascii_lowercase();
                }
                Some(replacement) => {
                    let replacement = replacement.to_ascii_lowercase();
                    if !variants.contains(&replacement) {
                        variants.push_normalized(replacement);
                    }
                }
                None => variants.push_normalized(variant.to_string()),
            }
        }
        parts.variants = variants;
    }

    fn canonical_region(&self, region: &str, language: &str) -> String {
        let Some(replacement) = self.lookup_alias(&AliasKind::Region, region) else {
            return region.to_ascii_uppercase();
        };
        let candidates = replacement.split_whitespace().collect::<Vec<_>>();
        if candidates.len() > 1 {
            let preferred = candidates.iter().find(|candidate| {
                self.likely_subtags(&format!("und-{candidate}"))
                    .is_some_and(|likely| likely.language() == language)
            });
            if let Some(candidate) = preferred {
                return candidate.to_ascii_uppercase();
            }
        }
        candidates
            .first()
            .map(|candidate| candidate.to_ascii_uppercase())
            .unwrap_or_else(|| region.to_ascii_uppercase())
    }
}

/// Applies a language alias whose value may carry script and region subtags;
/// those only fill fields the tag leaves empty.
fn apply_language_replacement(parts: &mut TagParts, replacement: &str) {
    match LanguageTag::parse(replacement) {
        Ok(replacement) => {
            parts.language = replacement.language().to_string();
            if parts.script.is_none() {
                parts.script = replacement.script().map(str::to_string);
            }
            if parts.region.is_none() {
                parts.region = replacement.region().map(str::to_string);
            }
        }
        Err(_) => parts.language = replacement.to_ascii_lowercase(),
    }
}
