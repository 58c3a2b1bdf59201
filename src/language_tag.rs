use super::*;
use crate::grammar::{
    LEGACY_VARIANTS, TagMatch, is_language_subtag, is_transform_key, is_unicode_key, match_tag,
    normalize_separators, title_case,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub allow_legacy: bool,
    pub ignore_private_extensions: bool,
}

impl ParseOptions {
    pub fn legacy() -> Self {
        Self {
            allow_legacy: true,
            ..Self::default()
        }
    }
}

/// Structured state shared by [`LanguageTag`] and [`TagBuilder`].
///
/// `singletons` keeps every non-`x` singleton in serialization order. The
/// `t` and `u` entries there are ordering placeholders only; their text is
/// always projected from `tlang`/`t_extensions` and
/// `attributes`/`u_extensions`.
#[derive(Debug, Clone)]
pub(crate) struct TagParts {
    pub(crate) language: String,
    pub(crate) script: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) variants: SubtagSet,
    pub(crate) attributes: SubtagSet,
    pub(crate) u_extensions: SubtagMap,
    pub(crate) t_extensions: SubtagMap,
    pub(crate) tlang: Option<Box<LanguageTag>>,
    pub(crate) singletons: SubtagMap,
    pub(crate) private_use: Option<String>,
}

impl Default for TagParts {
    fn default() -> Self {
        Self {
            language: String::new(),
            script: None,
            region: None,
            variants: SubtagSet::for_field(Field::Variant),
            attributes: SubtagSet::for_field(Field::Attribute),
            u_extensions: SubtagMap::for_fields(Field::UnicodeKey, Field::UnicodeType),
            t_extensions: SubtagMap::for_fields(Field::TransformKey, Field::TransformValue),
            tlang: None,
            singletons: SubtagMap::for_fields(Field::Singleton, Field::ExtensionValue),
            private_use: None,
        }
    }
}

impl TagParts {
    pub(crate) fn unicode_text(&self) -> String {
        let mut out = self.attributes.iter().map(str::to_string).collect::<Vec<_>>();
        for (key, value) in self.u_extensions.iter() {
            out.push(key.to_string());
            if !value.is_empty() && value != "true" {
                out.push(value.to_string());
            }
        }
        out.join("-")
    }

    pub(crate) fn transform_text(&self) -> String {
        let mut out = Vec::new();
        if let Some(tlang) = &self.tlang {
            out.push(tlang.as_str().to_ascii_lowercase());
        }
        for (key, value) in self.t_extensions.iter() {
            out.push(key.to_string());
            out.push(value.to_string());
        }
        out.join("-")
    }

    /// Singleton key/value pairs in serialization order, `x` last.
    pub(crate) fn singleton_entries(&self) -> Vec<(String, String)> {
        let transform = self.transform_text();
        let unicode = self.unicode_text();
        let mut out = Vec::with_capacity(self.singletons.len() + 3);
        let mut saw_t = false;
        let mut saw_u = false;

        for (key, value) in self.singletons.iter() {
            let value = match key {
                "t" => {
                    saw_t = true;
                    transform.clone()
                }
                "u" => {
                    saw_u = true;
                    unicode.clone()
                }
                _ => value.to_string(),
            };
            if !value.is_empty() {
                out.push((key.to_string(), value));
            }
        }
        if !saw_t && !transform.is_empty() {
            out.push(("t".to_string(), transform));
        }
        if !saw_u && !unicode.is_empty() {
            out.push(("u".to_string(), unicode));
        }
        if self.singletons.order() == SubtagOrder::Sorted {
            out.sort_by(|a, b| a.0.cmp(&b.0));
        }
        if let Some(private_use) = &self.private_use {
            out.push(("x".to_string(), private_use.clone()));
        }
        out
    }

    pub(crate) fn base_name(&self) -> String {
        let mut out = vec![if self.language.is_empty() {
            "und".to_string()
        } else {
            self.language.clone()
        }];
        out.extend(self.script.iter().cloned());
        out.extend(self.region.iter().cloned());
        out.extend(self.variants.iter().map(str::to_string));
        out.join("-")
    }

    fn serialize(&self) -> String {
        let mut out = self.base_name();
        for (key, value) in self.singleton_entries() {
            out.push('-');
            out.push_str(&key);
            out.push('-');
            out.push_str(&value);
        }
        out
    }

    /// Re-derives the placeholder singleton map into a frozen projection.
    fn singleton_view(&self) -> SubtagMap {
        let mut view = SubtagMap::new();
        for (key, value) in self.singleton_entries() {
            view.insert_normalized(key, value);
        }
        view.frozen()
    }
}

/// An immutable BCP-47 language tag.
///
/// Equality, hashing and display all go through the serialized form
/// computed at construction.
#[derive(Debug, Clone)]
pub struct LanguageTag {
    parts: TagParts,
    singletons: SubtagMap,
    text: String,
}

impl LanguageTag {
    pub fn parse(text: &str) -> Result<Arc<Self>> {
        Self::parse_with(text, ParseOptions::default())
    }

    pub fn parse_with(text: &str, options: ParseOptions) -> Result<Arc<Self>> {
        Self::parse_owned(text, options).map(Arc::new)
    }

    pub fn try_parse(text: &str, options: ParseOptions) -> Option<Arc<Self>> {
        Self::parse_with(text, options).ok()
    }

    pub fn is_valid(text: &str) -> bool {
        Self::is_valid_with(text, ParseOptions::default())
    }

    pub fn is_valid_with(text: &str, options: ParseOptions) -> bool {
        Self::parse_owned(text, options).is_ok()
    }

    pub(crate) fn parse_owned(text: &str, options: ParseOptions) -> Result<Self> {
        let invalid_language_tag = || Error::Format(text.to_string());
        let normalized = normalize_separators(text);
        if normalized.is_empty() {
            return Err(invalid_language_tag());
        }

        let Some(TagMatch {
            language,
            script,
            region,
            variants,
            extensions,
            private_use,
        }) = match_tag(&normalized)?
        else {
            return Err(invalid_language_tag());
        };

        let mut parts = TagParts {
            language,
            script: script.as_deref().map(title_case),
            region: region.map(|region| region.to_ascii_uppercase()),
            ..TagParts::default()
        };

        for variant in variants {
            if !options.allow_legacy && LEGACY_VARIANTS.contains(&variant.as_str()) {
                return Err(invalid_language_tag());
            }
            if parts.variants.contains(&variant) {
                return Err(invalid_language_tag());
            }
            parts.variants.push_normalized(variant);
        }

        if let Some(extensions) = extensions {
            parse_extensions(&extensions, &mut parts).map_err(|_| invalid_language_tag())?;
        }

        if !options.ignore_private_extensions {
            parts.private_use = private_use;
        }

        Ok(Self::from_parts(parts))
    }

    pub(crate) fn from_parts(mut parts: TagParts) -> Self {
        if parts.language.is_empty() {
            parts.language = "und".to_string();
        }
        parts.variants = std::mem::take(&mut parts.variants).frozen();
        parts.attributes = std::mem::take(&mut parts.attributes).frozen();
        parts.u_extensions = std::mem::take(&mut parts.u_extensions).frozen();
        parts.t_extensions = std::mem::take(&mut parts.t_extensions).frozen();
        parts.singletons = std::mem::take(&mut parts.singletons).frozen();
        let singletons = parts.singleton_view();
        let text = parts.serialize();
        Self {
            parts,
            singletons,
            text,
        }
    }

    pub(crate) fn parts(&self) -> &TagParts {
        &self.parts
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> &str {
        &self.parts.language
    }

    pub fn script(&self) -> Option<&str> {
        self.parts.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.parts.region.as_deref()
    }

    pub fn variants(&self) -> &SubtagSet {
        &self.parts.variants
    }

    pub fn attributes(&self) -> &SubtagSet {
        &self.parts.attributes
    }

    pub fn u_extensions(&self) -> &SubtagMap {
        &self.parts.u_extensions
    }

    pub fn t_extensions(&self) -> &SubtagMap {
        &self.parts.t_extensions
    }

    pub fn tlang(&self) -> Option<&LanguageTag> {
        self.parts.tlang.as_deref()
    }

    pub fn singleton_subtags(&self) -> &SubtagMap {
        &self.singletons
    }

    pub fn private_use(&self) -> Option<&str> {
        self.parts.private_use.as_deref()
    }

    pub fn base_name(&self) -> String {
        self.parts.base_name()
    }

    pub fn has_extensions(&self) -> bool {
        !self.singletons.is_empty()
    }

    /// Value of a `u` keyword; a bare keyword reads as `"true"`.
    pub fn unicode_extension(&self, key: &str) -> Option<&str> {
        self.parts
            .u_extensions
            .get(key)
            .map(|value| if value.is_empty() { "true" } else { value })
    }

    pub fn canonicalize(self: &Arc<Self>, registry: &LocaleRegistry) -> Arc<LanguageTag> {
        registry.canonicalize(self)
    }

    pub fn maximize(self: &Arc<Self>, registry: &LocaleRegistry) -> Arc<LanguageTag> {
        registry.maximize(self)
    }

    pub fn minimize(self: &Arc<Self>, registry: &LocaleRegistry) -> Arc<LanguageTag> {
        registry.minimize(self)
    }
}

impl PartialEq for LanguageTag {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for LanguageTag {}

impl std::hash::Hash for LanguageTag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for LanguageTag {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse_owned(text, ParseOptions::default())
    }
}

impl AsRef<str> for LanguageTag {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

fn parse_extensions(run: &str, parts: &mut TagParts) -> Result<()> {
    let subtags = run.split('-').collect::<Vec<_>>();
    let mut idx = 0usize;
    while idx < subtags.len() {
        let singleton = subtags[idx];
        idx += 1;
        let start = idx;
        while idx < subtags.len() && subtags[idx].len() != 1 {
            idx += 1;
        }
        let block = &subtags[start..idx];
        if parts.singletons.contains_key(singleton) {
            return Err(Error::Format(run.to_string()));
        }
        match singleton {
            "u" => parse_unicode_block(block, parts)?,
            "t" => parse_transform_block(block, parts)?,
            _ => {}
        }
        let value = if matches!(singleton, "t" | "u") {
            String::new()
        } else {
            block.join("-")
        };
        parts.singletons.insert_normalized(singleton.to_string(), value);
    }
    Ok(())
}

pub(crate) fn parse_unicode_block(block: &[&str], parts: &mut TagParts) -> Result<()> {
    let mut idx = 0usize;
    while idx < block.len() && block[idx].len() > 2 {
        parts.attributes.push_normalized(block[idx].to_string());
        idx += 1;
    }
    while idx < block.len() {
        let key = block[idx];
        if !is_unicode_key(key) {
            return Err(Error::Format(block.join("-")));
        }
        idx += 1;
        let start = idx;
        while idx < block.len() && block[idx].len() > 2 {
            idx += 1;
        }
        if !parts.u_extensions.contains_key(key) {
            parts
                .u_extensions
                .insert_normalized(key.to_string(), block[start..idx].join("-"));
        }
    }
    Ok(())
}

pub(crate) fn parse_transform_block(block: &[&str], parts: &mut TagParts) -> Result<()> {
    let mut idx = 0usize;
    if block.first().is_some_and(|first| is_language_subtag(first)) {
        while idx < block.len() && !is_transform_key(block[idx]) {
            idx += 1;
        }
        let tlang = LanguageTag::parse_owned(&block[..idx].join("-"), ParseOptions::default())?;
        if tlang.has_extensions() {
            return Err(Error::Format(block.join("-")));
        }
        parts.tlang = Some(Box::new(tlang));
    }
    while idx < block.len() {
        let key = block[idx];
        if !is_transform_key(key) {
            return Err(Error::Format(block.join("-")));
        }
        idx += 1;
        let start = idx;
        while idx < block.len() && !is_transform_key(block[idx]) {
            if !(3..=8).contains(&block[idx].len()) {
                return Err(Error::Format(block.join("-")));
            }
            idx += 1;
        }
        if start == idx {
            return Err(Error::Format(block.join("-")));
        }
        if !parts.t_extensions.contains_key(key) {
            parts
                .t_extensions
                .insert_normalized(key.to_string(), block[start..idx].join("-"));
        }
    }
    Ok(())
}
