use super::*;
use crate::grammar::{normalize_separators, title_case};
use crate::language_tag::TagParts;

/// Mutable editor for a language tag.
///
/// Only the structured fields are stored. The `t` and `u` entries reported by
/// [`TagBuilder::singleton_subtags`] are serialized from those fields on every
/// read, and writing either entry re-parses it into the fields, so the two
/// views cannot drift apart.
#[derive(Debug, Clone, Default)]
pub struct TagBuilder {
    parts: TagParts,
}

impl TagBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tag(tag: &Arc<LanguageTag>) -> Self {
        Self::from(&**tag)
    }

    fn copy_parts(tag: &LanguageTag) -> Self {
        let source = tag.parts();
        Self {
            parts: TagParts {
                language: source.language.clone(),
                script: source.script.clone(),
                region: source.region.clone(),
                variants: source.variants.thawed(),
                attributes: source.attributes.thawed(),
                u_extensions: source.u_extensions.thawed(),
                t_extensions: source.t_extensions.thawed(),
                tlang: source.tlang.clone(),
                singletons: source.singletons.thawed(),
                private_use: source.private_use.clone(),
            },
        }
    }

    pub fn language(&self) -> &str {
        &self.parts.language
    }

    pub fn set_language(&mut self, language: &str) -> Result<()> {
        Field::Language.validate(language)?;
        self.parts.language = normalize_separators(language);
        Ok(())
    }

    pub fn script(&self) -> Option<&str> {
        self.parts.script.as_deref()
    }

    pub fn set_script(&mut self, script: Option<&str>) -> Result<()> {
        if let Some(script) = script {
            Field::Script.validate(script)?;
        }
        self.parts.script = script.map(|script| title_case(script.trim()));
        Ok(())
    }

    pub fn region(&self) -> Option<&str> {
        self.parts.region.as_deref()
    }

    pub fn set_region(&mut self, region: Option<&str>) -> Result<()> {
        if let Some(region) = region {
            Field::Region.validate(region)?;
        }
        self.parts.region = region.map(|region| region.trim().to_ascii_uppercase());
        Ok(())
    }

    pub fn tlang(&self) -> Option<&LanguageTag> {
        self.parts.tlang.as_deref()
    }

    pub fn set_tlang(&mut self, tlang: Option<&str>) -> Result<()> {
        let parsed = match tlang {
            Some(text) => {
                Field::TransformLanguage.validate(text)?;
                let tag = LanguageTag::parse_owned(text, ParseOptions::default()).map_err(|_| {
                    Error::InvalidField {
                        field: Field::TransformLanguage,
                        value: text.to_string(),
                    }
                })?;
                Some(Box::new(tag))
            }
            None => None,
        };
        self.parts.tlang = parsed;
        Ok(())
    }

    pub fn variants(&self) -> &SubtagSet {
        &self.parts.variants
    }

    pub fn variants_mut(&mut self) -> &mut SubtagSet {
        &mut self.parts.variants
    }

    pub fn attributes(&self) -> &SubtagSet {
        &self.parts.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut SubtagSet {
        &mut self.parts.attributes
    }

    pub fn u_extensions(&self) -> &SubtagMap {
        &self.parts.u_extensions
    }

    pub fn u_extensions_mut(&mut self) -> &mut SubtagMap {
        &mut self.parts.u_extensions
    }

    pub fn t_extensions(&self) -> &SubtagMap {
        &self.parts.t_extensions
    }

    pub fn t_extensions_mut(&mut self) -> &mut SubtagMap {
        &mut self.parts.t_extensions
    }

    pub fn private_use(&self) -> Option<&str> {
        self.parts.private_use.as_deref()
    }

    /// Current text of one singleton block, `t` and `u` included.
    pub fn singleton_subtag(&self, key: &str) -> Option<String> {
        let key = normalize_separators(key);
        self.parts
            .singleton_entries()
            .into_iter()
            .find(|(singleton, _)| *singleton == key)
            .map(|(_, value)| value)
    }

    /// Snapshot of every singleton block in serialization order.
    pub fn singleton_subtags(&self) -> SubtagMap {
        let mut view = SubtagMap::new();
        for (key, value) in self.parts.singleton_entries() {
            view.insert_normalized(key, value);
        }
        view.frozen()
    }

    pub fn set_singleton_subtag(&mut self, key: &str, value: &str) -> Result<()> {
        let key = normalize_separators(key);
        match key.as_str() {
            "t" => {
                let parsed = reparse_block("t", value)?;
                self.parts.tlang = parsed.parts().tlang.clone();
                self.parts.t_extensions = parsed.t_extensions().thawed();
            }
            "u" => {
                let parsed = reparse_block("u", value)?;
                self.parts.attributes = parsed.attributes().thawed();
                self.parts.u_extensions = parsed.u_extensions().thawed();
            }
            "x" => {
                Field::PrivateUse.validate(value)?;
                self.parts.private_use = Some(normalize_separators(value));
                return Ok(());
            }
            _ => {
                Field::Singleton.validate(&key)?;
                Field::ExtensionValue.validate(value)?;
                self.parts
                    .singletons
                    .insert_normalized(key, normalize_separators(value));
                return Ok(());
            }
        }
        if !self.parts.singletons.contains_key(&key) {
            self.parts.singletons.insert_normalized(key, String::new());
        }
        Ok(())
    }

    pub fn remove_singleton_subtag(&mut self, key: &str) -> Result<bool> {
        let key = normalize_separators(key);
        let removed = match key.as_str() {
            "t" => {
                let had = self.parts.tlang.is_some() || !self.parts.t_extensions.is_empty();
                self.parts.tlang = None;
                self.parts.t_extensions.clear()?;
                had
            }
            "u" => {
                let had = !self.parts.attributes.is_empty() || !self.parts.u_extensions.is_empty();
                self.parts.attributes.clear()?;
                self.parts.u_extensions.clear()?;
                had
            }
            "x" => self.parts.private_use.take().is_some(),
            _ => false,
        };
        let placeholder = self.parts.singletons.remove(&key)?.is_some();
        Ok(removed || placeholder)
    }

    pub fn as_read_only(&self) -> Arc<LanguageTag> {
        Arc::new(LanguageTag::from_parts(self.parts.clone()))
    }

    pub fn canonicalize(&self, registry: &LocaleRegistry) -> Arc<LanguageTag> {
        registry.canonicalize(&self.as_read_only())
    }
}

impl From<&LanguageTag> for TagBuilder {
    fn from(tag: &LanguageTag) -> Self {
        Self::copy_parts(tag)
    }
}

impl From<&Arc<LanguageTag>> for TagBuilder {
    fn from(tag: &Arc<LanguageTag>) -> Self {
        Self::from_tag(tag)
    }
}

fn reparse_block(singleton: &str, value: &str) -> Result<LanguageTag> {
    let field = if singleton == "t" {
        Field::TransformValue
    } else {
        Field::UnicodeType
    };
    let invalid = || Error::InvalidField {
        field,
        value: value.to_string(),
    };
    let tag = LanguageTag::parse_owned(
        &format!("root-{singleton}-{}", value.trim()),
        ParseOptions::default(),
    )
    .map_err(|_| invalid())?;
    if tag.singleton_subtags().len() != 1 {
        return Err(invalid());
    }
    Ok(tag)
}
