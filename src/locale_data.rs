//! The locale-data collaborator: alias, likely-subtag, parent-locale,
//! plural-rule and region-preference tables.

use super::*;
use serde::Deserialize;
use std::collections::BTreeMap;

const BUNDLED_DATA: &str = include_str!("../data/cldr_subset.json");

/// Raw CLDR tables consumed by [`LocaleRegistry`]. Each method is called at
/// most once per registry, when the corresponding table is first needed.
pub trait LocaleDataProvider: Send + Sync {
    fn aliases(&self, kind: &AliasKind) -> Vec<(String, String)>;
    fn likely_subtags(&self) -> Vec<(String, String)>;
    fn parent_locales(&self) -> Vec<ParentLocaleEntry>;
    fn plural_rules(&self, rule_type: PluralRuleType) -> Vec<PluralRuleEntry>;
    fn hour_cycles(&self) -> Vec<(String, String)>;
    fn calendar_preferences(&self) -> Vec<(String, Vec<String>)>;
    fn region_languages(&self) -> Vec<(String, String)>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParentLocaleEntry {
    pub locales: Vec<String>,
    pub parent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PluralRuleEntry {
    pub locales: Vec<String>,
    pub rules: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct PluralRuleTables {
    #[serde(default)]
    cardinal: Vec<PluralRuleEntry>,
    #[serde(default)]
    ordinal: Vec<PluralRuleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleData {
    #[serde(default)]
    language_aliases: BTreeMap<String, String>,
    #[serde(default)]
    script_aliases: BTreeMap<String, String>,
    #[serde(default)]
    territory_aliases: BTreeMap<String, String>,
    #[serde(default)]
    variant_aliases: BTreeMap<String, String>,
    #[serde(default)]
    extension_aliases: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    likely_subtags: BTreeMap<String, String>,
    #[serde(default)]
    parent_locales: Vec<ParentLocaleEntry>,
    #[serde(default)]
    plural_rules: PluralRuleTables,
    #[serde(default)]
    hour_cycles: BTreeMap<String, String>,
    #[serde(default)]
    calendar_preferences: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    region_languages: BTreeMap<String, String>,
}

impl LocaleData {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DATA)
    }

    /// Deserializes and validates a data document. Every likely-subtag target
    /// and parent locale must parse and every plural rule must compile.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json).map_err(|err| Error::Data(err.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    fn validate(&self) -> Result<()> {
        for (from, to) in &self.likely_subtags {
            LanguageTag::parse(from)
                .and_then(|_| LanguageTag::parse(to))
                .map_err(|err| Error::Data(format!("likely subtags {from} -> {to}: {err}")))?;
        }
        for entry in &self.parent_locales {
            LanguageTag::parse(&entry.parent)
                .map_err(|err| Error::Data(format!("parent locale {}: {err}", entry.parent)))?;
        }
        for entry in self
            .plural_rules
            .cardinal
            .iter()
            .chain(self.plural_rules.ordinal.iter())
        {
            PluralRules::compile(&entry.rules).map_err(|err| {
                Error::Data(format!("plural rules for {}: {err}", entry.locales.join(" ")))
            })?;
        }
        Ok(())
    }
}

fn pairs(map: &BTreeMap<String, String>) -> Vec<(String, String)> {
    map.iter()
        .map(|(from, to)| (from.clone(), to.clone()))
        .collect()
}

impl LocaleDataProvider for LocaleData {
    fn aliases(&self, kind: &AliasKind) -> Vec<(String, String)> {
        match kind {
            AliasKind::Language => pairs(&self.language_aliases),
            AliasKind::Script => pairs(&self.script_aliases),
            AliasKind::Region => pairs(&self.territory_aliases),
            AliasKind::Variant => pairs(&self.variant_aliases),
            AliasKind::ExtensionKey(key) => self
                .extension_aliases
                .get(key.as_str())
                .map(pairs)
                .unwrap_or_default(),
        }
    }

    fn likely_subtags(&self) -> Vec<(String, String)> {
        pairs(&self.likely_subtags)
    }

    fn parent_locales(&self) -> Vec<ParentLocaleEntry> {
        self.parent_locales.clone()
    }

    fn plural_rules(&self, rule_type: PluralRuleType) -> Vec<PluralRuleEntry> {
        match rule_type {
            PluralRuleType::Cardinal => self.plural_rules.cardinal.clone(),
            PluralRuleType::Ordinal => self.plural_rules.ordinal.clone(),
        }
    }

    fn hour_cycles(&self) -> Vec<(String, String)> {
        pairs(&self.hour_cycles)
    }

    fn calendar_preferences(&self) -> Vec<(String, Vec<String>)> {
        self.calendar_preferences
            .iter()
            .map(|(region, calendars)| (region.clone(), calendars.clone()))
            .collect()
    }

    fn region_languages(&self) -> Vec<(String, String)> {
        pairs(&self.region_languages)
    }
}
