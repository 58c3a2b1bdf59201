use super::*;
use crate::grammar::title_case;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AliasKind {
    Language,
    Script,
    Region,
    Variant,
    ExtensionKey(String),
}

impl AliasKind {
    fn default_form(&self, value: &str) -> String {
        match self {
            Self::Script => title_case(value),
            Self::Region => value.to_ascii_uppercase(),
            Self::Language | Self::Variant | Self::ExtensionKey(_) => value.to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub default_locale: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
        }
    }
}

type AliasTable = HashMap<String, String>;

/// Owns the locale-data provider and every table and memo derived from it.
///
/// Tables are built on first use and are read-only afterwards. Two threads
/// touching a table for the first time may both build it; the builds are
/// pure functions of the provider, so whichever lands is equivalent.
pub struct LocaleRegistry {
    provider: Box<dyn LocaleDataProvider>,
    config: RegistryConfig,
    aliases: RwLock<HashMap<AliasKind, Arc<AliasTable>>>,
    likely_subtags: OnceLock<HashMap<String, Arc<LanguageTag>>>,
    parent_locales: OnceLock<HashMap<String, String>>,
    plural_tables: OnceLock<HashMap<(String, PluralRuleType), Arc<PluralRules>>>,
    hour_cycles: OnceLock<HashMap<String, String>>,
    calendar_preferences: OnceLock<HashMap<String, Vec<String>>>,
    region_languages: OnceLock<HashMap<String, String>>,
    pub(crate) canonical_cache: RwLock<HashMap<String, Arc<LanguageTag>>>,
    pub(crate) maximal_cache: RwLock<HashMap<String, Arc<LanguageTag>>>,
    pub(crate) minimal_cache: RwLock<HashMap<String, Arc<LanguageTag>>>,
    plural_cache: RwLock<HashMap<(String, PluralRuleType), Arc<PluralRules>>>,
}

impl fmt::Debug for LocaleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LocaleRegistry {
    pub fn new(provider: impl LocaleDataProvider + 'static) -> Self {
        Self::with_config(provider, RegistryConfig::default())
    }

    pub fn with_config(provider: impl LocaleDataProvider + 'static, config: RegistryConfig) -> Self {
        Self {
            provider: Box::new(provider),
            config,
            aliases: RwLock::new(HashMap::new()),
            likely_subtags: OnceLock::new(),
            parent_locales: OnceLock::new(),
            plural_tables: OnceLock::new(),
            hour_cycles: OnceLock::new(),
            calendar_preferences: OnceLock::new(),
            region_languages: OnceLock::new(),
            canonical_cache: RwLock::new(HashMap::new()),
            maximal_cache: RwLock::new(HashMap::new()),
            minimal_cache: RwLock::new(HashMap::new()),
            plural_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_bundled_data() -> Result<Self> {
        Ok(Self::new(LocaleData::bundled()?))
    }

    pub fn with_default_locale(mut self, locale: &str) -> Result<Self> {
        self.config.default_locale = LanguageTag::parse(locale)?.as_str().to_string();
        Ok(self)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    pub fn matcher(&self) -> LocaleMatcher<'_> {
        LocaleMatcher::new(self)
    }

    fn alias_table(&self, kind: &AliasKind) -> Arc<AliasTable> {
        if let Some(table) = read_lock(&self.aliases).get(kind) {
            return Arc::clone(table);
        }
        let table = Arc::new(
            self.provider
                .aliases(kind)
                .into_iter()
                .map(|(from, to)| (from.to_ascii_lowercase().replace('_', "-"), to))
                .collect::<AliasTable>(),
        );
        debug!(kind = ?kind, entries = table.len(), "built alias table");
        let mut tables = write_lock(&self.aliases);
        Arc::clone(tables.entry(kind.clone()).or_insert(table))
    }

    /// Alias replacement for `value`, or `None` when the table has no entry.
    pub fn lookup_alias(&self, kind: &AliasKind, value: &str) -> Option<String> {
        self.alias_table(kind)
            .get(&value.to_ascii_lowercase().replace('_', "-"))
            .cloned()
    }

    /// Alias replacement for `value`, or `value` in the kind's default casing.
    pub fn resolve_alias(&self, kind: &AliasKind, value: &str) -> String {
        self.lookup_alias(kind, value)
            .unwrap_or_else(|| kind.default_form(value))
    }

    pub(crate) fn likely_table(&self) -> &HashMap<String, Arc<LanguageTag>> {
        self.likely_subtags.get_or_init(|| {
            let mut table = HashMap::new();
            for (from, to) in self.provider.likely_subtags() {
                match LanguageTag::parse(&to) {
                    Ok(tag) => {
                        table.insert(from.to_ascii_lowercase().replace('_', "-"), tag);
                    }
                    Err(err) => warn!(from = %from, to = %to, error = %err, "skipping likely subtags entry"),
                }
            }
            debug!(entries = table.len(), "built likely subtags table");
            table
        })
    }

    pub fn likely_subtags(&self, key: &str) -> Option<Arc<LanguageTag>> {
        self.likely_table()
            .get(&key.to_ascii_lowercase().replace('_', "-"))
            .cloned()
    }

    fn parent_table(&self) -> &HashMap<String, String> {
        self.parent_locales.get_or_init(|| {
            let mut table = HashMap::new();
            for entry in self.provider.parent_locales() {
                for locale in entry.locales {
                    table.insert(locale.to_ascii_lowercase(), entry.parent.clone());
                }
            }
            debug!(entries = table.len(), "built parent locale table");
            table
        })
    }

    /// The fallback parent of `locale`, or `None` for `root`.
    pub fn parent_locale(&self, locale: &str) -> Option<String> {
        let locale = locale.trim().replace('_', "-");
        if locale.is_empty() || locale.eq_ignore_ascii_case("root") {
            return None;
        }
        if let Some(parent) = self.parent_table().get(&locale.to_ascii_lowercase()) {
            return Some(parent.clone());
        }
        match truncate_last_subtag(&locale) {
            Some(parent) => Some(parent.to_string()),
            None => Some("root".to_string()),
        }
    }

    /// Every ancestor of `locale`, nearest first, ending with `root`.
    pub fn fallback_chain(&self, locale: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = locale.to_string();
        while let Some(parent) = self.parent_locale(&current) {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }

    fn plural_table(&self) -> &HashMap<(String, PluralRuleType), Arc<PluralRules>> {
        self.plural_tables.get_or_init(|| {
            let mut table = HashMap::new();
            for rule_type in [PluralRuleType::Cardinal, PluralRuleType::Ordinal] {
                for entry in self.provider.plural_rules(rule_type) {
                    let rules = match PluralRules::compile(&entry.rules) {
                        Ok(rules) => Arc::new(rules),
                        Err(err) => {
                            warn!(locales = ?entry.locales, error = %err, "skipping plural rules");
                            continue;
                        }
                    };
                    for locale in entry.locales {
                        table.insert((locale.to_ascii_lowercase(), rule_type), Arc::clone(&rules));
                    }
                }
            }
            debug!(entries = table.len(), "built plural rule table");
            table
        })
    }

    /// Plural rules for `locale`, walking the parent chain when the locale
    /// itself has none. Locales with no rules anywhere on the chain get a
    /// rule set that only yields `other`.
    pub fn plural_rules(&self, locale: &str, rule_type: PluralRuleType) -> Arc<PluralRules> {
        let key = (locale.to_ascii_lowercase().replace('_', "-"), rule_type);
        if let Some(rules) = read_lock(&self.plural_cache).get(&key) {
            return Arc::clone(rules);
        }

        let table = self.plural_table();
        let rules = std::iter::once(key.0.clone())
            .chain(self.fallback_chain(&key.0))
            .find_map(|candidate| table.get(&(candidate.to_ascii_lowercase(), rule_type)))
            .cloned()
            .unwrap_or_default();

        let mut cache = write_lock(&self.plural_cache);
        Arc::clone(cache.entry(key).or_insert(rules))
    }

    /// Preferred hour cycle (`h11`, `h12`, `h23` or `h24`) for a region,
    /// falling back to the world (`001`) entry.
    pub fn default_hour_cycle(&self, region: &str) -> Option<&str> {
        let table = self.hour_cycles.get_or_init(|| {
            let table = uppercase_keys(self.provider.hour_cycles());
            debug!(entries = table.len(), "built hour cycle table");
            table
        });
        table
            .get(&region.to_ascii_uppercase())
            .or_else(|| table.get("001"))
            .map(String::as_str)
    }

    pub fn preferred_calendars(&self, region: &str) -> &[String] {
        let table = self.calendar_preferences.get_or_init(|| {
            let table = uppercase_keys(self.provider.calendar_preferences());
            debug!(entries = table.len(), "built calendar preference table");
            table
        });
        table
            .get(&region.to_ascii_uppercase())
            .or_else(|| table.get("001"))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn default_language(&self, region: &str) -> Option<&str> {
        self.region_languages
            .get_or_init(|| {
                let table = uppercase_keys(self.provider.region_languages());
                debug!(entries = table.len(), "built region language table");
                table
            })
            .get(&region.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Parses `text` and returns its canonical form, consulting the canonical
    /// cache before parsing.
    pub fn parse_canonical(&self, text: &str, options: ParseOptions) -> Result<Arc<LanguageTag>> {
        let key = cache_key(text);
        if let Some(tag) = read_lock(&self.canonical_cache).get(&key) {
            trace!(key = %key, "canonical cache hit");
            return Ok(Arc::clone(tag));
        }
        let tag = LanguageTag::parse_with(text, options)?;
        Ok(self.canonicalize(&tag))
    }

    pub fn is_canonical(&self, tag: &Arc<LanguageTag>) -> bool {
        *self.canonicalize(tag) == **tag
    }

    pub fn is_maximal(&self, tag: &Arc<LanguageTag>) -> bool {
        *self.maximize(tag) == **tag
    }

    pub fn is_minimal(&self, tag: &Arc<LanguageTag>) -> bool {
        *self.minimize(tag) == **tag
    }
}

pub(crate) fn cache_key(text: &str) -> String {
    text.trim().replace('_', "-").to_ascii_lowercase()
}

/// Drops the last subtag; when the subtag before it is a singleton, that
/// singleton goes too.
pub(crate) fn truncate_last_subtag(locale: &str) -> Option<&str> {
    let mut pos = locale.rfind('-')?;
    if pos >= 2 && locale.as_bytes()[pos - 2] == b'-' {
        pos -= 2;
    }
    Some(&locale[..pos])
}

fn uppercase_keys<V>(entries: Vec<(String, V)>) -> HashMap<String, V> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_ascii_uppercase(), value))
        .collect()
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
