use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct CountingProvider {
    alias_builds: Arc<AtomicUsize>,
    likely_builds: Arc<AtomicUsize>,
}

impl LocaleDataProvider for CountingProvider {
    fn aliases(&self, kind: &AliasKind) -> Vec<(String, String)> {
        self.alias_builds.fetch_add(1, Ordering::SeqCst);
        match kind {
            AliasKind::Language => vec![("iw".to_string(), "he".to_string())],
            _ => Vec::new(),
        }
    }

    fn likely_subtags(&self) -> Vec<(String, String)> {
        self.likely_builds.fetch_add(1, Ordering::SeqCst);
        vec![
            ("he".to_string(), "he-Hebr-IL".to_string()),
            ("und".to_string(), "en-Latn-US".to_string()),
            ("bad".to_string(), "not a tag".to_string()),
        ]
    }

    fn parent_locales(&self) -> Vec<ParentLocaleEntry> {
        Vec::new()
    }

    fn plural_rules(&self, _rule_type: PluralRuleType) -> Vec<PluralRuleEntry> {
        vec![PluralRuleEntry {
            locales: vec!["he".to_string()],
            rules: vec![("one".to_string(), "n = ".to_string())],
        }]
    }

    fn hour_cycles(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn calendar_preferences(&self) -> Vec<(String, Vec<String>)> {
        Vec::new()
    }

    fn region_languages(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

#[test]
fn tables_are_built_once_per_kind() -> Result<()> {
    let provider = CountingProvider::default();
    let alias_builds = Arc::clone(&provider.alias_builds);
    let likely_builds = Arc::clone(&provider.likely_builds);
    let registry = LocaleRegistry::new(provider);

    for _ in 0..3 {
        assert_eq!(
            registry.lookup_alias(&AliasKind::Language, "IW"),
            Some("he".to_string())
        );
        assert!(registry.likely_subtags("he").is_some());
    }
    assert_eq!(alias_builds.load(Ordering::SeqCst), 1);
    assert_eq!(likely_builds.load(Ordering::SeqCst), 1);

    assert_eq!(registry.lookup_alias(&AliasKind::Script, "Qaai"), None);
    assert_eq!(
        registry.lookup_alias(&AliasKind::ExtensionKey("ca".to_string()), "islamicc"),
        None
    );
    assert_eq!(
        registry.lookup_alias(&AliasKind::ExtensionKey("ca".to_string()), "buddhist"),
        None
    );
    assert_eq!(alias_builds.load(Ordering::SeqCst), 3);
    Ok(())
}

#[test]
fn custom_provider_skips_bad_entries_lazily() -> Result<()> {
    let registry = LocaleRegistry::new(CountingProvider::default());
    assert!(registry.likely_subtags("bad").is_none());
    assert_eq!(
        LanguageTag::parse("iw")?.maximize(&registry).as_str(),
        "he-Hebr-IL"
    );
    let rules = registry.plural_rules("he", PluralRuleType::Cardinal);
    assert_eq!(rules.select(1u64), PluralCategory::Other);

    let debug = format!("{registry:?}");
    assert!(debug.contains("LocaleRegistry"));
    assert!(debug.contains("en-US"));
    Ok(())
}

#[test]
fn alias_resolution_defaults_casing_per_kind() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(registry.lookup_alias(&AliasKind::Language, "IW"), Some("he".to_string()));
    assert_eq!(registry.lookup_alias(&AliasKind::Language, "en"), None);
    assert_eq!(registry.resolve_alias(&AliasKind::Language, "EN"), "en");
    assert_eq!(registry.resolve_alias(&AliasKind::Script, "latn"), "Latn");
    assert_eq!(registry.resolve_alias(&AliasKind::Script, "qaai"), "Zinh");
    assert_eq!(registry.resolve_alias(&AliasKind::Region, "us"), "US");
    assert_eq!(registry.resolve_alias(&AliasKind::Region, "uk"), "GB");
    assert_eq!(registry.resolve_alias(&AliasKind::Variant, "HEPLOC"), "alalc97");
    assert_eq!(
        registry.resolve_alias(&AliasKind::ExtensionKey("ca".to_string()), "ISLAMICC"),
        "islamic-civil"
    );
    assert_eq!(
        registry.resolve_alias(&AliasKind::ExtensionKey("zz".to_string()), "Value"),
        "value"
    );
    Ok(())
}

#[test]
fn parent_locales_use_overrides_then_truncation() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(registry.parent_locale("en-GB").as_deref(), Some("en-001"));
    assert_eq!(registry.parent_locale("en_gb").as_deref(), Some("en-001"));
    assert_eq!(registry.parent_locale("en-001").as_deref(), Some("en"));
    assert_eq!(registry.parent_locale("en").as_deref(), Some("root"));
    assert_eq!(registry.parent_locale("root"), None);
    assert_eq!(registry.parent_locale("zh-Hant-HK").as_deref(), Some("zh-Hant"));
    assert_eq!(registry.parent_locale("zh-Hant").as_deref(), Some("root"));
    assert_eq!(
        registry.parent_locale("de-DE-u-co-phonebk").as_deref(),
        Some("de-DE-u-co")
    );
    assert_eq!(registry.parent_locale("de-DE-u-co").as_deref(), Some("de-DE"));
    Ok(())
}

#[test]
fn fallback_chain_ends_at_root() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(
        registry.fallback_chain("es-MX"),
        strings(["es-419", "es", "root"])
    );
    assert_eq!(
        registry.fallback_chain("zh-Hant-HK"),
        strings(["zh-Hant", "root"])
    );
    assert_eq!(registry.fallback_chain("root"), Vec::<String>::new());
    Ok(())
}

#[test]
fn region_preferences_fall_back_to_world() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(registry.default_hour_cycle("us"), Some("h12"));
    assert_eq!(registry.default_hour_cycle("DE"), Some("h23"));
    assert_eq!(registry.default_hour_cycle("ZZ"), Some("h23"));
    assert_eq!(
        registry.preferred_calendars("TH"),
        strings(["buddhist", "gregorian"]).as_slice()
    );
    assert_eq!(
        registry.preferred_calendars("BR"),
        strings(["gregorian"]).as_slice()
    );
    assert_eq!(registry.default_language("jp"), Some("ja"));
    assert_eq!(registry.default_language("ZZ"), None);
    Ok(())
}

#[test]
fn likely_subtag_lookup_is_case_insensitive() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(
        registry.likely_subtags("ZH_tw").map(|tag| tag.as_str().to_string()),
        Some("zh-Hant-TW".to_string())
    );
    assert!(registry.likely_subtags("qq").is_none());
    Ok(())
}

#[test]
fn malformed_locale_data_fails_at_load() {
    for json in [
        r#"{ "likelySubtags": { "en": "not a tag" } }"#,
        r#"{ "likelySubtags": { "en--": "en-Latn-US" } }"#,
        r#"{ "parentLocales": [ { "locales": ["en-GB"], "parent": "??" } ] }"#,
        r#"{ "pluralRules": { "cardinal": [ { "locales": ["xx"], "rules": [["one", "n % 0 = 1"]] } ] } }"#,
        r#"{ "pluralRules": { "ordinal": [ { "locales": ["xx"], "rules": [["most", "n = 1"]] } ] } }"#,
        r#"{ "languageAliases": [] }"#,
        "not json",
    ] {
        match LocaleData::from_json(json) {
            Err(Error::Data(message)) => assert!(!message.is_empty()),
            other => panic!("expected data error for {json}, got: {other:?}"),
        }
    }
}

#[test]
fn empty_document_is_valid_data() -> Result<()> {
    let data = LocaleData::from_json("{}")?;
    assert_eq!(data, LocaleData::default());
    let registry = LocaleRegistry::new(data);
    assert_eq!(LanguageTag::parse("en")?.maximize(&registry).as_str(), "en");
    assert_eq!(registry.default_hour_cycle("US"), None);
    assert!(registry.preferred_calendars("US").is_empty());
    Ok(())
}

#[test]
fn registry_config_defaults_and_overrides() -> Result<()> {
    assert_eq!(RegistryConfig::default().default_locale, "en-US");
    let registry = LocaleRegistry::with_config(
        LocaleData::bundled()?,
        RegistryConfig {
            default_locale: "de-CH".to_string(),
        },
    );
    assert_eq!(registry.default_locale(), "de-CH");
    assert_eq!(registry.config().default_locale, "de-CH");

    let registry = bundled_registry()?.with_default_locale("JA_jp")?;
    assert_eq!(registry.default_locale(), "ja-JP");
    assert!(matches!(
        bundled_registry()?.with_default_locale("??"),
        Err(Error::Format(_))
    ));
    Ok(())
}

#[test]
fn parse_canonical_and_queries() -> Result<()> {
    let registry = bundled_registry()?;
    let tag = registry.parse_canonical("iw_il", ParseOptions::default())?;
    assert_eq!(tag.as_str(), "he-IL");
    assert!(registry.is_canonical(&tag));
    assert!(!registry.is_maximal(&tag));
    assert!(registry.is_minimal(&LanguageTag::parse("he")?));
    assert!(matches!(
        registry.parse_canonical("en--", ParseOptions::default()),
        Err(Error::Format(_))
    ));
    Ok(())
}

#[test]
fn registry_is_shared_across_threads() -> Result<()> {
    let registry = bundled_registry()?;
    let results = std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    LanguageTag::parse("iw-SU")
                        .map(|tag| tag.maximize(&registry).as_str().to_string())
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|_| Err(Error::Data("thread panicked".into()))))
            .collect::<Result<Vec<_>>>()
    })?;
    assert!(results.iter().all(|text| text == "he-Hebr-RU"));
    Ok(())
}
