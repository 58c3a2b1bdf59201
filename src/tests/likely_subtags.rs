use super::*;

fn maximal(registry: &LocaleRegistry, text: &str) -> Result<String> {
    Ok(LanguageTag::parse(text)?.maximize(registry).as_str().to_string())
}

fn minimal(registry: &LocaleRegistry, text: &str) -> Result<String> {
    Ok(LanguageTag::parse(text)?.minimize(registry).as_str().to_string())
}

#[test]
fn maximize_adds_likely_script_and_region() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(maximal(&registry, "en")?, "en-Latn-US");
    assert_eq!(maximal(&registry, "zh-TW")?, "zh-Hant-TW");
    assert_eq!(maximal(&registry, "zh-Hant")?, "zh-Hant-TW");
    assert_eq!(maximal(&registry, "sr-ME")?, "sr-Latn-ME");
    assert_eq!(maximal(&registry, "und")?, "en-Latn-US");
    assert_eq!(maximal(&registry, "und-FR")?, "fr-Latn-FR");
    assert_eq!(maximal(&registry, "und-Cyrl")?, "ru-Cyrl-RU");
    Ok(())
}

#[test]
fn maximize_never_overwrites_present_fields() -> Result<()> {
    let registry = bundled_registry()?;
    let tag = LanguageTag::parse("en-GB")?.maximize(&registry);
    assert_eq!(tag.region(), Some("GB"));
    assert_eq!(tag.as_str(), "en-Latn-GB");
    assert_eq!(maximal(&registry, "sr-Latn")?, "sr-Latn-RS");
    assert_eq!(maximal(&registry, "und-Arab-ME")?, "sr-Arab-ME");
    Ok(())
}

#[test]
fn maximize_canonicalizes_first_and_keeps_extensions() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(maximal(&registry, "iw")?, "he-Hebr-IL");
    assert_eq!(
        maximal(&registry, "en-u-ca-gregory")?,
        "en-Latn-US-u-ca-gregory"
    );
    assert_eq!(maximal(&registry, "de-1901-x-priv")?, "de-Latn-DE-1901-x-priv");
    Ok(())
}

#[test]
fn unknown_language_keeps_its_language_subtag() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(maximal(&registry, "xyz")?, "xyz-Latn-US");
    assert_eq!(maximal(&registry, "xyz-Hant")?, "xyz-Hant-TW");
    assert_eq!(minimal(&registry, "xyz-Hant-TW")?, "xyz-Hant");
    Ok(())
}

#[test]
fn minimize_removes_what_maximize_adds() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(minimal(&registry, "en-Latn-US")?, "en");
    assert_eq!(minimal(&registry, "en-Latn-GB")?, "en-GB");
    assert_eq!(minimal(&registry, "zh-Hant-TW")?, "zh-TW");
    assert_eq!(minimal(&registry, "zh-Hans-CN")?, "zh");
    assert_eq!(minimal(&registry, "sr-Latn-ME")?, "sr-ME");
    assert_eq!(minimal(&registry, "sr-Latn-RS")?, "sr-Latn");
    assert_eq!(minimal(&registry, "und")?, "en");
    Ok(())
}

#[test]
fn minimize_keeps_variants_and_extensions() -> Result<()> {
    let registry = bundled_registry()?;
    assert_eq!(minimal(&registry, "de-Latn-DE-1901")?, "de-1901");
    assert_eq!(
        minimal(&registry, "en-Latn-US-u-ca-gregory-x-priv")?,
        "en-u-ca-gregory-x-priv"
    );
    Ok(())
}

#[test]
fn already_minimal_tag_is_returned_unchanged() -> Result<()> {
    let registry = bundled_registry()?;
    let tag = LanguageTag::parse("en")?;
    assert!(Arc::ptr_eq(&tag, &tag.minimize(&registry)));
    assert!(registry.is_minimal(&tag));
    Ok(())
}

#[test]
fn already_maximal_tag_is_returned_unchanged() -> Result<()> {
    let registry = bundled_registry()?;
    let tag = LanguageTag::parse("en-Latn-US")?;
    assert!(Arc::ptr_eq(&tag, &tag.maximize(&registry)));
    assert!(registry.is_maximal(&tag));
    assert!(!registry.is_minimal(&tag));
    assert!(!registry.is_maximal(&LanguageTag::parse("en")?));
    Ok(())
}

#[test]
fn minimize_then_maximize_is_a_fixed_point() -> Result<()> {
    let registry = bundled_registry()?;
    for text in [
        "en", "en-GB", "zh-Hant", "zh-HK", "sr-Latn", "und-Arab-ME", "sh", "iw-IL", "xyz",
        "pt-PT", "ja-u-ca-japanese",
    ] {
        let max = LanguageTag::parse(text)?.maximize(&registry);
        let round = max.minimize(&registry).maximize(&registry);
        assert_eq!(round, max, "{text}");
    }
    Ok(())
}

#[test]
fn data_with_only_english_mapping_round_trips() -> Result<()> {
    let data = LocaleData::from_json(r#"{ "likelySubtags": { "en": "en-Latn-US" } }"#)?;
    let registry = LocaleRegistry::new(data);
    assert_eq!(maximal(&registry, "en")?, "en-Latn-US");
    assert_eq!(minimal(&registry, "en-Latn-US")?, "en");
    assert_eq!(maximal(&registry, "fr")?, "fr");
    Ok(())
}
