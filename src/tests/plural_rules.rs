use super::*;

fn english_cardinal() -> Result<PluralRules> {
    PluralRules::compile(&[("one", "i = 1 and v = 0 @integer 1"), ("other", "")])
}

fn decimal(text: &str) -> Result<PluralOperands> {
    text.parse()
}

#[test]
fn english_cardinal_rules_match() -> Result<()> {
    let rules = english_cardinal()?;
    assert_eq!(rules.select(1u64), PluralCategory::One);
    assert_eq!(rules.select(2u64), PluralCategory::Other);
    assert_eq!(rules.select(0u64), PluralCategory::Other);
    assert_eq!(rules.select(-1i64), PluralCategory::One);
    assert_eq!(rules.select_operands(&decimal("1.0")?), PluralCategory::Other);
    assert_eq!(rules.select(1.5f64), PluralCategory::Other);
    assert_eq!(rules.select(f64::NAN), PluralCategory::Other);
    assert_eq!(
        rules.categories().iter().collect::<Vec<_>>(),
        vec![PluralCategory::One, PluralCategory::Other]
    );
    Ok(())
}

#[test]
fn operands_come_from_decimal_text() -> Result<()> {
    let operands = decimal("1.250")?;
    assert_eq!(operands.i().to_string(), "1");
    assert_eq!(operands.v(), 3);
    assert_eq!(operands.w(), operands.v());
    assert_eq!(operands.f().to_string(), "250");
    assert_eq!(operands.t().to_string(), "25");
    assert!(!operands.is_integer());

    let operands = PluralOperands::from(2.5f64);
    assert_eq!(operands.i().to_string(), "2");
    assert_eq!(operands.v(), 1);
    assert_eq!(operands.f().to_string(), "5");

    let big = decimal("123456789012345678901234567890")?;
    assert_eq!(big.i().to_string(), "123456789012345678901234567890");
    assert!(big.is_integer());

    assert!(matches!(decimal("1.2.3"), Err(Error::PluralRule(_))));
    assert!(matches!(decimal("abc"), Err(Error::PluralRule(_))));
    Ok(())
}

#[test]
fn modulus_and_ranges_follow_declaration_order() -> Result<()> {
    let rules = PluralRules::compile(&[
        ("zero", "n = 0"),
        ("one", "n = 1"),
        ("two", "n = 2"),
        ("few", "n % 100 = 3..10"),
        ("many", "n % 100 = 11..99"),
    ])?;
    for (value, expected) in [
        (0u64, PluralCategory::Zero),
        (1, PluralCategory::One),
        (2, PluralCategory::Two),
        (6, PluralCategory::Few),
        (18, PluralCategory::Many),
        (100, PluralCategory::Other),
        (103, PluralCategory::Few),
        (111, PluralCategory::Many),
    ] {
        assert_eq!(rules.select(value), expected, "{value}");
    }
    assert_eq!(rules.select(1.5f64), PluralCategory::Other);
    assert_eq!(rules.categories().len(), 6);
    Ok(())
}

#[test]
fn or_binds_looser_than_and() -> Result<()> {
    let rules = PluralRules::compile(&[(
        "many",
        "v = 0 and i % 10 = 0 or v = 0 and i % 10 = 5..9 or v = 0 and i % 100 = 11..14",
    )])?;
    assert_eq!(rules.select(10u64), PluralCategory::Many);
    assert_eq!(rules.select(7u64), PluralCategory::Many);
    assert_eq!(rules.select(12u64), PluralCategory::Many);
    assert_eq!(rules.select(21u64), PluralCategory::Other);
    assert_eq!(rules.select_operands(&decimal("10.0")?), PluralCategory::Other);

    let rules = PluralRules::compile(&[("one", "n != 2,4..6 and n % 7 != 0")])?;
    assert_eq!(rules.select(1u64), PluralCategory::One);
    assert_eq!(rules.select(5u64), PluralCategory::Other);
    assert_eq!(rules.select(14u64), PluralCategory::Other);
    Ok(())
}

#[test]
fn compact_exponent_operands_read_as_zero() -> Result<()> {
    let rules = PluralRules::compile(&[
        ("one", "i = 0,1"),
        (
            "many",
            "e = 0 and i != 0 and i % 1000000 = 0 and v = 0 or e != 0..5",
        ),
    ])?;
    assert_eq!(rules.select(1_000_000u64), PluralCategory::Many);
    assert_eq!(rules.select(0u64), PluralCategory::One);
    assert_eq!(rules.select(2u64), PluralCategory::Other);
    assert_eq!(rules.select(1.5f64), PluralCategory::One);
    Ok(())
}

#[test]
fn malformed_rules_fail_to_compile() {
    for (category, rule) in [
        ("one", "n % 0 = 1"),
        ("one", "x = 1"),
        ("one", "n = 5..3"),
        ("one", "n = "),
        ("one", "n == 1"),
        ("one", "n = 1 or"),
        ("one", "@integer 1"),
        ("one", "n = 1 $"),
        ("lots", "n = 1"),
    ] {
        assert!(
            matches!(
                PluralRules::compile(&[(category, rule)]),
                Err(Error::PluralRule(_))
            ),
            "{category}: {rule:?} should not compile"
        );
    }

    assert!(matches!(
        PluralRules::compile(&[("one", "n = 1"), ("one", "n = 2")]),
        Err(Error::PluralRule(_))
    ));
}

#[test]
fn select_range_agrees_only_on_equal_categories() -> Result<()> {
    let registry = bundled_registry()?;
    let ordinal = registry.plural_rules("en-US", PluralRuleType::Ordinal);
    assert_eq!(ordinal.select_range(1u64, 1u64), PluralCategory::One);
    assert_eq!(ordinal.select_range(1u64, 2u64), PluralCategory::Other);
    let arabic = registry.plural_rules("ar-EG", PluralRuleType::Cardinal);
    assert_eq!(arabic.select_range(0u64, 0u64), PluralCategory::Zero);
    Ok(())
}

#[test]
fn registry_plural_rules_follow_locale_data() -> Result<()> {
    let registry = bundled_registry()?;

    let english = registry.plural_rules("en-US", PluralRuleType::Cardinal);
    assert_eq!(english.select(1u64), PluralCategory::One);
    assert_eq!(english.select(3u64), PluralCategory::Other);

    let ordinal = registry.plural_rules("en", PluralRuleType::Ordinal);
    for (value, expected) in [
        (1u64, PluralCategory::One),
        (2, PluralCategory::Two),
        (3, PluralCategory::Few),
        (4, PluralCategory::Other),
        (11, PluralCategory::Other),
        (12, PluralCategory::Other),
        (13, PluralCategory::Other),
        (21, PluralCategory::One),
        (22, PluralCategory::Two),
        (23, PluralCategory::Few),
        (111, PluralCategory::Other),
    ] {
        assert_eq!(ordinal.select(value), expected, "ordinal {value}");
    }

    let russian = registry.plural_rules("ru", PluralRuleType::Cardinal);
    assert_eq!(russian.select(1u64), PluralCategory::One);
    assert_eq!(russian.select(3u64), PluralCategory::Few);
    assert_eq!(russian.select(5u64), PluralCategory::Many);
    assert_eq!(russian.select(11u64), PluralCategory::Many);
    assert_eq!(russian.select(21u64), PluralCategory::One);
    assert_eq!(russian.select(1.5f64), PluralCategory::Other);

    let polish = registry.plural_rules("pl-PL", PluralRuleType::Cardinal);
    assert_eq!(polish.select(0u64), PluralCategory::Many);
    assert_eq!(polish.select(22u64), PluralCategory::Few);
    assert_eq!(polish.select(12u64), PluralCategory::Many);

    let french = registry.plural_rules("fr-CA", PluralRuleType::Cardinal);
    assert_eq!(french.select(0u64), PluralCategory::One);
    assert_eq!(french.select(1.5f64), PluralCategory::One);
    assert_eq!(french.select(2u64), PluralCategory::Other);
    Ok(())
}

#[test]
fn plural_rules_walk_parent_chain_to_other_only() -> Result<()> {
    let registry = bundled_registry()?;
    let british = registry.plural_rules("en-GB", PluralRuleType::Cardinal);
    assert_eq!(british.select(1u64), PluralCategory::One);

    let japanese = registry.plural_rules("ja", PluralRuleType::Cardinal);
    assert_eq!(japanese.select(1u64), PluralCategory::Other);
    assert_eq!(
        japanese.categories().iter().collect::<Vec<_>>(),
        vec![PluralCategory::Other]
    );

    let unknown = registry.plural_rules("xx-YY", PluralRuleType::Ordinal);
    assert_eq!(unknown.select(1u64), PluralCategory::Other);

    let again = registry.plural_rules("EN_us", PluralRuleType::Cardinal);
    assert!(Arc::ptr_eq(&again, &registry.plural_rules("en-US", PluralRuleType::Cardinal)));
    Ok(())
}

#[test]
fn plural_category_names_round_trip() -> Result<()> {
    for category in PluralCategory::ALL {
        assert_eq!(category.as_str().parse::<PluralCategory>()?, category);
        assert_eq!(category.to_string(), category.as_str());
    }
    assert_eq!(PluralRuleType::default(), PluralRuleType::Cardinal);
    assert_eq!(PluralRuleType::Ordinal.as_str(), "ordinal");
    Ok(())
}
