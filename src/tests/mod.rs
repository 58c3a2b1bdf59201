use super::*;

mod likely_subtags;
mod locale_data_and_registry;
mod plural_rules;

fn bundled_registry() -> Result<LocaleRegistry> {
    LocaleRegistry::with_bundled_data()
}

fn strings<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    items.into_iter().map(str::to_string).collect()
}
