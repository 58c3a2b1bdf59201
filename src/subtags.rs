use super::*;
use crate::grammar::normalize_separators;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubtagOrder {
    #[default]
    Insertion,
    Sorted,
}

/// Case-insensitive ordered set of subtags. Values are stored lowercased.
#[derive(Debug, Clone, Default)]
pub struct SubtagSet {
    items: Vec<String>,
    order: SubtagOrder,
    field: Option<Field>,
    read_only: bool,
}

impl SubtagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sorted() -> Self {
        Self {
            order: SubtagOrder::Sorted,
            ..Self::default()
        }
    }

    pub(crate) fn for_field(field: Field) -> Self {
        Self {
            field: Some(field),
            ..Self::default()
        }
    }

    pub fn order(&self) -> SubtagOrder {
        self.order
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.position(value).is_some()
    }

    pub fn get(&self, index: usize) -> Result<&str> {
        self.items
            .get(index)
            .map(String::as_str)
            .ok_or(Error::OutOfRange {
                index,
                len: self.items.len(),
            })
    }

    pub fn insert(&mut self, value: &str) -> Result<bool> {
        self.ensure_writable()?;
        let value = self.checked(value)?;
        if self.position(&value).is_some() {
            return Ok(false);
        }
        self.push_normalized(value);
        Ok(true)
    }

    pub fn remove(&mut self, value: &str) -> Result<bool> {
        self.ensure_writable()?;
        match self.position(value) {
            Some(index) => {
                self.items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set(&mut self, index: usize, value: &str) -> Result<()> {
        self.ensure_writable()?;
        if index >= self.items.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let value = self.checked(value)?;
        if let Some(existing) = self.position(&value) {
            if existing != index {
                self.items.remove(index);
                return Ok(());
            }
        }
        self.items[index] = value;
        if self.order == SubtagOrder::Sorted {
            self.items.sort();
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.items.clear();
        Ok(())
    }

    pub(crate) fn push_normalized(&mut self, value: String) {
        match self.order {
            SubtagOrder::Insertion => self.items.push(value),
            SubtagOrder::Sorted => {
                let at = self.items.partition_point(|item| item.as_str() < value.as_str());
                self.items.insert(at, value);
            }
        }
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&String) -> bool) {
        self.items.retain(keep);
    }

    pub(crate) fn to_sorted(&self) -> Self {
        let mut items = self.items.clone();
        items.sort();
        items.dedup();
        Self {
            items,
            order: SubtagOrder::Sorted,
            field: self.field,
            read_only: false,
        }
    }

    pub(crate) fn emptied(&self) -> Self {
        Self {
            items: Vec::new(),
            order: self.order,
            field: self.field,
            read_only: false,
        }
    }

    pub(crate) fn frozen(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub(crate) fn thawed(&self) -> Self {
        Self {
            items: self.items.clone(),
            order: SubtagOrder::Insertion,
            field: self.field,
            read_only: false,
        }
    }

    fn position(&self, value: &str) -> Option<usize> {
        let value = normalize_separators(value);
        self.items.iter().position(|item| *item == value)
    }

    fn checked(&self, value: &str) -> Result<String> {
        if let Some(field) = self.field {
            field.validate(value)?;
        }
        Ok(normalize_separators(value))
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly("subtag set".into()));
        }
        Ok(())
    }
}

impl PartialEq for SubtagSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for SubtagSet {}

/// Case-insensitive ordered map from subtag key to value. Keys and values are
/// stored lowercased with `-` separators.
#[derive(Debug, Clone, Default)]
pub struct SubtagMap {
    entries: Vec<(String, String)>,
    order: SubtagOrder,
    key_field: Option<Field>,
    value_field: Option<Field>,
    read_only: bool,
}

impl SubtagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sorted() -> Self {
        Self {
            order: SubtagOrder::Sorted,
            ..Self::default()
        }
    }

    pub(crate) fn for_fields(key_field: Field, value_field: Field) -> Self {
        Self {
            key_field: Some(key_field),
            value_field: Some(value_field),
            ..Self::default()
        }
    }

    pub fn order(&self) -> SubtagOrder {
        self.order
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key)
            .map(|index| self.entries[index].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get_index(&self, index: usize) -> Result<(&str, &str)> {
        self.entries
            .get(index)
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .ok_or(Error::OutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn insert(&mut self, key: &str, value: &str) -> Result<Option<String>> {
        self.ensure_writable()?;
        if let Some(field) = self.key_field {
            field.validate(key)?;
        }
        if let Some(field) = self.value_field {
            field.validate(value)?;
        }
        Ok(self.insert_normalized(normalize_separators(key), normalize_separators(value)))
    }

    pub fn set_index(&mut self, index: usize, value: &str) -> Result<()> {
        self.ensure_writable()?;
        if index >= self.entries.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        if let Some(field) = self.value_field {
            field.validate(value)?;
        }
        self.entries[index].1 = normalize_separators(value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<String>> {
        self.ensure_writable()?;
        Ok(self
            .position(key)
            .map(|index| self.entries.remove(index).1))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.entries.clear();
        Ok(())
    }

    pub(crate) fn insert_normalized(&mut self, key: String, value: String) -> Option<String> {
        if let Some(index) = self.position(&key) {
            return Some(std::mem::replace(&mut self.entries[index].1, value));
        }
        match self.order {
            SubtagOrder::Insertion => self.entries.push((key, value)),
            SubtagOrder::Sorted => {
                let at = self
                    .entries
                    .partition_point(|(existing, _)| existing.as_str() < key.as_str());
                self.entries.insert(at, (key, value));
            }
        }
        None
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.entries
            .iter_mut()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub(crate) fn to_sorted(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            entries,
            order: SubtagOrder::Sorted,
            key_field: self.key_field,
            value_field: self.value_field,
            read_only: false,
        }
    }

    pub(crate) fn frozen(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub(crate) fn thawed(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            order: SubtagOrder::Insertion,
            key_field: self.key_field,
            value_field: self.value_field,
            read_only: false,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        let key = normalize_separators(key);
        self.entries.iter().position(|(existing, _)| *existing == key)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly("subtag map".into()));
        }
        Ok(())
    }
}

impl PartialEq for SubtagMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for SubtagMap {}
