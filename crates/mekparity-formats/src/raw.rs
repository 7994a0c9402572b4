//! Transient field map produced by both tokenizers.

use indexmap::IndexMap;
use mekparity_canonical::MechLocation;

/// Raw value of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Single text value.
    Scalar(String),
    /// Ordered list, from a repeated key or a list-valued tag.
    List(Vec<String>),
    /// Multi-line value whose every line is a number.
    Numbers(Vec<f64>),
}

impl RawValue {
    /// First text value, if the value is textual.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            RawValue::Scalar(s) => Some(s),
            RawValue::List(items) => items.first().map(String::as_str),
            RawValue::Numbers(_) => None,
        }
    }
}

/// One equipment entry as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEquipment {
    /// Location taken from the enclosing block; `None` when the entry
    /// carries its own location (`name, location`).
    pub location: Option<String>,
    /// Entry text.
    pub entry: String,
}

/// Ordered, case-insensitive field map plus slot blocks and equipment.
#[derive(Debug, Clone, Default)]
pub struct RawFieldMap {
    fields: IndexMap<String, (String, RawValue)>,
    /// Slot blocks by location, `None` for an empty slot.
    pub locations: IndexMap<MechLocation, Vec<Option<String>>>,
    /// Equipment entries in source order.
    pub equipment: Vec<RawEquipment>,
}

impl RawFieldMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a scalar; a repeated key turns the value into a list.
    pub fn push_scalar(&mut self, key: &str, value: &str) {
        let lookup = key.trim().to_ascii_lowercase();
        match self.fields.get_mut(&lookup) {
            Some((_, existing)) => {
                let next = match std::mem::replace(existing, RawValue::List(Vec::new())) {
                    RawValue::Scalar(first) => vec![first, value.to_string()],
                    RawValue::List(mut items) => {
                        items.push(value.to_string());
                        items
                    }
                    RawValue::Numbers(numbers) => {
                        let mut items: Vec<String> =
                            numbers.iter().map(|n| n.to_string()).collect();
                        items.push(value.to_string());
                        items
                    }
                };
                *existing = RawValue::List(next);
            }
            None => {
                self.fields.insert(
                    lookup,
                    (key.trim().to_string(), RawValue::Scalar(value.to_string())),
                );
            }
        }
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: &str, value: RawValue) {
        self.fields.insert(
            key.trim().to_ascii_lowercase(),
            (key.trim().to_string(), value),
        );
    }

    /// Raw value for `key`, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields
            .get(&key.to_ascii_lowercase())
            .map(|(_, value)| value)
    }

    /// Returns true if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Trimmed first text value for `key`, `None` if absent.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RawValue::as_scalar).map(str::trim)
    }

    /// Trimmed text value for `key`, `None` if absent or blank.
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.scalar(key).filter(|s| !s.is_empty())
    }

    /// Every text value for `key` in source order.
    pub fn list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key).map(|value| match value {
            RawValue::Scalar(s) => vec![s.as_str()],
            RawValue::List(items) => items.iter().map(String::as_str).collect(),
            RawValue::Numbers(_) => Vec::new(),
        })
    }

    /// Numeric values for `key`; a numeric scalar yields one element.
    pub fn numbers(&self, key: &str) -> Option<Vec<f64>> {
        match self.get(key)? {
            RawValue::Numbers(numbers) => Some(numbers.clone()),
            RawValue::Scalar(s) => s.trim().parse::<f64>().ok().map(|n| vec![n]),
            RawValue::List(_) => None,
        }
    }

    /// Original-case keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(|(key, _)| key.as_str())
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field, slot block or equipment entry was read.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.locations.is_empty() && self.equipment.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_insensitive() {
        let mut raw = RawFieldMap::new();
        raw.push_scalar("Config", "Biped");
        assert_eq!(raw.scalar("config"), Some("Biped"));
        assert_eq!(raw.scalar("CONFIG"), Some("Biped"));
        assert_eq!(raw.keys().collect::<Vec<_>>(), vec!["Config"]);
    }

    #[test]
    fn repeated_keys_accumulate_in_order() {
        let mut raw = RawFieldMap::new();
        raw.push_scalar("quirk", "command_mech");
        raw.push_scalar("quirk", "rugged_1");
        raw.push_scalar("Quirk", "easy_maintain");
        assert_eq!(
            raw.list("quirk").unwrap(),
            vec!["command_mech", "rugged_1", "easy_maintain"]
        );
        assert_eq!(raw.scalar("quirk"), Some("command_mech"));
    }

    #[test]
    fn numeric_scalar_reads_as_single_number() {
        let mut raw = RawFieldMap::new();
        raw.insert("armor", RawValue::Scalar("12".into()));
        assert_eq!(raw.numbers("armor"), Some(vec![12.0]));
        raw.insert("armor", RawValue::Numbers(vec![1.0, 2.0]));
        assert_eq!(raw.numbers("armor"), Some(vec![1.0, 2.0]));
    }
}
