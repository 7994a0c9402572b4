//! Comparable view of a unit file, extracted straight from its text.

use indexmap::{IndexMap, IndexSet};
use mekparity_formats::equipment::{parse_block_entry, parse_line_entry};
use mekparity_formats::{blk_reader, mtf_reader, Grammar, ParseError, RawFieldMap};

/// One equipment entry, keyed for multiset comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EquipmentKey {
    /// Location label, lowercased.
    pub location: String,
    /// Entry name with mount flags, lowercased and whitespace-collapsed.
    pub name: String,
}

/// Fields, slots, equipment and quirk tokens of one unit file.
#[derive(Debug, Clone, Default)]
pub struct ComparableUnit {
    /// Field values by lowercased key; the first occurrence wins.
    pub fields: IndexMap<String, String>,
    /// Slot arrays by location name; `None` is an empty slot.
    pub slots: IndexMap<String, Vec<Option<String>>>,
    /// Equipment entries in source order, with their display text.
    pub equipment: Vec<(EquipmentKey, String)>,
    /// Quirk and weapon-quirk tokens.
    pub quirks: IndexSet<String>,
}

impl ComparableUnit {
    /// Extracts a unit from text in `grammar`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text cannot be tokenized.
    pub fn extract(grammar: Grammar, text: &str) -> Result<Self, ParseError> {
        match grammar {
            Grammar::LineOriented => Ok(Self::from_line_oriented(&mtf_reader::tokenize(text))),
            Grammar::TagBlock => Ok(Self::from_tag_block(&blk_reader::tokenize(text)?)),
        }
    }

    /// Returns true if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.slots.is_empty()
            && self.equipment.is_empty()
            && self.quirks.is_empty()
    }

    /// Field value by lowercased key.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    fn collect_fields(raw: &RawFieldMap) -> IndexMap<String, String> {
        raw.keys()
            .filter_map(|key| {
                raw.scalar(key)
                    .map(|value| (key.to_ascii_lowercase(), value.to_string()))
            })
            .collect()
    }

    fn from_line_oriented(raw: &RawFieldMap) -> Self {
        let mut unit = Self {
            fields: Self::collect_fields(raw),
            ..Self::default()
        };
        for (location, slots) in &raw.locations {
            unit.slots.insert(location.name().to_string(), slots.clone());
        }
        for entry in &raw.equipment {
            let mount = parse_line_entry(&entry.entry);
            unit.push_equipment(&mount.location, &mount.name, mount.rear, &entry.entry);
        }
        for quirk in raw.list("quirk").unwrap_or_default() {
            unit.quirks.insert(quirk.trim().to_string());
        }
        for quirk in raw.list("weaponquirk").unwrap_or_default() {
            unit.quirks.insert(format!("weaponquirk:{}", quirk.trim()));
        }
        unit
    }

    fn from_tag_block(raw: &RawFieldMap) -> Self {
        let mut unit = Self {
            fields: Self::collect_fields(raw),
            ..Self::default()
        };
        for (index, points) in raw.numbers("armor").unwrap_or_default().iter().enumerate() {
            unit.fields.insert(format!("armor[{}]", index), points.to_string());
        }
        for entry in &raw.equipment {
            let location = entry.location.as_deref().unwrap_or_default();
            let mount = parse_block_entry(location, &entry.entry);
            unit.push_equipment(&mount.location, &mount.name, mount.rear, &entry.entry);
        }
        for quirk in raw.list("quirks").unwrap_or_default() {
            unit.quirks.insert(quirk.trim().to_string());
        }
        for quirk in raw.list("weapon_quirks").unwrap_or_default() {
            unit.quirks.insert(format!("weaponquirk:{}", quirk.trim()));
        }
        unit
    }

    fn push_equipment(&mut self, location: &str, name: &str, rear: bool, display: &str) {
        let mut name = crate::normalize::normalize_text(name);
        if rear {
            name.push_str(" (r)");
        }
        self.equipment.push((
            EquipmentKey {
                location: crate::normalize::normalize_text(location),
                name,
            },
            display.trim().to_string(),
        ));
    }
}
