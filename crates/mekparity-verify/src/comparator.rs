//! Round-trip comparator.

use crate::discrepancy::{DiscrepancyRecord, IssueCategory};
use crate::extract::{ComparableUnit, EquipmentKey};
use crate::normalize::{normalize_text, normalize_value, FieldKind};
use crate::result::ValidationResult;
use indexmap::{IndexMap, IndexSet};
use mekparity_canonical::{MechLocation, REAR_ARMOR_ORDER};
use mekparity_formats::Grammar;
use tracing::debug;

/// Slot names classified as actuators.
pub const ACTUATORS: &[&str] = &[
    "Shoulder",
    "Upper Arm Actuator",
    "Lower Arm Actuator",
    "Hand Actuator",
    "Hip",
    "Upper Leg Actuator",
    "Lower Leg Actuator",
    "Foot Actuator",
];

const EMPTY: &str = "-Empty-";

/// Returns true if `slot` names an actuator.
pub fn is_actuator(slot: &str) -> bool {
    let slot = slot.trim();
    ACTUATORS.iter().any(|name| name.eq_ignore_ascii_case(slot))
}

struct CuratedField {
    key: &'static str,
    category: IssueCategory,
    kind: FieldKind,
}

const fn curated(key: &'static str, category: IssueCategory, kind: FieldKind) -> CuratedField {
    CuratedField {
        key,
        category,
        kind,
    }
}

const LINE_FIELDS: &[CuratedField] = &[
    curated("chassis", IssueCategory::HeaderMismatch, FieldKind::Text),
    curated("model", IssueCategory::HeaderMismatch, FieldKind::Text),
    curated("config", IssueCategory::HeaderMismatch, FieldKind::Text),
    curated("techbase", IssueCategory::HeaderMismatch, FieldKind::TechBase),
    curated("mass", IssueCategory::HeaderMismatch, FieldKind::Number),
    curated("engine", IssueCategory::EngineMismatch, FieldKind::Engine),
    curated("walk mp", IssueCategory::MovementMismatch, FieldKind::Number),
    curated("jump mp", IssueCategory::MovementMismatch, FieldKind::Number),
    curated("overview", IssueCategory::FluffMismatch, FieldKind::Text),
    curated("capabilities", IssueCategory::FluffMismatch, FieldKind::Text),
    curated("deployment", IssueCategory::FluffMismatch, FieldKind::Text),
    curated("history", IssueCategory::FluffMismatch, FieldKind::Text),
];

const TAG_FIELDS: &[CuratedField] = &[
    curated("name", IssueCategory::HeaderMismatch, FieldKind::Text),
    curated("model", IssueCategory::HeaderMismatch, FieldKind::Text),
    curated("unittype", IssueCategory::HeaderMismatch, FieldKind::Text),
    curated("type", IssueCategory::HeaderMismatch, FieldKind::TechBase),
    curated("tonnage", IssueCategory::HeaderMismatch, FieldKind::Number),
    curated("engine_type", IssueCategory::EngineMismatch, FieldKind::Number),
    curated("cruisemp", IssueCategory::MovementMismatch, FieldKind::Number),
    curated("jumpingmp", IssueCategory::MovementMismatch, FieldKind::Number),
    curated("overview", IssueCategory::FluffMismatch, FieldKind::Text),
    curated("capabilities", IssueCategory::FluffMismatch, FieldKind::Text),
    curated("deployment", IssueCategory::FluffMismatch, FieldKind::Text),
    curated("history", IssueCategory::FluffMismatch, FieldKind::Text),
];

/// Location label for an armor key (`LA armor`, `RTC armor`, `armor[2]`).
fn armor_location(key: &str) -> String {
    let prefix = key.trim_end_matches(" armor");
    if let Some(location) = REAR_ARMOR_ORDER
        .iter()
        .find(|loc| loc.rear_armor_key().is_some_and(|rear| rear.eq_ignore_ascii_case(key)))
    {
        return format!("{} (rear)", location.name());
    }
    MechLocation::from_name(prefix)
        .map(|location| location.name().to_string())
        .unwrap_or_else(|| prefix.to_string())
}

fn is_armor_key(key: &str) -> bool {
    key.ends_with(" armor") || (key.starts_with("armor[") && key.ends_with(']'))
}

fn slot_text(slot: &Option<String>) -> &str {
    slot.as_deref().unwrap_or(EMPTY)
}

/// Drops trailing empty slots.
pub fn trim_trailing_empty(slots: &[Option<String>]) -> &[Option<String>] {
    let end = slots
        .iter()
        .rposition(|slot| slot.as_deref().is_some_and(|s| !s.trim().is_empty()))
        .map_or(0, |index| index + 1);
    &slots[..end]
}

/// Compares the slot arrays of one location.
///
/// Trailing empties are ignored on both sides. A length difference yields
/// one `SLOT_COUNT_MISMATCH`; positions up to the shorter length are then
/// compared one by one.
pub fn compare_slots(
    location: &str,
    original: &[Option<String>],
    generated: &[Option<String>],
) -> Vec<DiscrepancyRecord> {
    let original = trim_trailing_empty(original);
    let generated = trim_trailing_empty(generated);
    let mut found = Vec::new();

    if original.len() != generated.len() {
        found.push(
            DiscrepancyRecord::new(
                IssueCategory::SlotCountMismatch,
                original.len().to_string(),
                generated.len().to_string(),
            )
            .at_location(location),
        );
    }

    for (index, (expected, actual)) in original.iter().zip(generated).enumerate() {
        let (expected, actual) = (slot_text(expected), slot_text(actual));
        if normalize_text(expected) == normalize_text(actual) {
            continue;
        }
        let category = match (is_actuator(expected), is_actuator(actual)) {
            (true, false) => IssueCategory::MissingActuator,
            (false, true) => IssueCategory::ExtraActuator,
            _ => IssueCategory::SlotMismatch,
        };
        found.push(
            DiscrepancyRecord::new(category, expected, actual)
                .at_location(location)
                .at_index(index),
        );
    }
    found
}

/// Compares original and regenerated unit text.
///
/// Stateless; one value can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator;

impl Comparator {
    /// Creates a comparator.
    pub fn new() -> Self {
        Self
    }

    /// Compares two texts in the same grammar.
    ///
    /// Never fails: a side that cannot be tokenized, or that yields no
    /// content, produces a `ParseError` result.
    pub fn compare(&self, grammar: Grammar, original: &str, generated: &str) -> ValidationResult {
        let original = match ComparableUnit::extract(grammar, original) {
            Ok(unit) if !unit.is_empty() => unit,
            Ok(_) => return ValidationResult::parse_error("original: no extractable content"),
            Err(e) => return ValidationResult::parse_error(format!("original: {}", e)),
        };
        let generated = match ComparableUnit::extract(grammar, generated) {
            Ok(unit) if !unit.is_empty() => unit,
            Ok(_) => return ValidationResult::parse_error("generated: no extractable content"),
            Err(e) => return ValidationResult::parse_error(format!("generated: {}", e)),
        };
        let discrepancies = self.compare_units(grammar, &original, &generated);
        debug!(
            grammar = %grammar,
            discrepancies = discrepancies.len(),
            "compared unit texts"
        );
        ValidationResult::from_discrepancies(discrepancies)
    }

    /// Compares two extracted units.
    pub fn compare_units(
        &self,
        grammar: Grammar,
        original: &ComparableUnit,
        generated: &ComparableUnit,
    ) -> Vec<DiscrepancyRecord> {
        let mut found = Vec::new();
        let curated = match grammar {
            Grammar::LineOriented => LINE_FIELDS,
            Grammar::TagBlock => TAG_FIELDS,
        };
        for field in curated {
            compare_field(original, generated, field.key, field.category, field.kind, &mut found);
        }

        let armor_keys: IndexSet<&str> = original
            .fields
            .keys()
            .chain(generated.fields.keys())
            .map(String::as_str)
            .filter(|key| is_armor_key(key))
            .collect();
        for key in armor_keys {
            compare_field(
                original,
                generated,
                key,
                IssueCategory::ArmorMismatch,
                FieldKind::Armor,
                &mut found,
            );
        }

        let locations: IndexSet<&str> = original
            .slots
            .keys()
            .chain(generated.slots.keys())
            .map(String::as_str)
            .collect();
        for location in locations {
            let empty = Vec::new();
            let expected = original.slots.get(location).unwrap_or(&empty);
            let actual = generated.slots.get(location).unwrap_or(&empty);
            found.extend(compare_slots(location, expected, actual));
        }

        compare_equipment(original, generated, &mut found);

        for quirk in original.quirks.difference(&generated.quirks) {
            found.push(
                DiscrepancyRecord::new(IssueCategory::QuirkMismatch, quirk.as_str(), "")
                    .with_suggestion("Quirk from the source was not regenerated"),
            );
        }
        for quirk in generated.quirks.difference(&original.quirks) {
            found.push(
                DiscrepancyRecord::new(IssueCategory::QuirkMismatch, "", quirk.as_str())
                    .with_suggestion("Generated quirk is not in the source"),
            );
        }

        found
    }
}

fn compare_field(
    original: &ComparableUnit,
    generated: &ComparableUnit,
    key: &str,
    category: IssueCategory,
    kind: FieldKind,
    found: &mut Vec<DiscrepancyRecord>,
) {
    let expected = original.field(key).unwrap_or_default();
    let actual = generated.field(key).unwrap_or_default();
    if normalize_value(kind, expected) == normalize_value(kind, actual) {
        return;
    }
    let mut record = DiscrepancyRecord::new(category, expected, actual).for_field(key);
    if category == IssueCategory::ArmorMismatch {
        record = record.at_location(armor_location(key));
    }
    found.push(record);
}

fn compare_equipment(
    original: &ComparableUnit,
    generated: &ComparableUnit,
    found: &mut Vec<DiscrepancyRecord>,
) {
    let mut remaining: IndexMap<&EquipmentKey, usize> = IndexMap::new();
    for (key, _) in &generated.equipment {
        *remaining.entry(key).or_insert(0) += 1;
    }
    for (key, display) in &original.equipment {
        match remaining.get_mut(key) {
            Some(count) if *count > 0 => *count -= 1,
            _ => found.push(
                DiscrepancyRecord::new(IssueCategory::MissingEquipment, display.as_str(), "")
                    .at_location(key.location.as_str()),
            ),
        }
    }

    let mut unmatched: IndexMap<&EquipmentKey, usize> = IndexMap::new();
    for (key, _) in &original.equipment {
        *unmatched.entry(key).or_insert(0) += 1;
    }
    for (key, display) in &generated.equipment {
        match unmatched.get_mut(key) {
            Some(count) if *count > 0 => *count -= 1,
            _ => found.push(
                DiscrepancyRecord::new(IssueCategory::ExtraEquipment, "", display.as_str())
                    .at_location(key.location.as_str()),
            ),
        }
    }
}
