//! Line-oriented grammar reader.
//!
//! A line-oriented unit file is a sequence of `key:value` lines, slot
//! sections opened by a location header (`Left Arm:`), and a `Weapons:N`
//! block of equipment entries. Blank lines close a block.

use crate::equipment::parse_line_entry;
use crate::errors::ParseError;
use crate::format::ParsedUnit;
use crate::raw::{RawEquipment, RawFieldMap};
use indexmap::{IndexMap, IndexSet};
use mekparity_canonical::{
    ArmorType, CanonicalUnitRecord, CockpitType, Configuration, Engine, EngineType, Era,
    FieldNormalizer, Fluff, GyroType, HeatSinkType, HeatSinks, LocationArmor, LocationSlots,
    Movement, NormalizationReport, RulesLevel, StructureType, TechBase, UnitExtras, UnitType,
    Armor, MechLocation,
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Slot entry meaning "nothing mounted".
pub const EMPTY_SLOT: &str = "-Empty-";

/// Scalar keys of the grammar, lower-cased.
///
/// A line inside a slot or equipment block is only treated as a new field
/// when its key is one of these (or an armor key).
pub const KNOWN_KEYS: &[&str] = &[
    "chassis",
    "clanname",
    "model",
    "mul id",
    "config",
    "techbase",
    "era",
    "source",
    "rules level",
    "role",
    "mass",
    "engine",
    "structure",
    "myomer",
    "cockpit",
    "gyro",
    "ejection",
    "lam",
    "motive",
    "heat sinks",
    "base chassis heat sinks",
    "walk mp",
    "jump mp",
    "armor",
    "weapons",
    "overview",
    "capabilities",
    "deployment",
    "history",
    "manufacturer",
    "primaryfactory",
    "systemmanufacturer",
    "systemmode",
    "notes",
    "imagefile",
    "fluffimage",
    "quirk",
    "weaponquirk",
    "nocrit",
];

/// Returns true if `line` starts a new field rather than continuing a block.
pub fn is_section_break(line: &str) -> bool {
    if MechLocation::from_header(line).is_some() {
        return true;
    }
    match line.split_once(':') {
        Some((key, _)) => {
            let key = key.trim().to_ascii_lowercase();
            KNOWN_KEYS.contains(&key.as_str()) || key.ends_with(" armor")
        }
        None => false,
    }
}

/// Returns true for the empty-slot marker, case-insensitively.
pub fn is_empty_slot(entry: &str) -> bool {
    entry.trim().eq_ignore_ascii_case(EMPTY_SLOT)
}

#[derive(Debug, Clone, Copy)]
enum Block {
    None,
    Slots(MechLocation),
    Equipment,
}

/// Tokenizes line-oriented text into a raw field map.
///
/// Comment lines (`#`) are skipped. Unknown keys are kept; lines that are
/// neither fields nor block content are ignored.
pub fn tokenize(text: &str) -> RawFieldMap {
    let mut raw = RawFieldMap::new();
    let mut block = Block::None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            block = Block::None;
            continue;
        }
        if trimmed.starts_with('#') {
            continue;
        }
        if let Some(location) = MechLocation::from_header(trimmed) {
            raw.locations.entry(location).or_default();
            block = Block::Slots(location);
            continue;
        }

        let breaks = is_section_break(trimmed);
        match block {
            Block::Slots(location) if !breaks => {
                let slot = if is_empty_slot(trimmed) {
                    None
                } else {
                    Some(trimmed.to_string())
                };
                raw.locations.entry(location).or_default().push(slot);
                continue;
            }
            Block::Equipment if !breaks => {
                raw.equipment.push(RawEquipment {
                    location: None,
                    entry: trimmed.to_string(),
                });
                continue;
            }
            _ => block = Block::None,
        }

        match trimmed.split_once(':') {
            Some((key, value)) => {
                if key.trim().eq_ignore_ascii_case("weapons") {
                    block = Block::Equipment;
                }
                raw.push_scalar(key, value.trim());
            }
            None => debug!(line = trimmed, "ignoring line outside any block"),
        }
    }

    raw
}

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*(.*)$").expect("invalid regex"))
}

/// Splits `300 Fusion Engine` into `(300, "Fusion Engine")`.
fn split_count(value: &str) -> (u32, &str) {
    match leading_number().captures(value) {
        Some(caps) => {
            let count = caps
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            (count, rest.trim())
        }
        None => (0, value.trim()),
    }
}

/// Parses an armor value, taking the text after the last `:`.
///
/// Negative or unparseable values clamp to zero.
pub fn armor_points(value: &str) -> Option<u32> {
    let value = value.rsplit(':').next().unwrap_or(value).trim();
    match value.parse::<i64>() {
        Ok(points) if points >= 0 => Some(u32::try_from(points).unwrap_or(u32::MAX)),
        _ => None,
    }
}

fn number_field(raw: &RawFieldMap, key: &str, report: &mut NormalizationReport) -> u32 {
    match raw.non_blank(key) {
        Some(value) => match value.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                warn!(field = key, value, "unparseable number, using 0");
                report.bump("invalid_number");
                0
            }
        },
        None => 0,
    }
}

fn text_field(raw: &RawFieldMap, key: &str) -> Option<String> {
    raw.non_blank(key).map(str::to_string)
}

fn armor_field(
    raw: &RawFieldMap,
    key: &str,
    report: &mut NormalizationReport,
) -> Option<u32> {
    let value = raw.scalar(key)?;
    match armor_points(value) {
        Some(points) => Some(points),
        None => {
            warn!(field = key, value, "invalid armor value, clamping to 0");
            report.bump("clamped_armor");
            Some(0)
        }
    }
}

/// Builds a record from a tokenized line-oriented file.
///
/// # Errors
///
/// Returns [`ParseError::MissingFields`] naming every mandatory field
/// (`chassis`, `config`) that is missing or blank.
pub fn build_record(raw: &RawFieldMap) -> Result<ParsedUnit, ParseError> {
    let mut missing = Vec::new();
    if raw.non_blank("chassis").is_none() {
        missing.push("chassis".to_string());
    }
    if raw.non_blank("config").is_none() {
        missing.push("config".to_string());
    }
    let (chassis, config) = match (raw.non_blank("chassis"), raw.non_blank("config")) {
        (Some(chassis), Some(config)) => (chassis, config),
        _ => return Err(ParseError::MissingFields(missing)),
    };

    let mut normalizer = FieldNormalizer::new();
    let mut metrics = NormalizationReport::default();

    let omni = config.to_ascii_lowercase().contains("omnimech");
    let config_text = config
        .split_whitespace()
        .filter(|word| !word.eq_ignore_ascii_case("omnimech"))
        .collect::<Vec<_>>()
        .join(" ");
    let configuration: Configuration = normalizer.field("config", &config_text);
    let unit_type = if omni {
        UnitType::OmniMech
    } else {
        UnitType::BattleMech
    };

    let tech_base: TechBase =
        normalizer.field("techbase", raw.scalar("techbase").unwrap_or_default());
    let rules_level: RulesLevel =
        normalizer.field("rules level", raw.scalar("rules level").unwrap_or_default());
    let year = number_field(raw, "era", &mut metrics);

    let tonnage = match raw.non_blank("mass").map(str::parse::<f64>) {
        Some(Ok(mass)) if mass.is_finite() && mass >= 0.0 => mass,
        Some(_) => {
            warn!(chassis, "invalid mass, using 0");
            metrics.bump("invalid_number");
            0.0
        }
        None => 0.0,
    };

    let (rating, engine_text) = split_count(raw.scalar("engine").unwrap_or_default());
    let engine = Engine {
        engine_type: normalizer.field_in_context::<EngineType>("engine", engine_text, tech_base),
        rating,
    };
    let structure: StructureType = normalizer.field_in_context(
        "structure",
        raw.scalar("structure").unwrap_or_default(),
        tech_base,
    );
    let cockpit: CockpitType = normalizer.field("cockpit", raw.scalar("cockpit").unwrap_or_default());
    let gyro: GyroType = normalizer.field("gyro", raw.scalar("gyro").unwrap_or_default());

    let (sink_count, sink_text) = split_count(raw.scalar("heat sinks").unwrap_or_default());
    let heat_sinks = HeatSinks {
        sink_type: normalizer.field_in_context::<HeatSinkType>("heat sinks", sink_text, tech_base),
        count: sink_count,
    };

    let movement = Movement {
        walk: number_field(raw, "walk mp", &mut metrics),
        jump: number_field(raw, "jump mp", &mut metrics),
    };

    let armor_type: ArmorType = normalizer.field_in_context(
        "armor",
        raw.scalar("armor").unwrap_or_default(),
        tech_base,
    );
    let mut allocation = Vec::new();
    for location in configuration.slot_layout() {
        let front = armor_field(raw, &location.armor_key(), &mut metrics);
        let rear = location
            .rear_armor_key()
            .and_then(|key| armor_field(raw, key, &mut metrics));
        if front.is_some() || rear.is_some() {
            allocation.push(LocationArmor {
                location: location.name().to_string(),
                front: front.unwrap_or(0),
                rear,
            });
        }
    }

    let equipment = raw
        .equipment
        .iter()
        .map(|entry| parse_line_entry(&entry.entry))
        .collect();

    let mut critical_slots = Vec::new();
    for location in configuration.slot_layout() {
        let mut slots = raw.locations.get(location).cloned().unwrap_or_default();
        if slots.len() > location.capacity() {
            warn!(
                chassis,
                location = location.name(),
                len = slots.len(),
                capacity = location.capacity(),
                "slot section over capacity, truncating"
            );
            metrics.bump("truncated_slots");
            slots.truncate(location.capacity());
        }
        critical_slots.push(LocationSlots {
            location: *location,
            slots,
        });
    }
    for location in raw.locations.keys() {
        if !configuration.has_location(*location) {
            warn!(
                chassis,
                location = location.name(),
                configuration = configuration.name(),
                "dropping slot section outside the configuration"
            );
            metrics.bump("foreign_location");
        }
    }

    let quirks = raw
        .list("quirk")
        .map(|items| items.into_iter().map(str::to_string).collect::<IndexSet<_>>());
    let weapon_quirks = raw.list("weaponquirk").map(|items| {
        let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
        for item in items {
            let (quirk, key) = item.split_once(':').unwrap_or((item, ""));
            grouped
                .entry(key.trim().to_string())
                .or_default()
                .push(quirk.trim().to_string());
        }
        grouped
    });

    let fluff = Fluff {
        overview: text_field(raw, "overview"),
        capabilities: text_field(raw, "capabilities"),
        deployment: text_field(raw, "deployment"),
        history: text_field(raw, "history"),
        manufacturer: text_field(raw, "manufacturer"),
        primary_factory: text_field(raw, "primaryfactory"),
        notes: text_field(raw, "notes"),
        system_manufacturers: raw
            .list("systemmanufacturer")
            .map(|items| items.into_iter().map(str::to_string).collect())
            .unwrap_or_default(),
    };

    let extras = UnitExtras {
        source: text_field(raw, "source"),
        mul_id: raw.non_blank("mul id").and_then(|id| id.parse().ok()),
        mixed_chassis: (tech_base == TechBase::Mixed)
            .then(|| raw.scalar("techbase").and_then(TechBase::mixed_chassis))
            .flatten(),
        ..UnitExtras::default()
    };

    let record = CanonicalUnitRecord {
        chassis: chassis.to_string(),
        model: raw.scalar("model").unwrap_or_default().to_string(),
        unit_type,
        configuration,
        omni,
        tech_base,
        rules_level,
        era: Era::from_year(year),
        year,
        tonnage,
        engine,
        structure,
        gyro,
        cockpit,
        armor: Armor {
            armor_type,
            allocation,
        },
        heat_sinks,
        movement,
        equipment,
        critical_slots,
        quirks,
        weapon_quirks,
        fluff,
        extras,
    };
    record.validate()?;

    let mut report = normalizer.finish();
    for (metric, count) in metrics.metrics {
        *report.metrics.entry(metric).or_insert(0) += count;
    }
    debug!(
        chassis = %record.chassis,
        model = %record.model,
        notes = report.notes.len(),
        "built record from line-oriented text"
    );
    Ok(ParsedUnit { record, report })
}

/// Tokenizes and builds a record in one step.
pub fn read_record(text: &str) -> Result<ParsedUnit, ParseError> {
    build_record(&tokenize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_break_requires_known_key() {
        assert!(is_section_break("mass:100"));
        assert!(is_section_break("LA armor:34"));
        assert!(is_section_break("Left Arm:"));
        assert!(!is_section_break("Clan Ammo:Gauss"));
        assert!(!is_section_break("Medium Laser"));
    }

    #[test]
    fn slot_lines_with_colons_stay_in_the_block() {
        let raw = tokenize("Left Arm:\nShoulder\nISAmmo:LRM\n-Empty-\n\nmass:50\n");
        let slots = &raw.locations[&MechLocation::LeftArm];
        assert_eq!(
            slots,
            &vec![Some("Shoulder".into()), Some("ISAmmo:LRM".into()), None]
        );
        assert_eq!(raw.scalar("mass"), Some("50"));
    }

    #[test]
    fn armor_points_clamp() {
        assert_eq!(armor_points("34"), Some(34));
        assert_eq!(armor_points("Reactive(Inner Sphere):26"), Some(26));
        assert_eq!(armor_points("-5"), None);
        assert_eq!(armor_points("lots"), None);
    }

    #[test]
    fn split_count_reads_leading_rating() {
        assert_eq!(split_count("300 Fusion Engine"), (300, "Fusion Engine"));
        assert_eq!(split_count("Fusion"), (0, "Fusion"));
    }
}
