//! Tag-block grammar reader.
//!
//! Values live between `<Tag>` and `</Tag>`, usually one tag per line with
//! the value on the lines in between. A small set of tags hold lists; every
//! `<X Equipment>` tag holds one equipment entry per line.

use crate::equipment::parse_block_entry;
use crate::errors::ParseError;
use crate::format::ParsedUnit;
use crate::raw::{RawEquipment, RawFieldMap, RawValue};
use indexmap::{IndexMap, IndexSet};
use mekparity_canonical::{
    tag_armor_label, Armor, ArmorType, CanonicalUnitRecord, CockpitType, Configuration,
    CrewRoles, Engine, EngineType, Era, FieldNormalizer, Fluff, GyroType, HeatSinkType,
    HeatSinks, LocationArmor, Movement, NormalizationReport, RulesLevel, StructureType, TechBase,
    UnitExtras, UnitType,
};
use tracing::{debug, warn};

/// Equipment block tags seen in published files. Any other tag ending in
/// ` Equipment` is still read as a block.
pub const EQUIPMENT_BLOCKS: &[&str] = &[
    "Front Equipment",
    "Right Equipment",
    "Left Equipment",
    "Rear Equipment",
    "Rear Left Equipment",
    "Rear Right Equipment",
    "Turret Equipment",
    "Front Turret Equipment",
    "Rear Turret Equipment",
    "Rotor Equipment",
    "Body Equipment",
    "Nose Equipment",
    "Left Wing Equipment",
    "Right Wing Equipment",
    "Wings Equipment",
    "Aft Equipment",
    "Fuselage Equipment",
    "Hull Equipment",
    "Front Right Equipment",
    "Front Left Equipment",
    "Aft Right Equipment",
    "Aft Left Equipment",
    "Left Broadsides Equipment",
    "Right Broadsides Equipment",
    "Head Equipment",
    "Torso Equipment",
    "Right Arm Equipment",
    "Left Arm Equipment",
    "Legs Equipment",
    "Main Gun Equipment",
    "Center Torso Equipment",
    "Right Torso Equipment",
    "Left Torso Equipment",
    "Right Leg Equipment",
    "Left Leg Equipment",
    "Squad Equipment",
    "Point Equipment",
    "Trooper Equipment",
];

/// Tags whose content is a list of lines.
pub const LIST_TAGS: &[&str] = &["transporters", "quirks", "weapon_quirks"];

const EQUIPMENT_SUFFIX: &str = " equipment";

/// Location named by an equipment block tag, if `tag` is one.
pub fn equipment_block_location(tag: &str) -> Option<&str> {
    let split = tag.len().checked_sub(EQUIPMENT_SUFFIX.len())?;
    let suffix = tag.get(split..)?;
    if !suffix.eq_ignore_ascii_case(EQUIPMENT_SUFFIX) {
        return None;
    }
    let location = tag[..split].trim();
    if location.is_empty() {
        return None;
    }
    if !EQUIPMENT_BLOCKS.iter().any(|block| block.eq_ignore_ascii_case(tag)) {
        debug!(tag, "unlisted equipment block");
    }
    Some(location)
}

fn is_list_tag(tag: &str) -> bool {
    LIST_TAGS.iter().any(|list| list.eq_ignore_ascii_case(tag))
}

/// Opening tag name, if `line` is exactly `<Tag>`.
fn opening_tag(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('<')?.strip_suffix('>')?;
    if inner.starts_with('/') || inner.contains('<') || inner.contains('>') {
        return None;
    }
    Some(inner.trim())
}

/// `(tag, value)` for a single-line `<Tag>value</Tag>`.
fn inline_tag(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('<')?;
    let (tag, rest) = rest.split_once('>')?;
    if tag.starts_with('/') {
        return None;
    }
    let (value, close) = rest.rsplit_once("</")?;
    let close = close.strip_suffix('>')?;
    if !close.trim().eq_ignore_ascii_case(tag.trim()) {
        return None;
    }
    Some((tag.trim(), value.trim()))
}

fn finish_tag(raw: &mut RawFieldMap, tag: &str, lines: Vec<String>) {
    if let Some(location) = equipment_block_location(tag) {
        raw.equipment.extend(lines.into_iter().map(|entry| RawEquipment {
            location: Some(location.to_string()),
            entry,
        }));
        return;
    }
    let value = if is_list_tag(tag) {
        RawValue::List(lines)
    } else if lines.len() > 1 {
        let numbers: Option<Vec<f64>> = lines.iter().map(|l| l.parse::<f64>().ok()).collect();
        match numbers {
            Some(numbers) => RawValue::Numbers(numbers),
            None => RawValue::Scalar(lines.join("\n")),
        }
    } else {
        RawValue::Scalar(lines.into_iter().next().unwrap_or_default())
    };
    if raw.contains(tag) {
        debug!(tag, "duplicate tag, keeping the last value");
    }
    raw.insert(tag, value);
}

/// Tokenizes tag-block text into a raw field map.
///
/// # Errors
///
/// Returns [`ParseError::UnterminatedTag`] if a tag is still open at the
/// end of the input.
pub fn tokenize(text: &str) -> Result<RawFieldMap, ParseError> {
    let mut raw = RawFieldMap::new();
    let mut open: Option<(String, usize, Vec<String>)> = None;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if let Some((tag, opened_at, mut lines)) = open.take() {
            let is_close = trimmed
                .strip_prefix("</")
                .and_then(|rest| rest.strip_suffix('>'))
                .is_some_and(|name| name.trim().eq_ignore_ascii_case(&tag));
            if is_close {
                finish_tag(&mut raw, &tag, lines);
            } else {
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
                open = Some((tag, opened_at, lines));
            }
            continue;
        }

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((tag, value)) = inline_tag(trimmed) {
            let lines = if value.is_empty() {
                Vec::new()
            } else {
                vec![value.to_string()]
            };
            finish_tag(&mut raw, tag, lines);
        } else if let Some(tag) = opening_tag(trimmed) {
            open = Some((tag.to_string(), index + 1, Vec::new()));
        } else {
            debug!(line = trimmed, "ignoring text outside any tag");
        }
    }

    match open {
        Some((tag, line, _)) => Err(ParseError::UnterminatedTag { tag, line }),
        None => Ok(raw),
    }
}

fn optional_number(raw: &RawFieldMap, key: &str, report: &mut NormalizationReport) -> Option<u32> {
    let value = raw.non_blank(key)?;
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) => {
            if n.fract() != 0.0 {
                warn!(tag = key, value, "fractional number, truncating");
                report.bump("truncated_number");
            }
            Some(n.trunc() as u32)
        }
        Ok(n) if n.is_finite() && n < 0.0 => {
            warn!(tag = key, value, "negative number, clamping to 0");
            report.bump("clamped_number");
            Some(0)
        }
        _ => {
            warn!(tag = key, value, "unparseable number, ignoring");
            report.bump("invalid_number");
            None
        }
    }
}

fn text_field(raw: &RawFieldMap, key: &str) -> Option<String> {
    raw.non_blank(key).map(str::to_string)
}

fn list_field(raw: &RawFieldMap, key: &str) -> Option<Vec<String>> {
    raw.list(key)
        .map(|items| items.into_iter().map(|s| s.trim().to_string()).collect())
}

/// Builds a record from a tokenized tag-block file.
///
/// # Errors
///
/// Returns [`ParseError::MissingFields`] if `<Name>` or `<UnitType>` is
/// missing or blank, and [`ParseError::UnknownUnitType`] if the unit-type
/// token is not recognized.
pub fn build_record(raw: &RawFieldMap) -> Result<ParsedUnit, ParseError> {
    let (chassis, token) = match (raw.non_blank("Name"), raw.non_blank("UnitType")) {
        (Some(chassis), Some(token)) => (chassis, token),
        (chassis, token) => {
            let mut missing = Vec::new();
            if chassis.is_none() {
                missing.push("chassis".to_string());
            }
            if token.is_none() {
                missing.push("unit type".to_string());
            }
            return Err(ParseError::MissingFields(missing));
        }
    };
    let unit_type =
        UnitType::lookup(token).ok_or_else(|| ParseError::UnknownUnitType(token.to_string()))?;

    let mut normalizer = FieldNormalizer::new();
    let mut metrics = NormalizationReport::default();

    let type_text = raw.scalar("type").unwrap_or_default();
    let tech_base: TechBase = normalizer.field("type", type_text);
    let rules_level: RulesLevel = normalizer.field("type", type_text);
    let year = optional_number(raw, "year", &mut metrics).unwrap_or(0);

    let tonnage = match raw.non_blank("tonnage").map(str::parse::<f64>) {
        Some(Ok(tons)) if tons.is_finite() && tons >= 0.0 => tons,
        Some(_) => {
            warn!(chassis, "invalid tonnage, using 0");
            metrics.bump("invalid_number");
            0.0
        }
        None => 0.0,
    };

    let engine = Engine {
        engine_type: match raw.non_blank("engine_type") {
            Some(code) => normalizer.field_in_context::<EngineType>("engine_type", code, tech_base),
            None => EngineType::Fusion,
        },
        rating: optional_number(raw, "engine_rating", &mut metrics).unwrap_or(0),
    };

    let armor_type = match raw.non_blank("armor_type") {
        Some(code) => normalizer.field_in_context::<ArmorType>("armor_type", code, tech_base),
        None => ArmorType::Standard,
    };
    let allocation = raw
        .numbers("armor")
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, points)| {
            let label = tag_armor_label(unit_type, index);
            let front = if points.is_finite() && points >= 0.0 {
                points as u32
            } else {
                warn!(chassis, location = %label, points, "invalid armor value, clamping to 0");
                metrics.bump("clamped_armor");
                0
            };
            LocationArmor {
                location: label,
                front,
                rear: None,
            }
        })
        .collect();

    let heat_sinks = HeatSinks {
        sink_type: match raw.non_blank("sink_type") {
            Some(code) => normalizer.field_in_context::<HeatSinkType>("sink_type", code, tech_base),
            None => HeatSinkType::Single,
        },
        count: optional_number(raw, "heatsinks", &mut metrics).unwrap_or(0),
    };

    let movement = Movement {
        walk: optional_number(raw, "cruiseMP", &mut metrics).unwrap_or(0),
        jump: optional_number(raw, "jumpingMP", &mut metrics).unwrap_or(0),
    };

    let equipment = raw
        .equipment
        .iter()
        .map(|entry| parse_block_entry(entry.location.as_deref().unwrap_or_default(), &entry.entry))
        .collect();

    let crew = CrewRoles {
        crew: optional_number(raw, "crew", &mut metrics),
        officers: optional_number(raw, "officers", &mut metrics),
        gunners: optional_number(raw, "gunners", &mut metrics),
        passengers: optional_number(raw, "passengers", &mut metrics),
    };
    let crew = (crew != CrewRoles::default()).then_some(crew);

    let extras = UnitExtras {
        source: text_field(raw, "source"),
        mul_id: None,
        motion_type: text_field(raw, "motion_type"),
        trooper_count: optional_number(raw, "Trooper Count", &mut metrics),
        squad_size: optional_number(raw, "squad_size", &mut metrics),
        squad_count: optional_number(raw, "squadn", &mut metrics),
        crew,
        transporters: list_field(raw, "transporters"),
        unit_type_token: Some(token.trim().to_string()),
        mixed_chassis: (tech_base == TechBase::Mixed)
            .then(|| TechBase::mixed_chassis(type_text))
            .flatten(),
    };

    let quirks = list_field(raw, "quirks").map(|items| items.into_iter().collect::<IndexSet<_>>());
    let weapon_quirks = list_field(raw, "weapon_quirks").map(|items| {
        let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
        for item in items {
            let (quirk, key) = item.split_once(':').unwrap_or((item.as_str(), ""));
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
        primary_factory: text_field(raw, "primaryFactory"),
        notes: text_field(raw, "notes"),
        system_manufacturers: Vec::new(),
    };

    let record = CanonicalUnitRecord {
        chassis: chassis.to_string(),
        model: raw.scalar("Model").unwrap_or_default().to_string(),
        unit_type,
        configuration: Configuration::Other,
        omni: unit_type == UnitType::OmniMech,
        tech_base,
        rules_level,
        era: Era::from_year(year),
        year,
        tonnage,
        engine,
        structure: StructureType::Standard,
        gyro: GyroType::Standard,
        cockpit: CockpitType::Standard,
        armor: Armor {
            armor_type,
            allocation,
        },
        heat_sinks,
        movement,
        equipment,
        critical_slots: Vec::new(),
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
        unit_type = %record.unit_type,
        notes = report.notes.len(),
        "built record from tag-block text"
    );
    Ok(ParsedUnit { record, report })
}

/// Tokenizes and builds a record in one step.
pub fn read_record(text: &str) -> Result<ParsedUnit, ParseError> {
    build_record(&tokenize(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_multi_line_values_become_numbers() {
        let raw = tokenize("<armor>\n10\n8\n8\n6\n</armor>\n").unwrap();
        assert_eq!(raw.get("armor"), Some(&RawValue::Numbers(vec![10.0, 8.0, 8.0, 6.0])));
    }

    #[test]
    fn text_multi_line_values_join_with_newlines() {
        let raw = tokenize("<history>\nFirst.\nSecond.\n</history>").unwrap();
        assert_eq!(raw.scalar("history"), Some("First.\nSecond."));
    }

    #[test]
    fn inline_tags_are_accepted() {
        let raw = tokenize("<Name>Demolisher</Name>\n<year>2620</year>").unwrap();
        assert_eq!(raw.scalar("name"), Some("Demolisher"));
        assert_eq!(raw.scalar("year"), Some("2620"));
    }

    #[test]
    fn equipment_blocks_carry_their_location() {
        let raw = tokenize("<Front Equipment>\nAC/20\nAC/20\n</Front Equipment>").unwrap();
        assert_eq!(raw.equipment.len(), 2);
        assert_eq!(raw.equipment[0].location.as_deref(), Some("Front"));
        assert!(!raw.contains("Front Equipment"));
    }

    #[test]
    fn any_equipment_tag_is_a_block() {
        let raw = tokenize(
            "<Rear Left Equipment>\nISLRM10\n</Rear Left Equipment>\n\
             <Sponson Equipment>\nISMG\n</Sponson Equipment>",
        )
        .unwrap();
        let locations: Vec<_> = raw.equipment.iter().map(|e| e.location.as_deref()).collect();
        assert_eq!(locations, vec![Some("Rear Left"), Some("Sponson")]);
        assert_eq!(equipment_block_location("Equipment"), None);
        assert_eq!(equipment_block_location("equipment_notes"), None);
    }

    #[test]
    fn inline_closing_tag_ignores_case() {
        let raw = tokenize("<Name>Demolisher</name>\n<year>2620</YEAR>").unwrap();
        assert_eq!(raw.scalar("name"), Some("Demolisher"));
        assert_eq!(raw.scalar("year"), Some("2620"));
    }

    #[test]
    fn out_of_range_numbers_are_clamped_with_a_metric() {
        let raw = tokenize("<crew>-3</crew>\n<heatsinks>10.5</heatsinks>\n<officers>1e12</officers>")
            .unwrap();
        let mut report = NormalizationReport::default();
        assert_eq!(optional_number(&raw, "crew", &mut report), Some(0));
        assert_eq!(optional_number(&raw, "heatsinks", &mut report), Some(10));
        assert_eq!(optional_number(&raw, "officers", &mut report), None);
        assert_eq!(report.metrics.get("clamped_number"), Some(&1));
        assert_eq!(report.metrics.get("truncated_number"), Some(&1));
        assert_eq!(report.metrics.get("invalid_number"), Some(&1));
    }

    #[test]
    fn unterminated_tag_names_the_tag() {
        let err = tokenize("<Name>\nDemolisher\n").unwrap_err();
        assert!(err.to_string().contains("<Name>"));
    }
}
