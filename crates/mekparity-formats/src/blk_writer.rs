//! Tag-block grammar writer.

use crate::equipment::format_block_entry;
use indexmap::IndexMap;
use mekparity_canonical::{CanonicalUnitRecord, HeatSinkType, TechBase, UnitType};

struct TagWriter {
    out: String,
}

impl TagWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn tag<I, S>(&mut self, name: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push('<');
        self.out.push_str(name);
        self.out.push_str(">\n");
        for line in lines {
            self.out.push_str(line.as_ref());
            self.out.push('\n');
        }
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    fn value(&mut self, name: &str, value: impl ToString) {
        self.tag(name, [value.to_string()]);
    }

    fn optional(&mut self, name: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.value(name, value);
        }
    }

    fn text(&mut self, name: &str, value: &Option<String>) {
        if let Some(text) = value {
            self.tag(name, text.lines().map(str::trim).filter(|l| !l.is_empty()));
        }
    }
}

/// Formats tonnage the way tag-block files write it (`60.0`).
fn format_tonnage(tonnage: f64) -> String {
    if tonnage.fract() == 0.0 {
        format!("{:.1}", tonnage)
    } else {
        format!("{}", tonnage)
    }
}

fn type_line(record: &CanonicalUnitRecord) -> String {
    let base = match record.tech_base {
        TechBase::InnerSphere => "IS",
        TechBase::Clan => "Clan",
        TechBase::Mixed => {
            TechBase::mixed_label(record.extras.mixed_chassis.unwrap_or(TechBase::InnerSphere))
        }
    };
    format!("{} Level {}", base, record.rules_level.tag_level())
}

/// The source `<UnitType>` token when it still resolves to the record's
/// unit type, otherwise the default token for that type.
fn unit_type_token(record: &CanonicalUnitRecord) -> &str {
    record
        .extras
        .unit_type_token
        .as_deref()
        .filter(|token| UnitType::lookup(token) == Some(record.unit_type))
        .unwrap_or_else(|| record.unit_type.tag_token())
}

/// Serializes a record as tag-block text.
///
/// Equipment is grouped into one `<X Equipment>` block per location, in
/// the order each location first appears. Empty blocks are omitted.
pub fn write_record(record: &CanonicalUnitRecord) -> String {
    let mut w = TagWriter::new();

    w.value("BlockVersion", 1);
    w.value("Version", "MAM0");
    w.value("UnitType", unit_type_token(record));
    w.value("Name", &record.chassis);
    w.value("Model", &record.model);
    w.value("year", record.year);
    w.value("type", type_line(record));
    w.optional("motion_type", record.extras.motion_type.as_ref());
    if let Some(transporters) = &record.extras.transporters {
        w.tag("transporters", transporters);
    }
    w.value("cruiseMP", record.movement.walk);
    w.value("jumpingMP", record.movement.jump);
    w.value("engine_type", record.engine.engine_type.tag_code());
    if record.engine.rating > 0 {
        w.value("engine_rating", record.engine.rating);
    }
    match record.armor.armor_type.tag_code() {
        Some(code) => w.value("armor_type", code),
        None => w.value("armor_type", record.armor.armor_type),
    }
    if !record.armor.allocation.is_empty() {
        w.tag(
            "armor",
            record.armor.allocation.iter().map(|a| a.front.to_string()),
        );
    }

    let mut blocks: IndexMap<&str, Vec<String>> = IndexMap::new();
    for mount in &record.equipment {
        blocks
            .entry(mount.location.as_str())
            .or_default()
            .push(format_block_entry(mount));
    }
    for (location, entries) in &blocks {
        if location.is_empty() || entries.is_empty() {
            continue;
        }
        w.tag(&format!("{} Equipment", location), entries);
    }

    w.value("tonnage", format_tonnage(record.tonnage));
    if record.heat_sinks.count > 0 {
        w.value("heatsinks", record.heat_sinks.count);
        let code = match record.heat_sinks.sink_type {
            HeatSinkType::Double | HeatSinkType::DoubleClan => 1,
            _ => 0,
        };
        w.value("sink_type", code);
    }

    let extras = &record.extras;
    w.optional("Trooper Count", extras.trooper_count);
    w.optional("squad_size", extras.squad_size);
    w.optional("squadn", extras.squad_count);
    if let Some(crew) = &extras.crew {
        w.optional("crew", crew.crew);
        w.optional("officers", crew.officers);
        w.optional("gunners", crew.gunners);
        w.optional("passengers", crew.passengers);
    }
    w.optional("source", extras.source.as_ref());

    if let Some(quirks) = &record.quirks {
        w.tag("quirks", quirks);
    }
    if let Some(weapon_quirks) = &record.weapon_quirks {
        let lines = weapon_quirks.iter().flat_map(|(key, names)| {
            names.iter().map(move |name| format!("{}:{}", name, key))
        });
        w.tag("weapon_quirks", lines);
    }

    let fluff = &record.fluff;
    w.text("overview", &fluff.overview);
    w.text("capabilities", &fluff.capabilities);
    w.text("deployment", &fluff.deployment);
    w.text("history", &fluff.history);
    w.text("manufacturer", &fluff.manufacturer);
    w.text("primaryFactory", &fluff.primary_factory);
    w.text("notes", &fluff.notes);

    w.out
}
