//! Line-oriented grammar writer.

use crate::equipment::format_line_entry;
use crate::mtf_reader::EMPTY_SLOT;
use mekparity_canonical::{CanonicalUnitRecord, Configuration, TechBase, REAR_ARMOR_ORDER};

/// Formats tonnage, dropping the fraction when it is whole.
pub(crate) fn format_tonnage(tonnage: f64) -> String {
    if tonnage.fract() == 0.0 {
        format!("{:.0}", tonnage)
    } else {
        format!("{}", tonnage)
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accumulates blocks of lines separated by one blank line.
#[derive(Default)]
struct Blocks {
    blocks: Vec<Vec<String>>,
}

impl Blocks {
    fn push(&mut self, lines: Vec<String>) {
        if !lines.is_empty() {
            self.blocks.push(lines);
        }
    }

    fn finish(self) -> String {
        let mut out = self
            .blocks
            .into_iter()
            .map(|lines| lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        out
    }
}

/// Serializes a record as line-oriented text.
///
/// Every slot section is padded with `-Empty-` to its location's capacity.
/// The output is a pure function of the record.
pub fn write_record(record: &CanonicalUnitRecord) -> String {
    let mut blocks = Blocks::default();

    let mut identity = vec![
        format!("chassis:{}", record.chassis),
        format!("model:{}", record.model),
    ];
    if let Some(mul_id) = record.extras.mul_id {
        identity.push(format!("mul id:{}", mul_id));
    }
    blocks.push(identity);

    let config = if record.omni {
        format!("{} Omnimech", record.configuration)
    } else {
        record.configuration.to_string()
    };
    let mut header = vec![
        format!("Config:{}", config),
        match (record.tech_base, record.extras.mixed_chassis) {
            (TechBase::Mixed, Some(chassis)) => {
                format!("techbase:{}", TechBase::mixed_label(chassis))
            }
            (tech_base, _) => format!("techbase:{}", tech_base),
        },
        format!("era:{}", record.year),
    ];
    if let Some(source) = &record.extras.source {
        header.push(format!("source:{}", source));
    }
    header.push(format!("rules level:{}", record.rules_level.code()));
    blocks.push(header);

    blocks.push(vec![
        format!("mass:{}", format_tonnage(record.tonnage)),
        format!(
            "engine:{} {}",
            record.engine.rating, record.engine.engine_type
        ),
        format!("structure:{}", record.structure),
        format!("cockpit:{}", record.cockpit),
        format!("gyro:{}", record.gyro),
    ]);

    blocks.push(vec![
        format!(
            "heat sinks:{} {}",
            record.heat_sinks.count, record.heat_sinks.sink_type
        ),
        format!("walk mp:{}", record.movement.walk),
        format!("jump mp:{}", record.movement.jump),
    ]);

    let mut armor = vec![format!("armor:{}", record.armor.armor_type)];
    if record.configuration == Configuration::Other {
        for entry in &record.armor.allocation {
            armor.push(format!("{} armor:{}", entry.location, entry.front));
        }
    } else {
        for location in record.configuration.slot_layout() {
            if let Some(entry) = record.armor.get(location.name()) {
                armor.push(format!("{}:{}", location.armor_key(), entry.front));
            }
        }
        for location in REAR_ARMOR_ORDER {
            let rear = record
                .armor
                .get(location.name())
                .and_then(|entry| entry.rear)
                .zip(location.rear_armor_key());
            if let Some((points, key)) = rear {
                armor.push(format!("{}:{}", key, points));
            }
        }
    }
    blocks.push(armor);

    if !record.equipment.is_empty() {
        let mut weapons = vec![format!("Weapons:{}", record.equipment.len())];
        weapons.extend(record.equipment.iter().map(format_line_entry));
        blocks.push(weapons);
    }

    for location in record.configuration.slot_layout() {
        let mut section = vec![location.header()];
        let slots = record.slots(*location).unwrap_or(&[]);
        for index in 0..location.capacity() {
            let slot = slots.get(index).and_then(|slot| slot.as_deref());
            section.push(slot.unwrap_or(EMPTY_SLOT).to_string());
        }
        blocks.push(section);
    }

    let fluff = &record.fluff;
    let mut background = Vec::new();
    for (key, value) in [
        ("overview", &fluff.overview),
        ("capabilities", &fluff.capabilities),
        ("deployment", &fluff.deployment),
        ("history", &fluff.history),
        ("manufacturer", &fluff.manufacturer),
        ("primaryfactory", &fluff.primary_factory),
    ] {
        if let Some(value) = value {
            background.push(format!("{}:{}", key, single_line(value)));
        }
    }
    for entry in &fluff.system_manufacturers {
        background.push(format!("systemmanufacturer:{}", entry));
    }
    if let Some(notes) = &fluff.notes {
        background.push(format!("notes:{}", single_line(notes)));
    }
    blocks.push(background);

    let mut quirks = Vec::new();
    if let Some(set) = &record.quirks {
        quirks.extend(set.iter().map(|quirk| format!("quirk:{}", quirk)));
    }
    if let Some(map) = &record.weapon_quirks {
        for (key, names) in map {
            for name in names {
                quirks.push(format!("weaponquirk:{}:{}", name, key));
            }
        }
    }
    blocks.push(quirks);

    blocks.finish()
}
