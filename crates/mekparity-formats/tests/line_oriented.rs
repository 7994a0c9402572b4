use mekparity_canonical::{
    Configuration, EngineType, Era, HeatSinkType, MechLocation, Resolution, RulesLevel,
    StructureType, TechBase, UnitType,
};
use mekparity_formats::{Grammar, MtfFormat, ParseError, UnitFormat};

const ATLAS: &str = include_str!("fixtures/atlas.mtf");

fn section<'a>(text: &'a str, header: &str) -> Vec<&'a str> {
    text.lines()
        .skip_while(|line| *line != header)
        .skip(1)
        .take_while(|line| !line.is_empty())
        .collect()
}

#[test]
fn atlas_builds_expected_record() {
    let parsed = MtfFormat.parse(ATLAS).unwrap();
    let record = &parsed.record;

    assert_eq!(record.chassis, "Atlas");
    assert_eq!(record.model, "AS7-D");
    assert_eq!(record.unit_type, UnitType::BattleMech);
    assert_eq!(record.configuration, Configuration::Biped);
    assert!(!record.omni);
    assert_eq!(record.tech_base, TechBase::InnerSphere);
    assert_eq!(record.rules_level, RulesLevel::Standard);
    assert_eq!(record.year, 2755);
    assert_eq!(record.era, Era::StarLeague);
    assert_eq!(record.tonnage, 100.0);
    assert_eq!(record.engine.engine_type, EngineType::Fusion);
    assert_eq!(record.engine.rating, 300);
    assert_eq!(record.structure, StructureType::Standard);
    assert_eq!(record.heat_sinks.sink_type, HeatSinkType::Single);
    assert_eq!(record.heat_sinks.count, 20);
    assert_eq!(record.movement.walk, 3);
    assert_eq!(record.extras.mul_id, Some(140));
    assert_eq!(record.extras.source.as_deref(), Some("TRO: 3025"));

    assert_eq!(record.armor.get("Left Arm").unwrap().front, 34);
    let ct = record.armor.get("Center Torso").unwrap();
    assert_eq!((ct.front, ct.rear), (47, Some(14)));
    assert_eq!(record.armor.get("Head").unwrap().rear, None);

    assert_eq!(record.equipment.len(), 7);
    let rear = &record.equipment[6];
    assert_eq!(rear.name, "Medium Laser");
    assert_eq!(rear.location, "Center Torso");
    assert!(rear.rear);

    let head = record.slots(MechLocation::Head).unwrap();
    assert_eq!(head.len(), 6);
    assert_eq!(head[2].as_deref(), Some("Cockpit"));
    assert_eq!(head[3], None);

    let quirks = record.quirks.as_ref().unwrap();
    assert_eq!(quirks.len(), 2);
    assert!(quirks.contains("command_mech"));
    let weapon_quirks = record.weapon_quirks.as_ref().unwrap();
    assert_eq!(weapon_quirks["LT:0:ISLRM20"], vec!["imp_accuracy".to_string()]);

    assert_eq!(
        record.fluff.manufacturer.as_deref(),
        Some("Defiance Industries")
    );
    assert!(parsed.report.is_exact(), "{:?}", parsed.report);
}

#[test]
fn rendered_slot_sections_have_exactly_capacity_lines() {
    let record = MtfFormat.parse(ATLAS).unwrap().record;
    let text = MtfFormat.render(&record);

    for location in record.configuration.slot_layout() {
        let lines = section(&text, &location.header());
        assert_eq!(
            lines.len(),
            location.capacity(),
            "{} section",
            location.name()
        );
    }
    assert_eq!(section(&text, "Head:")[3], "-Empty-");
}

#[test]
fn render_is_deterministic_and_reparses_to_the_same_record() {
    let record = MtfFormat.parse(ATLAS).unwrap().record;
    let first = MtfFormat.render(&record);
    let second = MtfFormat.render(&record.clone());
    assert_eq!(first, second);

    let reparsed = MtfFormat.parse(&first).unwrap().record;
    assert_eq!(reparsed, record);
    assert_eq!(MtfFormat.render(&reparsed), first);
}

#[test]
fn rendered_text_uses_canonical_lines() {
    let record = MtfFormat.parse(ATLAS).unwrap().record;
    let text = Grammar::LineOriented.render(&record);

    assert!(text.starts_with("chassis:Atlas\nmodel:AS7-D\nmul id:140\n\nConfig:Biped\n"));
    assert!(text.contains("\nmass:100\nengine:300 Fusion Engine\n"));
    assert!(text.contains("\nLA armor:34\n"));
    assert!(text.contains("\nRTC armor:14\n"));
    assert!(text.contains("\nWeapons:7\nMedium Laser, Left Arm\n"));
    assert!(text.contains("\nMedium Laser, Center Torso (R)\n"));
    assert!(text.contains("\nweaponquirk:imp_accuracy:LT:0:ISLRM20\n"));
    assert!(!text.contains("\n\n\n"));
    assert!(text.ends_with('\n'));
}

#[test]
fn missing_chassis_is_named_in_the_error() {
    let text = ATLAS.replace("chassis:Atlas\n", "");
    let err = MtfFormat.parse(&text).unwrap_err();
    assert_eq!(err.missing_fields(), ["chassis".to_string()]);
    assert!(err.to_string().contains("chassis"));
}

#[test]
fn missing_chassis_and_config_are_both_listed() {
    let err = MtfFormat.parse("model:AS7-D\nmass:100\n").unwrap_err();
    match err {
        ParseError::MissingFields(fields) => assert_eq!(fields, vec!["chassis", "config"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn negative_armor_clamps_to_zero_with_a_metric() {
    let text = ATLAS.replace("LA armor:34", "LA armor:-5");
    let parsed = MtfFormat.parse(&text).unwrap();
    assert_eq!(parsed.record.armor.get("Left Arm").unwrap().front, 0);
    assert_eq!(parsed.report.metrics.get("clamped_armor"), Some(&1));
}

#[test]
fn omni_config_sets_flag_and_unit_type() {
    let text = ATLAS.replace("Config:Biped", "Config:Biped Omnimech");
    let record = MtfFormat.parse(&text).unwrap().record;
    assert!(record.omni);
    assert_eq!(record.unit_type, UnitType::OmniMech);
    assert_eq!(record.configuration, Configuration::Biped);
    assert!(MtfFormat.render(&record).contains("\nConfig:Biped Omnimech\n"));
}

#[test]
fn tech_base_disambiguates_inferred_engine() {
    let text = ATLAS
        .replace("techbase:Inner Sphere", "techbase:Clan")
        .replace("engine:300 Fusion Engine(IS)", "engine:300 XL");
    let parsed = MtfFormat.parse(&text).unwrap();
    assert_eq!(parsed.record.engine.engine_type, EngineType::ClanXl);

    let note = parsed
        .report
        .notes
        .iter()
        .find(|note| note.field == "engine")
        .unwrap();
    assert_eq!(note.resolution, Resolution::TechContext);
    assert_eq!(note.raw, "XL");
}

#[test]
fn quad_uses_leg_sections() {
    let text = "chassis:Goliath\nmodel:GOL-1H\nConfig:Quad\nmass:80\n\n\
                Front Left Leg:\nHip\nUpper Leg Actuator\nLower Leg Actuator\nFoot Actuator\n";
    let record = MtfFormat.parse(text).unwrap().record;
    assert_eq!(record.configuration, Configuration::Quad);
    let legs = record.slots(MechLocation::FrontLeftLeg).unwrap();
    assert_eq!(legs.len(), 4);

    let rendered = MtfFormat.render(&record);
    assert!(rendered.contains("\nRear Right Leg:\n"));
    assert!(!rendered.contains("\nLeft Arm:\n"));
    assert_eq!(section(&rendered, "Front Left Leg:").len(), 6);
}

#[test]
fn over_capacity_section_is_truncated() {
    let text = "chassis:Locust\nConfig:Biped\n\nHead:\nA\nB\nC\nD\nE\nF\nG\n";
    let parsed = MtfFormat.parse(text).unwrap();
    assert_eq!(parsed.record.slots(MechLocation::Head).unwrap().len(), 6);
    assert_eq!(parsed.report.metrics.get("truncated_slots"), Some(&1));
}

#[test]
fn absent_quirks_stay_absent() {
    let text = "chassis:Locust\nmodel:LCT-1V\nConfig:Biped\n";
    let record = MtfFormat.parse(text).unwrap().record;
    assert!(record.quirks.is_none());
    assert!(record.weapon_quirks.is_none());
    assert!(!MtfFormat.render(&record).contains("quirk"));
}

#[test]
fn mixed_tech_base_keeps_its_chassis() {
    let text = "chassis:Locust\nmodel:LCT-1V\nConfig:Biped\ntechbase:Mixed (Clan Chassis)\n";
    let record = MtfFormat.parse(text).unwrap().record;
    assert_eq!(record.tech_base, TechBase::Mixed);
    assert_eq!(record.extras.mixed_chassis, Some(TechBase::Clan));
    assert!(MtfFormat.render(&record).contains("techbase:Mixed (Clan Chassis)\n"));

    let plain = MtfFormat
        .parse(&text.replace("Mixed (Clan Chassis)", "Mixed"))
        .unwrap()
        .record;
    assert_eq!(plain.extras.mixed_chassis, None);
    assert!(MtfFormat.render(&plain).contains("techbase:Mixed\n"));
}
