use mekparity_canonical::{ArmorType, Configuration, EngineType, RulesLevel, TechBase, UnitType};
use mekparity_formats::{BlkFormat, Grammar, ParseError, UnitFormat};

const DEMOLISHER: &str = include_str!("fixtures/demolisher.blk");

#[test]
fn vehicle_builds_expected_record() {
    let record = BlkFormat.parse(DEMOLISHER).unwrap().record;

    assert_eq!(record.unit_type, UnitType::Vehicle);
    assert_eq!(record.configuration, Configuration::Other);
    assert_eq!(record.chassis, "Demolisher Heavy Tank");
    assert_eq!(record.model, "(Standard)");
    assert_eq!(record.year, 2620);
    assert_eq!(record.tech_base, TechBase::InnerSphere);
    assert_eq!(record.rules_level, RulesLevel::Standard);
    assert_eq!(record.tonnage, 80.0);
    assert_eq!(record.movement.walk, 3);
    assert_eq!(record.engine.engine_type, EngineType::Fusion);
    assert_eq!(record.armor.armor_type, ArmorType::Standard);

    let labels: Vec<_> = record
        .armor
        .allocation
        .iter()
        .map(|a| (a.location.as_str(), a.front))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("Front", 40),
            ("Right", 32),
            ("Left", 32),
            ("Rear", 24),
            ("Turret", 40)
        ]
    );

    assert_eq!(record.equipment.len(), 5);
    assert_eq!(record.equipment[0].location, "Turret");
    assert!(record.equipment[0].turret);
    assert_eq!(record.equipment[4].name, "ISAC20 Ammo");
    assert_eq!(record.equipment[4].location, "Body");

    assert_eq!(record.extras.motion_type.as_deref(), Some("Tracked"));
    assert_eq!(
        record.extras.transporters,
        Some(vec!["troopspace:1.0".to_string()])
    );
    assert_eq!(record.extras.crew.unwrap().crew, Some(6));
    assert_eq!(record.extras.trooper_count, None);
    assert_eq!(record.extras.squad_size, None);
    assert_eq!(record.extras.squad_count, None);
    assert_eq!(
        record.fluff.history.as_deref(),
        Some("Built as a city defender.\nIt has held that role ever since.")
    );
    assert_eq!(record.quirks.as_ref().map(|q| q.len()), Some(2));
}

#[test]
fn render_reparses_to_the_same_record() {
    let record = BlkFormat.parse(DEMOLISHER).unwrap().record;
    let text = BlkFormat.render(&record);
    assert_eq!(text, BlkFormat.render(&record.clone()));

    let reparsed = BlkFormat.parse(&text).unwrap().record;
    assert_eq!(reparsed, record);
}

#[test]
fn rendered_text_groups_equipment_by_location() {
    let record = BlkFormat.parse(DEMOLISHER).unwrap().record;
    let text = Grammar::TagBlock.render(&record);

    assert!(text.starts_with("<BlockVersion>\n1\n</BlockVersion>\n\n<Version>\nMAM0\n</Version>\n"));
    assert!(text.contains("<UnitType>\nTank\n</UnitType>"));
    assert!(text.contains("<type>\nIS Level 2\n</type>"));
    assert!(text.contains("<Turret Equipment>\nISAC20\nISAC20\n</Turret Equipment>"));
    assert!(text.contains("<tonnage>\n80.0\n</tonnage>"));
    assert!(!text.contains("\n\n\n"));
    let turret = text.find("<Turret Equipment>").unwrap();
    let body = text.find("<Body Equipment>").unwrap();
    assert!(turret < body);
}

#[test]
fn unit_without_equipment_has_no_equipment_blocks() {
    let text = "<UnitType>\nTank\n</UnitType>\n<Name>\nHunter\n</Name>\n";
    let record = BlkFormat.parse(text).unwrap().record;
    assert!(record.equipment.is_empty());
    assert!(!BlkFormat.render(&record).contains("Equipment>"));
}

#[test]
fn unknown_unit_type_names_the_token() {
    let text = DEMOLISHER.replace("<UnitType>\nTank\n", "<UnitType>\nZeppelin\n");
    let err = BlkFormat.parse(&text).unwrap_err();
    assert!(matches!(err, ParseError::UnknownUnitType(ref token) if token == "Zeppelin"));
    assert!(err.to_string().contains("Zeppelin"));
}

#[test]
fn missing_name_is_reported_as_chassis() {
    let text = DEMOLISHER.replace("<Name>\nDemolisher Heavy Tank\n</Name>\n", "");
    let err = BlkFormat.parse(&text).unwrap_err();
    assert_eq!(err.missing_fields(), ["chassis".to_string()]);
}

#[test]
fn unterminated_tag_is_a_parse_error() {
    let text = DEMOLISHER.replace("</tonnage>", "");
    match BlkFormat.parse(&text).unwrap_err() {
        ParseError::UnterminatedTag { tag, .. } => assert_eq!(tag, "tonnage"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn battle_armor_reads_trooper_count() {
    let text = "<UnitType>BattleArmor</UnitType>\n<Name>Elemental</Name>\n<Model>[Laser](Sqd5)</Model>\n\
                <type>Clan Level 2</type>\n<Trooper Count>5</Trooper Count>\n<armor>\n10\n</armor>\n";
    let record = BlkFormat.parse(text).unwrap().record;
    assert_eq!(record.unit_type, UnitType::BattleArmor);
    assert_eq!(record.tech_base, TechBase::Clan);
    assert_eq!(record.extras.trooper_count, Some(5));
    assert_eq!(record.armor.allocation[0].location, "Trooper");
    assert_eq!(record.armor.allocation[0].front, 10);
    assert!(BlkFormat.render(&record).contains("<Trooper Count>\n5\n</Trooper Count>"));
}

#[test]
fn grammar_is_chosen_by_extension() {
    use std::path::Path;
    assert_eq!(
        Grammar::from_path(Path::new("units/Atlas AS7-D.mtf")),
        Some(Grammar::LineOriented)
    );
    assert_eq!(
        Grammar::from_path(Path::new("units/Demolisher.BLK")),
        Some(Grammar::TagBlock)
    );
    assert_eq!(Grammar::from_path(Path::new("README.md")), None);
}

#[test]
fn mixed_type_line_keeps_chassis_and_level() {
    let text = DEMOLISHER.replace("<type>\nIS Level 2\n", "<type>\nMixed (Clan Chassis) Level 3\n");
    let record = BlkFormat.parse(&text).unwrap().record;
    assert_eq!(record.tech_base, TechBase::Mixed);
    assert_eq!(record.rules_level, RulesLevel::Advanced);
    assert_eq!(record.extras.mixed_chassis, Some(TechBase::Clan));
    assert!(BlkFormat
        .render(&record)
        .contains("<type>\nMixed (Clan Chassis) Level 3\n</type>"));
}

#[test]
fn source_unit_type_token_is_written_back() {
    let text = DEMOLISHER.replace("<UnitType>\nTank\n", "<UnitType>\nLargeSupportTank\n");
    let mut record = BlkFormat.parse(&text).unwrap().record;
    assert_eq!(record.unit_type, UnitType::SupportVehicle);
    assert_eq!(record.extras.unit_type_token.as_deref(), Some("LargeSupportTank"));
    assert!(BlkFormat
        .render(&record)
        .contains("<UnitType>\nLargeSupportTank\n</UnitType>"));

    record.unit_type = UnitType::Aerospace;
    assert!(BlkFormat.render(&record).contains("<UnitType>\nAero\n</UnitType>"));
}
