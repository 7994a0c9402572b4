use mekparity_canonical::{CanonicalEnum, Configuration, REAR_ARMOR_ORDER, UNIT_TYPE_TOKENS};
use mekparity_formats::{BlkFormat, Grammar, MtfFormat, UnitFormat};
use mekparity_verify::{
    compare_slots, Comparator, DiscrepancyRecord, IssueCategory, ValidationStatus,
};
use serde_json::json;

const DEMOLISHER: &str = include_str!("../../mekparity-formats/tests/fixtures/demolisher.blk");

fn minimal_atlas() -> String {
    let mut text = String::from(
        "chassis:Atlas\nmodel:AS7-D\nConfig:Biped\ntechbase:Inner Sphere\nera:2755\nrules level:1\n\n\
         mass:100\nengine:280 Fusion Engine\nwalk mp:3\njump mp:0\n\n",
    );
    let arm = [
        "Shoulder",
        "Upper Arm Actuator",
        "Lower Arm Actuator",
        "Hand Actuator",
    ];
    let leg = [
        "Hip",
        "Upper Leg Actuator",
        "Lower Leg Actuator",
        "Foot Actuator",
    ];
    for (header, fixed, capacity) in [
        ("Left Arm:", &arm[..], 12),
        ("Right Arm:", &arm[..], 12),
        ("Left Torso:", &[][..], 12),
        ("Right Torso:", &[][..], 12),
        ("Center Torso:", &["Fusion Engine", "Fusion Engine", "Fusion Engine", "Gyro"][..], 12),
        ("Head:", &["Life Support", "Sensors", "Cockpit"][..], 6),
        ("Left Leg:", &leg[..], 6),
        ("Right Leg:", &leg[..], 6),
    ] {
        text.push_str(header);
        text.push('\n');
        for index in 0..capacity {
            text.push_str(fixed.get(index).copied().unwrap_or("-Empty-"));
            text.push('\n');
        }
        text.push('\n');
    }
    text
}

/// A mech of any configuration with armor on every location and one
/// weapon per slot section.
fn mech_text(configuration: Configuration) -> String {
    let mut text = format!(
        "chassis:Matrix\nmodel:MX-1\nConfig:{}\ntechbase:Inner Sphere\nera:3050\nrules level:2\n\n\
         mass:55\nengine:275 Fusion Engine\nwalk mp:5\njump mp:0\n\n",
        configuration
    );
    for location in configuration.slot_layout() {
        text.push_str(&format!("{}:10\n", location.armor_key()));
    }
    for location in REAR_ARMOR_ORDER {
        if let Some(key) = location.rear_armor_key() {
            text.push_str(&format!("{}:4\n", key));
        }
    }
    text.push('\n');
    for location in configuration.slot_layout() {
        text.push_str(&location.header());
        text.push_str("\nMedium Laser\n\n");
    }
    text
}

fn slots(names: &[&str]) -> Vec<Option<String>> {
    names
        .iter()
        .map(|name| (*name != "-Empty-").then(|| name.to_string()))
        .collect()
}

#[test]
fn minimal_atlas_round_trips_to_passed() {
    let original = minimal_atlas();
    let record = MtfFormat.parse(&original).unwrap().record;
    let generated = MtfFormat.render(&record);

    let result = Comparator::new().compare(Grammar::LineOriented, &original, &generated);
    assert_eq!(result.status, ValidationStatus::Passed, "{:?}", result.discrepancies);
    assert!(result.discrepancies.is_empty());
}

#[test]
fn serialized_text_compares_clean_against_itself() {
    let record = MtfFormat.parse(&minimal_atlas()).unwrap().record;
    let text = MtfFormat.render(&record);
    assert!(Comparator::new()
        .compare(Grammar::LineOriented, &text, &text)
        .is_passed());

    let vehicle = BlkFormat.parse(DEMOLISHER).unwrap().record;
    let text = BlkFormat.render(&vehicle);
    assert!(Comparator::new()
        .compare(Grammar::TagBlock, &text, &text)
        .is_passed());
}

#[test]
fn every_mech_configuration_compares_clean_after_render() {
    let comparator = Comparator::new();
    for configuration in Configuration::ALL.iter().filter(|c| c.is_mech()) {
        let record = MtfFormat.parse(&mech_text(*configuration)).unwrap().record;
        assert_eq!(record.configuration, *configuration);

        let text = MtfFormat.render(&record);
        let result = comparator.compare(Grammar::LineOriented, &text, &text);
        assert!(result.is_passed(), "{}: {:?}", configuration, result.discrepancies);

        let again = MtfFormat.render(&MtfFormat.parse(&text).unwrap().record);
        let result = comparator.compare(Grammar::LineOriented, &text, &again);
        assert!(result.is_passed(), "{}: {:?}", configuration, result.discrepancies);
    }
}

#[test]
fn every_unit_type_token_round_trips_to_passed() {
    let comparator = Comparator::new();
    for (token, unit_type) in UNIT_TYPE_TOKENS {
        let source = DEMOLISHER.replace("<UnitType>\nTank\n", &format!("<UnitType>\n{}\n", token));
        let record = BlkFormat.parse(&source).unwrap().record;
        assert_eq!(record.unit_type, *unit_type);

        let generated = BlkFormat.render(&record);
        assert!(
            generated.contains(&format!("<UnitType>\n{}\n</UnitType>", token)),
            "{}",
            token
        );
        let result = comparator.compare(Grammar::TagBlock, &source, &generated);
        assert!(result.is_passed(), "{}: {:?}", token, result.discrepancies);
        assert!(comparator
            .compare(Grammar::TagBlock, &generated, &generated)
            .is_passed());
    }
}

#[test]
fn unlisted_equipment_block_is_regenerated_and_compared() {
    let block = "<Rear Left Equipment>\nISLRM10\n</Rear Left Equipment>\n";
    let source = DEMOLISHER.replace("<tonnage>", &format!("{}\n<tonnage>", block));
    let record = BlkFormat.parse(&source).unwrap().record;
    let generated = BlkFormat.render(&record);
    assert!(generated.contains(block));
    let result = Comparator::new().compare(Grammar::TagBlock, &source, &generated);
    assert!(result.is_passed(), "{:?}", result.discrepancies);

    let dropped = generated.replace(&format!("{}\n", block), "");
    let result = Comparator::new().compare(Grammar::TagBlock, &source, &dropped);
    assert_eq!(result.status, ValidationStatus::IssuesFound);
    assert_eq!(result.discrepancies.len(), 1);
    let found = &result.discrepancies[0];
    assert_eq!(found.category, IssueCategory::MissingEquipment);
    assert_eq!(found.expected, "ISLRM10");
    assert_eq!(found.location.as_deref(), Some("rear left"));
}

#[test]
fn tag_block_vehicle_round_trips_to_passed() {
    let record = BlkFormat.parse(DEMOLISHER).unwrap().record;
    let generated = BlkFormat.render(&record);
    let result = Comparator::new().compare(Grammar::TagBlock, DEMOLISHER, &generated);
    assert!(result.is_passed(), "{:?}", result.discrepancies);
}

#[test]
fn changed_tag_block_armor_is_an_armor_mismatch() {
    let record = BlkFormat.parse(DEMOLISHER).unwrap().record;
    let generated = BlkFormat.render(&record).replacen("<armor>\n40\n", "<armor>\n38\n", 1);
    let result = Comparator::new().compare(Grammar::TagBlock, DEMOLISHER, &generated);

    assert_eq!(result.status, ValidationStatus::IssuesFound);
    assert_eq!(result.discrepancies.len(), 1);
    let found = &result.discrepancies[0];
    assert_eq!(found.category, IssueCategory::ArmorMismatch);
    assert_eq!(found.field.as_deref(), Some("armor[0]"));
    assert_eq!((found.expected.as_str(), found.actual.as_str()), ("40", "38"));
}

#[test]
fn dropped_hand_actuator_is_a_missing_actuator() {
    let original = slots(&[
        "Shoulder",
        "Upper Arm Actuator",
        "Lower Arm Actuator",
        "Hand Actuator",
        "Medium Laser",
    ]);
    let generated = slots(&[
        "Shoulder",
        "Upper Arm Actuator",
        "Lower Arm Actuator",
        "-Empty-",
        "Medium Laser",
    ]);

    let found = compare_slots("Left Arm", &original, &generated);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, IssueCategory::MissingActuator);
    assert_eq!(found[0].index, Some(3));
    assert_eq!(found[0].expected, "Hand Actuator");
    assert_eq!(found[0].location.as_deref(), Some("Left Arm"));
}

#[test]
fn added_actuator_is_an_extra_actuator() {
    let found = compare_slots(
        "Left Arm",
        &slots(&["Shoulder", "Medium Laser"]),
        &slots(&["Shoulder", "Upper Arm Actuator"]),
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, IssueCategory::ExtraActuator);
    assert_eq!(found[0].actual, "Upper Arm Actuator");
}

#[test]
fn unknown_structural_names_are_plain_slot_mismatches() {
    let found = compare_slots(
        "Left Arm",
        &slots(&["Shoulder", "Claw"]),
        &slots(&["Shoulder", "-Empty-", "Medium Laser"]),
    );
    let categories: Vec<_> = found.iter().map(|d| d.category).collect();
    assert_eq!(
        categories,
        vec![IssueCategory::SlotCountMismatch, IssueCategory::SlotMismatch]
    );
}

#[test]
fn trailing_empty_padding_is_ignored() {
    let mut padded = vec!["Hip", "Upper Leg Actuator", "Heat Sink"];
    padded.extend(["-Empty-"; 6]);
    let found = compare_slots(
        "Left Leg",
        &slots(&padded),
        &slots(&["Hip", "Upper Leg Actuator", "Heat Sink"]),
    );
    assert!(found.is_empty(), "{:?}", found);
}

#[test]
fn engine_filler_and_parentheticals_are_ignored() {
    let original = minimal_atlas().replace("engine:280 Fusion Engine", "engine:280 Fusion Engine(IS)");
    let record = MtfFormat.parse(&original).unwrap().record;
    let generated = MtfFormat.render(&record);
    assert!(Comparator::new()
        .compare(Grammar::LineOriented, &original, &generated)
        .is_passed());

    let changed = generated.replace("engine:280 Fusion Engine", "engine:280 XL Engine");
    let result = Comparator::new().compare(Grammar::LineOriented, &original, &changed);
    assert_eq!(result.primary_category(), Some(IssueCategory::EngineMismatch));
}

#[test]
fn mixed_tech_bases_collapse() {
    let original = minimal_atlas().replace("techbase:Inner Sphere", "techbase:Mixed (IS Chassis)");
    let generated = minimal_atlas().replace("techbase:Inner Sphere", "techbase:Mixed");
    assert!(Comparator::new()
        .compare(Grammar::LineOriented, &original, &generated)
        .is_passed());
}

#[test]
fn equipment_is_compared_as_a_multiset() {
    let base = minimal_atlas();
    let original = format!(
        "{}Weapons:3\nMedium Laser, Center Torso (R)\nMedium Laser, Center Torso (R)\nAC/20, Right Torso\n",
        base
    );
    let generated = format!(
        "{}Weapons:2\nMedium Laser, Center Torso (R)\nLRM 20, Left Torso\n",
        base
    );

    let result = Comparator::new().compare(Grammar::LineOriented, &original, &generated);
    let found: Vec<_> = result
        .discrepancies
        .iter()
        .map(|d| (d.category, d.expected.as_str(), d.actual.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (
                IssueCategory::MissingEquipment,
                "Medium Laser, Center Torso (R)",
                ""
            ),
            (IssueCategory::MissingEquipment, "AC/20, Right Torso", ""),
            (IssueCategory::ExtraEquipment, "", "LRM 20, Left Torso"),
        ]
    );
}

#[test]
fn quirks_are_compared_as_sets() {
    let base = minimal_atlas();
    let original = format!("{}quirk:command_mech\nquirk:distracting\n", base);
    let generated = format!("{}quirk:distracting\nquirk:rugged_1\n", base);

    let result = Comparator::new().compare(Grammar::LineOriented, &original, &generated);
    assert_eq!(result.issue_count(), 2);
    assert!(result
        .discrepancies
        .iter()
        .all(|d| d.category == IssueCategory::QuirkMismatch));
    assert_eq!(result.discrepancies[0].expected, "command_mech");
    assert_eq!(result.discrepancies[1].actual, "rugged_1");
}

#[test]
fn empty_side_is_a_parse_error_result() {
    let result = Comparator::new().compare(Grammar::LineOriented, "", &minimal_atlas());
    assert_eq!(result.status, ValidationStatus::ParseError);
    assert_eq!(result.primary_category(), Some(IssueCategory::ParseError));
    assert_eq!(result.parse_errors.len(), 1);

    let result = Comparator::new().compare(Grammar::TagBlock, DEMOLISHER, "<Name>\nbroken\n");
    assert_eq!(result.status, ValidationStatus::ParseError);
    assert!(result.parse_errors[0].contains("<Name>"));
}

#[test]
fn discrepancy_serializes_camel_case_without_absent_fields() {
    let record = DiscrepancyRecord::new(IssueCategory::MissingActuator, "Hand Actuator", "-Empty-")
        .at_location("Left Arm")
        .at_index(3);
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "category": "MISSING_ACTUATOR",
            "location": "Left Arm",
            "index": 3,
            "expected": "Hand Actuator",
            "actual": "-Empty-",
            "suggestion": "Actuator dropped from the slot layout"
        })
    );
}
