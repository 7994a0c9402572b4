use crate::enums::{CanonicalEnum, Configuration, UnitType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mech body location with a fixed critical-slot capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MechLocation {
    /// Head.
    Head,
    /// Center torso.
    CenterTorso,
    /// Left torso.
    LeftTorso,
    /// Right torso.
    RightTorso,
    /// Left arm.
    LeftArm,
    /// Right arm.
    RightArm,
    /// Left leg.
    LeftLeg,
    /// Right leg.
    RightLeg,
    /// Front left leg (quad).
    FrontLeftLeg,
    /// Front right leg (quad).
    FrontRightLeg,
    /// Rear left leg (quad).
    RearLeftLeg,
    /// Rear right leg (quad).
    RearRightLeg,
    /// Center leg (tripod).
    CenterLeg,
}

/// `(location, display name, armor abbreviation, capacity)`.
const LOCATION_TABLE: &[(MechLocation, &str, &str, usize)] = &[
    (MechLocation::Head, "Head", "HD", 6),
    (MechLocation::CenterTorso, "Center Torso", "CT", 12),
    (MechLocation::LeftTorso, "Left Torso", "LT", 12),
    (MechLocation::RightTorso, "Right Torso", "RT", 12),
    (MechLocation::LeftArm, "Left Arm", "LA", 12),
    (MechLocation::RightArm, "Right Arm", "RA", 12),
    (MechLocation::LeftLeg, "Left Leg", "LL", 6),
    (MechLocation::RightLeg, "Right Leg", "RL", 6),
    (MechLocation::FrontLeftLeg, "Front Left Leg", "FLL", 6),
    (MechLocation::FrontRightLeg, "Front Right Leg", "FRL", 6),
    (MechLocation::RearLeftLeg, "Rear Left Leg", "RLL", 6),
    (MechLocation::RearRightLeg, "Rear Right Leg", "RRL", 6),
    (MechLocation::CenterLeg, "Center Leg", "CL", 6),
];

const BIPED_ORDER: &[MechLocation] = &[
    MechLocation::LeftArm,
    MechLocation::RightArm,
    MechLocation::LeftTorso,
    MechLocation::RightTorso,
    MechLocation::CenterTorso,
    MechLocation::Head,
    MechLocation::LeftLeg,
    MechLocation::RightLeg,
];

const QUAD_ORDER: &[MechLocation] = &[
    MechLocation::FrontLeftLeg,
    MechLocation::FrontRightLeg,
    MechLocation::LeftTorso,
    MechLocation::RightTorso,
    MechLocation::CenterTorso,
    MechLocation::Head,
    MechLocation::RearLeftLeg,
    MechLocation::RearRightLeg,
];

const TRIPOD_ORDER: &[MechLocation] = &[
    MechLocation::LeftArm,
    MechLocation::RightArm,
    MechLocation::LeftTorso,
    MechLocation::RightTorso,
    MechLocation::CenterTorso,
    MechLocation::Head,
    MechLocation::LeftLeg,
    MechLocation::RightLeg,
    MechLocation::CenterLeg,
];

/// Torso locations carrying rear armor, in armor-line order.
pub const REAR_ARMOR_ORDER: &[MechLocation] = &[
    MechLocation::LeftTorso,
    MechLocation::RightTorso,
    MechLocation::CenterTorso,
];

impl MechLocation {
    fn row(&self) -> &'static (MechLocation, &'static str, &'static str, usize) {
        LOCATION_TABLE
            .iter()
            .find(|row| row.0 == *self)
            .unwrap_or(&LOCATION_TABLE[0])
    }

    /// Every location, biped, quad and tripod vocabularies together.
    pub fn all() -> impl Iterator<Item = MechLocation> {
        LOCATION_TABLE.iter().map(|row| row.0)
    }

    /// Display name, also the slot-section header without its colon.
    pub fn name(&self) -> &'static str {
        self.row().1
    }

    /// Armor-line abbreviation (`LA`, `CT`, ...).
    pub fn abbreviation(&self) -> &'static str {
        self.row().2
    }

    /// Fixed critical-slot capacity.
    pub fn capacity(&self) -> usize {
        self.row().3
    }

    /// Slot-section header line, e.g. `Left Arm:`.
    pub fn header(&self) -> String {
        format!("{}:", self.name())
    }

    /// Front armor key, e.g. `LA armor`.
    pub fn armor_key(&self) -> String {
        format!("{} armor", self.abbreviation())
    }

    /// Rear armor key for torso locations, e.g. `RTL armor`.
    pub fn rear_armor_key(&self) -> Option<&'static str> {
        match self {
            MechLocation::LeftTorso => Some("RTL armor"),
            MechLocation::RightTorso => Some("RTR armor"),
            MechLocation::CenterTorso => Some("RTC armor"),
            _ => None,
        }
    }

    /// Matches a full header line exactly (surrounding whitespace ignored).
    pub fn from_header(line: &str) -> Option<Self> {
        let line = line.trim();
        let name = line.strip_suffix(':')?;
        LOCATION_TABLE
            .iter()
            .find(|row| row.1 == name)
            .map(|row| row.0)
    }

    /// Resolves a display name or armor abbreviation, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        LOCATION_TABLE
            .iter()
            .find(|row| row.1.eq_ignore_ascii_case(name) || row.2.eq_ignore_ascii_case(name))
            .map(|row| row.0)
    }
}

impl fmt::Display for MechLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Configuration {
    /// Locations carrying critical slots, in section order. Empty for `Other`.
    pub fn slot_layout(&self) -> &'static [MechLocation] {
        match self {
            Configuration::Biped | Configuration::Lam => BIPED_ORDER,
            Configuration::Quad | Configuration::QuadVee => QUAD_ORDER,
            Configuration::Tripod => TRIPOD_ORDER,
            Configuration::Other => &[],
        }
    }

    /// Returns true if the configuration has mech locations.
    pub fn is_mech(&self) -> bool {
        !self.slot_layout().is_empty()
    }

    /// Returns true if `location` belongs to this configuration.
    pub fn has_location(&self, location: MechLocation) -> bool {
        self.slot_layout().contains(&location)
    }

    /// Display name (same as the canonical text).
    pub fn name(&self) -> &'static str {
        self.as_str()
    }
}

/// Positional armor-location labels for the tag-block `<armor>` list.
pub fn tag_armor_labels(unit_type: UnitType) -> &'static [&'static str] {
    match unit_type {
        UnitType::Vehicle | UnitType::SupportVehicle => {
            &["Front", "Right", "Left", "Rear", "Turret", "Front Turret"]
        }
        UnitType::Vtol => &["Front", "Right", "Left", "Rear", "Rotor", "Turret"],
        UnitType::Aerospace | UnitType::ConventionalFighter | UnitType::SmallCraft => {
            &["Nose", "Left Wing", "Right Wing", "Aft"]
        }
        UnitType::DropShip
        | UnitType::JumpShip
        | UnitType::WarShip
        | UnitType::SpaceStation => &[
            "Nose",
            "Front Right",
            "Front Left",
            "Aft Left",
            "Aft Right",
            "Aft",
        ],
        UnitType::ProtoMech => &["Head", "Torso", "Right Arm", "Left Arm", "Legs", "Main Gun"],
        UnitType::BattleArmor | UnitType::Infantry => &["Trooper"],
        UnitType::BattleMech | UnitType::OmniMech | UnitType::IndustrialMech => &[
            "Head",
            "Center Torso",
            "Right Torso",
            "Left Torso",
            "Right Arm",
            "Left Arm",
            "Right Leg",
            "Left Leg",
        ],
    }
}

/// Label for armor position `index`, falling back to `Location N`.
pub fn tag_armor_label(unit_type: UnitType, index: usize) -> String {
    tag_armor_labels(unit_type)
        .get(index)
        .map(|label| label.to_string())
        .unwrap_or_else(|| format!("Location {}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_match_exactly() {
        assert_eq!(MechLocation::from_header("Left Arm:"), Some(MechLocation::LeftArm));
        assert_eq!(
            MechLocation::from_header("  Front Right Leg:  "),
            Some(MechLocation::FrontRightLeg)
        );
        assert_eq!(MechLocation::from_header("Center Leg:"), Some(MechLocation::CenterLeg));
        assert_eq!(MechLocation::from_header("left arm:"), None);
        assert_eq!(MechLocation::from_header("Left Arm:Medium Laser"), None);
    }

    #[test]
    fn quad_substitutes_legs_for_arms() {
        let quad = Configuration::Quad.slot_layout();
        assert!(!quad.contains(&MechLocation::LeftArm));
        assert!(quad.contains(&MechLocation::FrontLeftLeg));
        assert_eq!(quad.len(), 8);
    }

    #[test]
    fn tripod_adds_center_leg() {
        let tripod = Configuration::Tripod.slot_layout();
        assert_eq!(tripod.len(), 9);
        assert_eq!(tripod.last(), Some(&MechLocation::CenterLeg));
    }

    #[test]
    fn other_has_no_slot_layout() {
        assert!(!Configuration::Other.is_mech());
    }
}
