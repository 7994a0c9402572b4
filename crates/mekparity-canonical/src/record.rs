use crate::enums::{
    ArmorType, CockpitType, Configuration, EngineType, Era, GyroType, HeatSinkType, RulesLevel,
    StructureType, TechBase, UnitType,
};
use crate::location::MechLocation;
use crate::validation::ValidationError;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Engine type and rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    /// Engine construction type.
    #[serde(rename = "type")]
    pub engine_type: EngineType,
    /// Engine rating.
    pub rating: u32,
}

/// Armor points for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationArmor {
    /// Location label (mech location name or tag-block position label).
    pub location: String,
    /// Front armor points.
    pub front: u32,
    /// Rear armor points, torso locations only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rear: Option<u32>,
}

/// Armor type plus per-location allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    /// Armor type.
    #[serde(rename = "type")]
    pub armor_type: ArmorType,
    /// Allocation in layout order.
    pub allocation: Vec<LocationArmor>,
}

impl Armor {
    /// Armor entry for `location`, matched by label.
    pub fn get(&self, location: &str) -> Option<&LocationArmor> {
        self.allocation.iter().find(|a| a.location == location)
    }

    /// Total armor points, front and rear.
    pub fn total(&self) -> u32 {
        self.allocation
            .iter()
            .map(|a| a.front + a.rear.unwrap_or(0))
            .sum()
    }
}

/// Heat sink type and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatSinks {
    /// Heat sink type.
    #[serde(rename = "type")]
    pub sink_type: HeatSinkType,
    /// Number of heat sinks.
    pub count: u32,
}

/// Walk and jump movement points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Movement {
    /// Walking (cruise) MP.
    pub walk: u32,
    /// Jumping MP.
    pub jump: u32,
}

/// One mounted equipment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentMount {
    /// Equipment name as written in the source.
    pub name: String,
    /// Mount location label.
    pub location: String,
    /// Rear-facing mount.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rear: bool,
    /// Pod-mounted on an omni chassis.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub omnipod: bool,
    /// Turret-mounted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub turret: bool,
}

/// Critical slots of one location. `None` is an empty slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSlots {
    /// Location.
    pub location: MechLocation,
    /// Slots in order, at most the location's capacity.
    pub slots: Vec<Option<String>>,
}

/// Crew role counts for vehicles and large craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrewRoles {
    /// General crew.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew: Option<u32>,
    /// Officers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officers: Option<u32>,
    /// Gunners.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gunners: Option<u32>,
    /// Passengers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passengers: Option<u32>,
}

/// Free-text background fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fluff {
    /// Overview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<String>,
    /// Deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    /// History.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
    /// Manufacturer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Primary factory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_factory: Option<String>,
    /// Designer notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `SYSTEM:Manufacturer` entries in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_manufacturers: Vec<String>,
}

/// Type-specific and bookkeeping fields; each is `None` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitExtras {
    /// Source book or publication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Master Unit List identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mul_id: Option<u32>,
    /// Vehicle motion type (tracked, wheeled, hover, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion_type: Option<String>,
    /// Battle armor troopers per squad.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trooper_count: Option<u32>,
    /// Infantry squad size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squad_size: Option<u32>,
    /// Infantry squad count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squad_count: Option<u32>,
    /// Crew roles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew: Option<CrewRoles>,
    /// Transporter bay descriptors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transporters: Option<Vec<String>>,
    /// `<UnitType>` token as written in the source file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_type_token: Option<String>,
    /// Chassis of a mixed-tech unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixed_chassis: Option<TechBase>,
}

/// Normalized unit shared by serializers and downstream calculators.
///
/// Records are produced by the format builders and treated as immutable
/// afterwards: nothing in the pipeline mutates one once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalUnitRecord {
    /// Chassis name.
    pub chassis: String,
    /// Model designation (may be empty).
    pub model: String,
    /// Unit-type category.
    pub unit_type: UnitType,
    /// Structural layout.
    pub configuration: Configuration,
    /// Omni chassis flag.
    #[serde(default)]
    pub omni: bool,
    /// Technology base.
    pub tech_base: TechBase,
    /// Rules level.
    pub rules_level: RulesLevel,
    /// Era derived from `year`.
    pub era: Era,
    /// Introduction year.
    pub year: u32,
    /// Tonnage.
    pub tonnage: f64,
    /// Engine.
    pub engine: Engine,
    /// Internal structure.
    pub structure: StructureType,
    /// Gyro.
    pub gyro: GyroType,
    /// Cockpit.
    pub cockpit: CockpitType,
    /// Armor.
    pub armor: Armor,
    /// Heat sinks.
    pub heat_sinks: HeatSinks,
    /// Movement.
    pub movement: Movement,
    /// Equipment in source order.
    pub equipment: Vec<EquipmentMount>,
    /// Critical slots per location, in configuration order.
    pub critical_slots: Vec<LocationSlots>,
    /// Quirk set, `None` when the source had none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quirks: Option<IndexSet<String>>,
    /// Weapon quirks keyed by `location:slot:weapon`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon_quirks: Option<IndexMap<String, Vec<String>>>,
    /// Background text.
    pub fluff: Fluff,
    /// Type-specific optional fields.
    pub extras: UnitExtras,
}

impl CanonicalUnitRecord {
    /// Slots recorded for `location`, if any.
    pub fn slots(&self, location: MechLocation) -> Option<&[Option<String>]> {
        self.critical_slots
            .iter()
            .find(|s| s.location == location)
            .map(|s| s.slots.as_slice())
    }

    /// Checks the record invariants.
    ///
    /// Slot lists never exceed their location's capacity and only use
    /// locations of the record's configuration; tonnage is finite and
    /// non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chassis.trim().is_empty() {
            return Err(ValidationError::PatternMismatch {
                field: "chassis",
                value: self.chassis.clone(),
            });
        }
        if !self.tonnage.is_finite() || self.tonnage < 0.0 {
            return Err(ValidationError::OutOfBounds {
                field: "tonnage",
                value: self.tonnage.to_string(),
            });
        }
        for entry in &self.critical_slots {
            if !self.configuration.has_location(entry.location) {
                return Err(ValidationError::ForeignLocation {
                    location: entry.location.name(),
                    configuration: self.configuration.name(),
                });
            }
            if entry.slots.len() > entry.location.capacity() {
                return Err(ValidationError::CapacityExceeded {
                    location: entry.location.name(),
                    len: entry.slots.len(),
                    capacity: entry.location.capacity(),
                });
            }
        }
        Ok(())
    }
}
