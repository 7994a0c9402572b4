//! Canonical data model for constructed game units.
//!
//! Every grammar reader produces a [`CanonicalUnitRecord`]; every serializer
//! and downstream calculator consumes one. Free-text fields are mapped onto
//! closed enumerations by the ordered cascades in [`normalizer`].
//!
#![deny(missing_docs)]

/// Record digests.
pub mod digest;
/// Closed enumerations and their canonical text.
pub mod enums;
/// Unit identifiers.
pub mod identifiers;
/// Mech locations, configuration layouts and tag-block armor labels.
pub mod location;
/// Ordered normalization cascades.
pub mod normalizer;
/// Informational notes emitted while normalizing.
pub mod notes;
/// The canonical unit record.
pub mod record;
/// Validation errors for canonical primitives.
pub mod validation;

pub use digest::{record_digest, Digest, DigestAlg, DigestError};
pub use enums::{
    ArmorType, CanonicalEnum, CockpitType, Configuration, EngineType, Era, GyroType,
    HeatSinkType, RulesLevel, StructureType, TechBase, UnitType, UNIT_TYPE_TOKENS,
};
pub use identifiers::UnitId;
pub use location::{tag_armor_label, tag_armor_labels, MechLocation, REAR_ARMOR_ORDER};
pub use normalizer::{
    normalize, normalize_in_context, Cascade, FieldNormalizer, Keywords, Normalize, Normalized,
    Rule,
};
pub use notes::{NormalizationNote, NormalizationReport, Resolution};
pub use record::{
    Armor, CanonicalUnitRecord, CrewRoles, Engine, EquipmentMount, Fluff, HeatSinks,
    LocationArmor, LocationSlots, Movement, UnitExtras,
};
pub use validation::ValidationError;
