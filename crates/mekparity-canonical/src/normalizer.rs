use crate::enums::{
    ArmorType, CanonicalEnum, CockpitType, Configuration, EngineType, Era, GyroType,
    HeatSinkType, RulesLevel, StructureType, TechBase,
};
use crate::notes::{NormalizationNote, NormalizationReport, Resolution};
use tracing::{debug, warn};

/// Keyword predicate evaluated against the upper-cased input.
#[derive(Debug, Clone, Copy)]
pub enum Keywords {
    /// Every keyword must occur.
    All(&'static [&'static str]),
    /// At least one keyword must occur.
    Any(&'static [&'static str]),
}

impl Keywords {
    /// Returns true if the upper-cased text satisfies the predicate.
    pub fn matches(&self, upper: &str) -> bool {
        match self {
            Keywords::All(words) => words.iter().all(|w| upper.contains(w)),
            Keywords::Any(words) => words.iter().any(|w| upper.contains(w)),
        }
    }
}

/// One `(predicate, result)` row of a cascade.
#[derive(Debug, Clone, Copy)]
pub struct Rule<T: 'static> {
    /// Predicate over the upper-cased input.
    pub when: Keywords,
    /// Value produced when the predicate holds.
    pub then: T,
}

const fn rule<T>(when: Keywords, then: T) -> Rule<T> {
    Rule { when, then }
}

/// Ordered normalization cascade for one enumeration.
///
/// Resolution order: canonical text, alias table (both case-insensitive),
/// keyword rules in table order, then the default.
#[derive(Debug)]
pub struct Cascade<T: 'static> {
    /// Alias table.
    pub aliases: &'static [(&'static str, T)],
    /// Keyword rules, most specific first.
    pub rules: &'static [Rule<T>],
    /// Fallback when nothing matches.
    pub default: T,
}

/// Result of running a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized<T> {
    /// Resolved value.
    pub value: T,
    /// Which stage produced the value.
    pub resolution: Resolution,
}

impl<T: CanonicalEnum> Cascade<T> {
    /// Runs the cascade over `raw`.
    pub fn resolve(&self, raw: &str) -> Normalized<T> {
        let clean = raw.trim();

        if let Some(value) = T::ALL
            .iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(clean))
        {
            return Normalized {
                value: *value,
                resolution: Resolution::Canonical,
            };
        }

        if let Some((_, value)) = self
            .aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(clean))
        {
            return Normalized {
                value: *value,
                resolution: Resolution::Alias,
            };
        }

        let upper = clean.to_ascii_uppercase();
        if let Some((index, rule)) = self
            .rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.when.matches(&upper))
        {
            return Normalized {
                value: rule.then,
                resolution: Resolution::Rule(index),
            };
        }

        Normalized {
            value: self.default,
            resolution: Resolution::Default,
        }
    }
}

/// Enumeration that can be normalized from free text.
pub trait Normalize: CanonicalEnum {
    /// The enumeration's cascade table.
    fn cascade() -> &'static Cascade<Self>;

    /// Tech-base variant of an ambiguous value; identity unless overridden.
    fn for_tech_base(self, _tech_base: TechBase) -> Self {
        self
    }
}

/// Normalizes `raw` without tech-base context.
pub fn normalize<T: Normalize>(raw: &str) -> Normalized<T> {
    T::cascade().resolve(raw)
}

/// Normalizes `raw`, letting `tech_base` disambiguate when no explicit
/// canonical or alias entry matched.
pub fn normalize_in_context<T: Normalize>(raw: &str, tech_base: TechBase) -> Normalized<T> {
    let normalized = normalize::<T>(raw);
    match normalized.resolution {
        Resolution::Canonical | Resolution::Alias => normalized,
        _ => {
            let value = normalized.value.for_tech_base(tech_base);
            if value != normalized.value {
                Normalized {
                    value,
                    resolution: Resolution::TechContext,
                }
            } else {
                normalized
            }
        }
    }
}

/// Stateless-per-unit normalizer that records notes as it resolves fields.
#[derive(Debug, Default)]
pub struct FieldNormalizer {
    report: NormalizationReport,
}

impl FieldNormalizer {
    /// Creates a normalizer with an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes one field, noting anything that was not an exact match.
    pub fn field<T: Normalize>(&mut self, field: &str, raw: &str) -> T {
        let normalized = normalize::<T>(raw);
        self.note(field, raw, normalized)
    }

    /// Normalizes one field with tech-base context.
    pub fn field_in_context<T: Normalize>(
        &mut self,
        field: &str,
        raw: &str,
        tech_base: TechBase,
    ) -> T {
        let normalized = normalize_in_context::<T>(raw, tech_base);
        self.note(field, raw, normalized)
    }

    /// Consumes the normalizer and returns its report.
    pub fn finish(self) -> NormalizationReport {
        self.report
    }

    fn note<T: Normalize>(&mut self, field: &str, raw: &str, normalized: Normalized<T>) -> T {
        if !matches!(
            normalized.resolution,
            Resolution::Canonical | Resolution::Alias
        ) {
            if normalized.resolution == Resolution::Default && !raw.trim().is_empty() {
                warn!(
                    field,
                    raw,
                    resolved = normalized.value.as_str(),
                    "unrecognized value, using default"
                );
            } else {
                debug!(
                    field,
                    raw,
                    resolved = normalized.value.as_str(),
                    "field resolved by {:?}",
                    normalized.resolution
                );
            }
            self.report.push(NormalizationNote {
                field: field.to_string(),
                raw: raw.trim().to_string(),
                resolved: normalized.value.as_str().to_string(),
                resolution: normalized.resolution,
            });
        }
        normalized.value
    }
}

use Keywords::{All, Any};

static TECH_BASE: Cascade<TechBase> = Cascade {
    aliases: &[
        ("IS", TechBase::InnerSphere),
        ("IS Level 1", TechBase::InnerSphere),
        ("IS Level 2", TechBase::InnerSphere),
        ("IS Level 3", TechBase::InnerSphere),
        ("IS Level 4", TechBase::InnerSphere),
        ("CL", TechBase::Clan),
        ("Clan Level 1", TechBase::Clan),
        ("Clan Level 2", TechBase::Clan),
        ("Clan Level 3", TechBase::Clan),
        ("Clan Level 4", TechBase::Clan),
        ("Mixed (IS Chassis)", TechBase::Mixed),
        ("Mixed (Clan Chassis)", TechBase::Mixed),
        ("0", TechBase::InnerSphere),
        ("1", TechBase::Clan),
        ("2", TechBase::Mixed),
    ],
    rules: &[
        rule(Any(&["MIXED"]), TechBase::Mixed),
        rule(Any(&["CLAN"]), TechBase::Clan),
        rule(Any(&["INNER SPHERE", "IS "]), TechBase::InnerSphere),
    ],
    default: TechBase::InnerSphere,
};

impl Normalize for TechBase {
    fn cascade() -> &'static Cascade<Self> {
        &TECH_BASE
    }
}

static RULES_LEVEL: Cascade<RulesLevel> = Cascade {
    aliases: &[
        ("0", RulesLevel::Introductory),
        ("1", RulesLevel::Standard),
        ("2", RulesLevel::Advanced),
        ("3", RulesLevel::Experimental),
        ("4", RulesLevel::Unofficial),
        ("IS Level 1", RulesLevel::Introductory),
        ("IS Level 2", RulesLevel::Standard),
        ("IS Level 3", RulesLevel::Advanced),
        ("IS Level 4", RulesLevel::Experimental),
        ("Clan Level 1", RulesLevel::Introductory),
        ("Clan Level 2", RulesLevel::Standard),
        ("Clan Level 3", RulesLevel::Advanced),
        ("Clan Level 4", RulesLevel::Experimental),
        ("Mixed (IS Chassis) Level 1", RulesLevel::Introductory),
        ("Mixed (IS Chassis) Level 2", RulesLevel::Standard),
        ("Mixed (IS Chassis) Level 3", RulesLevel::Advanced),
        ("Mixed (IS Chassis) Level 4", RulesLevel::Experimental),
        ("Mixed (Clan Chassis) Level 1", RulesLevel::Introductory),
        ("Mixed (Clan Chassis) Level 2", RulesLevel::Standard),
        ("Mixed (Clan Chassis) Level 3", RulesLevel::Advanced),
        ("Mixed (Clan Chassis) Level 4", RulesLevel::Experimental),
    ],
    rules: &[
        rule(Any(&["INTRO"]), RulesLevel::Introductory),
        rule(Any(&["EXPERIMENTAL"]), RulesLevel::Experimental),
        rule(Any(&["ADVANCED"]), RulesLevel::Advanced),
        rule(Any(&["UNOFFICIAL"]), RulesLevel::Unofficial),
        rule(Any(&["0"]), RulesLevel::Introductory),
        rule(Any(&["1"]), RulesLevel::Standard),
        rule(Any(&["2"]), RulesLevel::Advanced),
        rule(Any(&["3"]), RulesLevel::Experimental),
        rule(Any(&["4"]), RulesLevel::Unofficial),
    ],
    default: RulesLevel::Standard,
};

impl Normalize for RulesLevel {
    fn cascade() -> &'static Cascade<Self> {
        &RULES_LEVEL
    }
}

static ERA: Cascade<Era> = Cascade {
    aliases: &[
        ("Succession War", Era::SuccessionWars),
        ("Jihad", Era::CivilWar),
        ("Early Succession Wars", Era::SuccessionWars),
        ("Late Succession Wars", Era::SuccessionWars),
        ("Renaissance", Era::SuccessionWars),
    ],
    rules: &[
        rule(Any(&["SPACEFLIGHT"]), Era::EarlySpaceflight),
        rule(Any(&["AGE OF WAR"]), Era::AgeOfWar),
        rule(Any(&["STAR LEAGUE"]), Era::StarLeague),
        rule(Any(&["SUCCESSION"]), Era::SuccessionWars),
        rule(Any(&["INVASION"]), Era::ClanInvasion),
        rule(Any(&["CIVIL"]), Era::CivilWar),
        rule(Any(&["ILCLAN"]), Era::IlClan),
        rule(Any(&["DARK"]), Era::DarkAge),
    ],
    default: Era::SuccessionWars,
};

impl Normalize for Era {
    fn cascade() -> &'static Cascade<Self> {
        &ERA
    }
}

static ENGINE_TYPE: Cascade<EngineType> = Cascade {
    aliases: &[
        ("Fusion Engine(IS)", EngineType::Fusion),
        ("Fusion Engine (IS)", EngineType::Fusion),
        ("Fusion", EngineType::Fusion),
        ("Standard Fusion", EngineType::Fusion),
        ("XL Engine(IS)", EngineType::Xl),
        ("XL Engine (IS)", EngineType::Xl),
        ("XL Fusion Engine", EngineType::Xl),
        ("Extra-Light Engine", EngineType::Xl),
        ("XL Engine (Clan)", EngineType::ClanXl),
        ("Clan XL Engine", EngineType::ClanXl),
        ("Light Engine(IS)", EngineType::Light),
        ("Light Fusion Engine", EngineType::Light),
        ("Compact Fusion Engine", EngineType::Compact),
        ("XXL Engine(IS)", EngineType::Xxl),
        ("ICE Engine", EngineType::Ice),
        ("I.C.E.", EngineType::Ice),
        ("Internal Combustion Engine", EngineType::Ice),
        ("Fuel Cell Engine", EngineType::FuelCell),
        ("Fuel-Cell Engine", EngineType::FuelCell),
        ("Fuel-Cell", EngineType::FuelCell),
        ("Fission Engine", EngineType::Fission),
        ("0", EngineType::Fusion),
        ("1", EngineType::Xl),
        ("2", EngineType::Light),
        ("3", EngineType::Compact),
        ("4", EngineType::ClanXl),
        ("5", EngineType::Xxl),
        ("6", EngineType::Ice),
        ("7", EngineType::FuelCell),
        ("8", EngineType::Fission),
        ("9", EngineType::ClanXxl),
    ],
    rules: &[
        rule(All(&["XXL", "CLAN"]), EngineType::ClanXxl),
        rule(Any(&["XXL"]), EngineType::Xxl),
        rule(All(&["XL", "CLAN"]), EngineType::ClanXl),
        rule(Any(&["XL", "EXTRA-LIGHT", "EXTRALIGHT"]), EngineType::Xl),
        rule(Any(&["LIGHT"]), EngineType::Light),
        rule(Any(&["COMPACT"]), EngineType::Compact),
        rule(Any(&["I.C.E", "ICE", "COMBUSTION"]), EngineType::Ice),
        rule(Any(&["FUEL", "CELL"]), EngineType::FuelCell),
        rule(Any(&["FISSION"]), EngineType::Fission),
    ],
    default: EngineType::Fusion,
};

impl Normalize for EngineType {
    fn cascade() -> &'static Cascade<Self> {
        &ENGINE_TYPE
    }

    fn for_tech_base(self, tech_base: TechBase) -> Self {
        match (self, tech_base) {
            (EngineType::Xl, TechBase::Clan) => EngineType::ClanXl,
            (EngineType::Xxl, TechBase::Clan) => EngineType::ClanXxl,
            (other, _) => other,
        }
    }
}

static STRUCTURE_TYPE: Cascade<StructureType> = Cascade {
    aliases: &[
        ("IS Standard", StructureType::Standard),
        ("Standard Structure", StructureType::Standard),
        ("IS Endo Steel", StructureType::EndoSteel),
        ("Endo-Steel", StructureType::EndoSteel),
        ("Clan Endo-Steel", StructureType::EndoSteelClan),
        ("Endo Composite", StructureType::EndoComposite),
        ("Reinforced Structure", StructureType::Reinforced),
        ("Composite Structure", StructureType::Composite),
        ("Industrial Structure", StructureType::Industrial),
    ],
    rules: &[
        rule(All(&["ENDO", "COMPOSITE"]), StructureType::EndoComposite),
        rule(All(&["ENDO", "CLAN"]), StructureType::EndoSteelClan),
        rule(Any(&["ENDO"]), StructureType::EndoSteel),
        rule(Any(&["REINFORCED"]), StructureType::Reinforced),
        rule(Any(&["COMPOSITE"]), StructureType::Composite),
        rule(Any(&["INDUSTRIAL"]), StructureType::Industrial),
    ],
    default: StructureType::Standard,
};

impl Normalize for StructureType {
    fn cascade() -> &'static Cascade<Self> {
        &STRUCTURE_TYPE
    }

    fn for_tech_base(self, tech_base: TechBase) -> Self {
        match (self, tech_base) {
            (StructureType::EndoSteel, TechBase::Clan) => StructureType::EndoSteelClan,
            (other, _) => other,
        }
    }
}

static ARMOR_TYPE: Cascade<ArmorType> = Cascade {
    aliases: &[
        ("Standard Armor", ArmorType::Standard),
        ("Standard(Inner Sphere)", ArmorType::Standard),
        ("Standard(Clan)", ArmorType::Standard),
        ("Ferro-Fibrous Armor", ArmorType::FerroFibrous),
        ("Ferro-Fibrous(Inner Sphere)", ArmorType::FerroFibrous),
        ("IS Ferro-Fibrous", ArmorType::FerroFibrous),
        ("Clan Ferro-Fibrous", ArmorType::FerroFibrousClan),
        ("Light Ferro-Fibrous Armor", ArmorType::LightFerroFibrous),
        ("Heavy Ferro-Fibrous Armor", ArmorType::HeavyFerroFibrous),
        ("Stealth Armor", ArmorType::Stealth),
        ("Reactive Armor", ArmorType::Reactive),
        ("Reflective Armor", ArmorType::Reflective),
        ("Laser-Reflective", ArmorType::Reflective),
        ("Hardened Armor", ArmorType::Hardened),
        ("Primitive Armor", ArmorType::Primitive),
        ("Industrial Armor", ArmorType::Industrial),
        ("Commercial Armor", ArmorType::Commercial),
        ("Heavy Industrial Armor", ArmorType::HeavyIndustrial),
        ("Impact-Resistant Armor", ArmorType::ImpactResistant),
        ("0", ArmorType::Standard),
        ("1", ArmorType::FerroFibrous),
        ("2", ArmorType::Reactive),
        ("3", ArmorType::Reflective),
        ("4", ArmorType::Hardened),
        ("5", ArmorType::LightFerroFibrous),
        ("6", ArmorType::HeavyFerroFibrous),
        ("8", ArmorType::Stealth),
    ],
    rules: &[
        rule(Any(&["STEALTH"]), ArmorType::Stealth),
        rule(Any(&["REACTIVE"]), ArmorType::Reactive),
        rule(Any(&["REFLECTIVE", "LASER-REFLECT"]), ArmorType::Reflective),
        rule(Any(&["HARDENED"]), ArmorType::Hardened),
        rule(All(&["HEAVY", "FERRO"]), ArmorType::HeavyFerroFibrous),
        rule(All(&["LIGHT", "FERRO"]), ArmorType::LightFerroFibrous),
        rule(All(&["FERRO", "CLAN"]), ArmorType::FerroFibrousClan),
        rule(Any(&["FERRO"]), ArmorType::FerroFibrous),
        rule(Any(&["PRIMITIVE"]), ArmorType::Primitive),
        rule(Any(&["COMMERCIAL"]), ArmorType::Commercial),
        rule(All(&["IMPACT", "RESIST"]), ArmorType::ImpactResistant),
        rule(All(&["HEAVY", "INDUSTRIAL"]), ArmorType::HeavyIndustrial),
        rule(Any(&["INDUSTRIAL"]), ArmorType::Industrial),
    ],
    default: ArmorType::Standard,
};

impl Normalize for ArmorType {
    fn cascade() -> &'static Cascade<Self> {
        &ARMOR_TYPE
    }

    fn for_tech_base(self, tech_base: TechBase) -> Self {
        match (self, tech_base) {
            (ArmorType::FerroFibrous, TechBase::Clan) => ArmorType::FerroFibrousClan,
            (other, _) => other,
        }
    }
}

static HEAT_SINK_TYPE: Cascade<HeatSinkType> = Cascade {
    aliases: &[
        ("Single Heat Sink", HeatSinkType::Single),
        ("Single Heat Sinks", HeatSinkType::Single),
        ("Double Heat Sink", HeatSinkType::Double),
        ("Double Heat Sinks", HeatSinkType::Double),
        ("Double (IS)", HeatSinkType::Double),
        ("IS Double", HeatSinkType::Double),
        ("Clan Double Heat Sink", HeatSinkType::DoubleClan),
        ("Clan Double", HeatSinkType::DoubleClan),
        ("Compact Heat Sink", HeatSinkType::Compact),
        ("Laser Heat Sink", HeatSinkType::Laser),
        ("0", HeatSinkType::Single),
        ("1", HeatSinkType::Double),
    ],
    rules: &[
        rule(All(&["DOUBLE", "CLAN"]), HeatSinkType::DoubleClan),
        rule(Any(&["DOUBLE"]), HeatSinkType::Double),
        rule(Any(&["COMPACT"]), HeatSinkType::Compact),
        rule(Any(&["LASER"]), HeatSinkType::Laser),
    ],
    default: HeatSinkType::Single,
};

impl Normalize for HeatSinkType {
    fn cascade() -> &'static Cascade<Self> {
        &HEAT_SINK_TYPE
    }

    fn for_tech_base(self, tech_base: TechBase) -> Self {
        match (self, tech_base) {
            (HeatSinkType::Double, TechBase::Clan) => HeatSinkType::DoubleClan,
            (other, _) => other,
        }
    }
}

static GYRO_TYPE: Cascade<GyroType> = Cascade {
    aliases: &[
        ("Standard", GyroType::Standard),
        ("Extra-Light Gyro", GyroType::Xl),
        ("Heavy-Duty Gyro", GyroType::HeavyDuty),
        ("Super Heavy Gyro", GyroType::Superheavy),
        ("None", GyroType::NoGyro),
        ("0", GyroType::Standard),
        ("1", GyroType::Xl),
        ("2", GyroType::Compact),
        ("3", GyroType::HeavyDuty),
        ("4", GyroType::Superheavy),
    ],
    rules: &[
        rule(Any(&["SUPERHEAVY", "SUPER HEAVY"]), GyroType::Superheavy),
        rule(Any(&["XL", "EXTRA"]), GyroType::Xl),
        rule(Any(&["COMPACT"]), GyroType::Compact),
        rule(Any(&["HEAVY"]), GyroType::HeavyDuty),
    ],
    default: GyroType::Standard,
};

impl Normalize for GyroType {
    fn cascade() -> &'static Cascade<Self> {
        &GYRO_TYPE
    }
}

static COCKPIT_TYPE: Cascade<CockpitType> = Cascade {
    aliases: &[
        ("Standard", CockpitType::Standard),
        ("Small", CockpitType::Small),
        ("Torso Cockpit", CockpitType::TorsoMounted),
        ("Primitive", CockpitType::Primitive),
        ("Industrial", CockpitType::Industrial),
        ("Primitive Industrial", CockpitType::PrimitiveIndustrial),
    ],
    rules: &[],
    default: CockpitType::Standard,
};

impl Normalize for CockpitType {
    fn cascade() -> &'static Cascade<Self> {
        &COCKPIT_TYPE
    }
}

static CONFIGURATION: Cascade<Configuration> = Cascade {
    aliases: &[
        ("Biped Omnimech", Configuration::Biped),
        ("Quad Omnimech", Configuration::Quad),
        ("Tripod Omnimech", Configuration::Tripod),
    ],
    rules: &[
        rule(Any(&["QUADVEE"]), Configuration::QuadVee),
        rule(Any(&["TRIPOD"]), Configuration::Tripod),
        rule(Any(&["LAM"]), Configuration::Lam),
        rule(Any(&["QUAD"]), Configuration::Quad),
        rule(Any(&["BIPED"]), Configuration::Biped),
    ],
    default: Configuration::Biped,
};

impl Normalize for Configuration {
    fn cascade() -> &'static Cascade<Self> {
        &CONFIGURATION
    }
}
