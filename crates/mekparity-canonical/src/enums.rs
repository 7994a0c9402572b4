use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed enumeration with a canonical textual form.
///
/// The canonical text is what the serializers emit, and every normalizer
/// accepts it back unchanged.
pub trait CanonicalEnum: Copy + PartialEq + fmt::Debug + 'static {
    /// Every variant in declaration order.
    const ALL: &'static [Self];

    /// Canonical text for the variant.
    fn as_str(&self) -> &'static str;
}

macro_rules! canonical_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl CanonicalEnum for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

canonical_enum!(
    /// Technology base of a unit.
    TechBase {
        /// Inner Sphere technology.
        InnerSphere => "Inner Sphere",
        /// Clan technology.
        Clan => "Clan",
        /// Mixed technology, either chassis.
        Mixed => "Mixed",
    }
);

impl TechBase {
    /// Chassis named by a mixed tech-base text such as `Mixed (Clan Chassis)`.
    pub fn mixed_chassis(text: &str) -> Option<TechBase> {
        let upper = text.to_ascii_uppercase();
        if upper.contains("CLAN") {
            Some(TechBase::Clan)
        } else if upper.contains("IS CHASSIS") || upper.contains("INNER SPHERE") {
            Some(TechBase::InnerSphere)
        } else {
            None
        }
    }

    /// `Mixed (IS Chassis)` or `Mixed (Clan Chassis)`.
    pub fn mixed_label(chassis: TechBase) -> &'static str {
        match chassis {
            TechBase::Clan => "Mixed (Clan Chassis)",
            _ => "Mixed (IS Chassis)",
        }
    }
}

canonical_enum!(
    /// Rules level a design is legal under.
    RulesLevel {
        /// Introductory rules.
        Introductory => "Introductory",
        /// Standard rules.
        Standard => "Standard",
        /// Advanced rules.
        Advanced => "Advanced",
        /// Experimental rules.
        Experimental => "Experimental",
        /// Unofficial content.
        Unofficial => "Unofficial",
    }
);

impl RulesLevel {
    /// Numeric code used by the line-oriented grammar (`rules level:N`).
    pub fn code(&self) -> u8 {
        match self {
            RulesLevel::Introductory => 0,
            RulesLevel::Standard => 1,
            RulesLevel::Advanced => 2,
            RulesLevel::Experimental => 3,
            RulesLevel::Unofficial => 4,
        }
    }

    /// Level number used by the tag-block `<type>` tag (`IS Level N`).
    pub fn tag_level(&self) -> u8 {
        match self {
            RulesLevel::Introductory => 1,
            RulesLevel::Standard => 2,
            RulesLevel::Advanced => 3,
            RulesLevel::Experimental | RulesLevel::Unofficial => 4,
        }
    }
}

canonical_enum!(
    /// Historical era, derived from the introduction year.
    Era {
        /// Before 2005.
        EarlySpaceflight => "Early Spaceflight",
        /// 2005-2570.
        AgeOfWar => "Age of War",
        /// 2571-2780.
        StarLeague => "Star League",
        /// 2781-3049.
        SuccessionWars => "Succession Wars",
        /// 3050-3067.
        ClanInvasion => "Clan Invasion",
        /// 3068-3080.
        CivilWar => "Civil War",
        /// 3081-3151.
        DarkAge => "Dark Age",
        /// 3152 onwards.
        IlClan => "ilClan",
    }
);

/// Ascending `(exclusive upper bound, era)` thresholds.
const ERA_THRESHOLDS: &[(u32, Era)] = &[
    (2005, Era::EarlySpaceflight),
    (2571, Era::AgeOfWar),
    (2781, Era::StarLeague),
    (3050, Era::SuccessionWars),
    (3068, Era::ClanInvasion),
    (3081, Era::CivilWar),
    (3152, Era::DarkAge),
];

impl Era {
    /// Maps an introduction year onto its era.
    pub fn from_year(year: u32) -> Self {
        ERA_THRESHOLDS
            .iter()
            .find(|(bound, _)| year < *bound)
            .map(|(_, era)| *era)
            .unwrap_or(Era::IlClan)
    }
}

canonical_enum!(
    /// Engine construction type.
    EngineType {
        /// Standard fusion engine.
        Fusion => "Fusion Engine",
        /// Inner Sphere extra-light engine.
        Xl => "XL Engine",
        /// Clan extra-light engine.
        ClanXl => "XL Engine(Clan)",
        /// Light fusion engine.
        Light => "Light Engine",
        /// Compact fusion engine.
        Compact => "Compact Engine",
        /// Inner Sphere XXL engine.
        Xxl => "XXL Engine",
        /// Clan XXL engine.
        ClanXxl => "XXL Engine(Clan)",
        /// Internal combustion engine.
        Ice => "ICE",
        /// Fuel cell engine.
        FuelCell => "Fuel Cell",
        /// Fission engine.
        Fission => "Fission",
    }
);

impl EngineType {
    /// Numeric code used by the tag-block `<engine_type>` tag.
    pub fn tag_code(&self) -> u8 {
        match self {
            EngineType::Fusion => 0,
            EngineType::Xl => 1,
            EngineType::Light => 2,
            EngineType::Compact => 3,
            EngineType::ClanXl => 4,
            EngineType::Xxl => 5,
            EngineType::Ice => 6,
            EngineType::FuelCell => 7,
            EngineType::Fission => 8,
            EngineType::ClanXxl => 9,
        }
    }
}

canonical_enum!(
    /// Internal structure type.
    StructureType {
        /// Standard structure.
        Standard => "Standard",
        /// Inner Sphere endo steel.
        EndoSteel => "Endo Steel",
        /// Clan endo steel.
        EndoSteelClan => "Clan Endo Steel",
        /// Endo-composite structure.
        EndoComposite => "Endo-Composite",
        /// Reinforced structure.
        Reinforced => "Reinforced",
        /// Composite structure.
        Composite => "Composite",
        /// Industrial structure.
        Industrial => "Industrial",
    }
);

canonical_enum!(
    /// Armor type.
    ArmorType {
        /// Standard armor.
        Standard => "Standard",
        /// Inner Sphere ferro-fibrous.
        FerroFibrous => "Ferro-Fibrous",
        /// Clan ferro-fibrous.
        FerroFibrousClan => "Ferro-Fibrous(Clan)",
        /// Light ferro-fibrous.
        LightFerroFibrous => "Light Ferro-Fibrous",
        /// Heavy ferro-fibrous.
        HeavyFerroFibrous => "Heavy Ferro-Fibrous",
        /// Stealth armor.
        Stealth => "Stealth",
        /// Reactive armor.
        Reactive => "Reactive",
        /// Laser-reflective armor.
        Reflective => "Reflective",
        /// Hardened armor.
        Hardened => "Hardened",
        /// Primitive armor.
        Primitive => "Primitive",
        /// Industrial armor.
        Industrial => "Industrial",
        /// Commercial armor.
        Commercial => "Commercial",
        /// Heavy industrial armor.
        HeavyIndustrial => "Heavy Industrial",
        /// Impact-resistant armor.
        ImpactResistant => "Impact-Resistant",
    }
);

impl ArmorType {
    /// Numeric code used by the tag-block `<armor_type>` tag, where one exists.
    pub fn tag_code(&self) -> Option<u8> {
        match self {
            ArmorType::Standard => Some(0),
            ArmorType::FerroFibrous => Some(1),
            ArmorType::Reactive => Some(2),
            ArmorType::Reflective => Some(3),
            ArmorType::Hardened => Some(4),
            ArmorType::LightFerroFibrous => Some(5),
            ArmorType::HeavyFerroFibrous => Some(6),
            ArmorType::Stealth => Some(8),
            _ => None,
        }
    }
}

canonical_enum!(
    /// Heat sink type.
    HeatSinkType {
        /// Single heat sinks.
        Single => "Single",
        /// Inner Sphere double heat sinks.
        Double => "Double",
        /// Clan double heat sinks.
        DoubleClan => "Double (Clan)",
        /// Compact heat sinks.
        Compact => "Compact",
        /// Laser heat sinks.
        Laser => "Laser",
    }
);

canonical_enum!(
    /// Gyro type.
    GyroType {
        /// Standard gyro.
        Standard => "Standard Gyro",
        /// Extra-light gyro.
        Xl => "XL Gyro",
        /// Compact gyro.
        Compact => "Compact Gyro",
        /// Heavy-duty gyro.
        HeavyDuty => "Heavy Duty Gyro",
        /// Superheavy gyro.
        Superheavy => "Superheavy Gyro",
        /// No gyro installed.
        NoGyro => "None",
    }
);

canonical_enum!(
    /// Cockpit type.
    CockpitType {
        /// Standard cockpit.
        Standard => "Standard Cockpit",
        /// Small cockpit.
        Small => "Small Cockpit",
        /// Command console.
        CommandConsole => "Command Console",
        /// Torso-mounted cockpit.
        TorsoMounted => "Torso-Mounted Cockpit",
        /// Primitive cockpit.
        Primitive => "Primitive Cockpit",
        /// Industrial cockpit.
        Industrial => "Industrial Cockpit",
        /// Primitive industrial cockpit.
        PrimitiveIndustrial => "Primitive Industrial Cockpit",
        /// Superheavy industrial cockpit.
        SuperheavyIndustrial => "Superheavy Industrial Cockpit",
        /// Tripod industrial cockpit.
        TripodIndustrial => "Tripod Industrial Cockpit",
        /// Superheavy tripod industrial cockpit.
        SuperheavyTripodIndustrial => "Superheavy Tripod Industrial Cockpit",
        /// Superheavy cockpit.
        Superheavy => "Superheavy Cockpit",
        /// Superheavy tripod cockpit.
        SuperheavyTripod => "Superheavy Tripod Cockpit",
        /// Interface cockpit.
        Interface => "Interface Cockpit",
        /// QuadVee cockpit.
        QuadVee => "QuadVee Cockpit",
    }
);

canonical_enum!(
    /// Structural layout; selects location vocabulary and slot capacities.
    Configuration {
        /// Two legs, two arms.
        Biped => "Biped",
        /// Four legs.
        Quad => "Quad",
        /// Three legs.
        Tripod => "Tripod",
        /// Land-air mech, biped layout.
        Lam => "LAM",
        /// QuadVee, quad layout.
        QuadVee => "QuadVee",
        /// Anything without mech locations (vehicles, aerospace, infantry).
        Other => "Other",
    }
);

canonical_enum!(
    /// Unit-type category.
    UnitType {
        /// BattleMech.
        BattleMech => "BattleMech",
        /// OmniMech.
        OmniMech => "OmniMech",
        /// IndustrialMech.
        IndustrialMech => "IndustrialMech",
        /// ProtoMech.
        ProtoMech => "ProtoMech",
        /// Combat vehicle.
        Vehicle => "Vehicle",
        /// Support vehicle.
        SupportVehicle => "Support Vehicle",
        /// VTOL.
        Vtol => "VTOL",
        /// Aerospace fighter.
        Aerospace => "Aerospace",
        /// Conventional fighter.
        ConventionalFighter => "Conventional Fighter",
        /// Small craft.
        SmallCraft => "Small Craft",
        /// DropShip.
        DropShip => "DropShip",
        /// JumpShip.
        JumpShip => "JumpShip",
        /// WarShip.
        WarShip => "WarShip",
        /// Space station.
        SpaceStation => "Space Station",
        /// Conventional infantry.
        Infantry => "Infantry",
        /// Battle armor.
        BattleArmor => "Battle Armor",
    }
);

/// Closed `<UnitType>` token table. Exact match first, then case-insensitive.
pub const UNIT_TYPE_TOKENS: &[(&str, UnitType)] = &[
    ("BattleMech", UnitType::BattleMech),
    ("Mech", UnitType::BattleMech),
    ("Biped", UnitType::BattleMech),
    ("Quad", UnitType::BattleMech),
    ("OmniMech", UnitType::OmniMech),
    ("IndustrialMech", UnitType::IndustrialMech),
    ("ProtoMech", UnitType::ProtoMech),
    ("Tank", UnitType::Vehicle),
    ("Vehicle", UnitType::Vehicle),
    ("VTOL", UnitType::Vtol),
    ("SupportTank", UnitType::SupportVehicle),
    ("LargeSupportTank", UnitType::SupportVehicle),
    ("SupportVTOL", UnitType::SupportVehicle),
    ("FixedWingSupport", UnitType::SupportVehicle),
    ("Support Vehicle", UnitType::SupportVehicle),
    ("SupportVehicle", UnitType::SupportVehicle),
    ("Aero", UnitType::Aerospace),
    ("Aerospace", UnitType::Aerospace),
    ("AeroSpaceFighter", UnitType::Aerospace),
    ("Conventional Fighter", UnitType::ConventionalFighter),
    ("ConvFighter", UnitType::ConventionalFighter),
    ("Small Craft", UnitType::SmallCraft),
    ("SmallCraft", UnitType::SmallCraft),
    ("DropShip", UnitType::DropShip),
    ("JumpShip", UnitType::JumpShip),
    ("WarShip", UnitType::WarShip),
    ("Space Station", UnitType::SpaceStation),
    ("SpaceStation", UnitType::SpaceStation),
    ("Infantry", UnitType::Infantry),
    ("BattleArmor", UnitType::BattleArmor),
    ("Battle Armor", UnitType::BattleArmor),
];

impl UnitType {
    /// Looks a `<UnitType>` token up in the closed table.
    ///
    /// Unlike the normalizer cascades this has no default: callers must treat
    /// `None` as a hard failure.
    pub fn lookup(token: &str) -> Option<Self> {
        let token = token.trim();
        UNIT_TYPE_TOKENS
            .iter()
            .find(|(key, _)| *key == token)
            .or_else(|| {
                UNIT_TYPE_TOKENS
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(token))
            })
            .map(|(_, unit_type)| *unit_type)
    }

    /// Default token for a `<UnitType>` tag when the source token is unknown.
    pub fn tag_token(&self) -> &'static str {
        match self {
            UnitType::BattleMech | UnitType::OmniMech | UnitType::IndustrialMech => "Mech",
            UnitType::ProtoMech => "ProtoMech",
            UnitType::Vehicle => "Tank",
            UnitType::SupportVehicle => "SupportTank",
            UnitType::Vtol => "VTOL",
            UnitType::Aerospace => "Aero",
            UnitType::ConventionalFighter => "ConvFighter",
            UnitType::SmallCraft => "SmallCraft",
            UnitType::DropShip => "Dropship",
            UnitType::JumpShip => "Jumpship",
            UnitType::WarShip => "Warship",
            UnitType::SpaceStation => "SpaceStation",
            UnitType::Infantry => "Infantry",
            UnitType::BattleArmor => "BattleArmor",
        }
    }
}
