use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of discrepancy categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    /// Identity, configuration, tech base or mass differs.
    HeaderMismatch,
    /// Engine type or rating differs.
    EngineMismatch,
    /// Walk or jump MP differs.
    MovementMismatch,
    /// Armor points differ for a location.
    ArmorMismatch,
    /// Equipment in the original is missing from the generated text.
    MissingEquipment,
    /// Equipment in the generated text is not in the original.
    ExtraEquipment,
    /// An actuator slot in the original is missing from the generated text.
    MissingActuator,
    /// An actuator slot appears only in the generated text.
    ExtraActuator,
    /// Two slots at the same position differ.
    SlotMismatch,
    /// The occupied slot counts of a location differ.
    SlotCountMismatch,
    /// A quirk or weapon quirk appears on one side only.
    QuirkMismatch,
    /// A fluff text field differs.
    FluffMismatch,
    /// The source could not be parsed.
    ParseError,
}

impl IssueCategory {
    /// Every category, in declaration order.
    pub const ALL: [IssueCategory; 13] = [
        IssueCategory::HeaderMismatch,
        IssueCategory::EngineMismatch,
        IssueCategory::MovementMismatch,
        IssueCategory::ArmorMismatch,
        IssueCategory::MissingEquipment,
        IssueCategory::ExtraEquipment,
        IssueCategory::MissingActuator,
        IssueCategory::ExtraActuator,
        IssueCategory::SlotMismatch,
        IssueCategory::SlotCountMismatch,
        IssueCategory::QuirkMismatch,
        IssueCategory::FluffMismatch,
        IssueCategory::ParseError,
    ];

    /// Wire name, e.g. `MISSING_ACTUATOR`.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::HeaderMismatch => "HEADER_MISMATCH",
            IssueCategory::EngineMismatch => "ENGINE_MISMATCH",
            IssueCategory::MovementMismatch => "MOVEMENT_MISMATCH",
            IssueCategory::ArmorMismatch => "ARMOR_MISMATCH",
            IssueCategory::MissingEquipment => "MISSING_EQUIPMENT",
            IssueCategory::ExtraEquipment => "EXTRA_EQUIPMENT",
            IssueCategory::MissingActuator => "MISSING_ACTUATOR",
            IssueCategory::ExtraActuator => "EXTRA_ACTUATOR",
            IssueCategory::SlotMismatch => "SLOT_MISMATCH",
            IssueCategory::SlotCountMismatch => "SLOT_COUNT_MISMATCH",
            IssueCategory::QuirkMismatch => "QUIRK_MISMATCH",
            IssueCategory::FluffMismatch => "FLUFF_MISMATCH",
            IssueCategory::ParseError => "PARSE_ERROR",
        }
    }

    /// Default remediation hint.
    pub fn suggestion(&self) -> &'static str {
        match self {
            IssueCategory::HeaderMismatch => "Check header field parsing and normalization",
            IssueCategory::EngineMismatch => "Check engine type and rating normalization",
            IssueCategory::MovementMismatch => "Check walk and jump MP parsing",
            IssueCategory::ArmorMismatch => "Check armor allocation for this location",
            IssueCategory::MissingEquipment => "Equipment from the source was not regenerated",
            IssueCategory::ExtraEquipment => "Generated equipment is not in the source",
            IssueCategory::MissingActuator => "Actuator dropped from the slot layout",
            IssueCategory::ExtraActuator => "Actuator added to the slot layout",
            IssueCategory::SlotMismatch => "Check critical slot ordering",
            IssueCategory::SlotCountMismatch => "Check slot padding and truncation",
            IssueCategory::QuirkMismatch => "Check quirk collection",
            IssueCategory::FluffMismatch => "Check fluff text preservation",
            IssueCategory::ParseError => "Fix the source file or extend the parser",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured finding from a comparison.
///
/// Built only by the comparator (and for parse failures); never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyRecord {
    /// Category.
    pub category: IssueCategory,
    /// Location the finding applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Slot index within the location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Field key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Value in the original text.
    pub expected: String,
    /// Value in the generated text.
    pub actual: String,
    /// Remediation hint.
    pub suggestion: String,
}

impl DiscrepancyRecord {
    /// Creates a record with the category's default suggestion.
    pub fn new(
        category: IssueCategory,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            category,
            location: None,
            index: None,
            field: None,
            expected: expected.into(),
            actual: actual.into(),
            suggestion: category.suggestion().to_string(),
        }
    }

    /// Sets the location.
    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the slot index.
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Sets the field key.
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Replaces the suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }
}

impl fmt::Display for DiscrepancyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        if let Some(location) = &self.location {
            write!(f, " [{}", location)?;
            if let Some(index) = self.index {
                write!(f, " #{}", index)?;
            }
            f.write_str("]")?;
        }
        if let Some(field) = &self.field {
            write!(f, " {}", field)?;
        }
        write!(f, ": expected '{}', got '{}'", self.expected, self.actual)
    }
}
