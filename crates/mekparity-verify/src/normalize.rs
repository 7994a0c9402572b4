//! Field-specific value normalization applied before comparing.

/// How a curated field's values are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whitespace-collapsed, case-insensitive text.
    Text,
    /// Numeric when both sides parse, text otherwise.
    Number,
    /// Engine description.
    Engine,
    /// Tech base description.
    TechBase,
    /// Armor points, possibly prefixed with an armor type.
    Armor,
}

const ENGINE_FILLER: &[&str] = &["fusion", "engine", "primitive", "large"];

/// Collapses whitespace and lowercases.
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn strip_parentheticals(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Normalizes an engine description.
///
/// `300 Fusion Engine(IS)` and `300 Fusion Engine` both become `300`;
/// `I.C.E.` becomes `ice` and `Fuel-Cell` becomes `fuelcell`.
pub fn normalize_engine(value: &str) -> String {
    let lower = strip_parentheticals(&value.to_lowercase())
        .replace("i.c.e.", "ice")
        .replace("i.c.e", "ice")
        .replace("fuel-cell", "fuelcell")
        .replace("fuel cell", "fuelcell");
    lower
        .split_whitespace()
        .filter(|word| !ENGINE_FILLER.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a tech base; every `Mixed (...)` variant becomes `mixed`.
pub fn normalize_tech_base(value: &str) -> String {
    let text = normalize_text(value);
    if text.starts_with("mixed") {
        "mixed".to_string()
    } else {
        text
    }
}

/// Normalizes an armor value, keeping the number after a `Type:` prefix.
pub fn normalize_armor(value: &str) -> String {
    let points = value.rsplit(':').next().unwrap_or(value);
    normalize_number(points)
}

/// Renders numbers canonically so `100` and `100.0` compare equal.
pub fn normalize_number(value: &str) -> String {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => format!("{}", n),
        _ => normalize_text(value),
    }
}

/// Normalizes a value according to its field kind.
pub fn normalize_value(kind: FieldKind, value: &str) -> String {
    match kind {
        FieldKind::Text => normalize_text(value),
        FieldKind::Number => normalize_number(value),
        FieldKind::Engine => normalize_engine(value),
        FieldKind::TechBase => normalize_tech_base(value),
        FieldKind::Armor => normalize_armor(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_pairs() {
        assert_eq!(normalize_engine("300 Fusion Engine(IS)"), "300");
        assert_eq!(normalize_engine("300 Fusion Engine"), "300");
        assert_eq!(normalize_engine("375 XL Engine(Clan)"), "375 xl");
        assert_eq!(normalize_engine("60 I.C.E."), "60 ice");
        assert_eq!(normalize_engine("60 ICE"), "60 ice");
        assert_eq!(normalize_engine("100 Fuel-Cell Engine"), "100 fuelcell");
        assert_eq!(normalize_engine("100 Fuel Cell"), "100 fuelcell");
        assert_eq!(normalize_engine("240 Primitive Fusion Engine"), "240");
        assert_eq!(normalize_engine("400 Large Fusion Engine"), "400");
    }

    #[test]
    fn tech_base_pairs() {
        assert_eq!(normalize_tech_base("Mixed (IS Chassis)"), "mixed");
        assert_eq!(normalize_tech_base("Mixed (Clan Chassis)"), "mixed");
        assert_eq!(normalize_tech_base("Mixed"), "mixed");
        assert_eq!(normalize_tech_base("Inner  Sphere"), "inner sphere");
    }

    #[test]
    fn armor_pairs() {
        assert_eq!(normalize_armor("Reactive(Inner Sphere):26"), "26");
        assert_eq!(normalize_armor("26"), "26");
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(normalize_number("100"), normalize_number("100.0"));
        assert_ne!(normalize_number("100"), normalize_number("95"));
    }
}
