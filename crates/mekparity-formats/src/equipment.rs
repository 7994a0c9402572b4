//! Equipment entry syntax shared by both grammars.
//!
//! Line-oriented entries carry their own location (`Medium Laser, Left Arm (R)`);
//! tag-block entries take the location from the enclosing block and mark
//! flags with suffixes (`Medium Laser (R):OMNI`).

use mekparity_canonical::EquipmentMount;

const REAR: &str = "(R)";
const TURRET: &str = "(T)";
const OMNIPOD: &str = "(OMNIPOD)";
const OMNI_SUFFIX: &str = ":OMNI";

fn strip_marker(text: &str, marker: &str) -> (String, bool) {
    let upper = text.to_ascii_uppercase();
    match upper.find(marker) {
        Some(at) => {
            let mut stripped = String::with_capacity(text.len());
            stripped.push_str(&text[..at]);
            stripped.push_str(&text[at + marker.len()..]);
            (stripped.split_whitespace().collect::<Vec<_>>().join(" "), true)
        }
        None => (text.trim().to_string(), false),
    }
}

/// Parses a `name, location` entry.
///
/// The split is at the last comma; an entry without a comma has an empty
/// location.
pub fn parse_line_entry(entry: &str) -> EquipmentMount {
    let (entry, omnipod) = strip_marker(entry, OMNIPOD);
    let (name, location) = match entry.rsplit_once(',') {
        Some((name, location)) => (name.trim().to_string(), location.trim().to_string()),
        None => (entry.trim().to_string(), String::new()),
    };
    let (location, rear) = strip_marker(&location, REAR);
    let (location, turret) = strip_marker(&location, TURRET);
    EquipmentMount {
        name,
        location,
        rear,
        omnipod,
        turret,
    }
}

/// Formats a mount as a `name, location` entry.
pub fn format_line_entry(mount: &EquipmentMount) -> String {
    let mut entry = mount.name.clone();
    if mount.omnipod {
        entry.push(' ');
        entry.push_str(OMNIPOD);
    }
    if !mount.location.is_empty() {
        entry.push_str(", ");
        entry.push_str(&mount.location);
    }
    if mount.rear {
        entry.push(' ');
        entry.push_str(REAR);
    }
    if mount.turret {
        entry.push(' ');
        entry.push_str(TURRET);
    }
    entry
}

/// Parses one line of an `<X Equipment>` block.
pub fn parse_block_entry(location: &str, entry: &str) -> EquipmentMount {
    let trimmed = entry.trim();
    let (body, omnipod) = match trimmed
        .len()
        .checked_sub(OMNI_SUFFIX.len())
        .filter(|&at| trimmed.is_char_boundary(at))
        .filter(|&at| trimmed[at..].eq_ignore_ascii_case(OMNI_SUFFIX))
    {
        Some(at) => (&trimmed[..at], true),
        None => (trimmed, false),
    };
    let (name, rear) = strip_marker(body, REAR);
    EquipmentMount {
        name,
        location: location.trim().to_string(),
        rear,
        omnipod,
        turret: location.to_ascii_lowercase().contains("turret"),
    }
}

/// Formats a mount as one line of its `<X Equipment>` block.
pub fn format_block_entry(mount: &EquipmentMount) -> String {
    let mut entry = mount.name.clone();
    if mount.rear {
        entry.push(' ');
        entry.push_str(REAR);
    }
    if mount.omnipod {
        entry.push_str(OMNI_SUFFIX);
    }
    entry
}
