//! Display-name normalization for villagers.
//!
//! Some hosts hand back labels a snapshot consumer cannot use: nothing at
//! all, the raw localization key, or text from a locale the consumer cannot
//! render. Those are replaced by a generic name derived from the villager's
//! profession.

use crate::components::EntityKind;

/// Localization key reported for a villager with no translated name.
pub const VILLAGER_PLACEHOLDER: &str = "entity.Villager.name";

/// Villager role, decoded from the host's numeric profession code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VillagerProfession {
    Farmer,
    Librarian,
    Priest,
    Smith,
    Butcher,
    /// Any code outside the known table.
    Generic,
}

impl VillagerProfession {
    /// Total mapping: every code, including negative ones, has a profession.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => VillagerProfession::Farmer,
            1 => VillagerProfession::Librarian,
            2 => VillagerProfession::Priest,
            3 => VillagerProfession::Smith,
            4 => VillagerProfession::Butcher,
            _ => VillagerProfession::Generic,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            VillagerProfession::Farmer => "Farmer",
            VillagerProfession::Librarian => "Librarian",
            VillagerProfession::Priest => "Priest",
            VillagerProfession::Smith => "Smith",
            VillagerProfession::Butcher => "Butcher",
            VillagerProfession::Generic => "Villager",
        }
    }
}

#[inline]
fn is_printable_ascii(c: char) -> bool {
    matches!(c, ' '..='~')
}

/// Whether a villager's raw label can be shown to snapshot consumers as is.
pub fn is_usable_label(raw_label: &str) -> bool {
    is_usable_label_for(EntityKind::Villager, raw_label)
}

/// Like [`is_usable_label`], but only `kind`'s own localization key counts
/// as a placeholder.
pub fn is_usable_label_for(kind: EntityKind, raw_label: &str) -> bool {
    if raw_label.trim().is_empty() {
        return false;
    }
    if raw_label == kind.placeholder_label() {
        return false;
    }
    raw_label.chars().all(is_printable_ascii)
}

/// Resolve the name published for a villager.
///
/// Usable labels come back untouched (no trimming); anything else falls back
/// to the profession name.
pub fn resolve_name(raw_label: &str, profession: i32) -> String {
    if is_usable_label(raw_label) {
        raw_label.to_string()
    } else {
        VillagerProfession::from_code(profession).display_name().to_string()
    }
}

/// Resolve a name for an entity returned by a scan of `kind`.
///
/// Each kind's own localization key counts as a placeholder. The profession
/// table is villager-specific; entities without a code take the generic branch.
pub fn resolve_entity_name(kind: EntityKind, raw_label: &str, profession: Option<i32>) -> String {
    if is_usable_label_for(kind, raw_label) {
        raw_label.to_string()
    } else {
        VillagerProfession::from_code(profession.unwrap_or(-1))
            .display_name()
            .to_string()
    }
}
