//! Armor and internal structure ledger.
//!
//! Per-location armor, rear armor and internal structure, each tracked as
//! current and original values. Every setter clamps into `0..=original`,
//! so overshooting damage never produces a negative or inflated value.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::location::Location;
use crate::math::{ratio, Fixed};

/// Armor construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ArmorType {
    /// Standard plate.
    #[default]
    Standard,
    /// Ferro-fibrous.
    FerroFibrous,
    /// Hardened. Damage sets the hardened-damaged flag.
    Hardened,
    /// Reactive.
    Reactive,
    /// Reflective.
    Reflective,
    /// Stealth.
    Stealth,
}

/// Technology base of a location's armor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TechBase {
    /// Inner Sphere.
    #[default]
    InnerSphere,
    /// Clan.
    Clan,
    /// Mixed.
    Mixed,
}

/// Overall damage state of a unit, ordered from best to worst.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum DamageLevel {
    /// Undamaged or scratched.
    #[default]
    None,
    /// Light damage.
    Light,
    /// Moderate damage.
    Moderate,
    /// Heavy damage.
    Heavy,
    /// Crippled.
    Crippled,
    /// Destroyed.
    Destroyed,
}

/// Scope of a remaining-percentage query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PercentScope {
    /// A single location.
    Location(Location),
    /// Every location of the unit.
    Aggregate,
}

/// Ledger entry for one location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationLedger {
    /// Current front armor.
    pub armor: u32,
    /// Original front armor.
    pub original_armor: u32,
    /// Current rear armor.
    pub rear_armor: u32,
    /// Original rear armor.
    pub original_rear_armor: u32,
    /// Current internal structure.
    pub internal: u32,
    /// Original internal structure.
    pub original_internal: u32,
    /// Armor construction.
    pub armor_type: ArmorType,
    /// Armor tech base.
    pub tech_base: TechBase,
    /// Hardened armor has taken damage.
    pub hardened_damaged: bool,
    /// Limb blown off.
    pub blown_off: bool,
}

impl LocationLedger {
    /// Internal structure reduced to zero or limb blown off.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.blown_off || (self.original_internal > 0 && self.internal == 0)
    }

    /// Internal structure below original.
    #[must_use]
    pub const fn has_internal_damage(&self) -> bool {
        self.internal < self.original_internal
    }
}

/// Armor/structure ledger of one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorLedger {
    locations: Vec<LocationLedger>,
    structural_integrity: u32,
    original_structural_integrity: u32,
}

impl ArmorLedger {
    /// Create a zeroed ledger for `count` locations.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            locations: vec![LocationLedger::default(); count],
            ..Self::default()
        }
    }

    /// Number of locations tracked.
    #[must_use]
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Resize for a recomputed layout. New locations start zeroed.
    pub fn resize(&mut self, count: usize) {
        self.locations.resize(count, LocationLedger::default());
    }

    /// Entry for a location.
    #[must_use]
    pub fn entry(&self, location: Location) -> Option<&LocationLedger> {
        self.locations.get(location.index())
    }

    /// Initialise a location's values. Current and original start equal.
    pub fn init_location(&mut self, location: Location, armor: u32, rear: u32, internal: u32) {
        if let Some(entry) = self.locations.get_mut(location.index()) {
            entry.armor = armor;
            entry.original_armor = armor;
            entry.rear_armor = rear;
            entry.original_rear_armor = rear;
            entry.internal = internal;
            entry.original_internal = internal;
        }
    }

    /// Set armor construction for a location.
    pub fn set_armor_type(&mut self, location: Location, armor_type: ArmorType, tech: TechBase) {
        if let Some(entry) = self.locations.get_mut(location.index()) {
            entry.armor_type = armor_type;
            entry.tech_base = tech;
        }
    }

    /// Current armor, front or rear.
    #[must_use]
    pub fn armor(&self, location: Location, rear: bool) -> u32 {
        self.entry(location)
            .map_or(0, |e| if rear { e.rear_armor } else { e.armor })
    }

    /// Original armor, front or rear.
    #[must_use]
    pub fn original_armor(&self, location: Location, rear: bool) -> u32 {
        self.entry(location).map_or(0, |e| {
            if rear {
                e.original_rear_armor
            } else {
                e.original_armor
            }
        })
    }

    /// Set armor, clamped to `0..=original`. Returns the stored value.
    ///
    /// Lowering hardened armor flags it as damaged.
    pub fn set_armor(&mut self, location: Location, value: u32, rear: bool) -> u32 {
        let Some(entry) = self.locations.get_mut(location.index()) else {
            return 0;
        };
        let (current, original) = if rear {
            (&mut entry.rear_armor, entry.original_rear_armor)
        } else {
            (&mut entry.armor, entry.original_armor)
        };
        let clamped = value.min(original);
        let lowered = clamped < *current;
        *current = clamped;
        if lowered && entry.armor_type == ArmorType::Hardened {
            entry.hardened_damaged = true;
        }
        clamped
    }

    /// Current internal structure.
    #[must_use]
    pub fn internal(&self, location: Location) -> u32 {
        self.entry(location).map_or(0, |e| e.internal)
    }

    /// Original internal structure.
    #[must_use]
    pub fn original_internal(&self, location: Location) -> u32 {
        self.entry(location).map_or(0, |e| e.original_internal)
    }

    /// Set internal structure, clamped to `0..=original`. Returns the
    /// stored value.
    pub fn set_internal(&mut self, location: Location, value: u32) -> u32 {
        let Some(entry) = self.locations.get_mut(location.index()) else {
            return 0;
        };
        entry.internal = value.min(entry.original_internal);
        entry.internal
    }

    /// Mark a limb blown off and zero its structure.
    pub fn blow_off(&mut self, location: Location) {
        if let Some(entry) = self.locations.get_mut(location.index()) {
            entry.blown_off = true;
            entry.internal = 0;
            entry.armor = 0;
            entry.rear_armor = 0;
        }
    }

    /// Location destroyed.
    #[must_use]
    pub fn is_destroyed(&self, location: Location) -> bool {
        self.entry(location).is_some_and(LocationLedger::is_destroyed)
    }

    /// Hardened armor in `location` has been damaged.
    #[must_use]
    pub fn is_hardened_damaged(&self, location: Location) -> bool {
        self.entry(location).is_some_and(|e| e.hardened_damaged)
    }

    /// Any location uses hardened armor.
    #[must_use]
    pub fn has_hardened_armor(&self) -> bool {
        self.locations
            .iter()
            .any(|e| e.armor_type == ArmorType::Hardened)
    }

    /// Locations whose internal structure is below original.
    #[must_use]
    pub fn locations_with_internal_damage(&self) -> usize {
        self.locations
            .iter()
            .filter(|e| e.has_internal_damage())
            .count()
    }

    /// Initialise structural integrity.
    pub fn init_structural_integrity(&mut self, value: u32) {
        self.structural_integrity = value;
        self.original_structural_integrity = value;
    }

    /// Current structural integrity.
    #[must_use]
    pub const fn structural_integrity(&self) -> u32 {
        self.structural_integrity
    }

    /// Original structural integrity.
    #[must_use]
    pub const fn original_structural_integrity(&self) -> u32 {
        self.original_structural_integrity
    }

    /// Set structural integrity, clamped to `0..=original`.
    pub fn set_structural_integrity(&mut self, value: u32) -> u32 {
        self.structural_integrity = value.min(self.original_structural_integrity);
        self.structural_integrity
    }

    /// Total `(current, original)` armor, front plus rear.
    #[must_use]
    pub fn armor_totals(&self, scope: PercentScope) -> (u32, u32) {
        self.fold(scope, |e| {
            (e.armor + e.rear_armor, e.original_armor + e.original_rear_armor)
        })
    }

    /// Total `(current, original)` internal structure.
    #[must_use]
    pub fn internal_totals(&self, scope: PercentScope) -> (u32, u32) {
        self.fold(scope, |e| (e.internal, e.original_internal))
    }

    /// Fraction of armor plus internal structure remaining.
    ///
    /// `None` when the scope has no points at all.
    #[must_use]
    pub fn remaining_percent(&self, scope: PercentScope) -> Option<Fixed> {
        let (armor, armor_original) = self.armor_totals(scope);
        let (internal, internal_original) = self.internal_totals(scope);
        ratio(armor + internal, armor_original + internal_original)
    }

    fn fold(&self, scope: PercentScope, pick: impl Fn(&LocationLedger) -> (u32, u32)) -> (u32, u32) {
        self.locations
            .iter()
            .enumerate()
            .filter(|(index, _)| match scope {
                PercentScope::Location(location) => *index == location.index(),
                PercentScope::Aggregate => true,
            })
            .fold((0u32, 0u32), |(cur, orig), (_, e)| {
                let (c, o) = pick(e);
                (cur.saturating_add(c), orig.saturating_add(o))
            })
    }
}
