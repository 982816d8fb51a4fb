//! Mounted equipment arena.
//!
//! Equipment records live in a per-unit arena and are addressed by
//! [`EquipmentId`]. Critical slots and weapon groups store handles only, so
//! destroying a slot from one code path can never leave another path
//! holding a stale alias.

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Handle into a unit's [`EquipmentArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EquipmentId(u32);

impl EquipmentId {
    /// Create a handle from a raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

bitflags::bitflags! {
    /// Per-item classification supplied by the equipment catalog.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EquipmentFlags: u32 {
        /// Fires at targets.
        const WEAPON = 1 << 0;
        /// Ammunition bin.
        const AMMO = 1 << 1;
        /// Jump jet.
        const JUMP_JET = 1 << 2;
        /// Myomer acceleration signal circuitry.
        const MASC = 1 << 3;
        /// Engine supercharger.
        const SUPERCHARGER = 1 << 4;
        /// Triple-strength myomer.
        const TSM = 1 << 5;
        /// Partial wing (adds jump MP by atmosphere).
        const PARTIAL_WING = 1 << 6;
        /// Modular armor plating.
        const MODULAR_ARMOR = 1 << 7;
        /// Encumbering cargo or load.
        const ENCUMBERING = 1 << 8;
        /// Bay mount that can co-mount ordnance.
        const BOMB_BAY = 1 << 9;
        /// External or bay ordnance.
        const BOMB = 1 << 10;
        /// QuadVee tracks mounted in a leg.
        const TRACKS = 1 << 11;
        /// Infantry field gun.
        const FIELD_GUN = 1 << 12;
        /// Crew-served infantry support weapon.
        const HEAVY_WEAPON = 1 << 13;
    }
}

/// A single mounted item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountedEquipment {
    /// Catalog name.
    pub name: String,
    /// Catalog flags.
    pub flags: EquipmentFlags,
    /// Critical slots the item occupies.
    pub slots: u8,
    /// Bomb points carried (ordnance only).
    pub bomb_points: u8,
    /// Troopers needed to crew the item (field guns only).
    pub crew: u8,
    /// Location the item is mounted in, [`Location::NONE`] until mounted.
    pub location: Location,
    /// At least one of the item's slots has been hit.
    pub hit: bool,
    /// Item destroyed, by slot damage or by losing its location.
    pub destroyed: bool,
    /// Switched on (MASC, supercharger) or loaded.
    pub armed: bool,
    /// Unavailable in the unit's current mode (bombs in Mek mode).
    pub suppressed: bool,
}

impl MountedEquipment {
    /// Create a one-slot item.
    #[must_use]
    pub fn new(name: impl Into<String>, flags: EquipmentFlags) -> Self {
        Self {
            name: name.into(),
            flags,
            slots: 1,
            bomb_points: 0,
            crew: 0,
            location: Location::NONE,
            hit: false,
            destroyed: false,
            armed: true,
            suppressed: false,
        }
    }

    /// Set the slot span.
    #[must_use]
    pub const fn with_slots(mut self, slots: u8) -> Self {
        self.slots = slots;
        self
    }

    /// Set carried bomb points.
    #[must_use]
    pub const fn with_bomb_points(mut self, points: u8) -> Self {
        self.bomb_points = points;
        self
    }

    /// Set the crew requirement.
    #[must_use]
    pub const fn with_crew(mut self, crew: u8) -> Self {
        self.crew = crew;
        self
    }

    /// Check for a catalog flag.
    #[must_use]
    pub const fn is(&self, flags: EquipmentFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Neither hit nor destroyed.
    #[must_use]
    pub const fn is_operable(&self) -> bool {
        !self.hit && !self.destroyed
    }

    /// Usable right now: operable, armed, not suppressed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_operable() && self.armed && !self.suppressed
    }
}

/// Arena owning every mounted item of one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentArena {
    items: Vec<MountedEquipment>,
}

impl EquipmentArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item and return its handle.
    pub fn insert(&mut self, item: MountedEquipment) -> EquipmentId {
        let id = EquipmentId(u32::try_from(self.items.len()).unwrap_or(u32::MAX));
        self.items.push(item);
        id
    }

    /// Look up an item.
    #[must_use]
    pub fn get(&self, id: EquipmentId) -> Option<&MountedEquipment> {
        self.items.get(id.0 as usize)
    }

    /// Look up an item mutably.
    pub fn get_mut(&mut self, id: EquipmentId) -> Option<&mut MountedEquipment> {
        self.items.get_mut(id.0 as usize)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate all items with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentId, &MountedEquipment)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (EquipmentId(u32::try_from(i).unwrap_or(u32::MAX)), item))
    }

    /// Iterate items carrying all of `flags`.
    pub fn with_flags(
        &self,
        flags: EquipmentFlags,
    ) -> impl Iterator<Item = (EquipmentId, &MountedEquipment)> {
        self.iter().filter(move |(_, item)| item.is(flags))
    }

    /// Any active item carrying `flags`.
    #[must_use]
    pub fn has_active(&self, flags: EquipmentFlags) -> bool {
        self.with_flags(flags).any(|(_, item)| item.is_active())
    }

    /// Mark an item hit.
    pub fn mark_hit(&mut self, id: EquipmentId) {
        if let Some(item) = self.get_mut(id) {
            item.hit = true;
        }
    }

    /// Mark an item destroyed (and hit).
    pub fn mark_destroyed(&mut self, id: EquipmentId) {
        if let Some(item) = self.get_mut(id) {
            item.hit = true;
            item.destroyed = true;
        }
    }

    /// Destroy everything mounted in `location`. Returns how many items
    /// changed state.
    pub fn destroy_in(&mut self, location: Location) -> usize {
        let mut count = 0;
        for item in self.items.iter_mut().filter(|i| i.location == location) {
            if !item.destroyed {
                item.hit = true;
                item.destroyed = true;
                count += 1;
            }
        }
        count
    }

    /// Set the suppressed flag on every item carrying `flags`.
    pub fn set_suppressed(&mut self, flags: EquipmentFlags, suppressed: bool) {
        for item in self.items.iter_mut().filter(|i| i.flags.contains(flags)) {
            item.suppressed = suppressed;
        }
    }
}
