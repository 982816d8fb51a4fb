//! Weapon groups.
//!
//! Aerospace craft (and LAMs in fighter mode) fire weapons of the same type
//! in the same arc together. Squadrons group the same weapon across all
//! their members. Groups hold handles only and are rebuilt explicitly when
//! the unit converts or the squadron changes membership.

use serde::{Deserialize, Serialize};

use crate::equipment::{EquipmentArena, EquipmentFlags, EquipmentId};
use crate::location::Location;
use crate::registry::UnitId;

/// Handle to one weapon, possibly on another unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponHandle {
    /// Owning squadron member, `None` for the unit's own weapons.
    pub unit: Option<UnitId>,
    /// Weapon in the owner's arena.
    pub equipment: EquipmentId,
}

/// Weapons fired as one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponGroup {
    /// Weapon name shared by the members.
    pub name: String,
    /// Arc of the group, [`Location::NONE`] for squadron groups.
    pub location: Location,
    /// Member weapons.
    pub weapons: Vec<WeaponHandle>,
}

/// Weapon groups of one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponGroups {
    groups: Vec<WeaponGroup>,
}

impl WeaponGroups {
    /// Group a unit's operable weapons by name and location.
    ///
    /// Ungrouped units get no groups.
    #[must_use]
    pub fn build(arena: &EquipmentArena, grouped: bool) -> Self {
        let mut groups = Self::default();
        if !grouped {
            return groups;
        }
        for (id, item) in arena.with_flags(EquipmentFlags::WEAPON) {
            if item.destroyed {
                continue;
            }
            groups.insert(&item.name, item.location, WeaponHandle { unit: None, equipment: id });
        }
        groups
    }

    /// Group the weapons of every squadron member by name.
    #[must_use]
    pub fn build_squadron<'a>(members: impl IntoIterator<Item = (UnitId, &'a EquipmentArena)>) -> Self {
        let mut groups = Self::default();
        for (unit, arena) in members {
            for (id, item) in arena.with_flags(EquipmentFlags::WEAPON) {
                if item.destroyed {
                    continue;
                }
                let handle = WeaponHandle {
                    unit: Some(unit),
                    equipment: id,
                };
                groups.insert(&item.name, Location::NONE, handle);
            }
        }
        groups
    }

    fn insert(&mut self, name: &str, location: Location, handle: WeaponHandle) {
        if let Some(group) = self
            .groups
            .iter_mut()
            .find(|g| g.name == name && g.location == location)
        {
            group.weapons.push(handle);
        } else {
            self.groups.push(WeaponGroup {
                name: name.to_string(),
                location,
                weapons: vec![handle],
            });
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// No groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate groups in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &WeaponGroup> {
        self.groups.iter()
    }

    /// Find a group by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&WeaponGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Total weapons across all groups.
    #[must_use]
    pub fn weapon_count(&self) -> usize {
        self.groups.iter().map(|g| g.weapons.len()).sum()
    }
}
