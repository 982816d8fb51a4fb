//! Critical slot store.
//!
//! One array of [`CriticalSlot`] per location, sized from the location
//! table at construction. A slot holds at most one primary content (a
//! built-in system or an equipment handle) and one secondary equipment
//! handle for bay co-mounts.
//!
//! Slot flags only ever move forward: clear → hit → destroyed. The only
//! way back is [`CriticalStore::repair`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::equipment::EquipmentId;
use crate::error::{CoreError, Result};
use crate::location::{Location, LocationInfo};

/// Built-in systems that occupy critical slots.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum SystemKind {
    /// Engine.
    Engine,
    /// Gyro.
    Gyro,
    /// Cockpit.
    Cockpit,
    /// Life support.
    LifeSupport,
    /// Sensors.
    Sensors,
    /// Shoulder actuator.
    Shoulder,
    /// Upper arm actuator.
    UpperArm,
    /// Lower arm actuator.
    LowerArm,
    /// Hand actuator.
    Hand,
    /// Hip actuator.
    Hip,
    /// Upper leg actuator.
    UpperLeg,
    /// Lower leg actuator.
    LowerLeg,
    /// Foot actuator.
    Foot,
    /// Flight avionics.
    Avionics,
    /// Landing gear.
    LandingGear,
    /// QuadVee conversion equipment.
    ConversionEquipment,
    /// Fire control.
    FireControl,
}

impl SystemKind {
    /// Leg actuators below the hip.
    #[must_use]
    pub const fn is_leg_actuator(self) -> bool {
        matches!(self, Self::UpperLeg | Self::LowerLeg | Self::Foot)
    }
}

/// Primary content of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotContent {
    /// Built-in system.
    System(SystemKind),
    /// Mounted equipment.
    Equipment(EquipmentId),
}

/// A single critical slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriticalSlot {
    /// Primary content.
    pub primary: Option<SlotContent>,
    /// Bay co-mounted equipment.
    pub secondary: Option<EquipmentId>,
    /// Slot has been hit.
    pub hit: bool,
    /// Slot has been destroyed. Implies `hit`.
    pub destroyed: bool,
}

impl CriticalSlot {
    /// Nothing mounted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.primary.is_none()
    }

    /// Hit or destroyed.
    #[must_use]
    pub const fn is_damaged(&self) -> bool {
        self.hit || self.destroyed
    }

    /// System held in this slot, if any.
    #[must_use]
    pub const fn system(&self) -> Option<SystemKind> {
        match self.primary {
            Some(SlotContent::System(kind)) => Some(kind),
            _ => None,
        }
    }

    /// Check this slot holds `kind`.
    #[must_use]
    pub fn holds(&self, kind: SystemKind) -> bool {
        self.system() == Some(kind)
    }

    /// Equipment handles referenced by this slot, primary first.
    pub fn equipment(&self) -> impl Iterator<Item = EquipmentId> {
        let primary = match self.primary {
            Some(SlotContent::Equipment(id)) => Some(id),
            _ => None,
        };
        primary.into_iter().chain(self.secondary)
    }
}

/// Per-location slot arrays for one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalStore {
    locations: Vec<Vec<CriticalSlot>>,
}

impl CriticalStore {
    /// Create empty slot arrays sized from a location table.
    #[must_use]
    pub fn for_layout(layout: &[LocationInfo]) -> Self {
        Self {
            locations: layout
                .iter()
                .map(|info| vec![CriticalSlot::default(); usize::from(info.slots)])
                .collect(),
        }
    }

    /// Number of locations.
    #[must_use]
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Slot count of a location, zero for an invalid location.
    #[must_use]
    pub fn slots_in(&self, location: Location) -> u8 {
        self.locations
            .get(location.index())
            .map_or(0, |slots| u8::try_from(slots.len()).unwrap_or(u8::MAX))
    }

    /// Slot lookup.
    #[must_use]
    pub fn slot(&self, location: Location, slot: u8) -> Option<&CriticalSlot> {
        self.locations
            .get(location.index())
            .and_then(|slots| slots.get(usize::from(slot)))
    }

    /// All slots of a location.
    #[must_use]
    pub fn slots(&self, location: Location) -> &[CriticalSlot] {
        self.locations
            .get(location.index())
            .map_or(&[], Vec::as_slice)
    }

    /// Free slots in a location.
    #[must_use]
    pub fn free_slots(&self, location: Location) -> u8 {
        let free = self.slots(location).iter().filter(|s| s.is_empty()).count();
        u8::try_from(free).unwrap_or(u8::MAX)
    }

    fn location_mut(&mut self, location: Location) -> Result<&mut Vec<CriticalSlot>> {
        self.locations
            .get_mut(location.index())
            .ok_or(CoreError::InvalidLocation(location.as_u8()))
    }

    fn slot_mut(&mut self, location: Location, slot: u8) -> Result<&mut CriticalSlot> {
        self.location_mut(location)?
            .get_mut(usize::from(slot))
            .ok_or(CoreError::InvalidSlot { location, slot })
    }

    /// Fill `span` free slots with `content`.
    ///
    /// All-or-nothing: when fewer than `span` slots are free the store is
    /// left untouched. Returns the first slot taken.
    pub fn mount(&mut self, location: Location, content: SlotContent, span: u8) -> Result<u8> {
        let span = span.max(1);
        let free = self.free_slots(location);
        let slots = self.location_mut(location)?;
        if free < span {
            return Err(CoreError::LocationFull {
                location,
                needed: span,
                free,
            });
        }

        let mut first = None;
        let mut remaining = span;
        for (index, slot) in slots.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            if slot.is_empty() {
                slot.primary = Some(content);
                first.get_or_insert(index);
                remaining -= 1;
            }
        }

        let first = first.unwrap_or_default();
        Ok(u8::try_from(first).unwrap_or(u8::MAX))
    }

    /// Co-mount `equipment` in the secondary position of `slot`.
    ///
    /// `is_bay` decides whether the slot's primary equipment is a bay mount.
    pub fn mount_secondary(
        &mut self,
        location: Location,
        slot: u8,
        equipment: EquipmentId,
        is_bay: impl Fn(EquipmentId) -> bool,
    ) -> Result<()> {
        let target = self.slot_mut(location, slot)?;
        let bay = matches!(target.primary, Some(SlotContent::Equipment(id)) if is_bay(id));
        if !bay || target.secondary.is_some() || target.destroyed {
            return Err(CoreError::BayUnavailable { location, slot });
        }
        target.secondary = Some(equipment);
        Ok(())
    }

    /// Mark a slot hit. Returns the slot after the change.
    pub fn apply_hit(&mut self, location: Location, slot: u8) -> Result<CriticalSlot> {
        let target = self.slot_mut(location, slot)?;
        target.hit = true;
        Ok(*target)
    }

    /// Mark a slot destroyed (and hit). Returns the slot after the change.
    pub fn apply_destroy(&mut self, location: Location, slot: u8) -> Result<CriticalSlot> {
        let target = self.slot_mut(location, slot)?;
        target.hit = true;
        target.destroyed = true;
        Ok(*target)
    }

    /// Clear the damage flags of a slot.
    pub fn repair(&mut self, location: Location, slot: u8) -> Result<CriticalSlot> {
        let target = self.slot_mut(location, slot)?;
        target.hit = false;
        target.destroyed = false;
        Ok(*target)
    }

    /// Iterate `(location, slot)` pairs across all locations.
    pub fn iter(&self) -> impl Iterator<Item = (Location, &CriticalSlot)> {
        self.locations.iter().enumerate().flat_map(|(loc, slots)| {
            let location = Location::new(u8::try_from(loc).unwrap_or(u8::MAX));
            slots.iter().map(move |slot| (location, slot))
        })
    }

    /// Damaged slots holding `kind`, across the whole unit.
    #[must_use]
    pub fn hits_on_system(&self, kind: SystemKind) -> u32 {
        let hits = self
            .iter()
            .filter(|(_, slot)| slot.holds(kind) && slot.is_damaged())
            .count();
        u32::try_from(hits).unwrap_or(u32::MAX)
    }

    /// Damaged slots holding `kind` in one location.
    #[must_use]
    pub fn hits_on_system_in(&self, location: Location, kind: SystemKind) -> u32 {
        self.count_hits_in(location, |slot| slot.holds(kind))
    }

    /// Any damaged slot holding `kind` in `location`.
    #[must_use]
    pub fn damaged_system_in(&self, location: Location, kind: SystemKind) -> bool {
        self.hits_on_system_in(location, kind) > 0
    }

    /// Slots holding `kind`, damaged or not.
    #[must_use]
    pub fn system_slots(&self, kind: SystemKind) -> u32 {
        let count = self.iter().filter(|(_, slot)| slot.holds(kind)).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Damaged slots in `location` matching `predicate`.
    #[must_use]
    pub fn count_hits_in(&self, location: Location, predicate: impl Fn(&CriticalSlot) -> bool) -> u32 {
        let hits = self
            .slots(location)
            .iter()
            .filter(|slot| slot.is_damaged() && predicate(slot))
            .count();
        u32::try_from(hits).unwrap_or(u32::MAX)
    }

    /// Any damaged slot anywhere holding `equipment`.
    #[must_use]
    pub fn equipment_damaged(&self, equipment: EquipmentId) -> bool {
        self.iter()
            .any(|(_, slot)| slot.is_damaged() && slot.equipment().any(|id| id == equipment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{mek, static_locations};
    use crate::unit_kind::Chassis;

    fn biped_store() -> CriticalStore {
        CriticalStore::for_layout(static_locations(Chassis::Biped))
    }

    // ========================================================================
    // Mounting
    // ========================================================================

    #[test]
    fn test_store_sized_from_layout() {
        let store = biped_store();
        assert_eq!(store.location_count(), 8);
        assert_eq!(store.slots_in(mek::HEAD), 6);
        assert_eq!(store.slots_in(mek::CENTER_TORSO), 12);
        assert_eq!(store.slots_in(Location::NONE), 0);
    }

    #[test]
    fn test_mount_takes_first_free_slots() {
        let mut store = biped_store();
        let engine = SlotContent::System(SystemKind::Engine);
        assert_eq!(store.mount(mek::CENTER_TORSO, engine, 3), Ok(0));
        let laser = SlotContent::Equipment(EquipmentId::new(0));
        assert_eq!(store.mount(mek::CENTER_TORSO, laser, 2), Ok(3));
        assert_eq!(store.free_slots(mek::CENTER_TORSO), 7);
    }

    #[test]
    fn test_mount_full_location_is_atomic() {
        let mut store = biped_store();
        let ppc = SlotContent::Equipment(EquipmentId::new(0));
        store.mount(mek::HEAD, ppc, 5).unwrap();

        let before = store.clone();
        let err = store
            .mount(mek::HEAD, SlotContent::Equipment(EquipmentId::new(1)), 2)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::LocationFull {
                location: mek::HEAD,
                needed: 2,
                free: 1,
            }
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_mount_invalid_location() {
        let mut store = biped_store();
        let result = store.mount(Location::new(20), SlotContent::System(SystemKind::Hip), 1);
        assert_eq!(result, Err(CoreError::InvalidLocation(20)));
    }

    #[test]
    fn test_bay_co_mount() {
        let mut store = biped_store();
        let bay = EquipmentId::new(0);
        let bomb = EquipmentId::new(1);
        let slot = store
            .mount(mek::LEFT_TORSO, SlotContent::Equipment(bay), 1)
            .unwrap();

        // Not a bay
        let refused = store.mount_secondary(mek::LEFT_TORSO, slot, bomb, |_| false);
        assert!(matches!(refused, Err(CoreError::BayUnavailable { .. })));

        store
            .mount_secondary(mek::LEFT_TORSO, slot, bomb, |id| id == bay)
            .unwrap();
        let equipment: Vec<_> = store.slot(mek::LEFT_TORSO, slot).unwrap().equipment().collect();
        assert_eq!(equipment, vec![bay, bomb]);

        // Bay already loaded
        let again = store.mount_secondary(mek::LEFT_TORSO, slot, EquipmentId::new(2), |_| true);
        assert!(again.is_err());
    }

    // ========================================================================
    // Damage flags
    // ========================================================================

    #[test]
    fn test_destroy_implies_hit() {
        let mut store = biped_store();
        store
            .mount(mek::RIGHT_LEG, SlotContent::System(SystemKind::Hip), 1)
            .unwrap();
        let slot = store.apply_destroy(mek::RIGHT_LEG, 0).unwrap();
        assert!(slot.hit);
        assert!(slot.destroyed);
    }

    #[test]
    fn test_hit_does_not_clear_destroyed() {
        let mut store = biped_store();
        store.apply_destroy(mek::RIGHT_LEG, 0).unwrap();
        let slot = store.apply_hit(mek::RIGHT_LEG, 0).unwrap();
        assert!(slot.destroyed);
    }

    #[test]
    fn test_repair_clears_flags() {
        let mut store = biped_store();
        store.apply_destroy(mek::RIGHT_LEG, 2).unwrap();
        let slot = store.repair(mek::RIGHT_LEG, 2).unwrap();
        assert!(!slot.is_damaged());
    }

    #[test]
    fn test_invalid_slot() {
        let mut store = biped_store();
        assert_eq!(
            store.apply_hit(mek::HEAD, 6),
            Err(CoreError::InvalidSlot {
                location: mek::HEAD,
                slot: 6,
            })
        );
    }

    #[test]
    fn test_system_hit_counts() {
        let mut store = biped_store();
        for loc in [mek::LEFT_LEG, mek::RIGHT_LEG] {
            store.mount(loc, SlotContent::System(SystemKind::Hip), 1).unwrap();
            store
                .mount(loc, SlotContent::System(SystemKind::UpperLeg), 1)
                .unwrap();
        }
        store.apply_hit(mek::LEFT_LEG, 0).unwrap();
        store.apply_hit(mek::LEFT_LEG, 1).unwrap();
        store.apply_destroy(mek::RIGHT_LEG, 0).unwrap();

        assert_eq!(store.hits_on_system(SystemKind::Hip), 2);
        assert_eq!(store.system_slots(SystemKind::Hip), 2);
        assert!(store.damaged_system_in(mek::RIGHT_LEG, SystemKind::Hip));
        assert!(!store.damaged_system_in(mek::RIGHT_LEG, SystemKind::UpperLeg));
        assert_eq!(
            store.count_hits_in(mek::LEFT_LEG, |s| s
                .system()
                .is_some_and(SystemKind::is_leg_actuator)),
            1
        );
    }
}
