//! Unit registry.
//!
//! Owns every unit by [`UnitId`]. Squadrons refer to their members by id,
//! so any query that depends on member state (MP, damage level, hit
//! resolution) goes through the registry.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::conditions::Environment;
use crate::dice::DiceRoller;
use crate::error::{CoreError, Result};
use crate::hit_location::{HitRequest, HitResult};
use crate::ledger::DamageLevel;
use crate::location::Location;
use crate::movement::{MpKind, MpSettings};
use crate::squadron::SquadronState;
use crate::unit::Unit;
use crate::unit_kind::Chassis;
use crate::weapon_groups::WeaponGroups;

/// Stable unit handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owner of all units in a game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
    next_id: u32,
}

impl UnitRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit and return its id.
    pub fn insert(&mut self, unit: Unit) -> UnitId {
        let id = UnitId::new(self.next_id);
        self.next_id += 1;
        self.units.insert(id, unit);
        id
    }

    /// Remove a unit, dropping it from any squadron first.
    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        if let Some(squadron) = self.squadron_of(id) {
            if let Err(e) = self.leave_squadron(squadron, id) {
                warn!(
                    unit = %id,
                    %squadron,
                    error = %e,
                    "removed unit could not leave its squadron"
                );
            }
        }
        self.units.remove(&id)
    }

    /// Look up a unit.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Look up a unit mutably.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Look up a unit or fail with `UnitNotFound`.
    pub fn unit(&self, id: UnitId) -> Result<&Unit> {
        self.units.get(&id).ok_or(CoreError::UnitNotFound(id.raw()))
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// No units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate units in id order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units.iter().map(|(id, unit)| (*id, unit))
    }

    /// Iterate units mutably. Each unit is handed out once, so batch
    /// refreshes may split the iterator across threads.
    pub fn units_mut(&mut self) -> impl Iterator<Item = (UnitId, &mut Unit)> {
        self.units.iter_mut().map(|(id, unit)| (*id, unit))
    }

    // ========================================================================
    // Squadrons
    // ========================================================================

    /// Squadron a fighter belongs to.
    #[must_use]
    pub fn squadron_of(&self, fighter: UnitId) -> Option<UnitId> {
        self.units.iter().find_map(|(id, unit)| {
            unit.squadron()
                .is_some_and(|s| s.contains(fighter))
                .then_some(*id)
        })
    }

    /// Add a fighter to a squadron and rebuild the squadron's layout and
    /// weapon groups.
    pub fn join_squadron(&mut self, squadron: UnitId, fighter: UnitId) -> Result<()> {
        let state = self.squadron_state(squadron)?;
        let member = self.unit(fighter)?;
        if member.chassis() != Chassis::AerospaceFighter {
            return Err(CoreError::NotAFighter(fighter.raw()));
        }
        if state.is_full() {
            return Err(CoreError::SquadronFull);
        }
        if let Some(current) = self.squadron_of(fighter) {
            return Err(CoreError::InvalidState(format!(
                "fighter {fighter} already in squadron {current}"
            )));
        }

        if let Some(state) = self.units.get_mut(&squadron).and_then(|u| u.squadron.as_mut()) {
            state.push(fighter);
        }
        self.refresh_squadron(squadron)?;
        debug!(%squadron, %fighter, "fighter joined squadron");
        Ok(())
    }

    /// Remove a fighter from a squadron. Returns whether it was a member.
    pub fn leave_squadron(&mut self, squadron: UnitId, fighter: UnitId) -> Result<bool> {
        self.squadron_state(squadron)?;
        let removed = self
            .units
            .get_mut(&squadron)
            .and_then(|u| u.squadron.as_mut())
            .is_some_and(|state| state.remove(fighter));
        if removed {
            self.refresh_squadron(squadron)?;
            debug!(%squadron, %fighter, "fighter left squadron");
        }
        Ok(removed)
    }

    /// Rebuild the member-per-location layout and cross-member weapon groups.
    pub fn refresh_squadron(&mut self, squadron: UnitId) -> Result<()> {
        let members = self.squadron_state(squadron)?.members().to_vec();
        let groups = WeaponGroups::build_squadron(
            members
                .iter()
                .filter_map(|id| self.units.get(id).map(|unit| (*id, unit.equipment()))),
        );
        let unit = self
            .units
            .get_mut(&squadron)
            .ok_or(CoreError::UnitNotFound(squadron.raw()))?;
        unit.rebuild_squadron_layout(groups);
        Ok(())
    }

    fn squadron_state(&self, squadron: UnitId) -> Result<&SquadronState> {
        self.unit(squadron)?
            .squadron()
            .ok_or(CoreError::NotASquadron(squadron.raw()))
    }

    /// Members of a squadron that are not destroyed, in member order.
    fn live_members(&self, squadron: &SquadronState) -> Vec<(UnitId, &Unit)> {
        squadron
            .members()
            .iter()
            .filter_map(|id| self.units.get(id).map(|unit| (*id, unit)))
            .filter(|(_, unit)| !unit.is_destroyed())
            .collect()
    }

    // ========================================================================
    // Member-aware queries
    // ========================================================================

    /// Compute MP. Squadrons move at the pace of their slowest live member.
    pub fn compute_mp(
        &self,
        id: UnitId,
        kind: MpKind,
        settings: MpSettings,
        env: Option<&Environment>,
    ) -> Result<u32> {
        let unit = self.unit(id)?;
        let Some(squadron) = unit.squadron() else {
            return Ok(unit.compute_mp(kind, settings, env));
        };
        let slowest = self
            .live_members(squadron)
            .into_iter()
            .map(|(_, member)| member.compute_mp(kind, settings, env))
            .min()
            .unwrap_or(0);
        Ok(slowest)
    }

    /// Damage level.
    ///
    /// A squadron is destroyed with no live member and crippled when fewer
    /// than half of its members are live and uncrippled. Otherwise it takes
    /// the worst level of its live members, below crippled.
    pub fn damage_level(&self, id: UnitId) -> Result<DamageLevel> {
        let unit = self.unit(id)?;
        let Some(squadron) = unit.squadron() else {
            return Ok(unit.damage_level());
        };
        let live = self.live_members(squadron);
        if live.is_empty() {
            return Ok(DamageLevel::Destroyed);
        }
        let levels: Vec<DamageLevel> = live.iter().map(|(_, m)| m.damage_level()).collect();
        let healthy = levels.iter().filter(|l| **l < DamageLevel::Crippled).count();
        if healthy * 2 < squadron.len() {
            return Ok(DamageLevel::Crippled);
        }
        let worst = levels
            .into_iter()
            .filter(|l| *l < DamageLevel::Crippled)
            .max()
            .unwrap_or(DamageLevel::None);
        Ok(worst)
    }

    /// Roll a hit location. A squadron picks one live member uniformly and
    /// delegates the whole resolution to it.
    pub fn roll_hit_location<D: DiceRoller + ?Sized>(
        &self,
        id: UnitId,
        request: &HitRequest,
        dice: &mut D,
        env: Option<&Environment>,
    ) -> Result<HitResult> {
        let unit = self.unit(id)?;
        let Some(squadron) = unit.squadron() else {
            return Ok(unit.roll_hit_location(request, dice, env));
        };
        let live = self.live_members(squadron);
        if live.is_empty() {
            return Ok(HitResult::at(Location::NONE));
        }
        let (member_id, member) = live[dice.pick_index(live.len())];
        let mut result = member.roll_hit_location(request, dice, env);
        result.member = Some(member_id);
        debug!(squadron = %id, member = %member_id, "squadron hit delegated");
        Ok(result)
    }

    // ========================================================================
    // Determinism
    // ========================================================================

    /// Hash of the full registry state.
    ///
    /// Two registries driven through the same operations with the same dice
    /// hash identically.
    pub fn state_hash(&self) -> Result<u64> {
        let bytes = bincode::serialize(self).map_err(|e| CoreError::InvalidState(e.to_string()))?;
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Ok(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::equipment::{EquipmentFlags, MountedEquipment};
    use crate::location::aero;

    fn fighter(thrust: u32) -> Unit {
        Unit::builder("Lucifer", Chassis::AerospaceFighter)
            .walk(thrust)
            .structural_integrity(6)
            .uniform(20, 0, 0)
            .with_equipment(
                aero::NOSE,
                MountedEquipment::new("Large Laser", EquipmentFlags::WEAPON).with_slots(2),
            )
            .build()
            .unwrap()
    }

    fn squadron() -> Unit {
        Unit::builder("Blue Flight", Chassis::FighterSquadron).build().unwrap()
    }

    fn registry_with(thrusts: &[u32]) -> (UnitRegistry, UnitId, Vec<UnitId>) {
        let mut registry = UnitRegistry::new();
        let sq = registry.insert(squadron());
        let members: Vec<UnitId> = thrusts
            .iter()
            .map(|t| registry.insert(fighter(*t)))
            .collect();
        for member in &members {
            registry.join_squadron(sq, *member).unwrap();
        }
        (registry, sq, members)
    }

    #[test]
    fn test_join_rebuilds_layout_and_groups() {
        let (registry, sq, _) = registry_with(&[6, 5]);
        let unit = registry.get(sq).unwrap();
        assert_eq!(unit.location_count(), 2);
        assert_eq!(unit.location_name(Location::new(1)), "Fighter 2");
        let lasers = unit.weapon_groups().find("Large Laser").unwrap();
        assert_eq!(lasers.weapons.len(), 2);
    }

    #[test]
    fn test_leave_rebuilds_layout() {
        let (mut registry, sq, members) = registry_with(&[6, 5, 7]);
        assert!(registry.leave_squadron(sq, members[1]).unwrap());
        assert!(!registry.leave_squadron(sq, members[1]).unwrap());
        let unit = registry.get(sq).unwrap();
        assert_eq!(unit.location_count(), 2);
        assert_eq!(unit.weapon_groups().weapon_count(), 2);
    }

    #[test]
    fn test_join_validation() {
        let (mut registry, sq, members) = registry_with(&[6]);
        let walker = registry.insert(Unit::builder("Atlas", Chassis::Biped).build().unwrap());
        assert!(matches!(
            registry.join_squadron(sq, walker),
            Err(CoreError::NotAFighter(_))
        ));
        assert!(matches!(
            registry.join_squadron(walker, members[0]),
            Err(CoreError::NotASquadron(_))
        ));
        assert!(matches!(
            registry.join_squadron(sq, members[0]),
            Err(CoreError::InvalidState(_))
        ));
        assert!(matches!(
            registry.join_squadron(UnitId::new(99), members[0]),
            Err(CoreError::UnitNotFound(99))
        ));
    }

    #[test]
    fn test_capacity_is_six() {
        let (mut registry, sq, _) = registry_with(&[5, 5, 5, 5, 5, 5]);
        let extra = registry.insert(fighter(5));
        assert!(matches!(
            registry.join_squadron(sq, extra),
            Err(CoreError::SquadronFull)
        ));
        assert_eq!(registry.get(sq).unwrap().location_count(), 6);
    }

    #[test]
    fn test_squadron_moves_at_slowest_member() {
        let (mut registry, sq, members) = registry_with(&[7, 5, 6]);
        let walk = registry.compute_mp(sq, MpKind::Walk, MpSettings::NONE, None);
        assert_eq!(walk.unwrap(), 5);

        registry
            .get_mut(members[1])
            .unwrap()
            .set_structural_integrity(0);
        let walk = registry.compute_mp(sq, MpKind::Walk, MpSettings::NONE, None);
        assert_eq!(walk.unwrap(), 6);
    }

    #[test]
    fn test_squadron_damage_level() {
        let (mut registry, sq, members) = registry_with(&[6, 6, 6]);
        assert_eq!(registry.damage_level(sq).unwrap(), DamageLevel::None);

        registry.get_mut(members[0]).unwrap().set_structural_integrity(0);
        assert_eq!(registry.damage_level(sq).unwrap(), DamageLevel::None);

        registry.get_mut(members[1]).unwrap().set_structural_integrity(3);
        assert_eq!(registry.damage_level(sq).unwrap(), DamageLevel::Crippled);

        registry.get_mut(members[2]).unwrap().set_structural_integrity(0);
        registry.get_mut(members[1]).unwrap().set_structural_integrity(0);
        assert_eq!(registry.damage_level(sq).unwrap(), DamageLevel::Destroyed);
    }

    #[test]
    fn test_squadron_hit_delegates_to_live_member() {
        let (mut registry, sq, members) = registry_with(&[6, 6, 6]);
        registry.get_mut(members[0]).unwrap().set_structural_integrity(0);

        // Index 1 among the two live members, then a 2d6 of 7
        let mut dice = ScriptedDice::new([1, 7]);
        let hit = registry
            .roll_hit_location(sq, &HitRequest::default(), &mut dice, None)
            .unwrap();
        assert_eq!(hit.member, Some(members[2]));
        assert_eq!(hit.location, aero::NOSE);
    }

    #[test]
    fn test_remove_leaves_squadron() {
        let (mut registry, sq, members) = registry_with(&[6, 6]);
        assert!(registry.remove(members[0]).is_some());
        assert_eq!(registry.get(sq).unwrap().location_count(), 1);
        assert_eq!(registry.squadron_of(members[1]), Some(sq));
    }

    #[test]
    fn test_remove_after_squadron_is_gone() {
        let (mut registry, sq, members) = registry_with(&[6, 6]);
        assert!(registry.remove(sq).is_some());
        assert_eq!(registry.squadron_of(members[0]), None);
        assert!(registry.remove(members[0]).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_state_hash_tracks_mutation() {
        let (mut registry, _, members) = registry_with(&[6, 6]);
        let before = registry.state_hash().unwrap();
        assert_eq!(before, registry.clone().state_hash().unwrap());
        registry.get_mut(members[0]).unwrap().set_heat(4);
        assert_ne!(before, registry.state_hash().unwrap());
    }
}
