//! The unit root entity.
//!
//! A [`Unit`] owns, by exclusive composition, its location layout, critical
//! slot store, armor ledger, equipment arena and (depending on chassis) a
//! conversion state, platoon state or squadron state. All mutation goes
//! through the methods here so that cascades (slot → equipment, location →
//! equipment, side torso → arm, troopers → active count) run before the
//! mutator returns.
//!
//! Movement, hit resolution, piloting and conversion live in their own
//! modules as further `impl Unit` blocks.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::conditions::{EnvironmentalSpecialty, MovementProfile};
use crate::conversion::{ConversionMode, ConversionState};
use crate::criticals::{CriticalSlot, CriticalStore, SlotContent, SystemKind};
use crate::equipment::{EquipmentArena, EquipmentFlags, EquipmentId, MountedEquipment};
use crate::error::Result;
use crate::ledger::{ArmorLedger, ArmorType, DamageLevel, PercentScope, TechBase};
use crate::location::{
    aero, dependent_location, infantry, mek, quad, static_locations, Location, LocationInfo,
    LocationKind,
};
use crate::math::{at_or_below_percent, below_percent, Fixed};
use crate::squadron::SquadronState;
use crate::unit_kind::{Chassis, ChassisTraits, LamKind, MovementMode, WeightClass};
use crate::weapon_groups::WeaponGroups;

/// Gyro construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GyroType {
    /// Standard gyro.
    #[default]
    Standard,
    /// Extra-light gyro.
    Xl,
    /// Compact gyro.
    Compact,
    /// Heavy-duty gyro.
    HeavyDuty,
    /// No gyro (non-walker chassis).
    None,
}

impl GyroType {
    /// Critical slots the gyro occupies in the center torso.
    #[must_use]
    pub const fn slots(self) -> u8 {
        match self {
            Self::Standard | Self::HeavyDuty => 4,
            Self::Xl => 6,
            Self::Compact => 2,
            Self::None => 0,
        }
    }

    /// Hits that destroy the gyro.
    #[must_use]
    pub const fn destroyed_at(self) -> u32 {
        match self {
            Self::HeavyDuty => 3,
            Self::None => u32::MAX,
            _ => 2,
        }
    }
}

/// Cockpit construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CockpitType {
    /// Standard cockpit.
    #[default]
    Standard,
    /// Small cockpit.
    Small,
    /// Industrial cockpit.
    Industrial,
}

bitflags::bitflags! {
    /// Crew implants and special pilot abilities.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CrewAbilities: u16 {
        /// Triple-strength myomer implants (infantry).
        const TSM_IMPLANT = 1 << 0;
        /// Enhanced leg implants (infantry).
        const ENHANCED_LEGS = 1 << 1;
        /// Vehicular direct neural interface.
        const VDNI = 1 << 2;
        /// Buffered VDNI.
        const BVDNI = 1 << 3;
        /// Maneuvering ace.
        const MANEUVERING_ACE = 1 << 4;
    }
}

/// Crew of a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    /// Piloting (or driving) skill.
    pub piloting: i32,
    /// Gunnery skill.
    pub gunnery: i32,
    /// Implants and abilities.
    pub abilities: CrewAbilities,
    /// Environmental specialist training, if any.
    pub specialty: Option<EnvironmentalSpecialty>,
    /// Wounds taken.
    pub hits: u8,
    /// Crew knocked out.
    pub unconscious: bool,
}

impl Default for Crew {
    fn default() -> Self {
        Self {
            piloting: 5,
            gunnery: 4,
            abilities: CrewAbilities::empty(),
            specialty: None,
            hits: 0,
            unconscious: false,
        }
    }
}

/// Platoon bookkeeping for headcount units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatoonState {
    /// Troopers per full squad.
    pub squad_size: u8,
    /// Squads at full strength.
    pub squads: u8,
    active_troopers: u32,
    active_squads: u8,
}

impl PlatoonState {
    /// Create a full-strength platoon.
    #[must_use]
    pub fn new(squads: u8, squad_size: u8) -> Self {
        let mut state = Self {
            squad_size: squad_size.max(1),
            squads,
            active_troopers: 0,
            active_squads: 0,
        };
        state.refresh(u32::from(squads) * u32::from(state.squad_size));
        state
    }

    /// Troopers still fighting.
    #[must_use]
    pub const fn active_troopers(&self) -> u32 {
        self.active_troopers
    }

    /// Squads with at least one trooper still fighting.
    #[must_use]
    pub const fn active_squads(&self) -> u8 {
        self.active_squads
    }

    fn refresh(&mut self, troopers: u32) {
        self.active_troopers = troopers;
        let size = u32::from(self.squad_size);
        let squads = troopers.div_ceil(size);
        self.active_squads = u8::try_from(squads).unwrap_or(u8::MAX);
    }
}

/// Result of mounting an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mounted {
    /// Arena handle of the new item.
    pub id: EquipmentId,
    /// First slot the item took.
    pub slot: u8,
}

/// A combat unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    name: String,
    chassis: Chassis,
    tonnage: u32,
    pub(crate) movement_mode: MovementMode,
    pub(crate) base_walk: u32,
    base_jump: u32,
    heat: u32,
    velocity: u32,
    airborne: bool,
    crew: Crew,
    gyro: GyroType,
    cockpit: CockpitType,
    pub(crate) layout: Cow<'static, [LocationInfo]>,
    pub(crate) criticals: CriticalStore,
    pub(crate) ledger: ArmorLedger,
    pub(crate) equipment: EquipmentArena,
    pub(crate) conversion: Option<ConversionState>,
    platoon: Option<PlatoonState>,
    pub(crate) squadron: Option<SquadronState>,
    pub(crate) weapon_groups: WeaponGroups,
}

impl Unit {
    /// Start building a unit.
    #[must_use]
    pub fn builder(name: impl Into<String>, chassis: Chassis) -> UnitBuilder {
        UnitBuilder::new(name, chassis)
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// Unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chassis tag.
    #[must_use]
    pub const fn chassis(&self) -> Chassis {
        self.chassis
    }

    /// Tonnage.
    #[must_use]
    pub const fn tonnage(&self) -> u32 {
        self.tonnage
    }

    /// Weight class.
    #[must_use]
    pub const fn weight_class(&self) -> WeightClass {
        WeightClass::from_tonnage(self.tonnage)
    }

    /// Current movement mode.
    #[must_use]
    pub const fn movement_mode(&self) -> MovementMode {
        self.movement_mode
    }

    /// Base walk MP (safe thrust for aerospace).
    #[must_use]
    pub const fn base_walk(&self) -> u32 {
        self.base_walk
    }

    /// Base jump MP rating for chassis that do not use jump jets.
    #[must_use]
    pub const fn base_jump(&self) -> u32 {
        self.base_jump
    }

    /// Crew.
    #[must_use]
    pub const fn crew(&self) -> &Crew {
        &self.crew
    }

    /// Crew, mutably.
    pub fn crew_mut(&mut self) -> &mut Crew {
        &mut self.crew
    }

    /// Gyro construction.
    #[must_use]
    pub const fn gyro(&self) -> GyroType {
        self.gyro
    }

    /// Cockpit construction.
    #[must_use]
    pub const fn cockpit(&self) -> CockpitType {
        self.cockpit
    }

    /// Current heat.
    #[must_use]
    pub const fn heat(&self) -> u32 {
        self.heat
    }

    /// Set current heat.
    pub fn set_heat(&mut self, heat: u32) {
        self.heat = heat;
    }

    /// Current velocity (flight-capable units).
    #[must_use]
    pub const fn velocity(&self) -> u32 {
        self.velocity
    }

    /// Set current velocity.
    pub fn set_velocity(&mut self, velocity: u32) {
        self.velocity = velocity;
    }

    /// Airborne.
    #[must_use]
    pub const fn is_airborne(&self) -> bool {
        self.airborne
    }

    /// Set the airborne flag.
    pub fn set_airborne(&mut self, airborne: bool) {
        self.airborne = airborne;
    }

    /// Check a chassis trait.
    #[must_use]
    pub const fn has(&self, traits: ChassisTraits) -> bool {
        self.chassis.has(traits)
    }

    /// Equipment arena.
    #[must_use]
    pub const fn equipment(&self) -> &EquipmentArena {
        &self.equipment
    }

    /// Switch an item on or off (MASC, supercharger).
    pub fn set_armed(&mut self, id: EquipmentId, armed: bool) {
        if let Some(item) = self.equipment.get_mut(id) {
            item.armed = armed;
        }
    }

    /// Critical slot store.
    #[must_use]
    pub const fn criticals(&self) -> &CriticalStore {
        &self.criticals
    }

    /// Armor ledger.
    #[must_use]
    pub const fn ledger(&self) -> &ArmorLedger {
        &self.ledger
    }

    /// Weapon groups for the current mode.
    #[must_use]
    pub const fn weapon_groups(&self) -> &WeaponGroups {
        &self.weapon_groups
    }

    /// Platoon state for headcount units.
    #[must_use]
    pub const fn platoon(&self) -> Option<&PlatoonState> {
        self.platoon.as_ref()
    }

    /// Squadron state for grouped units.
    #[must_use]
    pub const fn squadron(&self) -> Option<&SquadronState> {
        self.squadron.as_ref()
    }

    /// Current conversion mode for convertible units.
    #[must_use]
    pub fn conversion_mode(&self) -> Option<ConversionMode> {
        self.conversion.as_ref().map(ConversionState::mode)
    }

    /// Converting this round.
    #[must_use]
    pub fn is_converting(&self) -> bool {
        self.conversion.as_ref().is_some_and(ConversionState::is_converting)
    }

    // ========================================================================
    // Location table
    // ========================================================================

    /// Number of locations.
    #[must_use]
    pub fn location_count(&self) -> usize {
        self.layout.len()
    }

    /// Full location table.
    #[must_use]
    pub fn layout(&self) -> &[LocationInfo] {
        &self.layout
    }

    /// Location description.
    #[must_use]
    pub fn location_info(&self, location: Location) -> Option<&LocationInfo> {
        self.layout.get(location.index())
    }

    /// Critical slots in a location.
    #[must_use]
    pub fn slots_in(&self, location: Location) -> u8 {
        self.criticals.slots_in(location)
    }

    /// Location is an arm or a leg.
    #[must_use]
    pub fn is_appendage(&self, location: Location) -> bool {
        self.location_info(location)
            .is_some_and(LocationInfo::is_appendage)
    }

    /// Location name, empty for an invalid location.
    #[must_use]
    pub fn location_name(&self, location: Location) -> &str {
        self.location_info(location).map_or("", |l| l.name.as_ref())
    }

    /// Location abbreviation, empty for an invalid location.
    #[must_use]
    pub fn location_abbreviation(&self, location: Location) -> &str {
        self.location_info(location).map_or("", |l| l.abbreviation.as_ref())
    }

    /// Leg locations in table order.
    pub fn legs(&self) -> impl Iterator<Item = Location> + '_ {
        self.locations_of(LocationKind::Leg)
    }

    pub(crate) fn locations_of(&self, kind: LocationKind) -> impl Iterator<Item = Location> + '_ {
        self.layout
            .iter()
            .enumerate()
            .filter(move |(_, info)| info.kind == kind)
            .map(|(i, _)| Location::new(u8::try_from(i).unwrap_or(u8::MAX)))
    }

    /// Destroyed leg locations.
    #[must_use]
    pub fn destroyed_legs(&self) -> u32 {
        let count = self.legs().filter(|l| self.ledger.is_destroyed(*l)).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    // ========================================================================
    // Critical slots
    // ========================================================================

    /// Mount an item into `location`.
    ///
    /// Fails with `LocationFull` and leaves the unit untouched when the
    /// location lacks free slots.
    pub fn mount(&mut self, location: Location, mut item: MountedEquipment) -> Result<Mounted> {
        let id = EquipmentId::new(u32::try_from(self.equipment.len()).unwrap_or(u32::MAX));
        let slot = self
            .criticals
            .mount(location, SlotContent::Equipment(id), item.slots)?;
        item.location = location;
        let bomb = item.is(EquipmentFlags::BOMB);
        let inserted = self.equipment.insert(item);
        debug_assert_eq!(inserted, id);
        if bomb {
            self.refresh_bomb_suppression();
        }
        Ok(Mounted { id, slot })
    }

    /// Mount a built-in system into one slot of `location`.
    pub fn mount_system(&mut self, location: Location, kind: SystemKind) -> Result<u8> {
        self.criticals.mount(location, SlotContent::System(kind), 1)
    }

    /// Co-mount ordnance into a bay slot.
    pub fn mount_in_bay(
        &mut self,
        location: Location,
        slot: u8,
        mut item: MountedEquipment,
    ) -> Result<EquipmentId> {
        let id = EquipmentId::new(u32::try_from(self.equipment.len()).unwrap_or(u32::MAX));
        let arena = &self.equipment;
        self.criticals.mount_secondary(location, slot, id, |primary| {
            arena
                .get(primary)
                .is_some_and(|bay| bay.is(EquipmentFlags::BOMB_BAY))
        })?;
        item.location = location;
        let inserted = self.equipment.insert(item);
        debug_assert_eq!(inserted, id);
        self.refresh_bomb_suppression();
        Ok(id)
    }

    /// Mark a slot hit, cascading to the equipment it holds.
    pub fn apply_hit(&mut self, location: Location, slot: u8) -> Result<CriticalSlot> {
        let state = self.criticals.apply_hit(location, slot)?;
        for id in state.equipment() {
            self.equipment.mark_hit(id);
        }
        debug!(unit = %self.name, %location, slot, "critical hit");
        Ok(state)
    }

    /// Mark a slot destroyed, cascading to the equipment it holds.
    pub fn apply_destroy(&mut self, location: Location, slot: u8) -> Result<CriticalSlot> {
        let state = self.criticals.apply_destroy(location, slot)?;
        for id in state.equipment() {
            self.equipment.mark_destroyed(id);
        }
        debug!(unit = %self.name, %location, slot, "critical destroyed");
        Ok(state)
    }

    /// Repair a slot. Equipment with no other damaged slot becomes
    /// operable again unless its location is destroyed.
    pub fn repair(&mut self, location: Location, slot: u8) -> Result<CriticalSlot> {
        let state = self.criticals.repair(location, slot)?;
        for id in state.equipment() {
            let still_damaged = self.criticals.equipment_damaged(id);
            let Some(item) = self.equipment.get_mut(id) else {
                continue;
            };
            if !still_damaged && !self.ledger.is_destroyed(item.location) {
                item.hit = false;
                item.destroyed = false;
            }
        }
        Ok(state)
    }

    /// Damaged slots holding `kind`, across the unit.
    #[must_use]
    pub fn hits_on(&self, kind: SystemKind) -> u32 {
        self.criticals.hits_on_system(kind)
    }

    /// Gyro destroyed.
    #[must_use]
    pub fn is_gyro_destroyed(&self) -> bool {
        self.hits_on(SystemKind::Gyro) >= self.gyro.destroyed_at()
    }

    // ========================================================================
    // Armor ledger
    // ========================================================================

    /// Current armor.
    #[must_use]
    pub fn armor(&self, location: Location, rear: bool) -> u32 {
        self.ledger.armor(location, rear)
    }

    /// Set armor, clamped to `0..=original`.
    pub fn set_armor(&mut self, location: Location, value: u32, rear: bool) -> u32 {
        self.ledger.set_armor(location, value, rear)
    }

    /// Current internal structure.
    #[must_use]
    pub fn internal(&self, location: Location) -> u32 {
        self.ledger.internal(location)
    }

    /// Set internal structure, clamped to `0..=original`.
    ///
    /// Reaching zero destroys the location: all equipment mounted there is
    /// destroyed and dependent locations follow. For headcount units the
    /// trooper location also refreshes the active-trooper cache before
    /// returning.
    pub fn set_internal(&mut self, location: Location, value: u32) -> u32 {
        let stored = self.ledger.set_internal(location, value);
        if self.ledger.is_destroyed(location) {
            self.destroy_location(location);
        }
        if self.has(ChassisTraits::HEADCOUNT) && location == infantry::TROOPERS {
            self.refresh_troopers();
        }
        stored
    }

    /// Blow a limb off, destroying it.
    pub fn blow_off(&mut self, location: Location) {
        if !self.is_appendage(location) {
            return;
        }
        self.ledger.blow_off(location);
        self.destroy_location(location);
    }

    /// Set structural integrity (aerospace).
    pub fn set_structural_integrity(&mut self, value: u32) -> u32 {
        self.ledger.set_structural_integrity(value)
    }

    /// Fraction of armor plus structure remaining.
    #[must_use]
    pub fn remaining_percent(&self, scope: PercentScope) -> Option<Fixed> {
        self.ledger.remaining_percent(scope)
    }

    fn destroy_location(&mut self, location: Location) {
        let lost = self.equipment.destroy_in(location);
        debug!(unit = %self.name, %location, equipment_lost = lost, "location destroyed");

        if let Some(dependent) = dependent_location(self.chassis, location) {
            if !self.ledger.is_destroyed(dependent) {
                self.ledger.set_armor(dependent, 0, false);
                self.ledger.set_internal(dependent, 0);
                self.destroy_location(dependent);
            }
        }
    }

    fn refresh_troopers(&mut self) {
        let troopers = self.ledger.internal(infantry::TROOPERS);
        if let Some(platoon) = self.platoon.as_mut() {
            platoon.refresh(troopers);
            debug!(
                unit = %self.name,
                troopers,
                squads = platoon.active_squads(),
                "platoon strength refreshed"
            );
        }
    }

    /// Active troopers for headcount units, zero otherwise.
    #[must_use]
    pub fn active_troopers(&self) -> u32 {
        self.platoon.map_or(0, |p| p.active_troopers())
    }

    // ========================================================================
    // Damage state
    // ========================================================================

    /// Overall damage level. Pure query.
    ///
    /// Squadrons report only whether any member remains. Use
    /// [`crate::registry::UnitRegistry::damage_level`] for the member-aware
    /// answer.
    #[must_use]
    pub fn damage_level(&self) -> DamageLevel {
        if self.has(ChassisTraits::HEADCOUNT) {
            self.platoon_damage_level()
        } else if self.has(ChassisTraits::STRUCTURAL_INTEGRITY) {
            self.aero_damage_level()
        } else if self.has(ChassisTraits::GROUPED) {
            if self.squadron.as_ref().map_or(0, SquadronState::len) == 0 {
                DamageLevel::Destroyed
            } else {
                DamageLevel::None
            }
        } else {
            self.walker_damage_level()
        }
    }

    /// Destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.damage_level() == DamageLevel::Destroyed
    }

    /// Crippled (or worse).
    #[must_use]
    pub fn is_crippled(&self) -> bool {
        self.damage_level() >= DamageLevel::Crippled
    }

    /// Heavily damaged (or worse).
    #[must_use]
    pub fn is_dmg_heavy(&self) -> bool {
        self.damage_level() >= DamageLevel::Heavy
    }

    /// Moderately damaged (or worse).
    #[must_use]
    pub fn is_dmg_moderate(&self) -> bool {
        self.damage_level() >= DamageLevel::Moderate
    }

    /// Lightly damaged (or worse).
    #[must_use]
    pub fn is_dmg_light(&self) -> bool {
        self.damage_level() >= DamageLevel::Light
    }

    fn platoon_damage_level(&self) -> DamageLevel {
        let current = self.ledger.internal(infantry::TROOPERS);
        let original = self.ledger.original_internal(infantry::TROOPERS);
        if current == 0 {
            return DamageLevel::Destroyed;
        }
        if below_percent(current, original, 25) {
            DamageLevel::Crippled
        } else if below_percent(current, original, 50) {
            DamageLevel::Heavy
        } else if below_percent(current, original, 75) {
            DamageLevel::Moderate
        } else if below_percent(current, original, 90) {
            DamageLevel::Light
        } else {
            DamageLevel::None
        }
    }

    fn aero_damage_level(&self) -> DamageLevel {
        let si = self.ledger.structural_integrity();
        let original_si = self.ledger.original_structural_integrity();
        if original_si > 0 && si == 0 {
            return DamageLevel::Destroyed;
        }
        let nose_stripped =
            self.ledger.original_armor(aero::NOSE, false) > 0 && self.ledger.armor(aero::NOSE, false) == 0;
        if (original_si > 0 && at_or_below_percent(si, original_si, 50))
            || nose_stripped
            || self.hits_on(SystemKind::Engine) >= 2
        {
            return DamageLevel::Crippled;
        }
        self.armor_damage_level()
    }

    fn walker_damage_level(&self) -> DamageLevel {
        // Quad tables share head and torso indices with bipeds.
        if self.ledger.is_destroyed(mek::HEAD) || self.ledger.is_destroyed(mek::CENTER_TORSO) {
            return DamageLevel::Destroyed;
        }
        if self.is_walker_crippled() {
            return DamageLevel::Crippled;
        }
        self.armor_damage_level()
    }

    fn is_walker_crippled(&self) -> bool {
        let side_torso_gone = self.ledger.is_destroyed(mek::LEFT_TORSO)
            || self.ledger.is_destroyed(mek::RIGHT_TORSO);
        let legs_gone = self.destroyed_legs();
        let leg_limit = if self.chassis.leg_count() == 4 { 2 } else { 1 };

        side_torso_gone
            || legs_gone >= leg_limit
            || self.hits_on(SystemKind::Engine) >= 2
            || self.is_gyro_destroyed()
            || self.hits_on(SystemKind::Sensors) >= 2
            || self.ledger.locations_with_internal_damage() >= 3
    }

    fn armor_damage_level(&self) -> DamageLevel {
        let (current, original) = self.ledger.armor_totals(PercentScope::Aggregate);
        if original == 0 {
            return DamageLevel::None;
        }
        if at_or_below_percent(current, original, 33) {
            DamageLevel::Heavy
        } else if at_or_below_percent(current, original, 50) {
            DamageLevel::Moderate
        } else if at_or_below_percent(current, original, 75) {
            DamageLevel::Light
        } else {
            DamageLevel::None
        }
    }

    // ========================================================================
    // Mode helpers
    // ========================================================================

    /// Weather-rule view of this unit.
    #[must_use]
    pub fn movement_profile(&self) -> MovementProfile {
        MovementProfile {
            infantry: self.has(ChassisTraits::HEADCOUNT),
            ground_vehicle: matches!(
                self.movement_mode,
                MovementMode::Tracked | MovementMode::Wheeled | MovementMode::Hover
            ),
            airborne: self.airborne || self.chassis.is_aerospace(),
            heat_tracking: self.has(ChassisTraits::HEAT_TRACKING),
            specialty: self.crew.specialty,
        }
    }

    /// Moving on legs right now.
    #[must_use]
    pub const fn is_legged_mode(&self) -> bool {
        self.movement_mode.is_legged()
    }

    /// LAM in fighter mode or an aerospace craft.
    #[must_use]
    pub fn uses_thrust(&self) -> bool {
        let traits = self.chassis.traits();
        (traits.contains(ChassisTraits::FLIGHT) && !traits.contains(ChassisTraits::LEGGED))
            || self.conversion_mode() == Some(ConversionMode::Fighter)
    }

    pub(crate) fn refresh_bomb_suppression(&mut self) {
        let usable = match self.conversion_mode() {
            Some(mode) => mode.is_flight(),
            None => true,
        };
        self.equipment.set_suppressed(EquipmentFlags::BOMB, !usable);
    }
}

/// Builder for [`Unit`].
#[derive(Debug, Clone)]
pub struct UnitBuilder {
    name: String,
    chassis: Chassis,
    tonnage: u32,
    walk: u32,
    jump: u32,
    crew: Crew,
    gyro: GyroType,
    cockpit: CockpitType,
    standard_systems: bool,
    armor: Vec<(Location, u32, u32)>,
    internal: Vec<(Location, u32)>,
    armor_type: Option<(ArmorType, TechBase)>,
    structural_integrity: u32,
    platoon: Option<(u8, u8)>,
    mode: Option<ConversionMode>,
    equipment: Vec<(Location, MountedEquipment)>,
}

impl UnitBuilder {
    /// Start a builder.
    #[must_use]
    pub fn new(name: impl Into<String>, chassis: Chassis) -> Self {
        let gyro = if chassis.has(ChassisTraits::GYRO) {
            GyroType::Standard
        } else {
            GyroType::None
        };
        Self {
            name: name.into(),
            chassis,
            tonnage: 50,
            walk: 0,
            jump: 0,
            crew: Crew::default(),
            gyro,
            cockpit: CockpitType::Standard,
            standard_systems: true,
            armor: Vec::new(),
            internal: Vec::new(),
            armor_type: None,
            structural_integrity: 0,
            platoon: None,
            mode: None,
            equipment: Vec::new(),
        }
    }

    /// Set tonnage.
    #[must_use]
    pub const fn tonnage(mut self, tons: u32) -> Self {
        self.tonnage = tons;
        self
    }

    /// Set base walk MP (safe thrust for aerospace).
    #[must_use]
    pub const fn walk(mut self, mp: u32) -> Self {
        self.walk = mp;
        self
    }

    /// Set base jump MP (infantry).
    #[must_use]
    pub const fn jump(mut self, mp: u32) -> Self {
        self.jump = mp;
        self
    }

    /// Set the crew.
    #[must_use]
    pub fn crew(mut self, crew: Crew) -> Self {
        self.crew = crew;
        self
    }

    /// Set gyro construction.
    #[must_use]
    pub const fn gyro(mut self, gyro: GyroType) -> Self {
        self.gyro = gyro;
        self
    }

    /// Set cockpit construction.
    #[must_use]
    pub const fn cockpit(mut self, cockpit: CockpitType) -> Self {
        self.cockpit = cockpit;
        self
    }

    /// Skip installing engine, gyro, cockpit and actuators.
    #[must_use]
    pub const fn bare(mut self) -> Self {
        self.standard_systems = false;
        self
    }

    /// Set armor for one location.
    #[must_use]
    pub fn armor(mut self, location: Location, front: u32, rear: u32) -> Self {
        self.armor.push((location, front, rear));
        self
    }

    /// Set internal structure for one location.
    #[must_use]
    pub fn internal(mut self, location: Location, value: u32) -> Self {
        self.internal.push((location, value));
        self
    }

    /// Same armor and structure on every location. Rear armor only goes
    /// where the location has a rear facing.
    #[must_use]
    pub fn uniform(mut self, front: u32, rear: u32, internal: u32) -> Self {
        for (index, info) in static_locations(self.chassis).iter().enumerate() {
            let location = Location::new(u8::try_from(index).unwrap_or(u8::MAX));
            let rear = if info.rear_armor { rear } else { 0 };
            self.armor.push((location, front, rear));
            self.internal.push((location, internal));
        }
        self
    }

    /// Armor construction on every location.
    #[must_use]
    pub const fn armor_type(mut self, armor_type: ArmorType, tech: TechBase) -> Self {
        self.armor_type = Some((armor_type, tech));
        self
    }

    /// Structural integrity (aerospace).
    #[must_use]
    pub const fn structural_integrity(mut self, si: u32) -> Self {
        self.structural_integrity = si;
        self
    }

    /// Platoon organisation (infantry). Sets the trooper count.
    #[must_use]
    pub const fn platoon(mut self, squads: u8, squad_size: u8) -> Self {
        self.platoon = Some((squads, squad_size));
        self
    }

    /// Starting conversion mode (convertible chassis).
    #[must_use]
    pub const fn mode(mut self, mode: ConversionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Mount an item after the standard systems.
    #[must_use]
    pub fn with_equipment(mut self, location: Location, item: MountedEquipment) -> Self {
        self.equipment.push((location, item));
        self
    }

    /// Build the unit.
    ///
    /// Fails when a system or item does not fit its location.
    pub fn build(self) -> Result<Unit> {
        // Squadron layouts are rebuilt from their members on join and leave.
        let layout: Cow<'static, [LocationInfo]> = if self.chassis.has(ChassisTraits::GROUPED) {
            Cow::Owned(Vec::new())
        } else {
            Cow::Borrowed(static_locations(self.chassis))
        };
        let criticals = CriticalStore::for_layout(&layout);
        let ledger = ArmorLedger::new(layout.len());
        let conversion = self.chassis.has(ChassisTraits::CONVERTIBLE).then(|| {
            ConversionState::new(self.mode.unwrap_or(ConversionMode::Mek))
        });
        let squadron = self
            .chassis
            .has(ChassisTraits::GROUPED)
            .then(SquadronState::default);
        let platoon = self
            .platoon
            .filter(|_| self.chassis.has(ChassisTraits::HEADCOUNT))
            .map(|(squads, size)| PlatoonState::new(squads, size));

        let mut unit = Unit {
            name: self.name,
            chassis: self.chassis,
            tonnage: self.tonnage,
            movement_mode: self.chassis.default_movement_mode(),
            base_walk: self.walk,
            base_jump: self.jump,
            heat: 0,
            velocity: 0,
            airborne: false,
            crew: self.crew,
            gyro: self.gyro,
            cockpit: self.cockpit,
            layout,
            criticals,
            ledger,
            equipment: EquipmentArena::new(),
            conversion,
            platoon,
            squadron,
            weapon_groups: WeaponGroups::default(),
        };

        for (location, front, rear) in &self.armor {
            let internal = self
                .internal
                .iter()
                .rev()
                .find(|(l, _)| l == location)
                .map_or(0, |(_, v)| *v);
            unit.ledger.init_location(*location, *front, *rear, internal);
        }
        for (location, internal) in &self.internal {
            if !self.armor.iter().any(|(l, _, _)| l == location) {
                unit.ledger.init_location(*location, 0, 0, *internal);
            }
        }
        if let Some(platoon) = unit.platoon {
            let troopers = platoon.active_troopers();
            unit.ledger.init_location(infantry::TROOPERS, 0, 0, troopers);
        }
        if let Some((armor_type, tech)) = self.armor_type {
            for index in 0..unit.location_count() {
                let location = Location::new(u8::try_from(index).unwrap_or(u8::MAX));
                unit.ledger.set_armor_type(location, armor_type, tech);
            }
        }
        unit.ledger.init_structural_integrity(self.structural_integrity);

        if self.standard_systems {
            unit.install_standard_systems()?;
        }
        for (location, item) in self.equipment {
            unit.mount(location, item)?;
        }
        if let Some(mode) = unit.conversion_mode() {
            unit.movement_mode = mode.movement_mode(unit.chassis);
        }
        unit.refresh_bomb_suppression();
        unit.weapon_groups = WeaponGroups::build(&unit.equipment, unit.uses_thrust());
        Ok(unit)
    }
}

impl Unit {
    fn install_standard_systems(&mut self) -> Result<()> {
        if self.chassis.is_walker() {
            return self.install_walker_systems();
        }
        if self.chassis.is_aerospace() {
            for (kind, count) in [
                (SystemKind::Avionics, 3),
                (SystemKind::Engine, 3),
                (SystemKind::FireControl, 1),
                (SystemKind::Sensors, 1),
                (SystemKind::LandingGear, 1),
                (SystemKind::LifeSupport, 1),
            ] {
                self.criticals
                    .mount(aero::FUSELAGE, SlotContent::System(kind), count)?;
            }
        }
        Ok(())
    }

    fn install_walker_systems(&mut self) -> Result<()> {
        for kind in [
            SystemKind::LifeSupport,
            SystemKind::Sensors,
            SystemKind::Cockpit,
            SystemKind::Sensors,
            SystemKind::LifeSupport,
        ] {
            self.mount_system(mek::HEAD, kind)?;
        }

        let engine = SlotContent::System(SystemKind::Engine);
        self.criticals.mount(mek::CENTER_TORSO, engine, 3)?;
        if self.gyro.slots() > 0 {
            self.criticals.mount(
                mek::CENTER_TORSO,
                SlotContent::System(SystemKind::Gyro),
                self.gyro.slots(),
            )?;
        }
        self.criticals.mount(mek::CENTER_TORSO, engine, 3)?;

        let legs: Vec<Location> = self.legs().collect();
        for leg in legs {
            for kind in [
                SystemKind::Hip,
                SystemKind::UpperLeg,
                SystemKind::LowerLeg,
                SystemKind::Foot,
            ] {
                self.mount_system(leg, kind)?;
            }
        }
        let arms: Vec<Location> = self.locations_of(LocationKind::Arm).collect();
        for arm in arms {
            for kind in [
                SystemKind::Shoulder,
                SystemKind::UpperArm,
                SystemKind::LowerArm,
                SystemKind::Hand,
            ] {
                self.mount_system(arm, kind)?;
            }
        }

        match self.chassis {
            Chassis::LandAirMek(_) => {
                for location in [mek::HEAD, mek::LEFT_TORSO, mek::RIGHT_TORSO] {
                    self.mount_system(location, SystemKind::Avionics)?;
                }
                for location in [mek::CENTER_TORSO, mek::LEFT_TORSO, mek::RIGHT_TORSO] {
                    self.mount_system(location, SystemKind::LandingGear)?;
                }
            }
            Chassis::QuadVee => {
                self.mount_system(quad::CENTER_TORSO, SystemKind::ConversionEquipment)?;
                let legs: Vec<Location> = self.legs().collect();
                for leg in legs {
                    self.mount(leg, MountedEquipment::new("Tracks", EquipmentFlags::TRACKS))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Chassis is a standard three-mode LAM.
    #[must_use]
    pub const fn is_standard_lam(&self) -> bool {
        matches!(self.chassis, Chassis::LandAirMek(LamKind::Standard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biped() -> Unit {
        Unit::builder("Wolverine", Chassis::Biped)
            .tonnage(55)
            .walk(5)
            .uniform(10, 4, 8)
            .build()
            .unwrap()
    }

    fn platoon() -> Unit {
        Unit::builder("Foot Platoon", Chassis::InfantryPlatoon)
            .walk(1)
            .platoon(4, 7)
            .build()
            .unwrap()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_location_tables_consistent() {
        let unit = biped();
        assert_eq!(unit.location_count(), 8);
        assert_eq!(unit.layout().len(), unit.criticals().location_count());
        assert_eq!(unit.ledger().location_count(), unit.location_count());
        assert_eq!(unit.location_name(mek::LEFT_ARM), "Left Arm");
        assert_eq!(unit.location_abbreviation(mek::CENTER_TORSO), "CT");
        assert_eq!(unit.location_name(Location::NONE), "");
    }

    #[test]
    fn test_standard_systems_installed() {
        let unit = biped();
        let store = unit.criticals();
        assert_eq!(store.system_slots(SystemKind::Engine), 6);
        assert_eq!(store.system_slots(SystemKind::Gyro), 4);
        assert_eq!(store.system_slots(SystemKind::Hip), 2);
        assert_eq!(store.free_slots(mek::CENTER_TORSO), 2);
        assert_eq!(store.free_slots(mek::HEAD), 1);
    }

    #[test]
    fn test_lam_with_xl_gyro_does_not_fit() {
        let result = Unit::builder("Phoenix Hawk LAM", Chassis::LandAirMek(LamKind::Standard))
            .gyro(GyroType::Xl)
            .build();
        assert!(matches!(
            result,
            Err(crate::error::CoreError::LocationFull { .. })
        ));
    }

    #[test]
    fn test_construction_follows_chassis_traits() {
        let fighter = Unit::builder("Sparrowhawk", Chassis::AerospaceFighter)
            .build()
            .unwrap();
        assert!(fighter.uses_thrust());
        assert_eq!(fighter.criticals().system_slots(SystemKind::Avionics), 3);
        assert!(fighter.squadron().is_none());

        let squadron = Unit::builder("Blue Wing", Chassis::FighterSquadron)
            .build()
            .unwrap();
        assert!(squadron.uses_thrust());
        assert_eq!(squadron.location_count(), 0);
        assert!(squadron.squadron().is_some());
        assert_eq!(squadron.damage_level(), DamageLevel::Destroyed);

        assert!(!platoon().uses_thrust());
        assert_eq!(platoon().criticals().system_slots(SystemKind::Engine), 0);

        let mut lam = Unit::builder("Stinger LAM", Chassis::LandAirMek(LamKind::Standard))
            .build()
            .unwrap();
        assert!(!lam.uses_thrust());
        lam.request_conversion(ConversionMode::Fighter).unwrap();
        assert!(lam.uses_thrust());
    }

    #[test]
    fn test_unit_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Unit>();
    }

    #[test]
    fn test_weight_class() {
        assert_eq!(biped().weight_class(), WeightClass::Medium);
    }

    // ========================================================================
    // Cascades
    // ========================================================================

    #[test]
    fn test_slot_destroy_cascades_to_equipment() {
        let mut unit = biped();
        let laser = unit
            .mount(
                mek::RIGHT_ARM,
                MountedEquipment::new("Large Laser", EquipmentFlags::WEAPON).with_slots(2),
            )
            .unwrap();
        unit.apply_destroy(mek::RIGHT_ARM, laser.slot).unwrap();
        let item = unit.equipment().get(laser.id).unwrap();
        assert!(item.destroyed);

        unit.repair(mek::RIGHT_ARM, laser.slot).unwrap();
        assert!(unit.equipment().get(laser.id).unwrap().is_operable());
    }

    #[test]
    fn test_full_mount_leaves_arena_untouched() {
        let mut unit = biped();
        let before = unit.equipment().len();
        let result = unit.mount(
            mek::HEAD,
            MountedEquipment::new("PPC", EquipmentFlags::WEAPON).with_slots(3),
        );
        assert!(result.is_err());
        assert_eq!(unit.equipment().len(), before);
    }

    #[test]
    fn test_side_torso_destruction_takes_arm() {
        let mut unit = biped();
        let gun = unit
            .mount(
                mek::LEFT_ARM,
                MountedEquipment::new("AC/5", EquipmentFlags::WEAPON).with_slots(4),
            )
            .unwrap();
        unit.set_internal(mek::LEFT_TORSO, 0);
        assert!(unit.ledger().is_destroyed(mek::LEFT_ARM));
        assert!(unit.equipment().get(gun.id).unwrap().destroyed);
        assert!(unit.is_crippled());
    }

    #[test]
    fn test_set_never_exceeds_original() {
        let mut unit = biped();
        assert_eq!(unit.set_armor(mek::CENTER_TORSO, 99, false), 10);
        assert_eq!(unit.set_armor(mek::CENTER_TORSO, 99, true), 4);
        assert_eq!(unit.set_internal(mek::CENTER_TORSO, 99), 8);
    }

    #[test]
    fn test_trooper_cache_refreshes_synchronously() {
        let mut unit = platoon();
        assert_eq!(unit.active_troopers(), 28);
        unit.set_internal(infantry::TROOPERS, 9);
        assert_eq!(unit.active_troopers(), 9);
        assert_eq!(unit.platoon().unwrap().active_squads(), 2);
        unit.set_internal(infantry::TROOPERS, 0);
        assert!(unit.is_destroyed());
    }

    // ========================================================================
    // Damage levels
    // ========================================================================

    #[test]
    fn test_platoon_thresholds() {
        let mut unit = platoon();
        assert_eq!(unit.damage_level(), DamageLevel::None);
        unit.set_internal(infantry::TROOPERS, 24);
        assert_eq!(unit.damage_level(), DamageLevel::Light);
        unit.set_internal(infantry::TROOPERS, 20);
        assert_eq!(unit.damage_level(), DamageLevel::Moderate);
        unit.set_internal(infantry::TROOPERS, 13);
        assert_eq!(unit.damage_level(), DamageLevel::Heavy);
        unit.set_internal(infantry::TROOPERS, 6);
        assert!(unit.is_crippled());
        assert!(unit.is_dmg_heavy());
    }

    #[test]
    fn test_walker_armor_thresholds() {
        let mut unit = biped();
        assert!(!unit.is_dmg_light());
        for index in 0..8 {
            let location = Location::new(index);
            unit.set_armor(location, 5, false);
            unit.set_armor(location, 2, true);
        }
        // 46 of 92 points remaining
        assert_eq!(unit.damage_level(), DamageLevel::Moderate);
    }

    #[test]
    fn test_walker_crippled_by_leg_loss() {
        let mut unit = biped();
        unit.set_internal(mek::RIGHT_LEG, 0);
        assert!(unit.is_crippled());
        assert!(!unit.is_destroyed());
    }

    #[test]
    fn test_walker_crippled_by_gyro() {
        let mut unit = biped();
        let gyro_slots: Vec<u8> = unit
            .criticals()
            .slots(mek::CENTER_TORSO)
            .iter()
            .enumerate()
            .filter(|(_, s)| s.holds(SystemKind::Gyro))
            .map(|(i, _)| u8::try_from(i).unwrap())
            .collect();
        unit.apply_hit(mek::CENTER_TORSO, gyro_slots[0]).unwrap();
        assert!(!unit.is_crippled());
        unit.apply_hit(mek::CENTER_TORSO, gyro_slots[1]).unwrap();
        assert!(unit.is_gyro_destroyed());
        assert!(unit.is_crippled());
    }

    #[test]
    fn test_head_destroyed_is_destroyed() {
        let mut unit = biped();
        unit.set_internal(mek::HEAD, 0);
        assert_eq!(unit.damage_level(), DamageLevel::Destroyed);
    }

    #[test]
    fn test_crippled_query_is_pure() {
        let mut unit = biped();
        unit.set_internal(mek::LEFT_LEG, 0);
        let snapshot = unit.clone();
        for _ in 0..3 {
            assert!(unit.is_crippled());
        }
        assert_eq!(unit, snapshot);
    }

    #[test]
    fn test_blow_off_only_limbs() {
        let mut unit = biped();
        unit.blow_off(mek::CENTER_TORSO);
        assert!(!unit.ledger().is_destroyed(mek::CENTER_TORSO));
        unit.blow_off(mek::RIGHT_ARM);
        assert!(unit.ledger().is_destroyed(mek::RIGHT_ARM));
        assert!(unit.ledger().entry(mek::RIGHT_ARM).unwrap().blown_off);
    }
}
