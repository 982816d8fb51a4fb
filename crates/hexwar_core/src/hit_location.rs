//! Hit-location resolution.
//!
//! Resolution is a pure function of the unit's chassis and mode, the
//! request and the dice sequence. Forcing the same rolls through
//! [`crate::dice::ScriptedDice`] always yields the same [`HitResult`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::debug;

use crate::conditions::Environment;
use crate::dice::DiceRoller;
use crate::hit_tables::{table_set, EntryEffect, HitEntry, TableSet};
use crate::location::{infantry, mek, quad, Location, LocationKind};
use crate::registry::UnitId;
use crate::unit::Unit;
use crate::unit_kind::Chassis;

/// Attack type selecting the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum HitTable {
    /// Ranged and most physical attacks.
    #[default]
    Normal,
    /// Punches.
    Punch,
    /// Kicks.
    Kick,
    /// Swarming infantry.
    Swarm,
    /// Attacks from a higher elevation.
    Above,
    /// Attacks from a lower elevation.
    Below,
}

impl HitTable {
    /// Rolled on 2d6 rather than 1d6.
    #[must_use]
    pub const fn is_2d6(self) -> bool {
        matches!(self, Self::Normal | Self::Swarm)
    }
}

/// Side of the target the attack comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum AttackSide {
    /// Front arc.
    #[default]
    Front,
    /// Left side.
    Left,
    /// Right side.
    Right,
    /// Rear arc.
    Rear,
}

/// Aiming aid available to the attacker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AimingMode {
    /// No aimed shots.
    #[default]
    None,
    /// Target is immobile.
    Immobile,
    /// Targeting computer (cannot aim at the head).
    TargetingComputer,
}

bitflags::bitflags! {
    /// Partial cover, in the attacker's view.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Cover: u8 {
        /// Lower left covered.
        const LOW_LEFT = 1 << 0;
        /// Lower right covered.
        const LOW_RIGHT = 1 << 1;
        /// Whole left side covered.
        const LEFT = 1 << 2;
        /// Whole right side covered.
        const RIGHT = 1 << 3;
        /// Everything above the legs covered.
        const UPPER = 1 << 4;
        /// Both legs covered.
        const HORIZONTAL = Self::LOW_LEFT.bits() | Self::LOW_RIGHT.bits();
    }
}

impl Cover {
    /// Swap left and right.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        let mut out = self.intersection(Self::UPPER);
        if self.contains(Self::LOW_LEFT) {
            out = out.union(Self::LOW_RIGHT);
        }
        if self.contains(Self::LOW_RIGHT) {
            out = out.union(Self::LOW_LEFT);
        }
        if self.contains(Self::LEFT) {
            out = out.union(Self::RIGHT);
        }
        if self.contains(Self::RIGHT) {
            out = out.union(Self::LEFT);
        }
        out
    }
}

bitflags::bitflags! {
    /// Secondary effects of a hit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct HitEffects: u8 {
        /// Critical roll without penetrating armor.
        const THROUGH_ARMOR_CRIT = 1 << 0;
        /// Aerospace critical chance.
        const CRITICAL_CHANCE = 1 << 1;
        /// Aimed shot landed.
        const CALLED_SHOT = 1 << 2;
        /// Cover took the hit.
        const ABSORBED_BY_COVER = 1 << 3;
        /// Vehicle motive damage.
        const MOTIVE_DAMAGE = 1 << 4;
    }
}

/// What the attacker asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRequest {
    /// Table kind.
    pub table: HitTable,
    /// Attack side.
    pub side: AttackSide,
    /// Aimed location, [`Location::NONE`] when not aiming.
    pub aimed: Location,
    /// Aiming aid.
    pub aiming: AimingMode,
    /// Partial cover of the target.
    pub cover: Cover,
}

impl HitRequest {
    /// Unaimed, uncovered request.
    #[must_use]
    pub const fn new(table: HitTable, side: AttackSide) -> Self {
        Self {
            table,
            side,
            aimed: Location::NONE,
            aiming: AimingMode::None,
            cover: Cover::empty(),
        }
    }

    /// Aim at `location`.
    #[must_use]
    pub const fn aimed_at(mut self, location: Location, aiming: AimingMode) -> Self {
        self.aimed = location;
        self.aiming = aiming;
        self
    }

    /// Add partial cover.
    #[must_use]
    pub const fn with_cover(mut self, cover: Cover) -> Self {
        self.cover = cover;
        self
    }
}

impl Default for HitRequest {
    fn default() -> Self {
        Self::new(HitTable::Normal, AttackSide::Front)
    }
}

/// A resolved hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitResult {
    /// Location hit, [`Location::NONE`] when cover absorbed it.
    pub location: Location,
    /// Rear armor takes the hit.
    pub rear: bool,
    /// Secondary effects.
    pub effects: HitEffects,
    /// Squadron member that took the hit.
    pub member: Option<UnitId>,
}

impl HitResult {
    /// Plain hit on `location`.
    #[must_use]
    pub const fn at(location: Location) -> Self {
        Self {
            location,
            rear: false,
            effects: HitEffects::empty(),
            member: None,
        }
    }

    /// Cover absorbed the hit.
    #[must_use]
    pub const fn is_absorbed(&self) -> bool {
        self.effects.contains(HitEffects::ABSORBED_BY_COVER)
    }
}

/// Which side of a walker a location sits on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Flank {
    Left,
    Right,
    Center,
}

impl Unit {
    /// Roll a hit location.
    ///
    /// Squadrons pick among their member locations here. The member-aware
    /// resolution lives in [`crate::registry::UnitRegistry::roll_hit_location`].
    pub fn roll_hit_location<D: DiceRoller + ?Sized>(
        &self,
        request: &HitRequest,
        dice: &mut D,
        env: Option<&Environment>,
    ) -> HitResult {
        let result = match self.chassis() {
            Chassis::InfantryPlatoon => HitResult::at(infantry::TROOPERS),
            Chassis::FighterSquadron => self.roll_member_location(dice),
            chassis => match table_set(chassis, self.conversion_mode()) {
                Some(set) => self.roll_on_tables(set, request, dice, env),
                None => HitResult::at(Location::NONE),
            },
        };
        debug!(
            unit = %self.name(),
            table = %request.table,
            side = %request.side,
            location = %result.location,
            effects = ?result.effects,
            "hit location"
        );
        result
    }

    fn roll_member_location<D: DiceRoller + ?Sized>(&self, dice: &mut D) -> HitResult {
        let count = self.location_count();
        if count == 0 {
            return HitResult::at(Location::NONE);
        }
        let index = dice.pick_index(count);
        HitResult::at(Location::new(u8::try_from(index).unwrap_or(u8::MAX)))
    }

    fn roll_on_tables<D: DiceRoller + ?Sized>(
        &self,
        set: &TableSet,
        request: &HitRequest,
        dice: &mut D,
        env: Option<&Environment>,
    ) -> HitResult {
        let mut result = match self.called_shot(request, dice) {
            Some(result) => result,
            None => {
                let entry = lookup(set, request, dice);
                self.apply_entry(entry, dice, env)
            }
        };

        if !request.cover.is_empty() {
            let cover = if request.side == AttackSide::Front {
                request.cover.mirrored()
            } else {
                request.cover
            };
            if self.is_covered(result.location, cover) {
                result = HitResult {
                    location: Location::NONE,
                    rear: false,
                    effects: result.effects | HitEffects::ABSORBED_BY_COVER,
                    member: None,
                };
            }
        }
        result
    }

    fn called_shot<D: DiceRoller + ?Sized>(
        &self,
        request: &HitRequest,
        dice: &mut D,
    ) -> Option<HitResult> {
        let aimed = request.aimed;
        let allowed = match request.aiming {
            AimingMode::None => false,
            AimingMode::Immobile => true,
            AimingMode::TargetingComputer => {
                !matches!(self.location_info(aimed).map(|l| l.kind), Some(LocationKind::Head))
            }
        };
        if !allowed || aimed.index() >= self.location_count() {
            return None;
        }
        let roll = dice.roll_2d6();
        debug!(unit = %self.name(), aimed = %aimed, roll, "aimed shot");
        if !(6..=8).contains(&roll) {
            return None;
        }
        let rear = request.side == AttackSide::Rear
            && self.location_info(aimed).is_some_and(|l| l.rear_armor);
        Some(HitResult {
            location: aimed,
            rear,
            effects: HitEffects::CALLED_SHOT,
            member: None,
        })
    }

    fn apply_entry<D: DiceRoller + ?Sized>(
        &self,
        entry: HitEntry,
        dice: &mut D,
        env: Option<&Environment>,
    ) -> HitResult {
        let mut effects = HitEffects::empty();
        match entry.effect {
            EntryEffect::None => {}
            EntryEffect::Tac => {
                if !Environment::options_of(env).no_tac {
                    let roll = dice.roll_2d6();
                    debug!(unit = %self.name(), roll, "through-armor critical check");
                    if roll >= 8 {
                        effects |= HitEffects::THROUGH_ARMOR_CRIT;
                    }
                }
            }
            EntryEffect::Critical => effects |= HitEffects::CRITICAL_CHANCE,
            EntryEffect::Motive => effects |= HitEffects::MOTIVE_DAMAGE,
        }
        HitResult {
            location: entry.location,
            rear: entry.rear,
            effects,
            member: None,
        }
    }

    fn flank_of(&self, location: Location) -> Flank {
        let quad_layout = self.chassis().leg_count() == 4;
        let left = if quad_layout {
            [quad::LEFT_TORSO, quad::FRONT_LEFT_LEG, quad::REAR_LEFT_LEG].contains(&location)
        } else {
            [mek::LEFT_TORSO, mek::LEFT_ARM, mek::LEFT_LEG].contains(&location)
        };
        let right = if quad_layout {
            [quad::RIGHT_TORSO, quad::FRONT_RIGHT_LEG, quad::REAR_RIGHT_LEG].contains(&location)
        } else {
            [mek::RIGHT_TORSO, mek::RIGHT_ARM, mek::RIGHT_LEG].contains(&location)
        };
        match (left, right) {
            (true, _) => Flank::Left,
            (_, true) => Flank::Right,
            _ => Flank::Center,
        }
    }

    /// Partial cover only protects walkers.
    fn is_covered(&self, location: Location, cover: Cover) -> bool {
        if !self.chassis().is_walker() || !location.is_valid() {
            return false;
        }
        let is_leg = self.location_info(location).is_some_and(|l| l.is_leg());
        let flank = self.flank_of(location);

        if !is_leg && cover.contains(Cover::UPPER) {
            return true;
        }
        match flank {
            Flank::Left if cover.contains(Cover::LEFT) => true,
            Flank::Right if cover.contains(Cover::RIGHT) => true,
            Flank::Left => is_leg && cover.contains(Cover::LOW_LEFT),
            Flank::Right => is_leg && cover.contains(Cover::LOW_RIGHT),
            Flank::Center => is_leg && cover.contains(Cover::HORIZONTAL),
        }
    }
}

fn lookup<D: DiceRoller + ?Sized>(set: &TableSet, request: &HitRequest, dice: &mut D) -> HitEntry {
    let side = request.side;
    let one_d6 = match request.table {
        HitTable::Normal => None,
        HitTable::Swarm => {
            if let Some(swarm) = &set.swarm {
                return swarm[index_2d6(dice.roll_2d6())];
            }
            None
        }
        HitTable::Punch => set.punch.as_ref(),
        HitTable::Kick => set.kick.as_ref(),
        HitTable::Above => set.above.as_ref(),
        HitTable::Below => set.below.as_ref(),
    };
    match one_d6 {
        Some(tables) => {
            let table = pick_side(tables, side);
            table[index_1d6(dice.roll_1d6())]
        }
        None => pick_side(&set.normal, side)[index_2d6(dice.roll_2d6())],
    }
}

const fn pick_side<T>(tables: &crate::hit_tables::SideTables<T>, side: AttackSide) -> &T {
    match side {
        AttackSide::Front => &tables.front,
        AttackSide::Rear => &tables.rear,
        AttackSide::Left => &tables.left,
        AttackSide::Right => &tables.right,
    }
}

fn index_2d6(roll: u8) -> usize {
    usize::from(roll.clamp(2, 12) - 2)
}

fn index_1d6(roll: u8) -> usize {
    usize::from(roll.clamp(1, 6) - 1)
}
