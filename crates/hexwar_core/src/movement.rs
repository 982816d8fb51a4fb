//! Movement-point pipeline.
//!
//! Walk MP is computed as an ordered list of stages:
//!
//! 1. Base rating (safe thrust for aerospace, 3 × jump for AirMek)
//! 2. Damage: destroyed legs, hips, actuators, tracks, engine hits
//! 3. Equipment: modular armor, cargo, implants, field guns, bombs
//! 4. Heat
//! 5. Weather and wind
//! 6. Gravity
//! 7. Floor at zero
//! 8. Halving while converting
//!
//! Each stage can be suppressed by an [`MpSettings`] flag, and every stage
//! that reads the environment is skipped when no [`Environment`] is given.
//! Run, sprint and jump MP compose on the same stages. Run and sprint start
//! from the walk value before the floor, never from the clamped result.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, trace};

use crate::conditions::Environment;
use crate::conversion::ConversionMode;
use crate::criticals::SystemKind;
use crate::equipment::EquipmentFlags;
use crate::location::Location;
use crate::math::{div_round_half_down, halve_round_up, scale_floor, Fixed};
use crate::options::GameOptions;
use crate::unit::{CrewAbilities, Unit};
use crate::unit_kind::{ChassisTraits, MovementMode};

/// Movement kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum MpKind {
    /// Walk (cruise, safe thrust).
    Walk,
    /// Run (flank, max thrust).
    Run,
    /// Jump.
    Jump,
    /// Sprint.
    Sprint,
}

bitflags::bitflags! {
    /// Modifier families to leave out of an MP query.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MpSettings: u16 {
        /// Skip the heat stage.
        const IGNORE_HEAT = 1 << 0;
        /// Skip weather and wind.
        const IGNORE_WEATHER = 1 << 1;
        /// Skip gravity.
        const IGNORE_GRAVITY = 1 << 2;
        /// Skip halving while converting.
        const IGNORE_CONVERSION = 1 << 3;
        /// Skip the modular armor penalty.
        const IGNORE_MODULAR_ARMOR = 1 << 4;
        /// Skip the encumbering cargo penalty.
        const IGNORE_CARGO = 1 << 5;
        /// Skip MASC and supercharger boosts.
        const IGNORE_MASC = 1 << 6;
        /// Skip structural damage.
        const IGNORE_DAMAGE = 1 << 7;
        /// Skip the whole equipment stage.
        const IGNORE_EQUIPMENT = 1 << 8;
    }
}

impl MpSettings {
    /// Actual MP this turn.
    pub const NONE: Self = Self::empty();
    /// Ideal MP: the undamaged base rating.
    pub const ALL: Self = Self::all();
}

/// Pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MpStage {
    /// Base rating.
    Base,
    /// Structural damage.
    Damage,
    /// Equipment.
    Equipment,
    /// Heat.
    Heat,
    /// Weather and wind.
    Weather,
    /// Gravity.
    Gravity,
    /// Run, sprint or thrust multiplier.
    Multiplier,
    /// Floor at zero.
    Floor,
    /// Halving while converting.
    Conversion,
}

/// Running value after one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageValue {
    /// Stage applied.
    pub stage: MpStage,
    /// Value after the stage.
    pub value: i32,
}

/// Stage-by-stage record of one MP computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpBreakdown {
    /// Kind computed.
    pub kind: MpKind,
    /// Stages in application order.
    pub stages: Vec<StageValue>,
    /// Final MP.
    pub total: u32,
}

impl MpBreakdown {
    /// Value after `stage`, if it ran.
    #[must_use]
    pub fn after(&self, stage: MpStage) -> Option<i32> {
        self.stages
            .iter()
            .rev()
            .find(|s| s.stage == stage)
            .map(|s| s.value)
    }

    fn record(&mut self, stage: MpStage, value: i32) -> i32 {
        trace!(kind = %self.kind, %stage, value, "mp stage");
        self.stages.push(StageValue { stage, value });
        value
    }
}

/// Heat penalty to walk MP.
///
/// The standard table stops at 5. The alternate table continues in bands
/// of six heat up to 9.
#[must_use]
pub const fn heat_penalty(heat: u32, tacops: bool) -> i32 {
    let penalty = if !tacops || heat < 25 {
        let base = heat / 5;
        if !tacops && base > 5 {
            5
        } else {
            base
        }
    } else {
        match heat {
            25..=30 => 5,
            31..=36 => 6,
            37..=42 => 7,
            43..=48 => 8,
            _ => 9,
        }
    };
    penalty as i32
}

/// TSM bonus applies from this heat.
const TSM_HEAT: u32 = 9;

impl Unit {
    /// Compute MP of `kind` under `settings`.
    ///
    /// Never negative. `MpSettings::ALL` returns the undamaged base rating.
    #[must_use]
    pub fn compute_mp(&self, kind: MpKind, settings: MpSettings, env: Option<&Environment>) -> u32 {
        self.mp_breakdown(kind, settings, env).total
    }

    /// Compute MP of `kind` and keep the stage trace.
    #[must_use]
    pub fn mp_breakdown(
        &self,
        kind: MpKind,
        settings: MpSettings,
        env: Option<&Environment>,
    ) -> MpBreakdown {
        let mut breakdown = MpBreakdown {
            kind,
            stages: Vec::new(),
            total: 0,
        };
        let options = Environment::options_of(env);

        let raw = match kind {
            MpKind::Walk => self.walk_stages(settings, env, &mut breakdown),
            MpKind::Run => self.run_stages(settings, env, &mut breakdown),
            MpKind::Sprint => {
                if options.tacops_sprint && self.chassis().is_walker() && self.is_legged_mode() {
                    self.sprint_stages(settings, env, &mut breakdown)
                } else {
                    self.run_stages(settings, env, &mut breakdown)
                }
            }
            MpKind::Jump => self.jump_stages(settings, env, &mut breakdown),
        };

        let mut value = breakdown.record(MpStage::Floor, raw.max(0));
        if self.is_converting() && !settings.contains(MpSettings::IGNORE_CONVERSION) {
            value = breakdown.record(MpStage::Conversion, value / 2);
        }
        breakdown.total = value.unsigned_abs();
        debug!(unit = %self.name(), %kind, total = breakdown.total, "mp computed");
        breakdown
    }

    // ========================================================================
    // Walk
    // ========================================================================

    fn walk_stages(&self, s: MpSettings, env: Option<&Environment>, t: &mut MpBreakdown) -> i32 {
        if self.uses_thrust() {
            return self.thrust_stages(s, t);
        }
        if self.movement_mode == MovementMode::AirMek {
            return self.airmek_stages(s, t);
        }

        let options = Environment::options_of(env);
        let mut mp = t.record(MpStage::Base, to_mp(self.base_walk));

        let (damaged, pinned) = if s.contains(MpSettings::IGNORE_DAMAGE) {
            (mp, false)
        } else {
            let (value, pinned) = self.damage_stage(mp, &options);
            (t.record(MpStage::Damage, value), pinned)
        };
        mp = damaged;
        // Losing legs fixes the result regardless of later modifiers.
        if pinned {
            return mp;
        }

        if !s.contains(MpSettings::IGNORE_EQUIPMENT) {
            mp = t.record(MpStage::Equipment, self.equipment_stage(mp, s));
        }
        if self.has(ChassisTraits::HEAT_TRACKING) && !s.contains(MpSettings::IGNORE_HEAT) {
            mp = t.record(MpStage::Heat, mp + self.heat_delta(&options));
        }
        if let Some(env) = env {
            if !s.contains(MpSettings::IGNORE_WEATHER) {
                let effect = env.conditions.movement_modifier(&self.movement_profile());
                mp = t.record(MpStage::Weather, effect.apply(mp));
            }
            if !s.contains(MpSettings::IGNORE_GRAVITY) && env.conditions.is_nonstandard_gravity() {
                mp = t.record(MpStage::Gravity, apply_gravity(mp, env.conditions.gravity));
            }
        }
        mp
    }

    /// Structural penalty. Returns the new value and whether leg loss has
    /// fixed it.
    fn damage_stage(&self, mp: i32, options: &GameOptions) -> (i32, bool) {
        if self.has(ChassisTraits::HEADCOUNT) {
            return (mp, false);
        }
        if self.movement_mode == MovementMode::Tracked {
            return self.track_damage(mp);
        }

        let destroyed = self.destroyed_legs();
        let mut mp = mp;
        match (self.chassis().leg_count(), destroyed) {
            (_, 0) => {}
            (2, 1) => return (mp.min(1), true),
            (3 | 4, 1) => mp -= 1,
            (3 | 4, 2) => return (mp.min(1), true),
            _ => return (0, true),
        }

        let mut hips = 0;
        let mut actuators = 0;
        for leg in self.legs().filter(|l| !self.ledger.is_destroyed(*l)) {
            let leg_actuators = to_mp(self.criticals.count_hits_in(leg, |slot| {
                slot.system().is_some_and(SystemKind::is_leg_actuator)
            }));
            if self.criticals.damaged_system_in(leg, SystemKind::Hip) {
                hips += 1;
                if options.tacops_leg_damage {
                    actuators += leg_actuators;
                }
            } else {
                actuators += leg_actuators;
            }
        }

        mp -= actuators;
        if options.tacops_leg_damage {
            mp -= 2 * hips;
        } else {
            for _ in 0..hips {
                mp = halve_round_up(mp);
            }
        }
        (mp, false)
    }

    /// QuadVee vehicle mode: each leg without working tracks costs 1 MP,
    /// two or more immobilise the unit.
    fn track_damage(&self, mp: i32) -> (i32, bool) {
        let missing = self
            .legs()
            .filter(|leg| !self.has_working_tracks(*leg))
            .count();
        match missing {
            0 => (mp, false),
            1 => (mp - 1, false),
            _ => (0, true),
        }
    }

    fn has_working_tracks(&self, leg: Location) -> bool {
        !self.ledger.is_destroyed(leg)
            && self
                .equipment
                .with_flags(EquipmentFlags::TRACKS)
                .any(|(_, item)| item.location == leg && item.is_operable())
    }

    fn equipment_stage(&self, mp: i32, s: MpSettings) -> i32 {
        let mut mp = mp;
        if self.has(ChassisTraits::HEADCOUNT) {
            return self.infantry_equipment(mp);
        }
        if !s.contains(MpSettings::IGNORE_MODULAR_ARMOR)
            && self.equipment.has_active(EquipmentFlags::MODULAR_ARMOR)
        {
            mp -= 1;
        }
        if !s.contains(MpSettings::IGNORE_CARGO)
            && self.equipment.has_active(EquipmentFlags::ENCUMBERING)
        {
            mp -= 1;
        }
        mp
    }

    fn infantry_equipment(&self, mp: i32) -> i32 {
        let mut mp = mp;
        let abilities = self.crew().abilities;
        let secondary = self
            .equipment
            .with_flags(EquipmentFlags::HEAVY_WEAPON)
            .filter(|(_, item)| item.is_operable())
            .count();
        if secondary > 1 && !abilities.contains(CrewAbilities::TSM_IMPLANT) {
            mp -= 1;
        }
        if abilities.contains(CrewAbilities::ENHANCED_LEGS) {
            mp += 1;
        }

        let mut guns = 0;
        let mut crew_needed = 0u32;
        for (_, gun) in self.equipment.with_flags(EquipmentFlags::FIELD_GUN) {
            if gun.is_operable() {
                guns += 1;
                crew_needed += u32::from(gun.crew);
            }
        }
        if guns > 0 {
            mp = mp.min(1);
            if self.active_troopers() < crew_needed {
                mp = 0;
            }
        }
        mp
    }

    fn heat_delta(&self, options: &GameOptions) -> i32 {
        let heat = self.heat();
        let mut delta = -heat_penalty(heat, options.tacops_heat);
        if heat >= TSM_HEAT && self.equipment.has_active(EquipmentFlags::TSM) {
            delta += 2;
        }
        delta
    }

    /// Safe thrust: aerospace craft, squadrons and LAMs in fighter mode.
    fn thrust_stages(&self, s: MpSettings, t: &mut MpBreakdown) -> i32 {
        let base = if self.conversion_mode() == Some(ConversionMode::Fighter) {
            self.jet_count(s)
        } else {
            to_mp(self.base_walk)
        };
        let mut mp = t.record(MpStage::Base, base);

        if self.chassis().is_aerospace() && !s.contains(MpSettings::IGNORE_DAMAGE) {
            let engine_hits = to_mp(self.hits_on(SystemKind::Engine));
            mp = t.record(MpStage::Damage, mp - 2 * engine_hits);
        }
        if !s.contains(MpSettings::IGNORE_EQUIPMENT) {
            let points: u32 = self
                .equipment
                .with_flags(EquipmentFlags::BOMB)
                .filter(|(_, item)| item.is_active())
                .map(|(_, item)| u32::from(item.bomb_points))
                .sum();
            mp = t.record(MpStage::Equipment, mp - to_mp(points.div_ceil(5)));
        }
        mp
    }

    /// AirMek cruise: three times jump, reduced by heat.
    fn airmek_stages(&self, s: MpSettings, t: &mut MpBreakdown) -> i32 {
        let mut mp = t.record(MpStage::Base, 3 * self.jet_count(s));
        if !s.contains(MpSettings::IGNORE_HEAT) {
            // AirMek heat uses the standard table.
            mp = t.record(MpStage::Heat, mp - heat_penalty(self.heat(), false));
        }
        mp
    }

    // ========================================================================
    // Run, sprint, jump
    // ========================================================================

    fn boosters(&self, s: MpSettings) -> u8 {
        if s.contains(MpSettings::IGNORE_MASC) {
            return 0;
        }
        u8::from(self.equipment.has_active(EquipmentFlags::MASC))
            + u8::from(self.equipment.has_active(EquipmentFlags::SUPERCHARGER))
    }

    fn run_stages(&self, s: MpSettings, env: Option<&Environment>, t: &mut MpBreakdown) -> i32 {
        let walk = self.walk_stages(s, env, t);
        let run = if self.has(ChassisTraits::HEADCOUNT) {
            walk
        } else if self.uses_thrust() || self.movement_mode == MovementMode::AirMek {
            scale_floor(walk, 3, 2)
        } else {
            match self.boosters(s) {
                0 => scale_floor(walk, 3, 2),
                1 => walk * 2,
                _ => scale_floor(walk, 5, 2),
            }
        };
        t.record(MpStage::Multiplier, run)
    }

    fn sprint_stages(&self, s: MpSettings, env: Option<&Environment>, t: &mut MpBreakdown) -> i32 {
        let walk = self.walk_stages(s, env, t);
        let sprint = match self.boosters(s) {
            0 => walk * 2,
            1 => scale_floor(walk, 5, 2),
            _ => walk * 3,
        };
        t.record(MpStage::Multiplier, sprint)
    }

    fn jump_stages(&self, s: MpSettings, env: Option<&Environment>, t: &mut MpBreakdown) -> i32 {
        let grounded_mode = matches!(
            self.conversion_mode(),
            Some(ConversionMode::AirMek | ConversionMode::Fighter | ConversionMode::Vehicle)
        );
        if !self.has(ChassisTraits::JUMP_CAPABLE) || grounded_mode {
            return t.record(MpStage::Base, 0);
        }

        let base = if self.has(ChassisTraits::HEADCOUNT) {
            to_mp(self.base_jump())
        } else {
            self.jet_count(s)
        };
        let mut mp = t.record(MpStage::Base, base);

        if base > 0 && !s.contains(MpSettings::IGNORE_EQUIPMENT) {
            if self.equipment.has_active(EquipmentFlags::PARTIAL_WING) {
                mp += env.map_or(2, |e| e.conditions.partial_wing_bonus());
            }
            if !s.contains(MpSettings::IGNORE_MODULAR_ARMOR)
                && self.equipment.has_active(EquipmentFlags::MODULAR_ARMOR)
            {
                mp -= 1;
            }
            mp = t.record(MpStage::Equipment, mp);
        }
        if let Some(env) = env {
            if !s.contains(MpSettings::IGNORE_WEATHER) {
                mp = t.record(MpStage::Weather, env.conditions.jump_wind_modifier().apply(mp));
            }
            if !s.contains(MpSettings::IGNORE_GRAVITY) && env.conditions.is_nonstandard_gravity() {
                mp = t.record(MpStage::Gravity, apply_gravity(mp, env.conditions.gravity));
            }
        }
        mp
    }

    /// Jump jets whose slots and location are intact. With damage ignored
    /// every mounted jet counts.
    fn jet_count(&self, s: MpSettings) -> i32 {
        let ignore_damage = s.contains(MpSettings::IGNORE_DAMAGE);
        let jets = self
            .equipment
            .with_flags(EquipmentFlags::JUMP_JET)
            .filter(|(_, jet)| {
                ignore_damage || (jet.is_operable() && !self.ledger.is_destroyed(jet.location))
            })
            .count();
        i32::try_from(jets).unwrap_or(i32::MAX)
    }
}

/// Ceiling on any single MP value; keeps the run and sprint multipliers in
/// range.
const MAX_MP: i32 = 1 << 20;

fn to_mp(value: u32) -> i32 {
    i32::try_from(value).map_or(MAX_MP, |mp| mp.min(MAX_MP))
}

fn apply_gravity(mp: i32, gravity: Fixed) -> i32 {
    div_round_half_down(Fixed::from_num(mp), gravity).clamp(-MAX_MP, MAX_MP)
}
