//! Piloting-roll aggregation.
//!
//! [`Unit::base_piloting_roll`] collects the target number for a piloting
//! (control) roll: the crew's skill plus an ordered list of modifiers, or a
//! sentinel when no roll is made at all. Dice are rolled elsewhere.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::conditions::{EnvironmentalSpecialty, Environment, Weather, Wind};
use crate::criticals::SystemKind;
use crate::movement::{MpKind, MpSettings};
use crate::unit::{CockpitType, CrewAbilities, GyroType, Unit};
use crate::unit_kind::ChassisTraits;

/// What the roll is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PilotingAction {
    /// Any roll without action-specific modifiers.
    #[default]
    Generic,
    /// Getting up after a fall.
    StandUp,
    /// Landing a flying unit.
    Landing,
    /// Controlled maneuver.
    Maneuver,
    /// Skidding.
    Skid,
}

/// Terrain under the unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground or pavement.
    #[default]
    Clear,
    /// Ice.
    Ice,
    /// Mud.
    Mud,
    /// Swamp.
    Swamp,
    /// Deep snow.
    DeepSnow,
    /// Water of the given depth.
    Water(u8),
}

/// Replaces the target number when no roll applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum RollSentinel {
    /// The action cannot be attempted.
    Impossible,
    /// Fails without rolling.
    AutomaticFail,
    /// Succeeds without rolling.
    AutomaticSuccess,
    /// The unit does not make this kind of roll.
    CheckFalse,
}

/// Resolved target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollTarget {
    /// Roll 2d6 against this number.
    Value(i32),
    /// No roll.
    Sentinel(RollSentinel),
}

/// One modifier with its reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollModifier {
    /// Signed change to the target.
    pub value: i32,
    /// Why it applies.
    pub reason: String,
}

/// Inputs besides the unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct PilotingContext<'a> {
    /// Action being attempted.
    pub action: PilotingAction,
    /// Terrain underfoot.
    pub terrain: Terrain,
    /// Rules and conditions, if any.
    pub env: Option<&'a Environment>,
}

/// Aggregated piloting target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotingRoll {
    base: i32,
    modifiers: Vec<RollModifier>,
    sentinel: Option<(RollSentinel, String)>,
}

impl PilotingRoll {
    /// Start from a base skill.
    #[must_use]
    pub fn new(base: i32) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
            sentinel: None,
        }
    }

    /// Append a modifier. Zero modifiers are dropped.
    pub fn add(&mut self, value: i32, reason: impl Into<String>) {
        if value != 0 {
            self.modifiers.push(RollModifier {
                value,
                reason: reason.into(),
            });
        }
    }

    /// Set the sentinel. The first one set wins.
    pub fn set_sentinel(&mut self, sentinel: RollSentinel, reason: impl Into<String>) {
        if self.sentinel.is_none() {
            self.sentinel = Some((sentinel, reason.into()));
        }
    }

    /// Base skill.
    #[must_use]
    pub const fn base(&self) -> i32 {
        self.base
    }

    /// Modifiers in application order.
    #[must_use]
    pub fn modifiers(&self) -> &[RollModifier] {
        &self.modifiers
    }

    /// Sentinel, if set.
    #[must_use]
    pub fn sentinel(&self) -> Option<RollSentinel> {
        self.sentinel.as_ref().map(|(s, _)| *s)
    }

    /// Target number, or the sentinel.
    #[must_use]
    pub fn value(&self) -> RollTarget {
        match self.sentinel() {
            Some(sentinel) => RollTarget::Sentinel(sentinel),
            None => RollTarget::Value(self.base + self.modifiers.iter().map(|m| m.value).sum::<i32>()),
        }
    }

    /// Audit trail, e.g. `5 (base) +3 (gyro damaged) = 8`.
    #[must_use]
    pub fn description(&self) -> String {
        if let Some((sentinel, reason)) = &self.sentinel {
            return format!("{sentinel}: {reason}");
        }
        let modifiers: String = self
            .modifiers
            .iter()
            .map(|modifier| format!(" {:+} ({})", modifier.value, modifier.reason))
            .collect();
        match self.value() {
            RollTarget::Value(total) => format!("{} (base){modifiers} = {total}", self.base),
            RollTarget::Sentinel(_) => format!("{} (base){modifiers}", self.base),
        }
    }
}

impl Unit {
    /// Assemble the piloting target for `context`.
    #[must_use]
    pub fn base_piloting_roll(&self, context: &PilotingContext<'_>) -> PilotingRoll {
        let mut roll = PilotingRoll::new(self.crew().piloting);
        let options = Environment::options_of(context.env);

        // Sentinels
        if self.has(ChassisTraits::HEADCOUNT) {
            roll.set_sentinel(RollSentinel::CheckFalse, "infantry do not make piloting rolls");
            return roll;
        }
        if self.crew().unconscious {
            roll.set_sentinel(RollSentinel::AutomaticFail, "crew unconscious");
            return roll;
        }
        let on_legs = self.chassis().is_walker() && self.is_legged_mode();
        if on_legs && self.is_gyro_destroyed() {
            roll.set_sentinel(RollSentinel::AutomaticFail, "gyro destroyed");
            return roll;
        }
        if self.has(ChassisTraits::LEGGED)
            && self.chassis().leg_count() == 2
            && self.destroyed_legs() >= 2
        {
            roll.set_sentinel(RollSentinel::AutomaticFail, "both legs destroyed");
            return roll;
        }

        if on_legs {
            self.gyro_modifier(&mut roll);
        }
        match self.cockpit() {
            CockpitType::Standard => {}
            CockpitType::Small => roll.add(1, "small cockpit"),
            CockpitType::Industrial => roll.add(1, "industrial cockpit"),
        }
        if on_legs {
            self.leg_modifiers(&mut roll, options.tacops_leg_damage);
        }
        self.crew_and_equipment_modifiers(&mut roll, context);
        if self.movement_mode().is_flight() || self.uses_thrust() {
            let safe = self.compute_mp(MpKind::Walk, MpSettings::NONE, context.env);
            if self.velocity() > 2 * safe {
                roll.add(1, "velocity above twice safe thrust");
            }
        }
        self.environment_modifiers(&mut roll, context);
        roll
    }

    fn gyro_modifier(&self, roll: &mut PilotingRoll) {
        let hits = self.hits_on(SystemKind::Gyro);
        if hits == 0 {
            return;
        }
        match self.gyro() {
            GyroType::None => {}
            GyroType::HeavyDuty => roll.add(if hits == 1 { 1 } else { 3 }, "gyro damaged"),
            GyroType::Standard | GyroType::Xl | GyroType::Compact => roll.add(3, "gyro damaged"),
        }
    }

    fn leg_modifiers(&self, roll: &mut PilotingRoll, tacops: bool) {
        let legs: Vec<_> = self.legs().collect();
        for leg in &legs {
            let name = self.location_name(*leg);
            if self.ledger().is_destroyed(*leg) {
                roll.add(5, format!("{name} destroyed"));
                continue;
            }
            let hip = self.criticals().damaged_system_in(*leg, SystemKind::Hip);
            if hip {
                roll.add(2, format!("{name} hip damaged"));
            }
            if !hip || tacops {
                let actuators = self.criticals().count_hits_in(*leg, |slot| {
                    slot.system().is_some_and(SystemKind::is_leg_actuator)
                });
                roll.add(
                    i32::try_from(actuators).unwrap_or(i32::MAX),
                    format!("{name} actuators damaged"),
                );
            }
        }
        if legs.len() == 4 && self.destroyed_legs() == 0 {
            roll.add(-2, "quad with all legs");
        }
    }

    fn crew_and_equipment_modifiers(&self, roll: &mut PilotingRoll, context: &PilotingContext<'_>) {
        let abilities = self.crew().abilities;
        if abilities.intersects(CrewAbilities::VDNI | CrewAbilities::BVDNI) {
            roll.add(-1, "neural interface");
        }
        if self.ledger().has_hardened_armor() {
            roll.add(1, "hardened armor");
        }
        if abilities.contains(CrewAbilities::MANEUVERING_ACE)
            && matches!(context.action, PilotingAction::Skid | PilotingAction::Maneuver)
        {
            roll.add(-1, "maneuvering ace");
        }
        if self.movement_mode().is_flight() || self.uses_thrust() {
            let avionics = self.hits_on(SystemKind::Avionics);
            roll.add(i32::try_from(avionics).unwrap_or(i32::MAX), "avionics damaged");
            if context.action == PilotingAction::Landing && self.hits_on(SystemKind::LandingGear) > 0 {
                roll.add(1, "landing gear damaged");
            }
        }
    }

    fn environment_modifiers(&self, roll: &mut PilotingRoll, context: &PilotingContext<'_>) {
        match context.terrain {
            Terrain::Clear => {}
            Terrain::Ice => roll.add(4, "ice"),
            Terrain::Mud => roll.add(1, "mud"),
            Terrain::Swamp => roll.add(1, "swamp"),
            Terrain::DeepSnow => roll.add(1, "deep snow"),
            Terrain::Water(0) => {}
            Terrain::Water(1) => roll.add(-1, "depth 1 water"),
            Terrain::Water(2) => {}
            Terrain::Water(_) => roll.add(1, "deep water"),
        }

        let Some(env) = context.env else {
            return;
        };
        let specialty = self.crew().specialty;
        let conditions = &env.conditions;

        let wind = match conditions.wind {
            Wind::StrongGale => 1,
            Wind::Storm => 2,
            Wind::TornadoF1ToF3 => 3,
            Wind::TornadoF4 => {
                roll.set_sentinel(RollSentinel::AutomaticFail, "F4 tornado");
                return;
            }
            _ => 0,
        };
        if specialty != Some(EnvironmentalSpecialty::Wind) {
            roll.add(wind, format!("{}", conditions.wind));
        }

        if matches!(conditions.weather, Weather::IceStorm | Weather::HeavySnow)
            && specialty != conditions.weather.family()
        {
            roll.add(1, format!("{}", conditions.weather));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::PlanetaryConditions;
    use crate::conversion::ConversionMode;
    use crate::location::{mek, quad, Location};
    use crate::options::GameOptions;
    use crate::unit::Crew;
    use crate::unit_kind::{Chassis, LamKind};

    fn biped() -> Unit {
        Unit::builder("Centurion", Chassis::Biped)
            .walk(4)
            .uniform(10, 4, 8)
            .build()
            .unwrap()
    }

    fn slot_of(unit: &Unit, location: Location, kind: SystemKind) -> u8 {
        let index = unit
            .criticals()
            .slots(location)
            .iter()
            .position(|s| s.holds(kind))
            .unwrap();
        u8::try_from(index).unwrap()
    }

    fn target(unit: &Unit, context: &PilotingContext<'_>) -> RollTarget {
        unit.base_piloting_roll(context).value()
    }

    fn env_with(conditions: PlanetaryConditions) -> Environment {
        Environment::new(GameOptions::default(), conditions)
    }

    #[test]
    fn test_undamaged_unit_uses_skill() {
        let unit = biped();
        let roll = unit.base_piloting_roll(&PilotingContext::default());
        assert_eq!(roll.value(), RollTarget::Value(5));
        assert!(roll.modifiers().is_empty());
        assert_eq!(roll.description(), "5 (base) = 5");
    }

    #[test]
    fn test_sentinels() {
        let infantry = Unit::builder("Rifles", Chassis::InfantryPlatoon)
            .platoon(4, 7)
            .build()
            .unwrap();
        assert_eq!(
            target(&infantry, &PilotingContext::default()),
            RollTarget::Sentinel(RollSentinel::CheckFalse)
        );

        let mut unit = biped();
        unit.crew_mut().unconscious = true;
        assert_eq!(
            target(&unit, &PilotingContext::default()),
            RollTarget::Sentinel(RollSentinel::AutomaticFail)
        );

        let mut legless = biped();
        legless.set_internal(mek::LEFT_LEG, 0);
        legless.set_internal(mek::RIGHT_LEG, 0);
        let roll = legless.base_piloting_roll(&PilotingContext::default());
        assert_eq!(roll.sentinel(), Some(RollSentinel::AutomaticFail));
        assert_eq!(roll.description(), "AutomaticFail: both legs destroyed");
    }

    #[test]
    fn test_gyro_tiers() {
        let mut unit = biped();
        let gyro = slot_of(&unit, mek::CENTER_TORSO, SystemKind::Gyro);
        unit.apply_hit(mek::CENTER_TORSO, gyro).unwrap();
        assert_eq!(target(&unit, &PilotingContext::default()), RollTarget::Value(8));
        unit.apply_hit(mek::CENTER_TORSO, gyro + 1).unwrap();
        assert_eq!(
            target(&unit, &PilotingContext::default()),
            RollTarget::Sentinel(RollSentinel::AutomaticFail)
        );

        let mut heavy = Unit::builder("Heavy", Chassis::Biped)
            .gyro(GyroType::HeavyDuty)
            .uniform(10, 4, 8)
            .build()
            .unwrap();
        let gyro = slot_of(&heavy, mek::CENTER_TORSO, SystemKind::Gyro);
        heavy.apply_hit(mek::CENTER_TORSO, gyro).unwrap();
        assert_eq!(target(&heavy, &PilotingContext::default()), RollTarget::Value(6));
        heavy.apply_hit(mek::CENTER_TORSO, gyro + 1).unwrap();
        assert_eq!(target(&heavy, &PilotingContext::default()), RollTarget::Value(8));
    }

    #[test]
    fn test_leg_damage() {
        let mut unit = biped();
        let hip = slot_of(&unit, mek::LEFT_LEG, SystemKind::Hip);
        let foot = slot_of(&unit, mek::LEFT_LEG, SystemKind::Foot);
        unit.apply_hit(mek::LEFT_LEG, hip).unwrap();
        unit.apply_hit(mek::LEFT_LEG, foot).unwrap();
        // Hip supersedes the foot
        assert_eq!(target(&unit, &PilotingContext::default()), RollTarget::Value(7));

        let tacops = Environment::new(
            GameOptions {
                tacops_leg_damage: true,
                ..GameOptions::default()
            },
            PlanetaryConditions::default(),
        );
        let context = PilotingContext {
            env: Some(&tacops),
            ..PilotingContext::default()
        };
        assert_eq!(target(&unit, &context), RollTarget::Value(8));

        unit.set_internal(mek::RIGHT_LEG, 0);
        assert_eq!(target(&unit, &PilotingContext::default()), RollTarget::Value(12));
    }

    #[test]
    fn test_quad_bonus() {
        let mut unit = Unit::builder("Scorpion", Chassis::Quad)
            .uniform(10, 4, 8)
            .build()
            .unwrap();
        assert_eq!(target(&unit, &PilotingContext::default()), RollTarget::Value(3));
        unit.set_internal(quad::REAR_LEFT_LEG, 0);
        assert_eq!(target(&unit, &PilotingContext::default()), RollTarget::Value(10));
    }

    #[test]
    fn test_cockpit_and_crew() {
        let mut crew = Crew::default();
        crew.abilities = CrewAbilities::VDNI | CrewAbilities::MANEUVERING_ACE;
        let unit = Unit::builder("Cramped", Chassis::Biped)
            .cockpit(CockpitType::Small)
            .crew(crew)
            .uniform(10, 4, 8)
            .build()
            .unwrap();
        assert_eq!(target(&unit, &PilotingContext::default()), RollTarget::Value(5));
        let skid = PilotingContext {
            action: PilotingAction::Skid,
            ..PilotingContext::default()
        };
        assert_eq!(target(&unit, &skid), RollTarget::Value(4));
    }

    #[test]
    fn test_terrain() {
        let unit = biped();
        let at = |terrain| target(&unit, &PilotingContext { terrain, ..PilotingContext::default() });
        assert_eq!(at(Terrain::Ice), RollTarget::Value(9));
        assert_eq!(at(Terrain::Mud), RollTarget::Value(6));
        assert_eq!(at(Terrain::Water(1)), RollTarget::Value(4));
        assert_eq!(at(Terrain::Water(2)), RollTarget::Value(5));
        assert_eq!(at(Terrain::Water(3)), RollTarget::Value(6));
    }

    #[test]
    fn test_wind_and_specialist() {
        let storm = env_with(PlanetaryConditions {
            wind: Wind::Storm,
            weather: Weather::HeavySnow,
            ..PlanetaryConditions::default()
        });
        let context = PilotingContext {
            env: Some(&storm),
            ..PilotingContext::default()
        };
        let mut unit = biped();
        assert_eq!(target(&unit, &context), RollTarget::Value(8));

        unit.crew_mut().specialty = Some(EnvironmentalSpecialty::Wind);
        assert_eq!(target(&unit, &context), RollTarget::Value(6));
        unit.crew_mut().specialty = Some(EnvironmentalSpecialty::Snow);
        assert_eq!(target(&unit, &context), RollTarget::Value(7));

        let f4 = env_with(PlanetaryConditions {
            wind: Wind::TornadoF4,
            ..PlanetaryConditions::default()
        });
        unit.crew_mut().specialty = Some(EnvironmentalSpecialty::Wind);
        let context = PilotingContext {
            env: Some(&f4),
            ..PilotingContext::default()
        };
        assert_eq!(
            target(&unit, &context),
            RollTarget::Sentinel(RollSentinel::AutomaticFail)
        );
    }

    #[test]
    fn test_flight_modifiers() {
        let mut unit = Unit::builder("Stinger LAM", Chassis::LandAirMek(LamKind::Standard))
            .walk(6)
            .uniform(6, 2, 4)
            .build()
            .unwrap();
        unit.request_conversion(ConversionMode::Fighter).unwrap();
        let avionics = slot_of(&unit, mek::HEAD, SystemKind::Avionics);
        unit.apply_hit(mek::HEAD, avionics).unwrap();
        let landing = PilotingContext {
            action: PilotingAction::Landing,
            ..PilotingContext::default()
        };
        assert_eq!(target(&unit, &landing), RollTarget::Value(6));

        // Safe thrust is zero without jets, so any speed is excessive
        unit.set_velocity(1);
        assert_eq!(target(&unit, &landing), RollTarget::Value(7));
    }

    #[test]
    fn test_description_lists_modifiers() {
        let mut unit = biped();
        let foot = slot_of(&unit, mek::RIGHT_LEG, SystemKind::Foot);
        unit.apply_hit(mek::RIGHT_LEG, foot).unwrap();
        let roll = unit.base_piloting_roll(&PilotingContext {
            terrain: Terrain::Ice,
            ..PilotingContext::default()
        });
        assert_eq!(
            roll.description(),
            "5 (base) +1 (Right Leg actuators damaged) +4 (ice) = 10"
        );
    }
}
