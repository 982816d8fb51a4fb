//! Planetary conditions and the environment snapshot.
//!
//! An [`Environment`] is passed explicitly into every pipeline, resolver
//! and aggregator call. Passing `None` instead makes every
//! environment-dependent stage contribute nothing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::math::{fixed_serde, Fixed};
use crate::options::GameOptions;

/// Precipitation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Weather {
    /// No precipitation.
    #[default]
    Clear,
    /// Light rain.
    LightRain,
    /// Moderate rain.
    ModerateRain,
    /// Heavy rain.
    HeavyRain,
    /// Torrential downpour.
    Downpour,
    /// Light snow.
    LightSnow,
    /// Moderate snow.
    ModerateSnow,
    /// Heavy snow.
    HeavySnow,
    /// Sleet.
    Sleet,
    /// Ice storm.
    IceStorm,
    /// Light hail.
    LightHail,
    /// Heavy hail.
    HeavyHail,
}

impl Weather {
    /// Specialty that covers this weather.
    #[must_use]
    pub const fn family(self) -> Option<EnvironmentalSpecialty> {
        match self {
            Self::LightRain | Self::ModerateRain | Self::HeavyRain | Self::Downpour => {
                Some(EnvironmentalSpecialty::Rain)
            }
            Self::LightSnow | Self::ModerateSnow | Self::HeavySnow | Self::Sleet | Self::IceStorm => {
                Some(EnvironmentalSpecialty::Snow)
            }
            Self::Clear | Self::LightHail | Self::HeavyHail => None,
        }
    }
}

/// Wind strength.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Wind {
    /// No wind.
    #[default]
    Calm,
    /// Light gale.
    LightGale,
    /// Moderate gale.
    ModerateGale,
    /// Strong gale.
    StrongGale,
    /// Storm.
    Storm,
    /// Tornado, F1 to F3.
    TornadoF1ToF3,
    /// Tornado, F4 and above.
    TornadoF4,
}

/// Atmospheric density.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Atmosphere {
    /// No atmosphere.
    Vacuum,
    /// Thin atmosphere.
    Thin,
    /// Standard atmosphere.
    #[default]
    Standard,
    /// High pressure.
    High,
}

/// Crew training against one family of conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum EnvironmentalSpecialty {
    /// Rain of any strength.
    Rain,
    /// Snow, sleet and ice storms.
    Snow,
    /// Gales, storms and tornadoes.
    Wind,
    /// Extreme temperatures.
    Temperature,
}

/// Result of a condition query on movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionEffect {
    /// Signed MP change.
    Delta(i32),
    /// The unit cannot move at all.
    Grounded,
}

impl ConditionEffect {
    /// Apply to a running MP value.
    #[must_use]
    pub const fn apply(self, mp: i32) -> i32 {
        match self {
            Self::Delta(delta) => mp + delta,
            Self::Grounded => 0,
        }
    }
}

/// What the weather rules need to know about the moving unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementProfile {
    /// Conventional infantry.
    pub infantry: bool,
    /// Moving as a ground vehicle (tracks, wheels, hover).
    pub ground_vehicle: bool,
    /// Airborne.
    pub airborne: bool,
    /// Builds up heat (extreme temperature is handled by the heat scale).
    pub heat_tracking: bool,
    /// Crew specialty, if any.
    pub specialty: Option<EnvironmentalSpecialty>,
}

/// Planetary conditions snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanetaryConditions {
    /// Precipitation.
    #[serde(default)]
    pub weather: Weather,
    /// Wind.
    #[serde(default)]
    pub wind: Wind,
    /// Temperature in degrees Celsius.
    #[serde(default = "default_temperature")]
    pub temperature: i32,
    /// Gravity in G.
    #[serde(with = "fixed_serde", default = "default_gravity")]
    pub gravity: Fixed,
    /// Atmospheric density.
    #[serde(default)]
    pub atmosphere: Atmosphere,
}

const fn default_temperature() -> i32 {
    25
}

fn default_gravity() -> Fixed {
    Fixed::from_num(1)
}

impl Default for PlanetaryConditions {
    fn default() -> Self {
        Self {
            weather: Weather::Clear,
            wind: Wind::Calm,
            temperature: default_temperature(),
            gravity: default_gravity(),
            atmosphere: Atmosphere::Standard,
        }
    }
}

impl PlanetaryConditions {
    /// Temperature above 50°C or below −30°C.
    #[must_use]
    pub const fn is_extreme_temperature(&self) -> bool {
        self.temperature > 50 || self.temperature < -30
    }

    /// Gravity differs from 1G.
    #[must_use]
    pub fn is_nonstandard_gravity(&self) -> bool {
        self.gravity != Fixed::from_num(1)
    }

    fn weather_penalty(&self, profile: &MovementProfile) -> i32 {
        match self.weather {
            Weather::HeavySnow | Weather::IceStorm | Weather::Downpour
                if profile.infantry || profile.ground_vehicle =>
            {
                -1
            }
            Weather::ModerateSnow | Weather::Sleet if profile.infantry => -1,
            _ => 0,
        }
    }

    fn wind_penalty(&self, profile: &MovementProfile) -> ConditionEffect {
        if profile.airborne {
            return ConditionEffect::Delta(0);
        }
        let infantry = profile.infantry;
        match self.wind {
            Wind::StrongGale if infantry => ConditionEffect::Delta(-1),
            Wind::Storm => ConditionEffect::Delta(if infantry { -2 } else { -1 }),
            Wind::TornadoF1ToF3 => ConditionEffect::Delta(if infantry { -3 } else { -2 }),
            Wind::TornadoF4 => ConditionEffect::Grounded,
            _ => ConditionEffect::Delta(0),
        }
    }

    /// Combined weather, wind and temperature effect on walking MP.
    ///
    /// A crew specialist in the family of an active penalty ignores that
    /// penalty and gains +1 instead. An F4 tornado grounds everyone.
    #[must_use]
    pub fn movement_modifier(&self, profile: &MovementProfile) -> ConditionEffect {
        let specialist = |family: EnvironmentalSpecialty, penalty: i32| {
            if penalty < 0 && profile.specialty == Some(family) {
                1
            } else {
                penalty
            }
        };

        let weather = self
            .weather
            .family()
            .map_or(0, |family| specialist(family, self.weather_penalty(profile)));

        let wind = match self.wind_penalty(profile) {
            ConditionEffect::Grounded => return ConditionEffect::Grounded,
            ConditionEffect::Delta(delta) => specialist(EnvironmentalSpecialty::Wind, delta),
        };

        let temperature = if self.is_extreme_temperature() && !profile.heat_tracking {
            specialist(EnvironmentalSpecialty::Temperature, -1)
        } else {
            0
        };

        ConditionEffect::Delta(weather + wind + temperature)
    }

    /// Wind effect on jump MP.
    #[must_use]
    pub const fn jump_wind_modifier(&self) -> ConditionEffect {
        match self.wind {
            Wind::StrongGale => ConditionEffect::Delta(-1),
            Wind::Storm => ConditionEffect::Delta(-2),
            Wind::TornadoF1ToF3 | Wind::TornadoF4 => ConditionEffect::Grounded,
            _ => ConditionEffect::Delta(0),
        }
    }

    /// Jump MP added by a partial wing in this atmosphere.
    #[must_use]
    pub const fn partial_wing_bonus(&self) -> i32 {
        match self.atmosphere {
            Atmosphere::Vacuum => 0,
            Atmosphere::Thin => 1,
            Atmosphere::Standard | Atmosphere::High => 2,
        }
    }
}

/// Read-only context for one resolution step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Rule toggles.
    #[serde(default)]
    pub options: GameOptions,
    /// Planetary conditions.
    #[serde(default)]
    pub conditions: PlanetaryConditions,
}

impl Environment {
    /// Create an environment snapshot.
    #[must_use]
    pub const fn new(options: GameOptions, conditions: PlanetaryConditions) -> Self {
        Self {
            options,
            conditions,
        }
    }

    /// Options of an optional environment, defaults when absent.
    #[must_use]
    pub fn options_of(env: Option<&Self>) -> GameOptions {
        env.map(|e| e.options).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infantry() -> MovementProfile {
        MovementProfile {
            infantry: true,
            ..MovementProfile::default()
        }
    }

    fn walker() -> MovementProfile {
        MovementProfile {
            heat_tracking: true,
            ..MovementProfile::default()
        }
    }

    fn with(weather: Weather, wind: Wind) -> PlanetaryConditions {
        PlanetaryConditions {
            weather,
            wind,
            ..PlanetaryConditions::default()
        }
    }

    #[test]
    fn test_clear_conditions_have_no_effect() {
        let conditions = PlanetaryConditions::default();
        assert_eq!(conditions.movement_modifier(&infantry()), ConditionEffect::Delta(0));
        assert_eq!(conditions.movement_modifier(&walker()), ConditionEffect::Delta(0));
        assert!(!conditions.is_nonstandard_gravity());
    }

    #[test]
    fn test_snow_hits_infantry_harder() {
        let moderate = with(Weather::ModerateSnow, Wind::Calm);
        assert_eq!(moderate.movement_modifier(&infantry()), ConditionEffect::Delta(-1));
        assert_eq!(moderate.movement_modifier(&walker()), ConditionEffect::Delta(0));

        let heavy = with(Weather::HeavySnow, Wind::Calm);
        let vehicle = MovementProfile {
            ground_vehicle: true,
            ..walker()
        };
        assert_eq!(heavy.movement_modifier(&vehicle), ConditionEffect::Delta(-1));
        assert_eq!(heavy.movement_modifier(&walker()), ConditionEffect::Delta(0));
    }

    #[test]
    fn test_wind_table() {
        let storm = with(Weather::Clear, Wind::Storm);
        assert_eq!(storm.movement_modifier(&walker()), ConditionEffect::Delta(-1));
        assert_eq!(storm.movement_modifier(&infantry()), ConditionEffect::Delta(-2));

        let tornado = with(Weather::Clear, Wind::TornadoF1ToF3);
        assert_eq!(tornado.movement_modifier(&infantry()), ConditionEffect::Delta(-3));

        let f4 = with(Weather::Clear, Wind::TornadoF4);
        assert_eq!(f4.movement_modifier(&walker()), ConditionEffect::Grounded);

        let airborne = MovementProfile {
            airborne: true,
            ..walker()
        };
        assert_eq!(storm.movement_modifier(&airborne), ConditionEffect::Delta(0));
    }

    #[test]
    fn test_penalties_stack() {
        let conditions = with(Weather::Downpour, Wind::Storm);
        assert_eq!(conditions.movement_modifier(&infantry()), ConditionEffect::Delta(-3));
    }

    #[test]
    fn test_specialist_negates_and_gains() {
        let conditions = with(Weather::HeavySnow, Wind::Storm);
        let snow_trained = MovementProfile {
            specialty: Some(EnvironmentalSpecialty::Snow),
            ..infantry()
        };
        // +1 for snow, -2 for storm
        assert_eq!(
            conditions.movement_modifier(&snow_trained),
            ConditionEffect::Delta(-1)
        );

        // Specialty without an active penalty does nothing
        let calm = PlanetaryConditions::default();
        assert_eq!(calm.movement_modifier(&snow_trained), ConditionEffect::Delta(0));
    }

    #[test]
    fn test_extreme_temperature() {
        let hot = PlanetaryConditions {
            temperature: 60,
            ..PlanetaryConditions::default()
        };
        assert!(hot.is_extreme_temperature());
        assert_eq!(hot.movement_modifier(&infantry()), ConditionEffect::Delta(-1));
        assert_eq!(hot.movement_modifier(&walker()), ConditionEffect::Delta(0));
    }

    #[test]
    fn test_jump_and_wing_modifiers() {
        assert_eq!(
            with(Weather::Clear, Wind::StrongGale).jump_wind_modifier(),
            ConditionEffect::Delta(-1)
        );
        assert_eq!(
            with(Weather::Clear, Wind::TornadoF1ToF3).jump_wind_modifier(),
            ConditionEffect::Grounded
        );
        let thin = PlanetaryConditions {
            atmosphere: Atmosphere::Thin,
            ..PlanetaryConditions::default()
        };
        assert_eq!(thin.partial_wing_bonus(), 1);
        assert_eq!(PlanetaryConditions::default().partial_wing_bonus(), 2);
    }

    #[test]
    fn test_effect_apply() {
        assert_eq!(ConditionEffect::Delta(-2).apply(5), 3);
        assert_eq!(ConditionEffect::Grounded.apply(5), 0);
    }
}
