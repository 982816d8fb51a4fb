//! Environment definitions.

use serde::{Deserialize, Serialize};

use crate::conditions::{Environment, PlanetaryConditions};
use crate::error::{CoreError, Result};
use crate::math::Fixed;
use crate::options::GameOptions;

/// Coldest allowed temperature in °C.
pub const MIN_TEMPERATURE: i32 = -273;
/// Hottest allowed temperature in °C.
pub const MAX_TEMPERATURE: i32 = 200;
/// Lowest allowed gravity, 0.1G.
pub const MIN_GRAVITY: Fixed = Fixed::from_bits(0x1999_999A);

/// Data-driven environment definition.
///
/// # Example RON
///
/// ```ron
/// EnvironmentData(
///     id: "tharkad_winter",
///     name: "Tharkad, midwinter",
///     options: (tacops_leg_damage: true),
///     conditions: (
///         weather: HeavySnow,
///         wind: StrongGale,
///         temperature: -35,
///         gravity: 4294967296,  // Fixed-point for 1.0
///     ),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentData {
    /// Unique string identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Rule toggles.
    #[serde(default)]
    pub options: GameOptions,

    /// Planetary conditions.
    #[serde(default)]
    pub conditions: PlanetaryConditions,
}

impl EnvironmentData {
    /// Parse a RON document and validate it. `path` only labels errors.
    pub fn from_ron(path: &str, text: &str) -> Result<Self> {
        let data: Self = ron::from_str(text).map_err(|e| CoreError::DataParseError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        data.validate().map_err(|message| CoreError::DataParseError {
            path: path.to_string(),
            message,
        })?;
        Ok(data)
    }

    /// Check value ranges.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.id.is_empty() {
            return Err("id must not be empty".to_string());
        }
        if self.conditions.gravity < MIN_GRAVITY {
            return Err(format!(
                "gravity must be at least {MIN_GRAVITY}, got {}",
                self.conditions.gravity
            ));
        }
        let temperature = self.conditions.temperature;
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(format!(
                "temperature {temperature} outside {MIN_TEMPERATURE}..={MAX_TEMPERATURE}"
            ));
        }
        Ok(())
    }

    /// Environment snapshot for the core's queries.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        Environment::new(self.options, self.conditions)
    }
}
