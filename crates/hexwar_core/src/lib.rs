//! # Hexwar Core
//!
//! Deterministic unit combat-resolution core for a hex-grid tactical
//! wargame.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness (dice are injected through [`dice::DiceRoller`])
//! - No floating-point math (uses fixed-point)
//!
//! The turn scheduler, network layer, UI and equipment catalog live
//! elsewhere and talk to the core through [`unit::Unit`] and
//! [`registry::UnitRegistry`].
//!
//! ## Crate Structure
//!
//! - [`unit`] - Unit root entity and builder
//! - [`location`], [`criticals`], [`equipment`], [`ledger`] - Physical structure
//! - [`movement`] - Movement-point pipeline
//! - [`hit_location`], [`hit_tables`] - Hit-location resolution
//! - [`piloting`] - Piloting-roll aggregation
//! - [`conversion`] - Configuration changes of LAMs and QuadVees
//! - [`registry`], [`squadron`], [`weapon_groups`] - Unit ownership and squadrons
//! - [`options`], [`conditions`], [`data`] - Rule toggles and environment
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod conditions;
pub mod conversion;
pub mod criticals;
pub mod data;
pub mod dice;
pub mod equipment;
pub mod error;
pub mod hit_location;
pub mod hit_tables;
pub mod ledger;
pub mod location;
pub mod math;
pub mod movement;
pub mod options;
pub mod piloting;
pub mod registry;
pub mod squadron;
pub mod unit;
pub mod unit_kind;
pub mod weapon_groups;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::conditions::{
        Atmosphere, EnvironmentalSpecialty, Environment, PlanetaryConditions, Weather, Wind,
    };
    pub use crate::conversion::{ConversionMode, ConversionOutcome};
    pub use crate::criticals::{SlotContent, SystemKind};
    pub use crate::dice::{DiceRoller, ScriptedDice, SeededDice};
    pub use crate::equipment::{EquipmentFlags, EquipmentId, MountedEquipment};
    pub use crate::error::{CoreError, Result};
    pub use crate::hit_location::{AimingMode, AttackSide, Cover, HitEffects, HitRequest, HitResult, HitTable};
    pub use crate::ledger::{ArmorType, DamageLevel, PercentScope, TechBase};
    pub use crate::location::Location;
    pub use crate::math::Fixed;
    pub use crate::movement::{MpKind, MpSettings};
    pub use crate::options::GameOptions;
    pub use crate::piloting::{PilotingAction, PilotingContext, PilotingRoll, RollSentinel, RollTarget, Terrain};
    pub use crate::registry::{UnitId, UnitRegistry};
    pub use crate::unit::{CockpitType, Crew, CrewAbilities, GyroType, Unit, UnitBuilder};
    pub use crate::unit_kind::{Chassis, LamKind, MovementMode, WeightClass};
}
