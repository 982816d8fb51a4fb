//! Location and hit-table dumps.
//!
//! Flattens the static tables of one chassis into rows that print as
//! plain text or JSON.

use std::fmt::Write as _;
use std::str::FromStr;

use hexwar_core::data::EnvironmentData;
use hexwar_core::hit_tables::{table_set, EntryEffect, HitEntry, SideTables, Table2d6};
use hexwar_core::location::{static_locations, LocationInfo};
use hexwar_core::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error::{Result, ToolError};

/// One location of a chassis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRow {
    /// Index in the location table.
    pub index: usize,
    /// Full name.
    pub name: String,
    /// Abbreviation.
    pub abbreviation: String,
    /// Critical slots.
    pub slots: u8,
    /// Has a rear armor value.
    pub rear_armor: bool,
}

/// One entry of the normal hit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitRow {
    /// 2d6 total.
    pub roll: u8,
    /// Abbreviation of the location hit.
    pub location: String,
    /// Rear armor takes the hit.
    pub rear: bool,
    /// Secondary effect, empty when none.
    pub effect: String,
}

/// Everything dumped for one chassis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChassisTables {
    /// Chassis name.
    pub chassis: String,
    /// Location table.
    pub locations: Vec<LocationRow>,
    /// Normal hit table from the requested side.
    pub hits: Vec<HitRow>,
}

/// Parse a chassis name, case-insensitively.
///
/// # Errors
///
/// Returns [`ToolError::UnknownChassis`] listing the accepted names.
pub fn parse_chassis(name: &str) -> Result<Chassis> {
    Chassis::from_str(name).map_err(|_| {
        let known: Vec<String> = Chassis::iter().map(|c| c.to_string()).collect();
        ToolError::UnknownChassis(format!("{name} (expected one of {})", known.join(", ")))
    })
}

/// Build the dump for `chassis` seen from `side`.
#[must_use]
pub fn chassis_tables(chassis: Chassis, side: AttackSide) -> ChassisTables {
    let layout = static_locations(chassis);
    let locations = layout
        .iter()
        .enumerate()
        .map(|(index, info)| LocationRow {
            index,
            name: info.name.to_string(),
            abbreviation: info.abbreviation.to_string(),
            slots: info.slots,
            rear_armor: info.rear_armor,
        })
        .collect();
    let hits = table_set(chassis, None)
        .map(|set| hit_rows(side_table(&set.normal, side), layout))
        .unwrap_or_default();
    ChassisTables {
        chassis: chassis.to_string(),
        locations,
        hits,
    }
}

fn side_table(tables: &SideTables<Table2d6>, side: AttackSide) -> &Table2d6 {
    match side {
        AttackSide::Front => &tables.front,
        AttackSide::Left => &tables.left,
        AttackSide::Right => &tables.right,
        AttackSide::Rear => &tables.rear,
    }
}

fn hit_rows(table: &Table2d6, layout: &[LocationInfo]) -> Vec<HitRow> {
    table
        .iter()
        .zip(2u8..)
        .map(|(entry, roll)| HitRow {
            roll,
            location: abbreviation(entry, layout),
            rear: entry.rear,
            effect: match entry.effect {
                EntryEffect::None => String::new(),
                EntryEffect::Tac => "TAC".to_string(),
                EntryEffect::Critical => "critical".to_string(),
                EntryEffect::Motive => "motive".to_string(),
            },
        })
        .collect()
}

fn abbreviation(entry: &HitEntry, layout: &[LocationInfo]) -> String {
    layout
        .get(entry.location.index())
        .map_or_else(|| entry.location.to_string(), |info| info.abbreviation.to_string())
}

/// Render a dump as aligned text.
#[must_use]
pub fn render_text(tables: &ChassisTables) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tables.chassis);
    let _ = writeln!(out, "  #  abbr  slots  rear  name");
    for row in &tables.locations {
        let _ = writeln!(
            out,
            "  {:<2} {:<5} {:>5}  {:<4}  {}",
            row.index,
            row.abbreviation,
            row.slots,
            if row.rear_armor { "yes" } else { "" },
            row.name
        );
    }
    if !tables.hits.is_empty() {
        let _ = writeln!(out, "  roll  location");
        for row in &tables.hits {
            let rear = if row.rear { " (R)" } else { "" };
            let _ = writeln!(out, "  {:>4}  {}{rear} {}", row.roll, row.location, row.effect);
        }
    }
    out
}

/// Render a dump as pretty JSON.
///
/// # Errors
///
/// Returns [`ToolError::Json`] if serialization fails.
pub fn render_json(tables: &ChassisTables) -> Result<String> {
    Ok(serde_json::to_string_pretty(tables)?)
}

/// RON template for a new environment file with default values.
///
/// # Errors
///
/// Returns [`ToolError::Core`] if the template cannot be serialized.
pub fn environment_template(id: &str) -> Result<String> {
    let data = EnvironmentData {
        id: id.to_string(),
        name: id.to_string(),
        options: GameOptions::default(),
        conditions: PlanetaryConditions::default(),
    };
    ron::ser::to_string_pretty(&data, ron::ser::PrettyConfig::default()).map_err(|e| {
        ToolError::Core(CoreError::DataParseError {
            path: id.to_string(),
            message: e.to_string(),
        })
    })
}
