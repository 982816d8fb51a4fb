//! Static hit-location tables.
//!
//! Every table is a constant array indexed by the die total: 2d6 tables
//! have 11 entries (totals 2 to 12), 1d6 tables have 6. A [`TableSet`]
//! groups the tables one chassis (or one conversion mode of a hybrid)
//! uses. Sets that only define the normal table answer every attack type
//! with it.

use serde::{Deserialize, Serialize};

use crate::conversion::ConversionMode;
use crate::location::Location;
use crate::unit_kind::Chassis;

/// Secondary effect attached to a table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryEffect {
    /// Plain hit.
    None,
    /// Possible through-armor critical (sub-roll).
    Tac,
    /// Aerospace critical chance.
    Critical,
    /// Vehicle motive damage.
    Motive,
}

/// One row of a hit table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitEntry {
    /// Location hit.
    pub location: Location,
    /// Rear armor takes the hit.
    pub rear: bool,
    /// Secondary effect.
    pub effect: EntryEffect,
}

const fn at(location: Location) -> HitEntry {
    HitEntry {
        location,
        rear: false,
        effect: EntryEffect::None,
    }
}

const fn rr(location: Location) -> HitEntry {
    HitEntry {
        location,
        rear: true,
        effect: EntryEffect::None,
    }
}

const fn tac(location: Location) -> HitEntry {
    HitEntry {
        location,
        rear: false,
        effect: EntryEffect::Tac,
    }
}

const fn tac_rr(location: Location) -> HitEntry {
    HitEntry {
        location,
        rear: true,
        effect: EntryEffect::Tac,
    }
}

const fn crit(location: Location) -> HitEntry {
    HitEntry {
        location,
        rear: false,
        effect: EntryEffect::Critical,
    }
}

const fn crit_rr(location: Location) -> HitEntry {
    HitEntry {
        location,
        rear: true,
        effect: EntryEffect::Critical,
    }
}

const fn mot(location: Location) -> HitEntry {
    HitEntry {
        location,
        rear: false,
        effect: EntryEffect::Motive,
    }
}

/// A 2d6 table.
pub type Table2d6 = [HitEntry; 11];
/// A 1d6 table.
pub type Table1d6 = [HitEntry; 6];

/// One table per attack side.
#[derive(Debug)]
pub struct SideTables<T> {
    /// Attack from the front.
    pub front: T,
    /// Attack from behind.
    pub rear: T,
    /// Attack from the left.
    pub left: T,
    /// Attack from the right.
    pub right: T,
}

/// All tables of one chassis or mode.
#[derive(Debug)]
pub struct TableSet {
    /// Normal (2d6).
    pub normal: SideTables<Table2d6>,
    /// Punch (1d6).
    pub punch: Option<SideTables<Table1d6>>,
    /// Kick (1d6).
    pub kick: Option<SideTables<Table1d6>>,
    /// Swarm (2d6, same on every side).
    pub swarm: Option<Table2d6>,
    /// Attack from above (1d6).
    pub above: Option<SideTables<Table1d6>>,
    /// Attack from below (1d6).
    pub below: Option<SideTables<Table1d6>>,
}

// ============================================================================
// Bipeds and LAMs in Mek or AirMek mode
// ============================================================================

mod biped {
    use super::*;
    use crate::location::mek::{
        CENTER_TORSO as CT, HEAD as HD, LEFT_ARM as LA, LEFT_LEG as LL, LEFT_TORSO as LT,
        RIGHT_ARM as RA, RIGHT_LEG as RL, RIGHT_TORSO as RT,
    };

    pub const PUNCH: SideTables<Table1d6> = SideTables {
        front: [at(LA), at(LT), at(CT), at(RT), at(RA), at(HD)],
        rear: [at(LA), rr(LT), rr(CT), rr(RT), at(RA), at(HD)],
        left: [at(LT), at(LT), at(CT), at(LA), at(LA), at(HD)],
        right: [at(RT), at(RT), at(CT), at(RA), at(RA), at(HD)],
    };

    pub const SET: TableSet = TableSet {
        normal: SideTables {
            front: [
                tac(CT), at(RA), at(RA), at(RL), at(RT), at(CT), at(LT), at(LL), at(LA), at(LA), at(HD),
            ],
            rear: [
                tac_rr(CT), at(RA), at(RA), at(RL), rr(RT), rr(CT), rr(LT), at(LL), at(LA), at(LA), at(HD),
            ],
            left: [
                tac(LT), at(LL), at(LA), at(LA), at(LL), at(LT), at(CT), at(RT), at(RA), at(RL), at(HD),
            ],
            right: [
                tac(RT), at(RL), at(RA), at(RA), at(RL), at(RT), at(CT), at(LT), at(LA), at(LL), at(HD),
            ],
        },
        punch: Some(PUNCH),
        kick: Some(SideTables {
            front: [at(RL), at(RL), at(RL), at(LL), at(LL), at(LL)],
            rear: [at(RL), at(RL), at(RL), at(LL), at(LL), at(LL)],
            left: [at(LL); 6],
            right: [at(RL); 6],
        }),
        swarm: Some([
            at(HD), rr(CT), rr(RT), at(RT), at(RA), at(CT), at(LA), at(LT), rr(LT), rr(CT), at(HD),
        ]),
        above: Some(PUNCH),
        below: Some(SideTables {
            front: [at(RL), at(RL), at(RT), at(LT), at(LL), at(LL)],
            rear: [at(RL), at(RL), rr(RT), rr(LT), at(LL), at(LL)],
            left: [at(LL), at(LL), at(LT), at(LT), at(LL), at(LL)],
            right: [at(RL), at(RL), at(RT), at(RT), at(RL), at(RL)],
        }),
    };
}

// ============================================================================
// Tripods
// ============================================================================

mod tripod {
    use super::*;
    use crate::location::mek::{
        CENTER_LEG as CL, CENTER_TORSO as CT, HEAD as HD, LEFT_ARM as LA, LEFT_LEG as LL,
        LEFT_TORSO as LT, RIGHT_ARM as RA, RIGHT_LEG as RL, RIGHT_TORSO as RT,
    };

    pub const SET: TableSet = TableSet {
        normal: SideTables {
            front: [
                tac(CT), at(RA), at(CL), at(RL), at(RT), at(CT), at(LT), at(LL), at(CL), at(LA), at(HD),
            ],
            rear: [
                tac_rr(CT), at(RA), at(CL), at(RL), rr(RT), rr(CT), rr(LT), at(LL), at(CL), at(LA), at(HD),
            ],
            left: [
                tac(LT), at(LL), at(LA), at(LA), at(LL), at(LT), at(CT), at(RT), at(RA), at(CL), at(HD),
            ],
            right: [
                tac(RT), at(RL), at(RA), at(RA), at(RL), at(RT), at(CT), at(LT), at(LA), at(CL), at(HD),
            ],
        },
        punch: Some(biped::PUNCH),
        kick: Some(SideTables {
            front: [at(RL), at(RL), at(CL), at(CL), at(LL), at(LL)],
            rear: [at(RL), at(RL), at(CL), at(CL), at(LL), at(LL)],
            left: [at(LL), at(LL), at(LL), at(LL), at(CL), at(CL)],
            right: [at(RL), at(RL), at(RL), at(RL), at(CL), at(CL)],
        }),
        swarm: Some([
            at(HD), rr(CT), rr(RT), at(RT), at(RA), at(CT), at(LA), at(LT), rr(LT), rr(CT), at(HD),
        ]),
        above: Some(biped::PUNCH),
        below: Some(SideTables {
            front: [at(RL), at(CL), at(RT), at(LT), at(CL), at(LL)],
            rear: [at(RL), at(CL), rr(RT), rr(LT), at(CL), at(LL)],
            left: [at(LL), at(LL), at(LT), at(LT), at(CL), at(LL)],
            right: [at(RL), at(RL), at(RT), at(RT), at(CL), at(RL)],
        }),
    };
}

// ============================================================================
// Quads and QuadVees in Mek mode
// ============================================================================

mod quad_mek {
    use super::*;
    use crate::location::quad::{
        CENTER_TORSO as CT, FRONT_LEFT_LEG as FLL, FRONT_RIGHT_LEG as FRL, HEAD as HD,
        LEFT_TORSO as LT, REAR_LEFT_LEG as RLL, REAR_RIGHT_LEG as RRL, RIGHT_TORSO as RT,
    };

    pub const PUNCH: SideTables<Table1d6> = SideTables {
        front: [at(FLL), at(LT), at(CT), at(RT), at(FRL), at(HD)],
        rear: [at(RLL), rr(LT), rr(CT), rr(RT), at(RRL), at(HD)],
        left: [at(LT), at(LT), at(CT), at(FLL), at(FLL), at(HD)],
        right: [at(RT), at(RT), at(CT), at(FRL), at(FRL), at(HD)],
    };

    pub const SET: TableSet = TableSet {
        normal: SideTables {
            front: [
                tac(CT), at(FRL), at(FRL), at(RRL), at(RT), at(CT), at(LT), at(RLL), at(FLL), at(FLL), at(HD),
            ],
            rear: [
                tac_rr(CT), at(RRL), at(RRL), at(FRL), rr(RT), rr(CT), rr(LT), at(FLL), at(RLL), at(RLL), at(HD),
            ],
            left: [
                tac(LT), at(RLL), at(FLL), at(FLL), at(RLL), at(LT), at(CT), at(RT), at(FRL), at(RRL), at(HD),
            ],
            right: [
                tac(RT), at(RRL), at(FRL), at(FRL), at(RRL), at(RT), at(CT), at(LT), at(FLL), at(RLL), at(HD),
            ],
        },
        punch: Some(PUNCH),
        kick: Some(SideTables {
            front: [at(FRL), at(FRL), at(FRL), at(FLL), at(FLL), at(FLL)],
            rear: [at(RRL), at(RRL), at(RRL), at(RLL), at(RLL), at(RLL)],
            left: [at(FLL), at(FLL), at(FLL), at(RLL), at(RLL), at(RLL)],
            right: [at(FRL), at(FRL), at(FRL), at(RRL), at(RRL), at(RRL)],
        }),
        swarm: Some([
            at(HD), rr(CT), rr(RT), at(RT), at(FRL), at(CT), at(FLL), at(LT), rr(LT), rr(CT), at(HD),
        ]),
        above: Some(PUNCH),
        below: Some(SideTables {
            front: [at(FRL), at(RRL), at(RT), at(LT), at(RLL), at(FLL)],
            rear: [at(FRL), at(RRL), rr(RT), rr(LT), at(RLL), at(FLL)],
            left: [at(FLL), at(RLL), at(LT), at(LT), at(RLL), at(FLL)],
            right: [at(FRL), at(RRL), at(RT), at(RT), at(RRL), at(FRL)],
        }),
    };

    /// QuadVee in vehicle mode: legs carry the tracks.
    pub const VEHICLE: TableSet = TableSet {
        normal: SideTables {
            front: [
                tac(CT), mot(FRL), at(FRL), mot(FRL), at(RT), at(CT), at(LT), mot(FLL), at(FLL), mot(FLL), at(HD),
            ],
            rear: [
                tac_rr(CT), mot(RRL), at(RRL), mot(RRL), rr(RT), rr(CT), rr(LT), mot(RLL), at(RLL), mot(RLL), at(HD),
            ],
            left: [
                tac(LT), mot(RLL), at(FLL), mot(FLL), at(RLL), at(LT), at(CT), at(RT), mot(FRL), at(RRL), at(HD),
            ],
            right: [
                tac(RT), mot(RRL), at(FRL), mot(FRL), at(RRL), at(RT), at(CT), at(LT), mot(FLL), at(RLL), at(HD),
            ],
        },
        punch: None,
        kick: None,
        swarm: None,
        above: None,
        below: None,
    };
}

// ============================================================================
// LAMs in fighter mode
// ============================================================================

mod lam_fighter {
    use super::*;
    use crate::location::mek::{
        CENTER_TORSO as CT, HEAD as HD, LEFT_ARM as LA, LEFT_LEG as LL, LEFT_TORSO as LT,
        RIGHT_ARM as RA, RIGHT_LEG as RL, RIGHT_TORSO as RT,
    };

    pub const SET: TableSet = TableSet {
        normal: SideTables {
            front: [
                crit(HD), at(RA), at(RA), at(RT), at(CT), at(CT), at(CT), at(LT), at(LA), at(LA), crit(HD),
            ],
            rear: [
                crit_rr(CT), at(RL), at(RL), rr(RT), rr(CT), rr(CT), rr(CT), rr(LT), at(LL), at(LL), crit_rr(CT),
            ],
            left: [
                crit(LT), at(LL), at(LA), at(LA), at(LT), at(LT), at(LT), at(CT), at(LL), at(LL), crit(LT),
            ],
            right: [
                crit(RT), at(RL), at(RA), at(RA), at(RT), at(RT), at(RT), at(CT), at(RL), at(RL), crit(RT),
            ],
        },
        punch: None,
        kick: None,
        swarm: None,
        above: None,
        below: None,
    };
}

// ============================================================================
// Aerospace fighters and small craft
// ============================================================================

mod aerospace {
    use super::*;
    use crate::location::aero::{AFT, LEFT_WING as LW, NOSE, RIGHT_WING as RW};

    pub const SET: TableSet = TableSet {
        normal: SideTables {
            front: [
                crit(NOSE), at(RW), at(NOSE), crit(NOSE), at(RW), at(NOSE), at(LW), crit(NOSE), at(AFT), at(LW), crit(NOSE),
            ],
            rear: [
                crit(AFT), at(RW), at(AFT), crit(AFT), at(RW), at(AFT), at(LW), crit(AFT), at(NOSE), at(LW), crit(AFT),
            ],
            left: [
                crit(NOSE), at(LW), at(NOSE), crit(LW), at(LW), at(LW), at(LW), crit(LW), at(AFT), at(LW), crit(LW),
            ],
            right: [
                crit(NOSE), at(RW), at(NOSE), crit(RW), at(RW), at(RW), at(RW), crit(RW), at(AFT), at(RW), crit(RW),
            ],
        },
        punch: None,
        kick: None,
        swarm: None,
        above: None,
        below: None,
    };
}

static BIPED: TableSet = biped::SET;
static TRIPOD: TableSet = tripod::SET;
static QUAD: TableSet = quad_mek::SET;
static QUADVEE_VEHICLE: TableSet = quad_mek::VEHICLE;
static LAM_FIGHTER: TableSet = lam_fighter::SET;
static AEROSPACE: TableSet = aerospace::SET;

/// Table set for a chassis in its current conversion mode.
///
/// Infantry and squadrons have no tables.
#[must_use]
pub fn table_set(chassis: Chassis, mode: Option<ConversionMode>) -> Option<&'static TableSet> {
    match (chassis, mode) {
        (Chassis::LandAirMek(_), Some(ConversionMode::Fighter)) => Some(&LAM_FIGHTER),
        (Chassis::Biped | Chassis::LandAirMek(_), _) => Some(&BIPED),
        (Chassis::Tripod, _) => Some(&TRIPOD),
        (Chassis::QuadVee, Some(ConversionMode::Vehicle)) => Some(&QUADVEE_VEHICLE),
        (Chassis::Quad | Chassis::QuadVee, _) => Some(&QUAD),
        (Chassis::AerospaceFighter | Chassis::SmallCraft, _) => Some(&AEROSPACE),
        (Chassis::FighterSquadron | Chassis::InfantryPlatoon, _) => None,
    }
}
