//! Fighter squadron membership.
//!
//! Members are owned by the [`crate::registry::UnitRegistry`]. A squadron
//! unit only holds their ids, and its location layout (one location per
//! member) is rebuilt explicitly on every join and leave.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::criticals::CriticalStore;
use crate::location::LocationInfo;
use crate::registry::UnitId;
use crate::unit::Unit;
use crate::weapon_groups::WeaponGroups;

/// Member list of a squadron.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadronState {
    members: Vec<UnitId>,
}

impl SquadronState {
    /// Maximum members.
    pub const CAPACITY: usize = 6;

    /// Member count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// No members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in join order. Location `N` is member `N`.
    #[must_use]
    pub fn members(&self) -> &[UnitId] {
        &self.members
    }

    /// Member is already in the squadron.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.members.contains(&id)
    }

    /// At capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.members.len() >= Self::CAPACITY
    }

    pub(crate) fn push(&mut self, id: UnitId) {
        self.members.push(id);
    }

    pub(crate) fn remove(&mut self, id: UnitId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != id);
        self.members.len() != before
    }
}

impl Unit {
    /// Rebuild the member-per-location layout and install new weapon groups.
    pub(crate) fn rebuild_squadron_layout(&mut self, groups: WeaponGroups) {
        let count = self.squadron.as_ref().map_or(0, SquadronState::len);
        let layout: Vec<LocationInfo> = (1..=count).map(LocationInfo::member).collect();
        self.criticals = CriticalStore::for_layout(&layout);
        self.ledger.resize(layout.len());
        self.layout = Cow::Owned(layout);
        self.weapon_groups = groups;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_bookkeeping() {
        let mut state = SquadronState::default();
        assert!(state.is_empty());
        state.push(UnitId::new(4));
        state.push(UnitId::new(9));
        assert!(state.contains(UnitId::new(9)));
        assert!(state.remove(UnitId::new(4)));
        assert!(!state.remove(UnitId::new(4)));
        assert_eq!(state.members(), &[UnitId::new(9)]);
    }

    #[test]
    fn test_capacity() {
        let mut state = SquadronState::default();
        for raw in 0..6 {
            assert!(!state.is_full());
            state.push(UnitId::new(raw));
        }
        assert!(state.is_full());
    }
}
