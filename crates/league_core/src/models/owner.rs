//! Player ownership.
//!
//! On the wire (persisted saves, exports) ownership is the signed `tid`
//! integer: non-negative values are team ids and the negative sentinels below
//! mark the other states. In memory it is always an [`Owner`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel `tid` codes. Persisted data depends on these values.
pub mod tid {
    pub const FREE_AGENT: i32 = -1;
    pub const UNDRAFTED: i32 = -2;
    pub const RETIRED: i32 = -3;
    pub const UNDRAFTED_2: i32 = -4;
    pub const UNDRAFTED_3: i32 = -5;
    pub const UNDRAFTED_FANTASY_TEMP: i32 = -6;
}

/// Number of future draft classes that exist at any time.
pub const DRAFT_CLASS_COUNT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Owner {
    Team(u32),
    FreeAgent,
    Retired,
    /// Draft prospect. The offset is the number of drafts until eligibility:
    /// 1 is the upcoming draft, 3 the furthest class.
    Undrafted(u8),
    FantasyDraftTemp,
}

impl Owner {
    pub fn tid(self) -> i32 {
        match self {
            Owner::Team(t) => t as i32,
            Owner::FreeAgent => tid::FREE_AGENT,
            Owner::Retired => tid::RETIRED,
            Owner::Undrafted(1) => tid::UNDRAFTED,
            Owner::Undrafted(2) => tid::UNDRAFTED_2,
            Owner::Undrafted(_) => tid::UNDRAFTED_3,
            Owner::FantasyDraftTemp => tid::UNDRAFTED_FANTASY_TEMP,
        }
    }

    pub fn from_tid(value: i32) -> Option<Self> {
        match value {
            t if t >= 0 => Some(Owner::Team(t as u32)),
            tid::FREE_AGENT => Some(Owner::FreeAgent),
            tid::UNDRAFTED => Some(Owner::Undrafted(1)),
            tid::RETIRED => Some(Owner::Retired),
            tid::UNDRAFTED_2 => Some(Owner::Undrafted(2)),
            tid::UNDRAFTED_3 => Some(Owner::Undrafted(3)),
            tid::UNDRAFTED_FANTASY_TEMP => Some(Owner::FantasyDraftTemp),
            _ => None,
        }
    }

    pub fn team(self) -> Option<u32> {
        match self {
            Owner::Team(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_team(self) -> bool {
        matches!(self, Owner::Team(_))
    }

    pub fn is_draft_prospect(self) -> bool {
        matches!(self, Owner::Undrafted(_))
    }

    /// The three future draft classes, nearest first.
    pub fn draft_classes() -> [Owner; DRAFT_CLASS_COUNT as usize] {
        [Owner::Undrafted(1), Owner::Undrafted(2), Owner::Undrafted(3)]
    }

    /// Short label used where a team abbreviation would otherwise appear.
    pub fn label(self) -> &'static str {
        match self {
            Owner::Team(_) => "",
            Owner::FreeAgent => "FA",
            Owner::Retired => "RET",
            Owner::Undrafted(_) | Owner::FantasyDraftTemp => "DP",
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Owner::Team(t) => write!(f, "team {}", t),
            Owner::FreeAgent => write!(f, "free agent"),
            Owner::Retired => write!(f, "retired"),
            Owner::Undrafted(n) => write!(f, "draft class +{}", n),
            Owner::FantasyDraftTemp => write!(f, "fantasy draft pool"),
        }
    }
}

impl TryFrom<i32> for Owner {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Owner::from_tid(value).ok_or_else(|| format!("invalid tid {}", value))
    }
}

impl From<Owner> for i32 {
    fn from(owner: Owner) -> Self {
        owner.tid()
    }
}
