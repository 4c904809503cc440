use serde::{Deserialize, Serialize};
use std::fmt;

/// Season phase. The integer codes are persisted and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
#[repr(i8)]
pub enum Phase {
    FantasyDraft = -1,
    Preseason = 0,
    RegularSeason = 1,
    AfterTradeDeadline = 2,
    Playoffs = 3,
    BeforeDraft = 4,
    Draft = 5,
    AfterDraft = 6,
    ResignPlayers = 7,
    FreeAgency = 8,
}

impl Phase {
    pub const ALL: [Phase; 10] = [
        Phase::FantasyDraft,
        Phase::Preseason,
        Phase::RegularSeason,
        Phase::AfterTradeDeadline,
        Phase::Playoffs,
        Phase::BeforeDraft,
        Phase::Draft,
        Phase::AfterDraft,
        Phase::ResignPlayers,
        Phase::FreeAgency,
    ];

    pub fn code(self) -> i8 {
        self as i8
    }

    pub fn from_code(code: i8) -> Option<Self> {
        Phase::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// The phase a plain "advance" moves to.
    pub fn successor(self) -> Phase {
        match self {
            Phase::FantasyDraft => Phase::Preseason,
            Phase::Preseason => Phase::RegularSeason,
            Phase::RegularSeason => Phase::AfterTradeDeadline,
            Phase::AfterTradeDeadline => Phase::Playoffs,
            Phase::Playoffs => Phase::BeforeDraft,
            Phase::BeforeDraft => Phase::Draft,
            Phase::Draft => Phase::AfterDraft,
            Phase::AfterDraft => Phase::ResignPlayers,
            Phase::ResignPlayers => Phase::FreeAgency,
            Phase::FreeAgency => Phase::Preseason,
        }
    }

    /// Every phase reachable in one transition.
    ///
    /// Leagues without a trade deadline go straight from the regular season to
    /// the playoffs; the fantasy draft is only offered during the preseason.
    pub fn legal_targets(self) -> &'static [Phase] {
        match self {
            Phase::FantasyDraft => &[Phase::Preseason],
            Phase::Preseason => &[Phase::RegularSeason, Phase::FantasyDraft],
            Phase::RegularSeason => &[Phase::AfterTradeDeadline, Phase::Playoffs],
            Phase::AfterTradeDeadline => &[Phase::Playoffs],
            Phase::Playoffs => &[Phase::BeforeDraft],
            Phase::BeforeDraft => &[Phase::Draft],
            Phase::Draft => &[Phase::AfterDraft],
            Phase::AfterDraft => &[Phase::ResignPlayers],
            Phase::ResignPlayers => &[Phase::FreeAgency],
            Phase::FreeAgency => &[Phase::Preseason],
        }
    }

    pub fn can_transition_to(self, to: Phase) -> bool {
        self.legal_targets().contains(&to)
    }

    /// True when games on the schedule are played in this phase.
    pub fn is_regular_season(self) -> bool {
        matches!(self, Phase::RegularSeason | Phase::AfterTradeDeadline)
    }

    pub fn is_drafting(self) -> bool {
        matches!(self, Phase::Draft | Phase::FantasyDraft)
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::FantasyDraft => "fantasy draft",
            Phase::Preseason => "preseason",
            Phase::RegularSeason => "regular season",
            Phase::AfterTradeDeadline => "after trade deadline",
            Phase::Playoffs => "playoffs",
            Phase::BeforeDraft => "before draft",
            Phase::Draft => "draft",
            Phase::AfterDraft => "after draft",
            Phase::ResignPlayers => "re-sign players",
            Phase::FreeAgency => "free agency",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl TryFrom<i8> for Phase {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        Phase::from_code(code).ok_or_else(|| format!("invalid phase code {}", code))
    }
}

impl From<Phase> for i8 {
    fn from(phase: Phase) -> Self {
        phase.code()
    }
}
