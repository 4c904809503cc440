pub mod draft;
pub mod game;
pub mod owner;
pub mod phase;
pub mod player;
pub mod records;
pub mod stats;
pub mod team;

pub use draft::{DraftPick, DraftSlot};
pub use game::{BoxPlayer, BoxTeam, Feat, Game, Matchup, PlayoffSeries, ScheduledGame, SeriesTeam};
pub use owner::{tid, Owner, DRAFT_CLASS_COUNT};
pub use phase::Phase;
pub use player::{Born, Contract, DraftInfo, Injury, Player, RatingSnapshot, Skill};
pub use records::{
    Award, AwardKind, EventKind, GameAttribute, LeagueEvent, Message, Negotiation, ReleasedPlayer,
    TradeProposal, TradeSide,
};
pub use stats::{pct, PlayerStatsRow, StatLine};
pub use team::{Team, TeamSeason, TeamStatsRow};
