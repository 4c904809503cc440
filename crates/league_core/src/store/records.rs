//! Primary keys and secondary indexes of every stored collection.

use super::collection::Collection;
use super::table::{IndexDef, IndexKey, Record};
use crate::models::*;

fn player_tid(p: &Player) -> IndexKey {
    vec![p.tid.tid() as i64]
}

fn player_draft_year(p: &Player) -> IndexKey {
    vec![p.draft.year as i64]
}

impl Record for Player {
    type Key = u32;
    const COLLECTION: Collection = Collection::Players;

    fn key(&self) -> u32 {
        self.pid
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<Player>] = &[
            IndexDef { name: "tid", extract: player_tid },
            IndexDef { name: "draft.year", extract: player_draft_year },
        ];
        INDEXES
    }
}

fn stats_pid(s: &PlayerStatsRow) -> IndexKey {
    vec![s.pid as i64]
}

fn stats_pid_season(s: &PlayerStatsRow) -> IndexKey {
    vec![s.pid as i64, s.season as i64, s.playoffs as i64]
}

fn stats_season(s: &PlayerStatsRow) -> IndexKey {
    vec![s.season as i64, s.playoffs as i64, s.tid as i64]
}

impl Record for PlayerStatsRow {
    type Key = u32;
    const COLLECTION: Collection = Collection::PlayerStats;

    fn key(&self) -> u32 {
        self.psid
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<PlayerStatsRow>] = &[
            IndexDef { name: "pid", extract: stats_pid },
            IndexDef { name: "pid, season, playoffs", extract: stats_pid_season },
            IndexDef { name: "season, playoffs, tid", extract: stats_season },
        ];
        INDEXES
    }
}

impl Record for Team {
    type Key = u32;
    const COLLECTION: Collection = Collection::Teams;

    fn key(&self) -> u32 {
        self.tid
    }
}

fn game_season(g: &Game) -> IndexKey {
    vec![g.season as i64, g.playoffs as i64]
}

impl Record for Game {
    type Key = u32;
    const COLLECTION: Collection = Collection::Games;

    fn key(&self) -> u32 {
        self.gid
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<Game>] = &[IndexDef { name: "season", extract: game_season }];
        INDEXES
    }
}

fn schedule_day(g: &ScheduledGame) -> IndexKey {
    vec![g.day as i64]
}

impl Record for ScheduledGame {
    type Key = u32;
    const COLLECTION: Collection = Collection::Schedule;

    fn key(&self) -> u32 {
        self.gid
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<ScheduledGame>] =
            &[IndexDef { name: "day", extract: schedule_day }];
        INDEXES
    }
}

impl Record for PlayoffSeries {
    type Key = u16;
    const COLLECTION: Collection = Collection::PlayoffSeries;

    fn key(&self) -> u16 {
        self.season
    }
}

fn pick_season(dp: &DraftPick) -> IndexKey {
    vec![dp.season as i64, dp.round as i64]
}

fn pick_tid(dp: &DraftPick) -> IndexKey {
    vec![dp.tid as i64]
}

impl Record for DraftPick {
    type Key = u32;
    const COLLECTION: Collection = Collection::DraftPicks;

    fn key(&self) -> u32 {
        self.dpid
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<DraftPick>] = &[
            IndexDef { name: "season, round", extract: pick_season },
            IndexDef { name: "tid", extract: pick_tid },
        ];
        INDEXES
    }
}

impl Record for DraftSlot {
    type Key = u32;
    const COLLECTION: Collection = Collection::DraftOrder;

    fn key(&self) -> u32 {
        self.slot
    }
}

impl Record for Negotiation {
    type Key = u32;
    const COLLECTION: Collection = Collection::Negotiations;

    fn key(&self) -> u32 {
        self.pid
    }
}

fn released_tid(r: &ReleasedPlayer) -> IndexKey {
    vec![r.tid as i64]
}

impl Record for ReleasedPlayer {
    type Key = u32;
    const COLLECTION: Collection = Collection::ReleasedPlayers;

    fn key(&self) -> u32 {
        self.rpid
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<ReleasedPlayer>] =
            &[IndexDef { name: "tid", extract: released_tid }];
        INDEXES
    }
}

fn award_season(a: &Award) -> IndexKey {
    vec![a.season as i64]
}

impl Record for Award {
    type Key = u32;
    const COLLECTION: Collection = Collection::Awards;

    fn key(&self) -> u32 {
        self.aid
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<Award>] = &[IndexDef { name: "season", extract: award_season }];
        INDEXES
    }
}

fn feat_pid(f: &Feat) -> IndexKey {
    vec![f.pid as i64]
}

fn feat_season_tid(f: &Feat) -> IndexKey {
    vec![f.season as i64, f.tid as i64]
}

impl Record for Feat {
    type Key = u32;
    const COLLECTION: Collection = Collection::PlayerFeats;

    fn key(&self) -> u32 {
        self.feat_id
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<Feat>] = &[
            IndexDef { name: "pid", extract: feat_pid },
            IndexDef { name: "season, tid", extract: feat_season_tid },
        ];
        INDEXES
    }
}

impl Record for Message {
    type Key = u32;
    const COLLECTION: Collection = Collection::Messages;

    fn key(&self) -> u32 {
        self.mid
    }
}

fn event_season(e: &LeagueEvent) -> IndexKey {
    vec![e.season as i64]
}

impl Record for LeagueEvent {
    type Key = u32;
    const COLLECTION: Collection = Collection::Events;

    fn key(&self) -> u32 {
        self.eid
    }

    fn indexes() -> &'static [IndexDef<Self>] {
        const INDEXES: &[IndexDef<LeagueEvent>] =
            &[IndexDef { name: "season", extract: event_season }];
        INDEXES
    }
}

impl Record for TradeProposal {
    type Key = u32;
    const COLLECTION: Collection = Collection::Trade;

    fn key(&self) -> u32 {
        self.rid
    }
}

impl Record for GameAttribute {
    type Key = String;
    const COLLECTION: Collection = Collection::GameAttributes;

    fn key(&self) -> String {
        self.key.clone()
    }
}
