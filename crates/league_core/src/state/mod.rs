//! League state: the context plus the entity store, mutated as one unit.
//!
//! `LeagueState` is what gets persisted and what the league service guards
//! behind its lock. Phase transitions and market operations take
//! `&mut LeagueState`, usually through [`LeagueState::transaction`].

use crate::context::LeagueContext;
use crate::error::Result;
use crate::models::{GameAttribute, Owner, Player, ReleasedPlayer, Team};
use crate::store::EntityStore;

#[derive(Debug, Clone)]
pub struct LeagueState {
    pub ctx: LeagueContext,
    pub store: EntityStore,
}

impl LeagueState {
    pub fn new(ctx: LeagueContext, store: EntityStore) -> Self {
        Self { ctx, store }
    }

    /// Runs `f` against a staged copy of context and store. Nothing changes
    /// unless `f` returns `Ok`.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut LeagueState) -> Result<R>) -> Result<R> {
        let mut staged = self.clone();
        let out = f(&mut staged)?;
        *self = staged;
        Ok(out)
    }

    /// Rewrites the `gameAttributes` collection from the context.
    pub fn sync_game_attributes(&mut self) -> Result<()> {
        for attr in self.ctx.to_attributes()? {
            let unchanged = self.store.get::<GameAttribute>(&attr.key).map_or(false, |a| *a == attr);
            if !unchanged {
                self.store.put(attr);
            }
        }
        Ok(())
    }

    // ========================
    // Rosters
    // ========================

    pub fn roster(&self, tid: u32) -> Vec<&Player> {
        self.store.players_with_owner(Owner::Team(tid))
    }

    pub fn roster_size(&self, tid: u32) -> usize {
        self.roster(tid).len()
    }

    pub fn free_agents(&self) -> Vec<&Player> {
        self.store.players_with_owner(Owner::FreeAgent)
    }

    /// Salary committed by `tid`: its roster plus released players still owed.
    pub fn payroll(&self, tid: u32) -> u32 {
        let roster: u32 = self.roster(tid).iter().map(|p| p.contract.amount).sum();
        let released: u32 = self
            .store
            .index_get::<ReleasedPlayer>("tid", &[tid as i64])
            .unwrap_or_default()
            .iter()
            .map(|r| r.contract.amount)
            .sum();
        roster + released
    }

    pub fn cap_space(&self, tid: u32) -> i64 {
        self.ctx.settings.salary_cap as i64 - self.payroll(tid) as i64
    }

    pub fn team_abbrev(&self, owner: Owner) -> String {
        match owner {
            Owner::Team(tid) => self
                .store
                .get::<Team>(&tid)
                .map_or_else(|| owner.label().to_string(), |t| t.abbrev.clone()),
            other => other.label().to_string(),
        }
    }

    /// Non-user teams in tid order.
    pub fn ai_team_ids(&self) -> Vec<u32> {
        self.store.team_ids().into_iter().filter(|&tid| !self.ctx.is_user_team(tid)).collect()
    }

    /// Records an event in the transaction log for the current season and phase.
    pub fn log_event(
        &mut self,
        kind: crate::models::EventKind,
        text: String,
        pids: Vec<u32>,
        tids: Vec<u32>,
    ) {
        let (season, phase) = (self.ctx.season, self.ctx.phase);
        self.store.log_event(season, phase, kind, text, pids, tids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeagueError;
    use crate::models::{Contract, Phase};
    use crate::testutil::sample_state;

    #[test]
    fn test_transaction_stages_context_too() {
        let mut state = sample_state();
        let season = state.ctx.season;
        let result: Result<()> = state.transaction(|s| {
            s.ctx.season += 1;
            s.ctx.phase = Phase::RegularSeason;
            Err(LeagueError::Integrity("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(state.ctx.season, season);
        assert_eq!(state.ctx.phase, Phase::Preseason);
    }

    #[test]
    fn test_payroll_includes_released_players() {
        let mut state = sample_state();
        let tid = state.ctx.user_tid;
        let before = state.payroll(tid);
        let rpid = state.store.next_id::<ReleasedPlayer>();
        state.store.put(ReleasedPlayer {
            rpid,
            pid: 9999,
            tid,
            contract: Contract { amount: 1_000, exp: state.ctx.season + 1, rookie: false },
        });
        assert_eq!(state.payroll(tid), before + 1_000);
    }

    #[test]
    fn test_sync_game_attributes() {
        let mut state = sample_state();
        state.ctx.phase = Phase::RegularSeason;
        state.sync_game_attributes().unwrap();
        let phase = state.store.get::<GameAttribute>(&"phase".to_string()).unwrap();
        assert_eq!(phase.value, serde_json::json!(1));
        assert_eq!(LeagueContext::from_attributes(state.store.get_all::<GameAttribute>()).unwrap(), state.ctx);
    }
}
