//! The league service: one open league, its engines and its views.
//!
//! State lives behind an `RwLock`. Reads run against the last committed
//! snapshot; every mutation first claims the single writer slot and is
//! rejected with [`LeagueError::TransitionInProgress`] while another holds
//! it. After a mutation commits, dependent views are reloaded and listeners
//! notified while the read lock is held, so all of them see the same
//! snapshot.

use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

use crate::context::LeagueContext;
use crate::creation::{create_league, NewLeague};
use crate::error::{LeagueError, Result};
use crate::events::{Dispatcher, EventSet, UpdateEvent, View, ViewId, ViewParams, ViewUpdate};
use crate::export::{export_league, ExportArtifact, ExportSelection};
use crate::market::{self, OfferResponse};
use crate::models::Phase;
use crate::persist::{PersistError, SaveManager};
use crate::phase;
use crate::player::{DefaultDevelopment, DevelopmentModel};
use crate::sim::{apply_day, prepare_day, simulate_games, GameSimulator, RatingsSimulator};
use crate::state::LeagueState;
use crate::views;

type Listener = Box<dyn Fn(&ViewUpdate) + Send + Sync>;

/// Releases the writer slot when dropped.
struct WriterSlot<'a>(&'a AtomicBool);

impl Drop for WriterSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct League {
    state: RwLock<LeagueState>,
    writing: AtomicBool,
    dispatcher: Mutex<Dispatcher>,
    listeners: Mutex<Vec<Listener>>,
    dev: Box<dyn DevelopmentModel>,
    sim: Box<dyn GameSimulator>,
    saves: Option<SaveManager>,
}

impl std::fmt::Debug for League {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("League").field("writing", &self.writing.load(Ordering::Relaxed)).finish_non_exhaustive()
    }
}

impl League {
    /// Wraps `state` with the default development model and game simulator.
    pub fn new(state: LeagueState) -> Self {
        Self::with_engines(state, Box::new(DefaultDevelopment::default()), Box::new(RatingsSimulator::default()))
    }

    pub fn with_engines(state: LeagueState, dev: Box<dyn DevelopmentModel>, sim: Box<dyn GameSimulator>) -> Self {
        Self {
            state: RwLock::new(state),
            writing: AtomicBool::new(false),
            dispatcher: Mutex::new(Dispatcher::new()),
            listeners: Mutex::new(Vec::new()),
            dev,
            sim,
            saves: None,
        }
    }

    /// Saves go to `saves` from now on.
    pub fn with_saves(mut self, saves: SaveManager) -> Self {
        self.saves = Some(saves);
        self
    }

    pub fn create(opts: &NewLeague) -> Result<Self> {
        let state = create_league(opts)?;
        info!(lid = opts.lid, name = %opts.name, "league created");
        Ok(Self::new(state))
    }

    /// Opens league `lid` from `saves`.
    pub fn open(saves: SaveManager, lid: u32) -> std::result::Result<Self, PersistError> {
        let state = saves.load(lid)?;
        info!(lid, season = state.ctx.season, phase = %state.ctx.phase, "league opened");
        Ok(Self::new(state).with_saves(saves))
    }

    /// Saves (when a save directory is attached) and hands back the state.
    pub fn close(self) -> std::result::Result<LeagueState, PersistError> {
        if self.saves.is_some() {
            self.save()?;
        }
        let state = self.state.into_inner().expect("league state lock poisoned");
        info!(lid = state.ctx.lid, "league closed");
        Ok(state)
    }

    pub fn save(&self) -> std::result::Result<PathBuf, PersistError> {
        let saves = self
            .saves
            .as_ref()
            .ok_or_else(|| PersistError::Invalid(LeagueError::NotFound("save directory".into())))?;
        let _slot = self.claim_writer().map_err(PersistError::Invalid)?;
        saves.save(&self.read_guard())
    }

    // ========================
    // Reads
    // ========================

    fn read_guard(&self) -> RwLockReadGuard<'_, LeagueState> {
        self.state.read().expect("league state lock poisoned")
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, LeagueState> {
        self.state.write().expect("league state lock poisoned")
    }

    /// Runs `f` against the committed snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&LeagueState) -> R) -> R {
        f(&self.read_guard())
    }

    pub fn context(&self) -> LeagueContext {
        self.read_guard().ctx.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.writing.load(Ordering::Acquire)
    }

    // ========================
    // Mutations
    // ========================

    fn claim_writer(&self) -> Result<WriterSlot<'_>> {
        self.writing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LeagueError::TransitionInProgress)?;
        Ok(WriterSlot(&self.writing))
    }

    /// Applies `f` under the write lock, then dispatches `events` once the
    /// change is committed.
    fn mutate<R>(&self, events: EventSet, f: impl FnOnce(&mut LeagueState) -> Result<R>) -> Result<R> {
        let _slot = self.claim_writer()?;
        let out = f(&mut self.write_guard())?;
        self.dispatch(&events);
        Ok(out)
    }

    fn dispatch(&self, events: &EventSet) {
        if events.is_empty() {
            return;
        }
        let state = self.read_guard();
        let updates = self.dispatcher.lock().expect("dispatcher lock poisoned").dispatch(events, &state);
        let listeners = self.listeners.lock().expect("listener lock poisoned");
        for update in &updates {
            for listener in listeners.iter() {
                listener(update);
            }
        }
        debug!(events = ?events, updates = updates.len(), "dispatched");
    }

    pub fn advance(&self, to: Phase) -> Result<EventSet> {
        let _slot = self.claim_writer()?;
        let events = phase::advance(&mut self.write_guard(), to, self.dev.as_ref())?;
        self.dispatch(&events);
        Ok(events)
    }

    pub fn advance_to_next(&self) -> Result<EventSet> {
        let to = self.read_guard().ctx.phase.successor();
        self.advance(to)
    }

    /// Plays up to `days` days (all remaining when `None`); returns the
    /// number played. Each day is prepared and applied under the write lock
    /// but simulated under the read lock, and views are updated once at the
    /// end.
    pub fn play_days(&self, days: Option<u32>) -> Result<u32> {
        let _slot = self.claim_writer()?;
        let mut events = EventSet::new();
        let mut played = 0u32;
        let result = loop {
            if days.is_some_and(|d| played >= d) {
                break Ok(());
            }
            let games = match prepare_day(&mut self.write_guard()) {
                Ok(games) => games,
                Err(e) => break Err(e),
            };
            if games.is_empty() {
                break Ok(());
            }
            let outcomes = simulate_games(&self.read_guard(), &games, self.sim.as_ref());
            match apply_day(&mut self.write_guard(), &games, outcomes) {
                Ok(summary) => events.extend(summary.events),
                Err(e) => break Err(e),
            }
            played += 1;
        };
        self.dispatch(&events);
        result?;
        info!(played, "simulated days");
        Ok(played)
    }

    /// Plays the rest of the phase on a background thread.
    pub fn spawn_season_sim(self: &Arc<Self>) -> JoinHandle<Result<u32>> {
        let league = Arc::clone(self);
        std::thread::spawn(move || {
            let result = league.play_days(None);
            if let Err(e) = &result {
                warn!(error = %e, "background simulation stopped");
            }
            result
        })
    }

    // ========================
    // Market
    // ========================

    pub fn start_negotiation(&self, pid: u32, resigning: bool) -> Result<()> {
        let events = EventSet::of([UpdateEvent::PlayerMovement]);
        self.mutate(events, |s| {
            let tid = s.ctx.user_tid;
            s.transaction(|s| market::start_negotiation(s, pid, tid, resigning))
        })
    }

    pub fn make_offer(&self, pid: u32, amount: u32, exp: u16) -> Result<OfferResponse> {
        let events = EventSet::of([UpdateEvent::PlayerMovement]);
        self.mutate(events, |s| s.transaction(|s| market::make_offer(s, pid, amount, exp)))
    }

    pub fn cancel_negotiation(&self, pid: u32) -> Result<()> {
        let events = EventSet::of([UpdateEvent::PlayerMovement]);
        self.mutate(events, |s| s.transaction(|s| market::cancel_negotiation(s, pid)))
    }

    pub fn release_player(&self, pid: u32) -> Result<()> {
        let events = EventSet::of([UpdateEvent::PlayerMovement]);
        self.mutate(events, |s| s.transaction(|s| market::release_player(s, pid)))
    }

    pub fn toggle_watch(&self, pid: u32) -> Result<bool> {
        self.mutate(EventSet::of([UpdateEvent::Watch]), |s| {
            let mut watched = None;
            s.store.update::<crate::models::Player>(&pid, |p| {
                p.watch = !p.watch;
                watched = Some(p.watch);
            });
            watched.ok_or_else(|| LeagueError::NotFound(format!("player {}", pid)))
        })
    }

    // ========================
    // Draft
    // ========================

    pub fn draft_player(&self, pid: u32) -> Result<()> {
        let events = EventSet::of([UpdateEvent::PlayerMovement]);
        self.mutate(events, |s| s.transaction(|s| phase::select_player(s, pid)))
    }

    /// Lets AI teams pick until the user is on the clock or the draft is over.
    pub fn draft_until_user_or_end(&self) -> Result<Vec<u32>> {
        let events = EventSet::of([UpdateEvent::PlayerMovement]);
        self.mutate(events, |s| s.transaction(phase::until_user_or_end))
    }

    /// Auto-picks every remaining slot, the user's included.
    pub fn draft_until_end(&self) -> Result<Vec<u32>> {
        let events = EventSet::of([UpdateEvent::PlayerMovement]);
        self.mutate(events, |s| s.transaction(phase::until_end))
    }

    // ========================
    // Export
    // ========================

    pub fn export(&self, selection: &ExportSelection) -> Result<ExportArtifact> {
        if let Some(message) = selection.validate() {
            warn!(reason = message, "export selection adjusted");
        }
        export_league(&self.read_guard(), selection)
    }

    // ========================
    // Views
    // ========================

    /// Registers the view with route `name` and loads it.
    pub fn register_view(&self, name: &str, params: &ViewParams) -> Result<ViewId> {
        let view = views::by_name(name)?;
        let state = self.read_guard();
        self.dispatcher.lock().expect("dispatcher lock poisoned").register_boxed(view, params, &state)
    }

    pub fn register<V: View>(&self, view: V, params: &ViewParams) -> Result<ViewId> {
        let state = self.read_guard();
        self.dispatcher.lock().expect("dispatcher lock poisoned").register(view, params, &state)
    }

    pub fn unregister_view(&self, id: ViewId) -> bool {
        self.dispatcher.lock().expect("dispatcher lock poisoned").unregister(id)
    }

    /// Changes a view's parameters, reloading it when its input changed.
    pub fn set_view_params(&self, id: ViewId, params: &ViewParams) -> Result<Option<ViewUpdate>> {
        let state = self.read_guard();
        self.dispatcher.lock().expect("dispatcher lock poisoned").set_params(id, params, &state)
    }

    pub fn view_output(&self, id: ViewId) -> Option<Value> {
        self.dispatcher.lock().expect("dispatcher lock poisoned").output(id).cloned()
    }

    /// Calls `listener` with every view update delivered from now on.
    pub fn subscribe(&self, listener: impl Fn(&ViewUpdate) + Send + Sync + 'static) {
        self.listeners.lock().expect("listener lock poisoned").push(Box::new(listener));
    }
}
