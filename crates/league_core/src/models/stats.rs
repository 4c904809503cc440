use serde::{Deserialize, Serialize};

/// Counting stats shared by player rows, team rows, box scores and feats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct StatLine {
    pub gp: u32,
    pub gs: u32,
    pub min: f64,
    pub fg: u32,
    pub fga: u32,
    pub tp: u32,
    pub tpa: u32,
    pub ft: u32,
    pub fta: u32,
    pub orb: u32,
    pub drb: u32,
    pub ast: u32,
    pub tov: u32,
    pub stl: u32,
    pub blk: u32,
    pub pf: u32,
    pub pts: u32,
}

impl StatLine {
    pub fn add(&mut self, other: &StatLine) {
        self.gp += other.gp;
        self.gs += other.gs;
        self.min += other.min;
        self.fg += other.fg;
        self.fga += other.fga;
        self.tp += other.tp;
        self.tpa += other.tpa;
        self.ft += other.ft;
        self.fta += other.fta;
        self.orb += other.orb;
        self.drb += other.drb;
        self.ast += other.ast;
        self.tov += other.tov;
        self.stl += other.stl;
        self.blk += other.blk;
        self.pf += other.pf;
        self.pts += other.pts;
    }

    pub fn trb(&self) -> u32 {
        self.orb + self.drb
    }

    /// Number of categories (pts, trb, ast, stl, blk) in double figures.
    pub fn double_digit_categories(&self) -> usize {
        [self.pts, self.trb(), self.ast, self.stl, self.blk].iter().filter(|&&v| v >= 10).count()
    }
}

/// One player's accumulated line for a (season, playoffs) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerStatsRow {
    pub psid: u32,
    pub pid: u32,
    /// Team the player most recently appeared for in this season.
    pub tid: u32,
    pub season: u16,
    pub playoffs: bool,
    pub line: StatLine,
}

/// Percentage of makes over attempts; zero when there were no attempts.
pub fn pct(makes: u32, attempts: u32) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    (100.0 * makes as f64 / attempts as f64).clamp(0.0, 100.0)
}
