//! League settings.
//!
//! Every field has a default so partial YAML/JSON files are accepted. Amounts
//! are in thousands of dollars.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LeagueError, Result};

pub const MAX_PLAYOFF_ROUNDS: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueSettings {
    pub num_teams: u32,
    pub num_games: u32,
    /// Wins needed per round is `(games + 1) / 2`; the length is the number
    /// of playoff rounds.
    pub num_games_playoff_series: Vec<u8>,
    pub min_roster: usize,
    pub max_roster: usize,
    pub salary_cap: u32,
    pub min_payroll: u32,
    pub luxury_payroll: u32,
    pub min_contract: u32,
    pub max_contract: u32,
    pub draft_rounds: u8,
    pub draft_class_size: usize,
    /// Fraction of the regular season after which trades close; `None` means
    /// the league has no trade deadline.
    pub trade_deadline: Option<f64>,
    /// Seasons of future draft picks kept in circulation.
    pub future_pick_seasons: u16,
    pub rookie_contract_years: u16,
    pub product_prefix: String,
    pub max_feats_per_game: usize,
    pub injury_rate: f64,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            num_teams: 30,
            num_games: 82,
            num_games_playoff_series: vec![7, 7, 7, 7],
            min_roster: 13,
            max_roster: 15,
            salary_cap: 90_000,
            min_payroll: 60_000,
            luxury_payroll: 100_000,
            min_contract: 750,
            max_contract: 30_000,
            draft_rounds: 2,
            draft_class_size: 70,
            trade_deadline: Some(0.6),
            future_pick_seasons: 4,
            rookie_contract_years: 3,
            product_prefix: "Basketball GM".to_string(),
            max_feats_per_game: 4,
            injury_rate: 0.000_25,
        }
    }
}

impl LeagueSettings {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let settings: LeagueSettings = serde_yaml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let settings: LeagueSettings =
            serde_json::from_str(s).map_err(|e| LeagueError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LeagueError::InvalidSettings(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    pub fn num_playoff_rounds(&self) -> u8 {
        u8::try_from(self.num_games_playoff_series.len()).unwrap_or(u8::MAX)
    }

    /// Saturates at `u32::MAX` when the bracket is too deep to fill.
    pub fn num_playoff_teams(&self) -> u32 {
        u32::try_from(self.num_games_playoff_series.len())
            .ok()
            .and_then(|rounds| 1u32.checked_shl(rounds))
            .unwrap_or(u32::MAX)
    }

    pub fn games_to_win(&self, round: usize) -> u8 {
        let games = self.num_games_playoff_series.get(round).copied().unwrap_or(7);
        games / 2 + 1
    }

    /// Games per team after which the trade deadline passes.
    pub fn trade_deadline_games(&self) -> Option<u32> {
        self.trade_deadline.map(|f| (f * self.num_games as f64).round() as u32)
    }

    pub fn validate(&self) -> Result<()> {
        let err = |msg: String| Err(LeagueError::InvalidSettings(msg));
        if self.num_teams < 2 {
            return err(format!("num_teams must be at least 2, got {}", self.num_teams));
        }
        if self.num_games == 0 {
            return err("num_games must be positive".into());
        }
        if self.num_games_playoff_series.is_empty() {
            return err("at least one playoff round is required".into());
        }
        if self.num_games_playoff_series.len() > MAX_PLAYOFF_ROUNDS {
            return err(format!(
                "at most {} playoff rounds are supported, got {}",
                MAX_PLAYOFF_ROUNDS,
                self.num_games_playoff_series.len()
            ));
        }
        if self.num_games_playoff_series.iter().any(|&g| g == 0 || g % 2 == 0) {
            return err("playoff series lengths must be odd".into());
        }
        if self.num_playoff_teams() > self.num_teams {
            return err(format!(
                "{} playoff rounds need {} teams, league has {}",
                self.num_playoff_rounds(),
                self.num_playoff_teams(),
                self.num_teams
            ));
        }
        if self.min_roster == 0 || self.min_roster > self.max_roster {
            return err(format!(
                "roster limits [{}, {}] are inconsistent",
                self.min_roster, self.max_roster
            ));
        }
        if self.min_contract == 0 || self.min_contract > self.max_contract {
            return err(format!(
                "contract limits [{}, {}] are inconsistent",
                self.min_contract, self.max_contract
            ));
        }
        if self.min_payroll > self.salary_cap || self.salary_cap > self.luxury_payroll {
            return err("expected min_payroll <= salary_cap <= luxury_payroll".into());
        }
        if self.draft_rounds == 0 {
            return err("draft_rounds must be positive".into());
        }
        if self.draft_class_size < (self.draft_rounds as usize) * (self.num_teams as usize) / 2 {
            return err("draft_class_size is too small for the number of picks".into());
        }
        if let Some(f) = self.trade_deadline {
            if !(0.0..1.0).contains(&f) || f.is_nan() {
                return err(format!("trade_deadline must be in [0, 1), got {}", f));
            }
        }
        if self.future_pick_seasons == 0 || self.rookie_contract_years == 0 {
            return err("future_pick_seasons and rookie_contract_years must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = LeagueSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.num_playoff_teams(), 16);
        assert_eq!(settings.games_to_win(0), 4);
        assert_eq!(settings.trade_deadline_games(), Some(49));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings = LeagueSettings::from_yaml_str(
            "num_teams: 4\nnum_games: 6\nnum_games_playoff_series: [3]\ntrade_deadline: null\n",
        )
        .unwrap();
        assert_eq!(settings.num_teams, 4);
        assert_eq!(settings.salary_cap, 90_000);
        assert_eq!(settings.trade_deadline, None);
    }

    #[test]
    fn test_rejects_too_many_playoff_rounds() {
        let result = LeagueSettings::from_json_str(r#"{"num_teams": 4}"#);
        assert!(matches!(result, Err(LeagueError::InvalidSettings(_))));
    }

    #[test]
    fn test_deep_bracket_does_not_overflow() {
        let mut settings = LeagueSettings::default();
        settings.num_games_playoff_series = vec![1; 40];
        assert_eq!(settings.num_playoff_teams(), u32::MAX);
        assert!(matches!(settings.validate(), Err(LeagueError::InvalidSettings(_))));

        settings.num_games_playoff_series = vec![1; 31];
        settings.num_teams = 64;
        assert_eq!(settings.num_playoff_teams(), 1 << 31);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_even_series() {
        let mut settings = LeagueSettings::default();
        settings.num_games_playoff_series = vec![7, 6];
        assert!(settings.validate().is_err());
    }
}
