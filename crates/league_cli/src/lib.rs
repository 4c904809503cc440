//! League CLI library
//!
//! Each command opens a league file, runs one operation through the league
//! service and saves the result.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use league_core::export::ArtifactFetch;
use league_core::persist::LeagueFileInfo;
use league_core::{ExportSelection, League, LeagueSettings, NewLeague, Phase, SaveManager, ViewParams};

/// Options for `new`.
#[derive(Debug, Clone)]
pub struct NewLeagueArgs {
    pub name: String,
    pub season: u16,
    pub user_tid: u32,
    pub seed: u64,
    pub settings: Option<PathBuf>,
}

/// Accepts a phase code (`3`) or name (`playoffs`, `regular-season`).
pub fn parse_phase(raw: &str) -> Result<Phase> {
    if let Ok(code) = raw.parse::<i8>() {
        return Phase::from_code(code).with_context(|| format!("no phase with code {}", code));
    }
    let wanted = raw.to_ascii_lowercase().replace(['-', '_'], " ");
    Phase::ALL
        .iter()
        .copied()
        .find(|p| p.name().replace('-', " ") == wanted)
        .with_context(|| format!("unknown phase {:?}", raw))
}

/// Parses `key=value` view parameters.
pub fn parse_params(pairs: &[String]) -> Result<ViewParams> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => Ok((k.to_string(), v.to_string())),
            None => bail!("view parameter {:?} is not key=value", pair),
        })
        .collect()
}

/// Creates a league file and returns its id.
pub fn new_league(saves: &SaveManager, args: &NewLeagueArgs) -> Result<u32> {
    let settings = match &args.settings {
        Some(path) => LeagueSettings::from_path(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => LeagueSettings::default(),
    };
    let lid = saves.next_lid();
    let league = League::create(&NewLeague {
        lid,
        name: args.name.clone(),
        season: args.season,
        user_tid: args.user_tid,
        seed: args.seed,
        settings,
    })?
    .with_saves(saves.clone());
    league.save()?;
    Ok(lid)
}

fn open(saves: &SaveManager, lid: u32) -> Result<League> {
    League::open(saves.clone(), lid).with_context(|| format!("Failed to open league {}", lid))
}

/// Moves league `lid` to `to`, or to the next phase. Returns the new phase.
pub fn advance(saves: &SaveManager, lid: u32, to: Option<Phase>) -> Result<Phase> {
    let league = open(saves, lid)?;
    match to {
        Some(phase) => league.advance(phase)?,
        None => league.advance_to_next()?,
    };
    let phase = league.context().phase;
    league.close()?;
    Ok(phase)
}

/// Plays `days` days, or the rest of the phase. Returns the days played.
pub fn sim(saves: &SaveManager, lid: u32, days: Option<u32>) -> Result<u32> {
    let league = open(saves, lid)?;
    let played = league.play_days(days)?;
    league.close()?;
    Ok(played)
}

/// Writes an export of `collections` (all when empty) into `out_dir`.
pub fn export(saves: &SaveManager, lid: u32, collections: &[String], out_dir: &Path) -> Result<PathBuf> {
    let selection = if collections.is_empty() { ExportSelection::all() } else { ExportSelection::parse(collections)? };
    if let Some(message) = selection.validate() {
        eprintln!("{}", message);
    }
    let league = open(saves, lid)?;
    let mut artifact = league.export(&selection)?;
    let (file_name, contents) = match artifact.fetch() {
        ArtifactFetch::Ready { file_name, contents } => (file_name.to_string(), contents.to_string()),
        ArtifactFetch::Expired(message) => bail!("{}", message),
    };
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
    let path = out_dir.join(file_name);
    fs::write(&path, contents).with_context(|| format!("Failed to write export: {}", path.display()))?;
    Ok(path)
}

/// Loads one view and returns its JSON view model.
pub fn show(saves: &SaveManager, lid: u32, view: &str, params: &ViewParams) -> Result<serde_json::Value> {
    let league = open(saves, lid)?;
    let id = league.register_view(view, params)?;
    league.view_output(id).with_context(|| format!("view {} produced no output", view))
}

pub fn list(saves: &SaveManager) -> Vec<LeagueFileInfo> {
    saves.list()
}
