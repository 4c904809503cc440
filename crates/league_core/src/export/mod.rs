//! League export and import as named-collection JSON documents.

pub mod artifact;
pub mod document;
pub mod selection;


pub use artifact::{ArtifactFetch, ExportArtifact, EXPIRED_MESSAGE, EXPORT_TTL};
pub use document::{file_name, import_collections, import_league, ExportDocument, ExportMeta};
pub use selection::{ExportSelection, STATS_WITHOUT_PLAYERS};

use chrono::Utc;
use tracing::info;

use crate::error::Result;
use crate::state::LeagueState;

/// Renders `selection` of `state` into a downloadable artifact.
pub fn export_league(state: &LeagueState, selection: &ExportSelection) -> Result<ExportArtifact> {
    let doc = ExportDocument::build(state, selection, Utc::now())?;
    let contents = doc.to_json()?;
    let name = file_name(&state.ctx.settings.product_prefix, &state.ctx.name);
    info!(file = %name, bytes = contents.len(), "league exported");
    Ok(ExportArtifact::new(name, contents))
}
