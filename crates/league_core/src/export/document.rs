use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::selection::ExportSelection;
use crate::context::LeagueContext;
use crate::error::{LeagueError, Result};
use crate::models::GameAttribute;
use crate::state::LeagueState;
use crate::store::{Collection, EntityStore};

/// Header of an export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    pub name: String,
    #[serde(default)]
    pub season: Option<u16>,
}

/// A league (or part of one) as a JSON document:
/// `{ "meta": {...}, "<collection>": [ ... ], ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub meta: ExportMeta,
    pub collections: Vec<(Collection, Vec<Value>)>,
}

impl ExportDocument {
    pub fn build(state: &LeagueState, selection: &ExportSelection, exported_at: DateTime<Utc>) -> Result<Self> {
        let collections = selection
            .exported()
            .into_iter()
            .map(|c| Ok((c, state.store.collection_to_json(c)?)))
            .collect::<Result<Vec<_>>>()?;
        debug!(league = %state.ctx.name, collections = collections.len(), "built export document");
        Ok(Self {
            meta: ExportMeta { exported_at: Some(exported_at), name: state.ctx.name.clone(), season: Some(state.ctx.season) },
            collections,
        })
    }

    pub fn collection(&self, collection: Collection) -> Option<&[Value]> {
        self.collections.iter().find(|(c, _)| *c == collection).map(|(_, rows)| rows.as_slice())
    }

    pub fn to_value(&self) -> Result<Value> {
        let mut doc = BTreeMap::new();
        doc.insert("meta".to_string(), serde_json::to_value(&self.meta)?);
        for (collection, rows) in &self.collections {
            doc.insert(collection.name().to_string(), Value::Array(rows.clone()));
        }
        Ok(Value::Object(doc.into_iter().collect::<Map<String, Value>>()))
    }

    /// Pretty-printed with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(contents)?;
        let Value::Object(mut doc) = value else {
            return Err(LeagueError::Serialization("export document must be a JSON object".into()));
        };
        let meta = match doc.remove("meta") {
            Some(meta) => serde_json::from_value(meta)?,
            None => return Err(LeagueError::Serialization("export document has no meta".into())),
        };
        let mut collections = Vec::with_capacity(doc.len());
        for (key, rows) in doc {
            let collection: Collection = key.parse()?;
            let Value::Array(rows) = rows else {
                return Err(LeagueError::Serialization(format!("{} must be an array", key)));
            };
            collections.push((collection, rows));
        }
        Ok(Self { meta, collections })
    }
}

/// `"<product prefix> - <league name>.json"`.
pub fn file_name(product_prefix: &str, league_name: &str) -> String {
    format!("{} - {}.json", product_prefix, league_name)
}

/// Loads every collection of `doc` into `store`, replacing what was there.
pub fn import_collections(store: &mut EntityStore, doc: ExportDocument) -> Result<Vec<Collection>> {
    let mut imported = Vec::with_capacity(doc.collections.len());
    for (collection, rows) in doc.collections {
        store.collection_from_json(collection, rows)?;
        imported.push(collection);
    }
    Ok(imported)
}

/// Rebuilds a whole league from an export that includes `gameAttributes`.
pub fn import_league(contents: &str) -> Result<LeagueState> {
    let doc = ExportDocument::from_json(contents)?;
    if doc.collection(Collection::GameAttributes).is_none() {
        return Err(LeagueError::NotFound("gameAttributes in export document".into()));
    }
    let name = doc.meta.name.clone();
    let mut store = EntityStore::new();
    let imported = import_collections(&mut store, doc)?;
    let ctx = LeagueContext::from_attributes(store.get_all::<GameAttribute>())?;
    info!(league = %name, collections = imported.len(), season = ctx.season, "imported league");
    Ok(LeagueState::new(ctx, store))
}
