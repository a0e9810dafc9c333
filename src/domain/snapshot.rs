//! Serialized form of a [`Board`] and the validation applied when reading
//! one back from untrusted storage.

use crate::{
    domain::board::Board,
    error::{Result, TierError},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tier as stored: its name and item labels in rank order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSnapshot {
    pub name: String,
    pub items: Vec<String>,
}

/// Persisted board shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub title: String,
    pub tiers: Vec<TierSnapshot>,
    pub pool: Vec<String>,
}

impl Snapshot {
    /// Parses stored JSON, checking its shape before anything is built.
    ///
    /// `tiers` must be present and a list. A missing or non-string title
    /// becomes empty, a non-list `pool` or tier `items` is treated as empty,
    /// and a tier with a non-string name gets an empty name. Any non-string
    /// label fails the whole snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid("snapshot is not an object"))?;

        let tiers = match object.get("tiers") {
            None | Some(Value::Null) => return Err(invalid("missing tiers")),
            Some(Value::Array(tiers)) => tiers,
            Some(_) => return Err(invalid("tiers is not a list")),
        };

        let tiers = tiers
            .iter()
            .map(|tier| -> Result<TierSnapshot> {
                let tier = tier
                    .as_object()
                    .ok_or_else(|| invalid("tier entry is not an object"))?;
                Ok(TierSnapshot {
                    name: tier
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    items: labels(tier.get("items"))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: object
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            tiers,
            pool: labels(object.get("pool"))?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn labels(value: Option<&Value>) -> Result<Vec<String>> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("item label is not a string"))
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

fn invalid(reason: &str) -> TierError {
    TierError::InvalidSnapshot(reason.to_string())
}

/// Captures the board's title, tier order and item order
pub fn serialize(board: &Board) -> Snapshot {
    Snapshot {
        title: board.title().to_string(),
        tiers: board
            .tiers()
            .iter()
            .map(|tier| TierSnapshot {
                name: tier.name().to_string(),
                items: tier
                    .items()
                    .iter()
                    .map(|item| item.label().to_string())
                    .collect(),
            })
            .collect(),
        pool: board
            .pool()
            .iter()
            .map(|item| item.label().to_string())
            .collect(),
    }
}

/// Builds a fresh board from a snapshot.
///
/// Fails without building anything if the snapshot has no tiers. Blank
/// labels are dropped and a blank title becomes `default_title`.
pub fn restore(snapshot: &Snapshot, default_title: &str) -> Result<Board> {
    if snapshot.tiers.is_empty() {
        return Err(invalid("snapshot has no tiers"));
    }

    let title = match snapshot.title.trim() {
        "" => default_title.to_string(),
        title => title.to_string(),
    };
    let tiers = snapshot
        .tiers
        .iter()
        .map(|tier| (tier.name.trim().to_string(), tier.items.clone()))
        .collect();

    Ok(Board::from_parts(title, tiers, snapshot.pool.clone()))
}
