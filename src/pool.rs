//! Building the card pool from the selected packs.
//!
//! Packs are processed strictly in selection order. Within a pack every data
//! file listed in the manifest is fetched concurrently and the results are
//! joined before moving on. Pack- and file-level failures are logged and
//! skipped; only cancellation or a broken fetch environment aborts a build.

use crate::cancel::CancelToken;
use crate::defaults::{MANIFEST_FILE, PACKS_ROOT};
use crate::error::{BuildError, FetchError, PayloadError};
use crate::fetch::Fetcher;
use crate::model::{Card, Manifest, ManifestFile, PackConfig, Pool};
use futures::future::join_all;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::cell::RefCell;

/// Result of one [`PoolBuilder::build`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// Nothing was selected; no request was made.
    EmptySelection,
    /// The build ran to completion. The pool may be empty if every pack failed.
    Built(Pool),
    /// Superseded by a newer build or cancelled on request.
    Cancelled,
    /// Aborted by an unexpected error.
    Failed(String),
}

pub fn manifest_path(folder: &str) -> String {
    format!("{}/{}/{}", PACKS_ROOT, folder, MANIFEST_FILE)
}

pub fn data_path(folder: &str, file: &str) -> String {
    format!("{}/{}/{}", PACKS_ROOT, folder, file)
}

/// Parse a data file body and tag every card with its pack names.
///
/// The body must be a JSON array. Elements that are not objects are dropped
/// silently; objects that do not decode as a card are dropped with a warning.
pub fn parse_cards(body: &str, parent: &str, sub: &str) -> Result<Vec<Card>, PayloadError> {
    let Value::Array(items) = serde_json::from_str::<Value>(body)? else {
        return Err(PayloadError::NotAnArray);
    };
    let cards = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| match serde_json::from_value::<Card>(item) {
            Ok(card) => Some(card.tagged(parent, sub)),
            Err(e) => {
                warn!("Skipping malformed card record in {}: {}", parent, e);
                None
            }
        })
        .collect();
    Ok(cards)
}

/// How a single fetch step ended when it did not produce a body.
enum StepError {
    /// Stop the whole build.
    Abort(BuildError),
    /// Skip this pack or file.
    Skip(String),
}

async fn fetch_text<F: Fetcher>(
    fetcher: &F,
    path: &str,
    token: &CancelToken,
) -> Result<String, StepError> {
    match token.guard(fetcher.get_text(path, token)).await {
        Err(cancelled) => Err(StepError::Abort(cancelled)),
        Ok(Ok(body)) => Ok(body),
        Ok(Err(FetchError::Aborted)) => Err(StepError::Abort(BuildError::Cancelled)),
        Ok(Err(FetchError::Environment(msg))) => {
            Err(StepError::Abort(BuildError::Environment(msg)))
        }
        Ok(Err(other)) => Err(StepError::Skip(other.to_string())),
    }
}

async fn load_data_file<F: Fetcher>(
    fetcher: &F,
    folder: &str,
    entry: &ManifestFile,
    parent: &str,
    token: &CancelToken,
) -> Result<Option<Vec<Card>>, BuildError> {
    let Some(file) = entry.path() else {
        return Ok(None);
    };
    let path = data_path(folder, file);
    let body = match fetch_text(fetcher, &path, token).await {
        Ok(body) => body,
        Err(StepError::Abort(e)) => return Err(e),
        Err(StepError::Skip(reason)) => {
            error!("Error loading data file {}: {}", path, reason);
            return Ok(None);
        }
    };
    match parse_cards(&body, parent, entry.sub_pack()) {
        Ok(cards) => {
            debug!("{}: {} cards", path, cards.len());
            Ok(Some(cards))
        }
        Err(e) => {
            warn!("Data file {} rejected: {}", path, e);
            Ok(None)
        }
    }
}

async fn collect_pool<F: Fetcher>(
    fetcher: &F,
    catalog: &[PackConfig],
    selected: &[String],
    token: &CancelToken,
) -> Result<Pool, BuildError> {
    let mut pool = Pool::default();

    for pack_id in selected {
        token.check()?;

        let Some(config) = catalog.iter().find(|p| &p.id == pack_id) else {
            warn!("Skipping pack {}: not in the pack list", pack_id);
            continue;
        };
        let Some(folder) = config.folder() else {
            warn!("Skipping pack {}: no folder configured", pack_id);
            continue;
        };

        let path = manifest_path(folder);
        let manifest = match fetch_text(fetcher, &path, token).await {
            Ok(body) => serde_json::from_str::<Manifest>(&body).map_err(|e| e.to_string()),
            Err(StepError::Abort(e)) => return Err(e),
            Err(StepError::Skip(reason)) => Err(reason),
        };
        let manifest = match manifest {
            Ok(manifest) => manifest,
            Err(reason) => {
                error!("Failed to load manifest {}: {}. Skipping pack.", path, reason);
                continue;
            }
        };

        token.check()?;

        let parent = manifest
            .display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| config.label())
            .to_string();
        if !pool.packs.contains(&parent) {
            pool.packs.push(parent.clone());
        }

        if manifest.files.is_empty() {
            warn!("Manifest {} lists no data files", path);
            continue;
        }

        let results = join_all(
            manifest
                .files
                .iter()
                .map(|entry| load_data_file(fetcher, folder, entry, &parent, token)),
        )
        .await;

        token.check()?;

        for result in results {
            if let Some(cards) = result? {
                pool.cards.extend(cards);
            }
        }
    }

    Ok(pool)
}

/// Runs pool builds, keeping at most one in flight.
///
/// Starting a build cancels the previous one first, so a superseded build
/// ends as [`BuildOutcome::Cancelled`] and its cards never escape.
pub struct PoolBuilder<F> {
    fetcher: F,
    active: RefCell<Option<CancelToken>>,
}

impl<F: Fetcher> PoolBuilder<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            active: RefCell::new(None),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn is_building(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Cancel the outstanding build, if any. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        let active = self.active.borrow_mut().take();
        match active {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn begin(&self) -> CancelToken {
        let token = CancelToken::new();
        let previous = self.active.borrow_mut().replace(token.clone());
        if let Some(previous) = previous {
            debug!("Cancelling superseded pool build");
            previous.cancel();
        }
        token
    }

    fn finish(&self, token: &CancelToken) {
        let mut active = self.active.borrow_mut();
        if active.as_ref().is_some_and(|t| t.same_as(token)) {
            *active = None;
        }
    }

    /// Build a fresh pool from `selected` pack ids, looked up in `catalog`.
    pub async fn build(&self, catalog: &[PackConfig], selected: &[String]) -> BuildOutcome {
        let token = self.begin();

        let outcome = if selected.is_empty() {
            info!("No packs selected; pool left empty");
            BuildOutcome::EmptySelection
        } else {
            match collect_pool(&self.fetcher, catalog, selected, &token).await {
                Ok(pool) => {
                    info!(
                        "Pool built: {} cards from {} pack(s)",
                        pool.len(),
                        pool.packs.len()
                    );
                    BuildOutcome::Built(pool)
                }
                Err(BuildError::Cancelled) => {
                    info!("Pool build cancelled");
                    BuildOutcome::Cancelled
                }
                Err(e) => {
                    error!("Pool build failed: {}", e);
                    BuildOutcome::Failed(e.to_string())
                }
            }
        };

        self.finish(&token);
        outcome
    }
}
