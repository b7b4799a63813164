//! Loading the top-level pack list.

use crate::cancel::CancelToken;
use crate::defaults::CATALOG_PATH;
use crate::error::CatalogError;
use crate::fetch::Fetcher;
use crate::model::PackConfig;
use log::{info, warn};
use serde_json::Value;

/// Fetch and parse `packs/packs.json`. No retry; any failure is final.
///
/// The body must be a JSON array. Entries that do not decode as a pack
/// config are skipped with a warning.
pub async fn load_catalog<F: Fetcher>(fetcher: &F) -> Result<Vec<PackConfig>, CatalogError> {
    let body = fetcher.get_text(CATALOG_PATH, &CancelToken::new()).await?;
    let entries: Vec<Value> = serde_json::from_str(&body)?;
    let packs: Vec<PackConfig> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(pack) => Some(pack),
            Err(e) => {
                warn!("Skipping pack list entry {}: {}", i, e);
                None
            }
        })
        .collect();
    info!("Loaded {} pack configs from {}", packs.len(), CATALOG_PATH);
    Ok(packs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::fetch::MemoryFetcher;
    use futures::executor::block_on;

    #[test]
    fn parses_pack_configs() {
        let fetcher = MemoryFetcher::new().with(
            CATALOG_PATH,
            r#"[
                {"id":"std","folder":"standard","nameForCheckbox":"标准包","description":"基础武将"},
                {"id":"sp","folder":"sp"}
            ]"#,
        );
        let packs = block_on(load_catalog(&fetcher)).unwrap();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].label(), "标准包");
        assert_eq!(packs[0].description(), Some("基础武将"));
        assert_eq!(packs[1].label(), "sp");
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let fetcher = MemoryFetcher::new().with(
            CATALOG_PATH,
            r#"[{"folder":"no-id"}, 7, {"id":"std","folder":"standard"}, {"id":3}]"#,
        );
        let packs = block_on(load_catalog(&fetcher)).unwrap();
        let ids: Vec<_> = packs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["std"]);
    }

    #[test]
    fn missing_catalog_is_a_fetch_error() {
        let err = block_on(load_catalog(&MemoryFetcher::new())).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Fetch(FetchError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn non_array_catalog_is_a_parse_error() {
        let fetcher = MemoryFetcher::new().with(CATALOG_PATH, r#"{"id":"std"}"#);
        let err = block_on(load_catalog(&fetcher)).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
