//! Card-draw core: pack catalog, pool building, random draws and the view
//! state machine. The Yew front end in `main.rs` is a thin shell over this.

/// Default paths and input values
pub mod defaults {
    pub const CATALOG_PATH: &str = "packs/packs.json";
    pub const PACKS_ROOT: &str = "packs";
    pub const MANIFEST_FILE: &str = "_packinfo.json";
    pub const DEFAULT_DRAW_COUNT: usize = 5;
}

pub mod cancel;
pub mod catalog;
pub mod debounce;
pub mod display;
pub mod draw;
pub mod error;
pub mod fetch;
pub mod model;
pub mod pool;
pub mod state;

pub use cancel::CancelToken;
pub use catalog::load_catalog;
pub use debounce::DebounceSlot;
pub use error::{BuildError, CatalogError, DrawError, FetchError, PayloadError};
pub use fetch::{Fetcher, HttpFetcher, MemoryFetcher};
pub use model::{Card, Manifest, ManifestFile, PackConfig, Pool, Skill};
pub use pool::{BuildOutcome, PoolBuilder};
pub use state::{Action, AppState, CatalogStatus, PoolStatus, View};
