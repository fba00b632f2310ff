use std::sync::Arc;

use bldg_common::{AdminLevel, CountryCode};
use bldg_config::{BOUNDARY_NAME_COLUMN, GADM_ARCHIVE_DIR};
use bldg_object_storage::http_object_store;
use object_store::{path::Path, ObjectStore};

mod archive;
pub mod collection;
pub mod error;

pub use collection::{BoundaryCollection, GEOMETRY_COLUMN};
pub use error::BoundaryError;

/// Path of the GADM 4.1 archive for one country and level, relative to the endpoint root.
pub fn gadm_archive_path(country: &CountryCode, level: AdminLevel) -> String {
    format!("{}/gadm41_{}_{}.json.zip", GADM_ARCHIVE_DIR, country, level)
}

/// Full URL of the GADM 4.1 archive for one country and level under `base_url`.
pub fn gadm_url(base_url: &str, country: &CountryCode, level: AdminLevel) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        gadm_archive_path(country, level)
    )
}

/// Endpoint serving boundary archives.
#[derive(Debug, Clone)]
pub struct BoundarySource {
    base_url: String,
    store: Arc<dyn ObjectStore>,
}

impl BoundarySource {
    /// `store` must resolve archive paths relative to `base_url`.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            base_url: base_url.into(),
            store,
        }
    }

    /// The public GADM mirror at `BLDG_GADM_BASE_URL`.
    pub fn gadm() -> Result<Self, BoundaryError> {
        let base_url = &bldg_config::CONFIG.gadm_base_url;
        Ok(Self::new(base_url.clone(), http_object_store(base_url)?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch(
        &self,
        country: &CountryCode,
        level: AdminLevel,
    ) -> Result<BoundaryCollection, BoundaryError> {
        fetch_boundaries(self, country, level).await
    }
}

/// Download the boundaries of `country` at `level` and rename `NAME_<level>` to `Parish`.
///
/// Whether GADM publishes `level` for `country` is not checked; an unknown
/// combination surfaces as a not-found storage error.
pub async fn fetch_boundaries(
    source: &BoundarySource,
    country: &CountryCode,
    level: AdminLevel,
) -> Result<BoundaryCollection, BoundaryError> {
    let location = Path::from(gadm_archive_path(country, level));
    tracing::info!(
        %country,
        %level,
        "Fetching boundaries from {}",
        gadm_url(&source.base_url, country, level)
    );

    let payload = source.store.get(&location).await?.bytes().await?;
    let feature_collection =
        tokio::task::spawn_blocking(move || archive::read_feature_collection(&payload)).await??;

    let mut boundaries = BoundaryCollection::from(feature_collection);
    boundaries.rename_column(&level.name_column(), BOUNDARY_NAME_COLUMN)?;

    tracing::info!(%country, %level, "Loaded {} boundaries", boundaries.len());
    Ok(boundaries)
}
