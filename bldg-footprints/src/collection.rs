//! Lazy handle over the cached footprint files of one country.
//!
//! Construction only records a glob and a block size. Files are resolved, and
//! Parquet footers read, when a table provider or data frame is requested, so
//! the handle always reflects what is on disk at that moment.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use bldg_common::CountryCode;
use datafusion::{
    catalog::TableProvider,
    datasource::{
        file_format::parquet::ParquetFormat,
        listing::{ListingOptions, ListingTable, ListingTableConfig, ListingTableUrl},
    },
    execution::SessionState,
    prelude::{DataFrame, SessionConfig, SessionContext},
};

use crate::{block_size::BlockSize, error::FootprintError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootprintCollection {
    pattern: String,
    block_size: BlockSize,
}

impl FootprintCollection {
    /// Handle over `<local_dir>/<country>*.parquet`.
    pub fn new(local_dir: &Path, country: &CountryCode, block_size: BlockSize) -> Self {
        let pattern = local_dir
            .join(format!("{}*.parquet", country))
            .to_string_lossy()
            .into_owned();
        Self {
            pattern,
            block_size,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn block_size(&self) -> BlockSize {
        self.block_size
    }

    /// Files currently matching the pattern, sorted.
    pub fn files(&self) -> Result<Vec<PathBuf>, FootprintError> {
        let mut files: Vec<PathBuf> = glob::glob(&self.pattern)?
            .filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Skipping unreadable cache entry: {}", e);
                    None
                }
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Total size in bytes of the files currently matching the pattern.
    pub async fn total_bytes(&self) -> Result<u64, FootprintError> {
        let mut total = 0;
        for file in self.files()? {
            total += tokio::fs::metadata(&file).await?.len();
        }
        Ok(total)
    }

    /// Number of scan partitions for `total_bytes` of input: one per started block.
    pub fn partition_count(&self, total_bytes: u64) -> usize {
        let blocks = total_bytes.div_ceil(self.block_size.bytes().max(1)).max(1);
        usize::try_from(blocks).unwrap_or(usize::MAX)
    }

    /// Session settings that split file scans into partitions of at most the block size.
    pub async fn session_config(&self) -> Result<SessionConfig, FootprintError> {
        let total_bytes = self.total_bytes().await?;
        let partitions = self.partition_count(total_bytes);
        tracing::debug!(
            total_bytes,
            block_size = %self.block_size,
            "Scanning footprints in {} partition(s)",
            partitions
        );
        Ok(SessionConfig::new()
            .with_target_partitions(partitions)
            .with_repartition_file_scans(true)
            .with_repartition_file_min_size(self.block_size.as_usize()))
    }

    pub async fn session(&self) -> Result<SessionContext, FootprintError> {
        Ok(SessionContext::new_with_config(self.session_config().await?))
    }

    pub fn table_url(&self) -> Result<ListingTableUrl, FootprintError> {
        Ok(ListingTableUrl::parse(&self.pattern)?)
    }

    /// Listing table over the matching files. Only Parquet footers are read here;
    /// no spatial partition metadata is gathered.
    pub async fn table_provider(
        &self,
        state: &SessionState,
    ) -> Result<Arc<dyn TableProvider>, FootprintError> {
        let table_url = self.table_url()?;
        let format = ParquetFormat::default()
            .with_enable_pruning(true)
            .with_skip_metadata(true);
        let listing_options = ListingOptions::new(Arc::new(format))
            .with_file_extension(".parquet")
            .with_collect_stat(false);

        tracing::debug!("Infer schema for footprints: {}", table_url);
        let schema = listing_options.infer_schema(state, &table_url).await?;

        let config = ListingTableConfig::new(table_url)
            .with_listing_options(listing_options)
            .with_schema(schema);
        Ok(Arc::new(ListingTable::try_new(config)?))
    }

    /// Lazy data frame over the footprints, partitioned by block size.
    /// Nothing is scanned until it is executed.
    pub async fn read(&self) -> Result<DataFrame, FootprintError> {
        let ctx = self.session().await?;
        self.read_with(&ctx).await
    }

    /// Lazy data frame using the partitioning settings of `ctx`.
    pub async fn read_with(&self, ctx: &SessionContext) -> Result<DataFrame, FootprintError> {
        let provider = self.table_provider(&ctx.state()).await?;
        Ok(ctx.read_table(provider)?)
    }
}
