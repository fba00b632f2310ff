use std::path::PathBuf;

use envconfig::Envconfig;
use lazy_static::lazy_static;

#[derive(Debug, Clone, Envconfig)]
pub struct Config {
    #[envconfig(from = "BLDG_LOG_LEVEL", default = "info")]
    pub log_level: String,
    /// Directory footprint files are cached in.
    #[envconfig(from = "BLDG_DATA_DIR", default = "./data")]
    pub data_dir: PathBuf,
    /// Partition block size handed to the lazy footprint reader.
    #[envconfig(from = "BLDG_BLOCK_SIZE", default = "256M")]
    pub block_size: String,

    #[envconfig(from = "BLDG_S3_ENDPOINT", default = "https://data.source.coop")]
    pub s3_endpoint: String,
    #[envconfig(from = "BLDG_S3_REGION", default = "us-west-2")]
    pub s3_region: String,
    /// Send unsigned requests. The footprint bucket is publicly readable.
    #[envconfig(from = "BLDG_S3_SKIP_SIGNATURE", default = "true")]
    pub s3_skip_signature: bool,
    #[envconfig(from = "BLDG_S3_ALLOW_HTTP", default = "false")]
    pub s3_allow_http: bool,

    #[envconfig(from = "BLDG_GADM_BASE_URL", default = "https://geodata.ucdavis.edu")]
    pub gadm_base_url: String,
}

impl Config {
    pub fn init() -> Config {
        Config::init_from_env().expect("Failed to load config")
    }
}

/// Bucket holding the combined Google/Microsoft building footprints.
pub const FOOTPRINT_BUCKET: &str = "vida";
/// Key prefix of the per-country GeoParquet partitions; the ISO alpha-3 code is appended.
pub const FOOTPRINT_KEY_PREFIX: &str =
    "google-microsoft-open-buildings/geoparquet/by_country/country_iso=";

/// Directory of the GADM 4.1 GeoJSON archives, relative to [`Config::gadm_base_url`].
pub const GADM_ARCHIVE_DIR: &str = "gadm/gadm4.1/json";
/// Label given to the `NAME_<level>` column of fetched boundaries.
pub const BOUNDARY_NAME_COLUMN: &str = "Parish";

lazy_static! {
    pub static ref CONFIG: Config = Config::init();
}
