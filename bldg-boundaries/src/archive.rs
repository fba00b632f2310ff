use std::io::Cursor;

use geojson::{FeatureCollection, GeoJson};

use crate::error::BoundaryError;

const ZIP_LOCAL_HEADER: &[u8] = b"PK\x03\x04";

/// Decode a boundary payload, which is either a ZIP archive holding one GeoJSON
/// file or the GeoJSON document itself.
pub(crate) fn read_feature_collection(payload: &[u8]) -> Result<FeatureCollection, BoundaryError> {
    let geojson: GeoJson = if payload.starts_with(ZIP_LOCAL_HEADER) {
        let mut archive = zip::ZipArchive::new(Cursor::new(payload))?;
        let name = archive
            .file_names()
            .find(|name| is_geojson_entry(name))
            .map(str::to_string)
            .ok_or(BoundaryError::EmptyArchive)?;
        tracing::debug!("Reading {} from archive", name);

        let entry = archive.by_name(&name)?;
        serde_json::from_reader(entry)?
    } else {
        serde_json::from_slice(payload)?
    };

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(feature) => Ok(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }),
        GeoJson::Geometry(_) => Err(BoundaryError::UnexpectedGeoJson("Geometry")),
    }
}

fn is_geojson_entry(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    !lower.ends_with('/') && (lower.ends_with(".json") || lower.ends_with(".geojson"))
}
