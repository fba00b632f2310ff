use geo::{coord, BoundingRect, Rect};
use geojson::{Feature, FeatureCollection};
use serde_json::Value;

use crate::error::BoundaryError;

/// Name reported for the geometry column, after all property columns.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// Administrative boundaries of one country at one level, fully loaded.
///
/// Rows are GeoJSON features. Columns are the union of the feature property
/// names in first-seen order, followed by [`GEOMETRY_COLUMN`].
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCollection {
    columns: Vec<String>,
    features: Vec<Feature>,
}

impl BoundaryCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for properties in features.iter().filter_map(|f| f.properties.as_ref()) {
            for key in properties.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(GEOMETRY_COLUMN))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == GEOMETRY_COLUMN || self.columns.iter().any(|c| c == name)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Values of one property column, one entry per row.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&Value>>> {
        if !self.columns.iter().any(|c| c == name) {
            return None;
        }
        Some(self.features.iter().map(|f| f.property(name)).collect())
    }

    /// Rename a property column on every row, keeping its position.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), BoundaryError> {
        let position = self
            .columns
            .iter()
            .position(|c| c == from)
            .ok_or_else(|| BoundaryError::MissingColumn(from.to_string()))?;
        if from == to {
            return Ok(());
        }
        if self.has_column(to) {
            return Err(BoundaryError::DuplicateColumn(to.to_string()));
        }

        self.columns[position] = to.to_string();
        for properties in self.features.iter_mut().filter_map(|f| f.properties.as_mut()) {
            if properties.contains_key(from) {
                *properties = std::mem::take(properties)
                    .into_iter()
                    .map(|(key, value)| {
                        if key == from {
                            (to.to_string(), value)
                        } else {
                            (key, value)
                        }
                    })
                    .collect();
            }
        }
        Ok(())
    }

    /// Bounding rectangle over every geometry, `None` when no row has one.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(|g| geo::Geometry::<f64>::try_from(&g.value).ok())
            .filter_map(|g| g.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            })
    }

    pub fn into_feature_collection(self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members: None,
        }
    }
}

impl From<FeatureCollection> for BoundaryCollection {
    fn from(collection: FeatureCollection) -> Self {
        BoundaryCollection::new(collection.features)
    }
}

#[cfg(test)]
mod tests {
    use geojson::{Geometry, JsonObject};
    use serde_json::json;

    use super::*;

    fn square(x: f64, y: f64, name: &str) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("GID_1".to_string(), json!(format!("X.{name}")));
        properties.insert("NAME_1".to_string(), json!(name));
        properties.insert("TYPE_1".to_string(), json!("County"));
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::Polygon(vec![vec![
                vec![x, y],
                vec![x + 1.0, y],
                vec![x + 1.0, y + 1.0],
                vec![x, y + 1.0],
                vec![x, y],
            ]]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    #[test]
    fn columns_follow_property_order_then_geometry() {
        let boundaries = BoundaryCollection::new(vec![square(0.0, 0.0, "a")]);
        assert_eq!(
            boundaries.columns(),
            vec!["GID_1", "NAME_1", "TYPE_1", "geometry"]
        );
    }

    #[test]
    fn rename_keeps_position_and_values() {
        let mut boundaries =
            BoundaryCollection::new(vec![square(0.0, 0.0, "Nairobi"), square(2.0, 1.0, "Mombasa")]);

        boundaries.rename_column("NAME_1", "Parish").unwrap();

        assert_eq!(
            boundaries.columns(),
            vec!["GID_1", "Parish", "TYPE_1", "geometry"]
        );
        assert_eq!(
            boundaries.column("Parish").unwrap(),
            vec![Some(&json!("Nairobi")), Some(&json!("Mombasa"))]
        );
        assert!(boundaries.column("NAME_1").is_none());
        let first_keys: Vec<&String> = boundaries.features()[0]
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(first_keys, vec!["GID_1", "Parish", "TYPE_1"]);
    }

    #[test]
    fn rename_of_missing_column_fails() {
        let mut boundaries = BoundaryCollection::new(vec![square(0.0, 0.0, "a")]);
        assert!(matches!(
            boundaries.rename_column("NAME_3", "Parish"),
            Err(BoundaryError::MissingColumn(c)) if c == "NAME_3"
        ));
    }

    #[test]
    fn rename_onto_existing_column_fails() {
        let mut boundaries = BoundaryCollection::new(vec![square(0.0, 0.0, "a")]);
        assert!(matches!(
            boundaries.rename_column("NAME_1", "geometry"),
            Err(BoundaryError::DuplicateColumn(_))
        ));
        assert!(matches!(
            boundaries.rename_column("NAME_1", "TYPE_1"),
            Err(BoundaryError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn bounds_cover_every_geometry() {
        let boundaries =
            BoundaryCollection::new(vec![square(0.0, 0.0, "a"), square(2.0, -3.0, "b")]);
        let bounds = boundaries.bounds().unwrap();

        assert_eq!(bounds.min(), coord! { x: 0.0, y: -3.0 });
        assert_eq!(bounds.max(), coord! { x: 3.0, y: 1.0 });
    }

    #[test]
    fn empty_collection_has_no_bounds() {
        let boundaries = BoundaryCollection::new(vec![]);
        assert!(boundaries.is_empty());
        assert!(boundaries.bounds().is_none());
        assert_eq!(boundaries.columns(), vec!["geometry"]);
    }
}
