//! Earthquake records and their raw (string) input forms.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fields;
use crate::query::GeoPoint;

/// A row of the `earthquakes` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Earthquake {
    pub id: String,
    pub time: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub mag: f64,
    pub place: String,
}

impl Earthquake {
    pub const fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A row of the `earthquakes2` table, as ingested from uploaded catalogs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRow {
    pub id: String,
    pub time: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub mag: Option<f64>,
    pub nst: Option<i32>,
    pub net: Option<String>,
}

/// Query hit: the earthquake plus its distance from the search center
/// (location queries only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuakeMatch {
    pub quake: Earthquake,
    pub distance_km: Option<f64>,
}

/// Outcome of a catalog upload: rows written vs. rows whose id already existed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl IngestReport {
    pub const fn total(&self) -> usize {
        self.inserted + self.skipped
    }
}

/// Untyped insert-form submission.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EarthquakeInput {
    pub id: Option<String>,
    pub time: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub depth: Option<String>,
    pub mag: Option<String>,
    pub place: Option<String>,
}

impl EarthquakeInput {
    pub fn parse(&self) -> Result<Earthquake, ValidationError> {
        Ok(Earthquake {
            id: fields::required("id", self.id.as_deref())?.to_owned(),
            time: fields::required_timestamp("time", self.time.as_deref())?,
            latitude: fields::latitude("latitude", self.latitude.as_deref())?,
            longitude: fields::longitude("longitude", self.longitude.as_deref())?,
            depth: fields::required_f64("depth", self.depth.as_deref())?,
            mag: fields::required_f64("mag", self.mag.as_deref())?,
            place: fields::required("place", self.place.as_deref())?.to_owned(),
        })
    }
}

/// One CSV record of an uploaded catalog. Column names follow the USGS-style
/// export the upload form expects (`lat`/`long` rather than the table names).
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CatalogRecord {
    pub id: Option<String>,
    pub time: Option<String>,
    pub lat: Option<String>,
    pub long: Option<String>,
    pub mag: Option<String>,
    pub nst: Option<String>,
    pub net: Option<String>,
}

impl CatalogRecord {
    pub fn parse(&self) -> Result<CatalogRow, ValidationError> {
        Ok(CatalogRow {
            id: fields::required("id", self.id.as_deref())?.to_owned(),
            time: fields::required_timestamp("time", self.time.as_deref())?,
            latitude: fields::latitude("lat", self.lat.as_deref())?,
            longitude: fields::longitude("long", self.long.as_deref())?,
            mag: fields::optional_f64("mag", self.mag.as_deref())?,
            nst: fields::optional_i32("nst", self.nst.as_deref())?,
            net: fields::present(self.net.as_deref()).map(ToOwned::to_owned),
        })
    }

    /// Blank CSV lines surface as records with no usable cell.
    pub fn is_blank(&self) -> bool {
        [&self.id, &self.time, &self.lat, &self.long, &self.mag, &self.nst, &self.net]
            .iter()
            .all(|cell| fields::present(cell.as_deref()).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arlington_input() -> EarthquakeInput {
        EarthquakeInput {
            id: Some("1".to_owned()),
            time: Some("2024-01-01T00:00:00".to_owned()),
            latitude: Some("32.7357".to_owned()),
            longitude: Some("-97.1081".to_owned()),
            depth: Some("5.0".to_owned()),
            mag: Some("4.2".to_owned()),
            place: Some("Arlington, TX".to_owned()),
        }
    }

    #[test]
    fn parses_complete_insert_form() {
        let quake = arlington_input().parse().unwrap();
        assert_eq!(quake.id, "1");
        assert_eq!(quake.latitude, 32.7357);
        assert_eq!(quake.longitude, -97.1081);
        assert_eq!(quake.depth, 5.0);
        assert_eq!(quake.mag, 4.2);
        assert_eq!(quake.place, "Arlington, TX");
        assert_eq!(fields::format_timestamp(&quake.time), "2024-01-01T00:00:00");
    }

    #[test]
    fn insert_form_reports_first_bad_field() {
        let mut input = arlington_input();
        input.mag = Some("strong".to_owned());
        assert_eq!(input.parse().unwrap_err().field, "mag");

        let mut input = arlington_input();
        input.place = None;
        assert_eq!(input.parse().unwrap_err(), ValidationError::missing("place"));
    }

    #[test]
    fn catalog_record_allows_blank_optionals() {
        let record = CatalogRecord {
            id: Some("us7000abcd".to_owned()),
            time: Some("2024-02-01T10:00:00.000Z".to_owned()),
            lat: Some("35.1".to_owned()),
            long: Some("-117.9".to_owned()),
            mag: None,
            nst: Some(String::new()),
            net: Some("ci".to_owned()),
        };
        let row = record.parse().unwrap();
        assert_eq!(row.id, "us7000abcd");
        assert_eq!(row.mag, None);
        assert_eq!(row.nst, None);
        assert_eq!(row.net.as_deref(), Some("ci"));
    }

    #[test]
    fn catalog_record_uses_csv_column_names_in_errors() {
        let record = CatalogRecord {
            id: Some("x".to_owned()),
            time: Some("2024-02-01T10:00:00".to_owned()),
            lat: Some("north".to_owned()),
            ..CatalogRecord::default()
        };
        assert_eq!(record.parse().unwrap_err().field, "lat");
    }

    #[test]
    fn blank_record_detection() {
        assert!(CatalogRecord::default().is_blank());
        let whitespace = CatalogRecord { id: Some("  ".to_owned()), ..CatalogRecord::default() };
        assert!(whitespace.is_blank());
        let partial = CatalogRecord { net: Some("us".to_owned()), ..CatalogRecord::default() };
        assert!(!partial.is_blank());
    }
}
