//! The two canned queries and the great-circle distance they are built on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_MAG, DEFAULT_MIN_MAG, DEFAULT_RADIUS_KM, EARTH_RADIUS_KM};
use crate::error::ValidationError;
use crate::fields;

/// Base columns of every result table, in select order.
pub const QUAKE_COLUMNS: &[&str] =
    &["id", "time", "latitude", "longitude", "depth", "mag", "place"];

/// Columns of a location query: the base columns plus the computed distance.
pub const LOCATION_COLUMNS: &[&str] =
    &["id", "time", "latitude", "longitude", "depth", "mag", "place", "distance_km"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Great-circle distance in km on a spherical Earth (haversine form).
///
/// Equivalent to the spherical law of cosines, but exact for coincident
/// points: the law-of-cosines argument rounds to just under 1 there and
/// yields centimetres instead of zero. The inner term is clamped to
/// [0, 1] so antipodal rounding cannot leave the arcsine domain.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let half_dlat = ((b.latitude - a.latitude).to_radians() / 2.0).sin();
    let half_dlon = ((b.longitude - a.longitude).to_radians() / 2.0).sin();
    let h = half_dlat.powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * half_dlon.powi(2);
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Magnitude,
    Location,
}

impl QueryType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Magnitude => "magnitude",
            Self::Location => "location",
        }
    }
}

impl FromStr for QueryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "magnitude" => Ok(Self::Magnitude),
            "location" => Ok(Self::Location),
            other => Err(ValidationError::new(
                "query_type",
                format!("unknown query type '{other}' (expected magnitude or location)"),
            )),
        }
    }
}

/// Inclusive magnitude bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MagnitudeRange {
    pub min_mag: f64,
    pub max_mag: f64,
}

impl MagnitudeRange {
    pub fn new(min_mag: f64, max_mag: f64) -> Result<Self, ValidationError> {
        if min_mag > max_mag {
            return Err(ValidationError::new(
                "min_mag",
                format!("minimum magnitude {min_mag} exceeds maximum {max_mag}"),
            ));
        }
        Ok(Self { min_mag, max_mag })
    }

    pub fn contains(&self, mag: f64) -> bool {
        (self.min_mag..=self.max_mag).contains(&mag)
    }
}

impl Default for MagnitudeRange {
    fn default() -> Self {
        Self { min_mag: DEFAULT_MIN_MAG, max_mag: DEFAULT_MAX_MAG }
    }
}

/// Circle on the globe: everything within `radius_km` of `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusFilter {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl RadiusFilter {
    pub fn new(center: GeoPoint, radius_km: f64) -> Result<Self, ValidationError> {
        if radius_km < 0.0 {
            return Err(ValidationError::new("radius_km", "must not be negative"));
        }
        Ok(Self { center, radius_km })
    }

    pub fn distance_km(&self, point: GeoPoint) -> f64 {
        haversine_km(self.center, point)
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.distance_km(point) <= self.radius_km
    }
}

/// A fully validated query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum QueryKind {
    Magnitude(MagnitudeRange),
    Location(RadiusFilter),
}

impl QueryKind {
    pub const fn query_type(&self) -> QueryType {
        match self {
            Self::Magnitude(_) => QueryType::Magnitude,
            Self::Location(_) => QueryType::Location,
        }
    }

    pub const fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Magnitude(_) => QUAKE_COLUMNS,
            Self::Location(_) => LOCATION_COLUMNS,
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Magnitude(range) => {
                write!(f, "magnitude between {} and {}", range.min_mag, range.max_mag)
            },
            Self::Location(filter) => write!(
                f,
                "within {} km of ({}, {})",
                filter.radius_km, filter.center.latitude, filter.center.longitude
            ),
        }
    }
}

/// Untyped query-form submission.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct QueryInput {
    pub query_type: Option<String>,
    pub min_mag: Option<String>,
    pub max_mag: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius_km: Option<String>,
}

impl QueryInput {
    pub fn parse(&self) -> Result<QueryKind, ValidationError> {
        let query_type: QueryType =
            fields::required("query_type", self.query_type.as_deref())?.parse()?;
        match query_type {
            QueryType::Magnitude => {
                let min_mag =
                    fields::f64_or("min_mag", self.min_mag.as_deref(), DEFAULT_MIN_MAG)?;
                let max_mag =
                    fields::f64_or("max_mag", self.max_mag.as_deref(), DEFAULT_MAX_MAG)?;
                Ok(QueryKind::Magnitude(MagnitudeRange::new(min_mag, max_mag)?))
            },
            QueryType::Location => {
                let center = GeoPoint::new(
                    fields::latitude("latitude", self.latitude.as_deref())?,
                    fields::longitude("longitude", self.longitude.as_deref())?,
                );
                let radius_km =
                    fields::f64_or("radius_km", self.radius_km.as_deref(), DEFAULT_RADIUS_KM)?;
                Ok(QueryKind::Location(RadiusFilter::new(center, radius_km)?))
            },
        }
    }
}
