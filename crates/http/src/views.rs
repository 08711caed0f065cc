//! HTML pages rendered from templates embedded in the binary.

use std::sync::LazyLock;

use minijinja::{context, Environment};
use quakedb_core::{fields, QuakeMatch, DEFAULT_MAX_MAG, DEFAULT_MIN_MAG, DEFAULT_RADIUS_KM};
use quakedb_service::QueryOutcome;
use serde::Serialize;

use crate::flash::Notice;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    ("index.html", include_str!("templates/index.html")),
    ("insert.html", include_str!("templates/insert.html")),
    ("query.html", include_str!("templates/query.html")),
    ("results.html", include_str!("templates/results.html")),
    ("upload.html", include_str!("templates/upload.html")),
    ("error.html", include_str!("templates/error.html")),
];

/// `.html` names get minijinja's default HTML autoescaping.
static ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::error!(template = name, "failed to load template: {e}");
        }
    }
    env
});

fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, minijinja::Error> {
    ENV.get_template(name)?.render(ctx)
}

pub fn index(notice: Option<Notice>) -> Result<String, minijinja::Error> {
    render("index.html", context! { notice => notice.map(Notice::view) })
}

pub fn insert_form(notice: Option<Notice>) -> Result<String, minijinja::Error> {
    render("insert.html", context! { notice => notice.map(Notice::view) })
}

pub fn query_form(notice: Option<Notice>) -> Result<String, minijinja::Error> {
    let defaults = context! {
        min_mag => DEFAULT_MIN_MAG,
        max_mag => DEFAULT_MAX_MAG,
        radius_km => DEFAULT_RADIUS_KM,
    };
    render("query.html", context! { notice => notice.map(Notice::view), defaults })
}

pub fn upload_form(notice: Option<Notice>) -> Result<String, minijinja::Error> {
    render("upload.html", context! { notice => notice.map(Notice::view) })
}

pub fn results(outcome: &QueryOutcome) -> Result<String, minijinja::Error> {
    render("results.html", context! { table => ResultTable::from(outcome) })
}

pub fn error_page(status: &str, message: &str) -> Result<String, minijinja::Error> {
    render("error.html", context! { status, message })
}

/// A query result flattened to display strings, with headers taken from the
/// query's column list.
#[derive(Debug, Serialize)]
pub struct ResultTable {
    pub query_type: &'static str,
    pub description: String,
    pub columns: &'static [&'static str],
    pub row_count: usize,
    pub rows: Vec<Vec<String>>,
}

impl From<&QueryOutcome> for ResultTable {
    fn from(outcome: &QueryOutcome) -> Self {
        Self {
            query_type: outcome.kind.query_type().as_str(),
            description: outcome.kind.to_string(),
            columns: outcome.kind.columns(),
            row_count: outcome.matches.len(),
            rows: outcome.matches.iter().map(table_row).collect(),
        }
    }
}

fn table_row(m: &QuakeMatch) -> Vec<String> {
    let q = &m.quake;
    let mut row = vec![
        q.id.clone(),
        fields::format_timestamp(&q.time),
        q.latitude.to_string(),
        q.longitude.to_string(),
        q.depth.to_string(),
        q.mag.to_string(),
        q.place.clone(),
    ];
    if let Some(distance) = m.distance_km {
        row.push(format!("{distance:.3}"));
    }
    row
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use quakedb_core::{
        Earthquake, GeoPoint, MagnitudeRange, QueryKind, RadiusFilter, LOCATION_COLUMNS,
        QUAKE_COLUMNS,
    };

    use super::*;

    fn quake() -> Earthquake {
        Earthquake {
            id: "1".to_owned(),
            time: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            latitude: 32.7357,
            longitude: -97.1081,
            depth: 5.0,
            mag: 4.2,
            place: "<b>Arlington</b>, TX".to_owned(),
        }
    }

    #[test]
    fn every_template_renders() {
        assert!(index(None).unwrap().contains("/upload"));
        assert!(insert_form(Some(Notice::Inserted)).unwrap().contains("inserted successfully"));
        assert!(query_form(None).unwrap().contains("radius_km"));
        assert!(upload_form(Some(Notice::InvalidUpload)).unwrap().contains("valid CSV"));
        assert!(error_page("400 Bad Request", "mag: not a number").unwrap().contains("mag"));
    }

    #[test]
    fn location_table_has_distance_column() {
        let filter = RadiusFilter::new(GeoPoint::new(32.7357, -97.1081), 500.0).unwrap();
        let outcome = QueryOutcome {
            kind: QueryKind::Location(filter),
            matches: vec![QuakeMatch { quake: quake(), distance_km: Some(0.0) }],
        };
        let table = ResultTable::from(&outcome);
        assert_eq!(table.query_type, "location");
        assert_eq!(table.columns, LOCATION_COLUMNS);
        assert_eq!(
            table.rows[0],
            [
                "1",
                "2024-01-01T00:00:00",
                "32.7357",
                "-97.1081",
                "5",
                "4.2",
                "<b>Arlington</b>, TX",
                "0.000"
            ]
        );
    }

    #[test]
    fn results_page_escapes_cells() {
        let outcome = QueryOutcome {
            kind: QueryKind::Magnitude(MagnitudeRange::new(4.0, 5.0).unwrap()),
            matches: vec![QuakeMatch { quake: quake(), distance_km: None }],
        };
        let html = results(&outcome).unwrap();
        assert!(html.contains("&lt;b&gt;Arlington"));
        assert!(!html.contains("<b>Arlington"));
        assert!(html.contains("1 row: magnitude between 4 and 5"));
        assert!(html.contains("results-magnitude"));
        assert!(!html.contains("distance_km"));
        assert_eq!(ResultTable::from(&outcome).columns, QUAKE_COLUMNS);
    }

    #[test]
    fn empty_result_is_a_normal_table() {
        let outcome = QueryOutcome {
            kind: QueryKind::Magnitude(MagnitudeRange::new(5.0, 10.0).unwrap()),
            matches: Vec::new(),
        };
        let html = results(&outcome).unwrap();
        assert!(html.contains("0 rows"));
        assert!(html.contains("<th>place</th>"));
    }
}
