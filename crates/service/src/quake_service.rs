use std::path::{Path, PathBuf};
use std::sync::Arc;

use quakedb_core::{
    Earthquake, EarthquakeInput, IngestReport, QuakeMatch, QueryInput, QueryKind,
};
use quakedb_storage::EarthquakeStore;

use crate::upload;
use crate::ServiceError;

/// Rows returned by one of the canned queries, with the query that produced them.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub kind: QueryKind,
    pub matches: Vec<QuakeMatch>,
}

/// Where an accepted upload was written and what ingesting it did.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub stored_as: PathBuf,
    pub report: IngestReport,
}

pub struct QuakeService {
    store: Arc<dyn EarthquakeStore>,
    upload_dir: PathBuf,
}

impl QuakeService {
    #[must_use]
    pub fn new(store: Arc<dyn EarthquakeStore>, upload_dir: impl Into<PathBuf>) -> Self {
        Self { store, upload_dir: upload_dir.into() }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub async fn insert(&self, input: &EarthquakeInput) -> Result<Earthquake, ServiceError> {
        let quake = input.parse()?;
        self.store.insert_earthquake(&quake).await?;
        Ok(quake)
    }

    pub async fn query(&self, input: &QueryInput) -> Result<QueryOutcome, ServiceError> {
        let kind = input.parse()?;
        let matches = self.store.query(&kind).await?;
        tracing::debug!(
            query_type = kind.query_type().as_str(),
            matches = matches.len(),
            "query ran"
        );
        Ok(QueryOutcome { kind, matches })
    }

    /// Store an uploaded catalog under a generated name, then ingest it.
    ///
    /// The file is kept even when parsing or ingest fails afterwards.
    pub async fn ingest_upload(
        &self,
        filename: Option<&str>,
        bytes: &[u8],
    ) -> Result<UploadOutcome, ServiceError> {
        let filename = filename.map(upload::client_basename).unwrap_or_default();
        if !upload::is_csv_filename(filename) {
            return Err(ServiceError::InvalidUpload(format!(
                "expected a .csv file, got {filename:?}"
            )));
        }

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let stored_as = self.upload_dir.join(upload::stored_filename(filename));
        tokio::fs::write(&stored_as, bytes).await?;
        tracing::info!(
            client_name = filename,
            stored_as = %stored_as.display(),
            bytes = bytes.len(),
            "catalog upload saved"
        );

        let report = self.ingest_bytes(bytes).await?;
        Ok(UploadOutcome { stored_as, report })
    }

    /// Ingest a catalog file already on disk, as `quakedb import` does.
    pub async fn import_file(&self, path: &Path) -> Result<IngestReport, ServiceError> {
        let bytes = tokio::fs::read(path).await?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "importing catalog");
        self.ingest_bytes(&bytes).await
    }

    pub async fn catalog_count(&self) -> Result<u64, ServiceError> {
        Ok(self.store.catalog_count().await?)
    }

    async fn ingest_bytes(&self, bytes: &[u8]) -> Result<IngestReport, ServiceError> {
        let rows = upload::parse_catalog(bytes)?;
        if rows.is_empty() {
            tracing::info!("catalog has no data rows");
            return Ok(IngestReport::default());
        }
        let report = self.store.ingest_catalog(&rows).await?;
        tracing::info!(
            rows = report.total(),
            inserted = report.inserted,
            skipped = report.skipped,
            "catalog ingested"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use quakedb_storage::MemoryStore;
    use tempfile::TempDir;

    use super::*;

    const CATALOG: &str = "time,lat,long,mag,nst,net,id\n\
        2024-02-01T10:00:00,35.1,-117.9,2.5,12,ci,ci1\n\
        \n\
        2024-02-01T11:00:00,35.2,-117.8,,,ci,ci2\n";

    fn service() -> (QuakeService, Arc<MemoryStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let service = QuakeService::new(store.clone(), dir.path().join("uploads"));
        (service, store, dir)
    }

    fn form(pairs: &[(&str, &str)]) -> EarthquakeInput {
        let mut input = EarthquakeInput::default();
        for (key, value) in pairs {
            let value = Some((*value).to_owned());
            match *key {
                "id" => input.id = value,
                "time" => input.time = value,
                "latitude" => input.latitude = value,
                "longitude" => input.longitude = value,
                "depth" => input.depth = value,
                "mag" => input.mag = value,
                "place" => input.place = value,
                other => panic!("unknown field {other}"),
            }
        }
        input
    }

    fn arlington() -> EarthquakeInput {
        form(&[
            ("id", "1"),
            ("time", "2024-01-01T00:00:00"),
            ("latitude", "32.7357"),
            ("longitude", "-97.1081"),
            ("depth", "5.0"),
            ("mag", "4.2"),
            ("place", "Arlington, TX"),
        ])
    }

    #[tokio::test]
    async fn insert_then_query_round_trips() {
        let (service, store, _dir) = service();
        let quake = service.insert(&arlington()).await.unwrap();
        assert_eq!(store.earthquakes(), vec![quake.clone()]);

        let outcome = service
            .query(&QueryInput {
                query_type: Some("magnitude".to_owned()),
                min_mag: Some("4".to_owned()),
                max_mag: Some("5".to_owned()),
                ..QueryInput::default()
            })
            .await
            .unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].quake, quake);
    }

    #[tokio::test]
    async fn location_query_finds_arlington_at_zero_distance() {
        let (service, _store, _dir) = service();
        service.insert(&arlington()).await.unwrap();
        let outcome = service
            .query(&QueryInput {
                query_type: Some("location".to_owned()),
                latitude: Some("32.7357".to_owned()),
                longitude: Some("-97.1081".to_owned()),
                radius_km: Some("500".to_owned()),
                ..QueryInput::default()
            })
            .await
            .unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert!(outcome.matches[0].distance_km.unwrap().abs() < 1e-9);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_store() {
        let (service, store, _dir) = service();
        let mut input = arlington();
        input.latitude = Some("91".to_owned());
        let err = service.insert(&input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "latitude"));
        assert!(store.earthquakes().is_empty());
    }

    #[tokio::test]
    async fn duplicate_insert_is_reported() {
        let (service, _store, _dir) = service();
        service.insert(&arlington()).await.unwrap();
        assert!(service.insert(&arlington()).await.unwrap_err().is_duplicate());
    }

    #[tokio::test]
    async fn unknown_query_type_is_a_validation_error() {
        let (service, _store, _dir) = service();
        let err = service
            .query(&QueryInput { query_type: Some("depth".to_owned()), ..QueryInput::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "query_type"));
    }

    #[tokio::test]
    async fn upload_is_stored_under_generated_name() {
        let (service, _store, _dir) = service();
        let outcome =
            service.ingest_upload(Some("../month.csv"), CATALOG.as_bytes()).await.unwrap();
        assert_eq!(outcome.stored_as.parent(), Some(service.upload_dir()));
        assert!(outcome.stored_as.to_string_lossy().ends_with("-month.csv"));
        assert_eq!(std::fs::read_to_string(&outcome.stored_as).unwrap(), CATALOG);
        assert_eq!(outcome.report, IngestReport { inserted: 2, skipped: 0 });
    }

    #[tokio::test]
    async fn uploading_twice_is_idempotent() {
        let (service, store, _dir) = service();
        service.ingest_upload(Some("a.csv"), CATALOG.as_bytes()).await.unwrap();
        let count = store.catalog_rows().len();
        let second = service.ingest_upload(Some("a.csv"), CATALOG.as_bytes()).await.unwrap();
        assert_eq!(second.report, IngestReport { inserted: 0, skipped: 2 });
        assert_eq!(second.report.total(), count);
        assert_eq!(store.catalog_rows().len(), count);
        assert_eq!(service.catalog_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn non_csv_upload_is_rejected_without_writing() {
        let (service, store, _dir) = service();
        for name in [None, Some(""), Some("quakes.xlsx")] {
            let err = service.ingest_upload(name, CATALOG.as_bytes()).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidUpload(_)), "{name:?}");
        }
        assert!(!service.upload_dir().exists());
        assert!(store.catalog_rows().is_empty());
    }

    #[tokio::test]
    async fn bad_row_writes_nothing() {
        let (service, store, _dir) = service();
        let body = format!("{CATALOG}2024-02-01T12:00:00,35.3,east,1.0,1,ci,ci3\n");
        let err = service.ingest_upload(Some("bad.csv"), body.as_bytes()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRow { row: 3, .. }), "{err:?}");
        assert!(store.catalog_rows().is_empty());
    }

    #[tokio::test]
    async fn import_file_reads_from_disk() {
        let (service, store, dir) = service();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, CATALOG).unwrap();
        let report = service.import_file(&path).await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(store.catalog_rows().len(), 2);

        let missing = service.import_file(&dir.path().join("nope.csv")).await.unwrap_err();
        assert!(matches!(missing, ServiceError::Io(_)));
    }
}
