//! Uploaded catalog files: name checks, stored names, and CSV parsing.

use std::sync::LazyLock;

use csv::{ReaderBuilder, StringRecord, Trim};
use quakedb_core::{CatalogRecord, CatalogRow, ValidationError};
use regex::Regex;
use uuid::Uuid;

use crate::ServiceError;

/// Columns every catalog file must carry. `mag`, `nst` and `net` may be absent.
pub const REQUIRED_COLUMNS: &[&str] = &["id", "time", "lat", "long"];

const MAX_STEM_LEN: usize = 64;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Runs of characters not allowed in a stored file name.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// Last path component of a client-supplied name. Browsers on Windows may
/// send `C:\dir\file.csv`, so both separators count.
pub fn client_basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim()
}

/// Whether a client-supplied file name has a `.csv` suffix (any case).
pub fn is_csv_filename(name: &str) -> bool {
    let base = client_basename(name);
    base.len()
        .checked_sub(4)
        .and_then(|start| base.get(start..))
        .is_some_and(|suffix| suffix.eq_ignore_ascii_case(".csv"))
}

/// Reduce a client file stem to `[A-Za-z0-9._-]`, never empty and never
/// starting with a dot.
pub fn sanitize_stem(stem: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(stem, "_");
    let trimmed = cleaned.trim_start_matches('.');
    let mut out: String = trimmed.chars().take(MAX_STEM_LEN).collect();
    if out.is_empty() {
        out.push_str("upload");
    }
    out
}

/// Name under which an upload is stored: `<uuid>-<sanitized stem>.csv`.
///
/// The random prefix keeps concurrent uploads of the same file apart, and
/// nothing from the client can escape the upload directory.
pub fn stored_filename(client_name: &str) -> String {
    let base = client_basename(client_name);
    let stem = if is_csv_filename(base) { &base[..base.len() - 4] } else { base };
    format!("{}-{}.csv", Uuid::new_v4(), sanitize_stem(stem))
}

/// Parse a catalog CSV into typed rows.
///
/// Cells are trimmed and extra columns ignored. Blank lines, including lines
/// of only whitespace or empty cells, are skipped. Every row is parsed before
/// anything is returned, so a bad row means nothing gets written.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<CatalogRow>, ServiceError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    check_columns(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        // A whitespace-only line trims to a single empty field, shorter than
        // the header, so it has to be dropped before deserializing.
        if record.iter().all(str::is_empty) {
            continue;
        }
        let parsed: CatalogRecord = record.deserialize(Some(&headers))?;
        if parsed.is_blank() {
            continue;
        }
        let line = record.position().map_or(0, |pos| physical_line(bytes, pos.byte()));
        let row = parsed.parse().map_err(|source| ServiceError::InvalidRow {
            row: rows.len() + 1,
            line,
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// 1-based line number of the record starting near `offset`.
///
/// The reader counts skipped empty lines into the start of the next record,
/// so the offset may sit on a run of line breaks before the record itself.
fn physical_line(bytes: &[u8], offset: u64) -> u64 {
    let start = usize::try_from(offset).map_or(bytes.len(), |o| o.min(bytes.len()));
    let skipped = bytes[start..].iter().take_while(|&&b| matches!(b, b'\r' | b'\n')).count();
    let newlines = bytes[..start + skipped].iter().filter(|&&b| b == b'\n').count();
    newlines as u64 + 1
}

fn check_columns(headers: &StringRecord) -> Result<(), ValidationError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(ValidationError::new("file", format!("missing column `{column}`")));
        }
    }
    Ok(())
}
