use std::path::{Path, PathBuf};

use blogharvest_core::MetadataFormat;
use chrono::{DateTime, FixedOffset};
use engine_logging::engine_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

pub const METADATA_JSON: &str = "metadata.json";
pub const METADATA_CSV: &str = "metadata.csv";

/// One exported post, as listed in the metadata files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    pub url: String,
    /// ISO-8601 with offset.
    pub published_date: String,
    pub has_post_body: bool,
}

impl PostRecord {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        published: DateTime<FixedOffset>,
        has_post_body: bool,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            published_date: published.to_rfc3339(),
            has_post_body,
        }
    }
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to encode metadata JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode metadata CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode metadata CSV: {0}")]
    CsvFlush(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Write `records` to `output_dir` in `format`, replacing the previous file.
pub fn save_metadata(
    records: &[PostRecord],
    output_dir: &Path,
    format: MetadataFormat,
) -> Result<PathBuf, MetadataError> {
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let path = match format {
        MetadataFormat::Json => writer.write_bytes(METADATA_JSON, &to_json(records)?)?,
        MetadataFormat::Csv => writer.write_bytes(METADATA_CSV, &to_csv(records)?)?,
    };
    engine_info!("Saved metadata to {}", path.display());
    Ok(path)
}

/// Pretty JSON array, 4-space indent, non-ASCII kept as-is.
pub fn to_json(records: &[PostRecord]) -> Result<Vec<u8>, MetadataError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut ser)?;
    Ok(out)
}

/// CSV with header `title,url,published_date,has_post_body`.
pub fn to_csv(records: &[PostRecord]) -> Result<Vec<u8>, MetadataError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if records.is_empty() {
        writer.write_record(["title", "url", "published_date", "has_post_body"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|err| MetadataError::CsvFlush(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PostRecord {
        PostRecord::new(
            "Café",
            "https://blog.example/a",
            DateTime::parse_from_rfc3339("2024-03-01T08:00:00+07:00").unwrap(),
            true,
        )
    }

    #[test]
    fn json_uses_four_space_indent_and_keeps_utf8() {
        let text = String::from_utf8(to_json(&[record()]).unwrap()).unwrap();
        assert!(text.starts_with("[\n    {\n        \"title\": \"Café\""));
        assert!(text.contains("\"published_date\": \"2024-03-01T08:00:00+07:00\""));
    }

    #[test]
    fn empty_json_is_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), b"[]");
    }

    #[test]
    fn csv_has_header_even_when_empty() {
        let text = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "title,url,published_date,has_post_body\n");
        let text = String::from_utf8(to_csv(&[record()]).unwrap()).unwrap();
        assert_eq!(
            text,
            "title,url,published_date,has_post_body\nCafé,https://blog.example/a,2024-03-01T08:00:00+07:00,true\n"
        );
    }
}
