use std::path::{Path, PathBuf};

use crate::{
    error::ExportError,
    types::{RawTrackPayload, TrackRecord},
};

pub const RAW_EXPORT_FILE: &str = "tracks.json";
pub const RECORDS_EXPORT_FILE: &str = "playlist_songs.csv";

/// Writes the raw playlist payloads and the flattened records to disk.
///
/// Both files are overwritten on every export. There is no rollback: if the
/// CSV write fails the JSON file has already been replaced.
#[derive(Debug, Clone)]
pub struct ExportSink {
    raw_path: PathBuf,
    records_path: PathBuf,
}

impl ExportSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            raw_path: dir.join(RAW_EXPORT_FILE),
            records_path: dir.join(RECORDS_EXPORT_FILE),
        }
    }

    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub async fn persist(
        &self,
        raw_payloads: &[RawTrackPayload],
        records: &[TrackRecord],
    ) -> Result<(), ExportError> {
        for path in [&self.raw_path, &self.records_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec(raw_payloads)?;
        async_fs::write(&self.raw_path, json).await?;

        let csv = encode_records(records)?;
        async_fs::write(&self.records_path, csv).await?;

        Ok(())
    }

    /// Reads back the records of the last export.
    pub async fn load_records(&self) -> Result<Vec<TrackRecord>, ExportError> {
        let content = async_fs::read(&self.records_path).await?;
        decode_records(&content)
    }
}

/// CSV with a header row, even when there are no records.
fn encode_records(records: &[TrackRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(TrackRecord::FIELDS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn decode_records(content: &[u8]) -> Result<Vec<TrackRecord>, ExportError> {
    let mut reader = csv::Reader::from_reader(content);
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
