use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Timelike};
use engine_logging::{engine_debug, engine_info};
use grokview_core::{Archive, Content, SaveCandidate};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::ExportOptions;
use crate::filename::{dedupe_entry_names, sanitize_file_name, with_extension};
use crate::ingest::{read_entry, IngestError};
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot write destination: {0}")]
    Persist(#[from] PersistError),
    #[error("source unavailable: {0}")]
    Source(#[from] IngestError),
    #[error("source archive {0} no longer exists")]
    MissingArchive(String),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("nothing to export")]
    Empty,
    #[error("export task did not finish: {0}")]
    Interrupted(String),
}

/// Writes `candidate` to `{directory}/{name}` and returns the written path.
///
/// A single content is written as its raw bytes, a whole archive is copied
/// byte for byte, and a set of contents becomes a fresh ZIP whose entries are
/// named `{id}.{extension}`.
pub fn export(
    candidate: &SaveCandidate,
    directory: &Path,
    name: &str,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let writer = AtomicFileWriter::new(directory.to_path_buf());
    let name = sanitize_file_name(name);
    let target = match candidate {
        SaveCandidate::Content(content) => export_content(&writer, content, &name)?,
        SaveCandidate::Archive(archive) => export_archive(&writer, archive, &name)?,
        SaveCandidate::Contents(contents) => export_contents(&writer, contents, &name, options)?,
    };
    engine_info!("Exported to {}", target.display());
    Ok(target)
}

fn export_content(
    writer: &AtomicFileWriter,
    content: &Content,
    name: &str,
) -> Result<PathBuf, ExportError> {
    let bytes = read_entry(content)?;
    let file_name = with_extension(name, content.extension());
    Ok(writer.write(&file_name, &bytes)?)
}

fn export_archive(
    writer: &AtomicFileWriter,
    archive: &Archive,
    name: &str,
) -> Result<PathBuf, ExportError> {
    let source_path = Path::new(archive.path());
    let mut source = File::open(source_path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ExportError::MissingArchive(archive.path().to_string()),
        _ => ExportError::Io(err),
    })?;
    let file_name = with_extension(name, "zip");
    writer.write_with(&file_name, |file| {
        let copied = io::copy(&mut source, file)?;
        engine_debug!("Copied {} bytes from {}", copied, source_path.display());
        Ok::<_, ExportError>(())
    })
}

fn export_contents(
    writer: &AtomicFileWriter,
    contents: &[Content],
    name: &str,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    if contents.is_empty() {
        return Err(ExportError::Empty);
    }
    // Read every source first so a vanished archive aborts before anything is written.
    let payloads = contents
        .iter()
        .map(read_entry)
        .collect::<Result<Vec<_>, _>>()?;
    let names = dedupe_entry_names(
        contents
            .iter()
            .map(|content| (content.id(), content.extension())),
    );

    let file_name = with_extension(name, "zip");
    writer.write_with(&file_name, |file| {
        let mut zip = ZipWriter::new(file);
        for ((content, entry_name), bytes) in contents.iter().zip(&names).zip(&payloads) {
            zip.start_file(entry_name.as_str(), entry_options(content, options))?;
            zip.write_all(bytes)?;
        }
        zip.finish()?;
        Ok::<_, ExportError>(())
    })
}

fn entry_options(content: &Content, options: &ExportOptions) -> SimpleFileOptions {
    let mut file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(options.compression_level);
    if let Some(modified) = content.last_modified().and_then(zip_timestamp) {
        file_options = file_options.last_modified_time(modified);
    }
    file_options
}

/// Epoch millis to a DOS timestamp; `None` outside the 1980..=2107 range.
fn zip_timestamp(millis: i64) -> Option<zip::DateTime> {
    let utc = DateTime::from_timestamp_millis(millis)?;
    let year = u16::try_from(utc.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        utc.month() as u8,
        utc.day() as u8,
        utc.hour() as u8,
        utc.minute() as u8,
        utc.second() as u8,
    )
    .ok()
}
