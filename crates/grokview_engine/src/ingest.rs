use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read};

use chrono::NaiveDate;
use engine_logging::{engine_debug, engine_info, engine_warn};
use grokview_core::{archive_name, Archive, Content, ContentEntry, UNKNOWN_MIME_TYPE};
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::filename::{entry_id, unique_id};
use crate::resolve::resolve;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not a readable ZIP archive: {source}")]
    InvalidArchive {
        path: String,
        #[source]
        source: ZipError,
    },
    #[error("entry {entry} is missing from {path}")]
    MissingEntry { path: String, entry: String },
    #[error("cannot read entry {entry} of {path}: {message}")]
    ReadEntry {
        path: String,
        entry: String,
        message: String,
    },
}

/// Metadata of one entry, read without decompressing it.
struct EntryHeader {
    name: String,
    path: String,
    last_modified: Option<i64>,
    size: i64,
}

/// Reads the archive at `path` into a terminal [`Archive`].
///
/// Open and central-directory failures produce `Archive::Failure`. Individual
/// entries that cannot be read, including those with a corrupt local header,
/// are kept as `Content::Unknown` with size -1. Only entries the central
/// directory does not name are skipped.
pub fn ingest_archive(path: &str, sniff_prefix_bytes: usize) -> Archive {
    let name = archive_name(path);
    engine_info!("Ingesting archive {}", path);
    match read_contents(path, sniff_prefix_bytes) {
        Ok(contents) => {
            engine_info!("Archive {} processed: {} entries", path, contents.len());
            Archive::Processed {
                path: path.to_string(),
                name,
                contents,
            }
        }
        Err(err) => {
            engine_warn!("Archive {} failed: {}", path, err);
            Archive::Failure {
                path: path.to_string(),
                name,
                cause: err.to_string(),
            }
        }
    }
}

fn read_contents(path: &str, sniff_prefix_bytes: usize) -> Result<Vec<Content>, IngestError> {
    let mut archive = open_archive(path)?;
    let mut taken_ids = HashSet::new();
    let mut contents = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let (header, sample) = match read_header(&mut archive, index) {
            Ok(Some(header)) => {
                let sample = read_prefix(&mut archive, index, sniff_prefix_bytes);
                (header, sample)
            }
            Ok(None) => continue,
            Err(err) => match central_directory_header(&archive, index) {
                Some(header) => (header, Err(err.to_string())),
                None => {
                    engine_warn!("Skipping entry #{} of {}: {}", index, path, err);
                    continue;
                }
            },
        };

        let id = unique_id(entry_id(&header.name), &taken_ids);
        taken_ids.insert(id.clone());

        let content = match sample {
            Ok(sample) => {
                let resolved = resolve(&sample, &header.name);
                let entry = content_entry(id, path, &header, resolved.mime_type.clone(), header.size);
                if resolved.is_unknown() {
                    Content::Unknown(entry)
                } else {
                    Content::Resolved {
                        entry,
                        extension: resolved.extension,
                    }
                }
            }
            Err(err) => {
                engine_warn!("Entry {} of {} is unreadable: {}", header.name, path, err);
                Content::Unknown(content_entry(
                    id,
                    path,
                    &header,
                    UNKNOWN_MIME_TYPE.to_string(),
                    -1,
                ))
            }
        };
        engine_debug!("{} -> {} ({})", header.name, content.mime_type(), content.id());
        contents.push(content);
    }

    Ok(contents)
}

fn content_entry(
    id: String,
    zip_file_path: &str,
    header: &EntryHeader,
    mime_type: String,
    size: i64,
) -> ContentEntry {
    ContentEntry {
        id,
        path: header.path.clone(),
        mime_type,
        entry_name: header.name.clone(),
        zip_file_path: zip_file_path.to_string(),
        last_modified: header.last_modified,
        size,
    }
}

fn open_archive(path: &str) -> Result<ZipArchive<BufReader<File>>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_string(),
        source,
    })?;
    ZipArchive::new(BufReader::new(file)).map_err(|source| IngestError::InvalidArchive {
        path: path.to_string(),
        source,
    })
}

/// `Ok(None)` for directory entries.
fn read_header<R: Read + io::Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
) -> Result<Option<EntryHeader>, ZipError> {
    let file = archive.by_index_raw(index)?;
    if file.is_dir() {
        return Ok(None);
    }
    let name = file.name().to_string();
    let path = file
        .enclosed_name()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_else(|| name.clone());
    let last_modified = file.last_modified().and_then(|dt| {
        NaiveDate::from_ymd_opt(dt.year().into(), dt.month().into(), dt.day().into())?
            .and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into())
            .map(|naive| naive.and_utc().timestamp_millis())
    });
    let size = i64::try_from(file.size()).unwrap_or(-1);
    Ok(Some(EntryHeader {
        name,
        path,
        last_modified,
        size,
    }))
}

/// Name-only header from the central directory, for entries whose local
/// header is unreadable. `None` for directories or when no name is recorded.
fn central_directory_header<R: Read + io::Seek>(
    archive: &ZipArchive<R>,
    index: usize,
) -> Option<EntryHeader> {
    let name = archive.name_for_index(index)?;
    if name.is_empty() || name.ends_with('/') {
        return None;
    }
    Some(EntryHeader {
        name: name.to_string(),
        path: name.to_string(),
        last_modified: None,
        size: -1,
    })
}

fn read_prefix<R: Read + io::Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    limit: usize,
) -> Result<Vec<u8>, String> {
    let file = archive.by_index(index).map_err(|e| e.to_string())?;
    let mut sample = Vec::with_capacity(limit.min(64 * 1024));
    file.take(limit as u64)
        .read_to_end(&mut sample)
        .map_err(|e| e.to_string())?;
    Ok(sample)
}

/// Reads the full bytes of `content` from its owning archive.
pub fn read_entry(content: &Content) -> Result<Vec<u8>, IngestError> {
    let path = content.zip_file_path();
    let mut archive = open_archive(path)?;
    let file = match archive.by_name(content.entry_name()) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(IngestError::MissingEntry {
                path: path.to_string(),
                entry: content.entry_name().to_string(),
            })
        }
        Err(err) => {
            return Err(IngestError::ReadEntry {
                path: path.to_string(),
                entry: content.entry_name().to_string(),
                message: err.to_string(),
            })
        }
    };
    read_all(file).map_err(|err| IngestError::ReadEntry {
        path: path.to_string(),
        entry: content.entry_name().to_string(),
        message: err.to_string(),
    })
}

fn read_all(mut reader: impl Read) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}
