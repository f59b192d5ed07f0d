use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::{FxError, FxResult};
use crate::model::{CSV_HEADER, FIELD_COUNT, Fixlet, LoadReport, MalformedRowPolicy, RejectedRow};

/// Read every fixlet from `path`.
///
/// The first line is treated as a header and discarded without inspection.
pub fn load(path: &Path, policy: MalformedRowPolicy) -> FxResult<LoadReport> {
    let file = fs::File::open(path)?;
    let report = load_from_reader(file, policy)?;
    tracing::debug!(
        path = %path.display(),
        loaded = report.fixlets.len(),
        rejected = report.rejected.len(),
        truncated = report.truncated,
        "loaded fixlets"
    );
    Ok(report)
}

pub fn load_from_reader<R: Read>(reader: R, policy: MalformedRowPolicy) -> FxResult<LoadReport> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut report = LoadReport::default();
    for result in csv_reader.records() {
        let rejected = match result {
            Ok(record) => match decode_record(&record) {
                Ok(fixlet) => {
                    report.fixlets.push(fixlet);
                    continue;
                }
                Err(reason) => RejectedRow {
                    line: record_line(&record),
                    reason,
                },
            },
            Err(error) if matches!(error.kind(), csv::ErrorKind::Io(_)) => {
                return Err(error.into());
            }
            Err(error) => RejectedRow {
                line: error.position().map_or(0, csv::Position::line),
                reason: error.to_string(),
            },
        };

        match policy {
            MalformedRowPolicy::Fail => {
                return Err(FxError::malformed_row(rejected.line, rejected.reason));
            }
            MalformedRowPolicy::Skip => {
                tracing::warn!(line = rejected.line, reason = %rejected.reason, "skipping malformed row");
                report.rejected.push(rejected);
            }
            MalformedRowPolicy::Truncate => {
                tracing::warn!(
                    line = rejected.line,
                    reason = %rejected.reason,
                    "malformed row; ignoring the rest of the file"
                );
                report.rejected.push(rejected);
                report.truncated = true;
                break;
            }
        }
    }
    Ok(report)
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

fn decode_record(record: &StringRecord) -> Result<Fixlet, String> {
    if record.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} fields, found {}",
            record.len()
        ));
    }
    let line = record_line(record);
    Ok(Fixlet {
        site_id: lenient_int(&record[0], line, CSV_HEADER[0]),
        fixlet_id: lenient_int(&record[1], line, CSV_HEADER[1]),
        name: record[2].to_owned(),
        criticality: record[3].to_owned(),
        relevant_computer_count: lenient_int(&record[4], line, CSV_HEADER[4]),
    })
}

/// Numeric columns never reject a row: anything unparseable reads as zero.
fn lenient_int<T>(raw: &str, line: u64, column: &str) -> T
where
    T: std::str::FromStr + Default,
{
    raw.trim().parse().unwrap_or_else(|_| {
        if is_out_of_range_int(raw) {
            tracing::warn!(line, column, value = raw, "integer out of range for column, read as zero");
        } else {
            tracing::debug!(line, column, value = raw, "non-numeric field read as zero");
        }
        T::default()
    })
}

fn is_out_of_range_int(raw: &str) -> bool {
    let digits = raw.trim();
    let digits = digits.strip_prefix(['-', '+']).unwrap_or(digits);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Replace the contents of `path` with a header line and one row per fixlet.
///
/// Rows are written to a temporary file next to the real file, synced and
/// renamed over it, so readers see either the old file or the new one. A
/// symlinked `path` keeps pointing at its target, and an existing file keeps
/// its permissions.
pub fn save(path: &Path, fixlets: &[Fixlet]) -> FxResult<()> {
    let target = resolve_target(path)?;
    let previous = match fs::metadata(&target) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
        Err(error) => return Err(error.into()),
    };

    let tmp = temp_path_for(&target);
    let written = write_temp(&tmp, fixlets).and_then(|()| {
        if let Some(permissions) = previous {
            fs::set_permissions(&tmp, permissions)?;
        }
        fs::rename(&tmp, &target)?;
        Ok(())
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written?;

    // The new contents are already in place; only durability of the rename
    // is in doubt.
    if let Err(error) = sync_parent_dir(&target) {
        tracing::warn!(path = %target.display(), %error, "directory sync after save failed");
    }
    tracing::debug!(path = %target.display(), rows = fixlets.len(), "saved fixlets");
    Ok(())
}

/// The file a save should replace: the symlink target when `path` is a link.
fn resolve_target(path: &Path) -> FxResult<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(_) => match fs::canonicalize(path) {
            Ok(resolved) => Ok(resolved),
            // dangling link: write through to where it points
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                let link = fs::read_link(path)?;
                Ok(match path.parent() {
                    Some(parent) => parent.join(link),
                    None => link,
                })
            }
            Err(error) => Err(error.into()),
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(error) => Err(error.into()),
    }
}

fn write_temp(tmp: &Path, fixlets: &[Fixlet]) -> FxResult<()> {
    let file = fs::File::create(tmp)?;
    let file = write_to(file, fixlets)?;
    file.sync_all()?;
    Ok(())
}

/// Encode the header and `fixlets` into `writer`, returning it flushed.
pub fn write_to<W: Write>(writer: W, fixlets: &[Fixlet]) -> FxResult<W> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for fixlet in fixlets {
        csv_writer.write_record(fixlet.to_row())?;
    }
    csv_writer.flush()?;
    csv_writer
        .into_inner()
        .map_err(|error| FxError::Io(error.into_error()))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn sync_parent_dir(path: &Path) -> FxResult<()> {
    #[cfg(unix)]
    {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::File::open(parent)?.sync_all()?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
