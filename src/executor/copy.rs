//! Single-file copy with metadata preservation

use crate::logging::{Action, SyncLog};
use crate::types::{CopyStage, FileOutcome, PathEntry, SyncError};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

/// Size of the streaming buffer
const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy `src` over `dest` in place.
///
/// 1. Dry run: log the intent and return before touching the filesystem
/// 2. Create missing parent directories
/// 3. Stream bytes from source into a created/truncated destination
/// 4. Flush to disk
/// 5. Best effort: copy mtime and permission bits from `entry`
///
/// Failures in steps 2-4 abandon this file and are returned. Failures in
/// step 5 are only logged as warnings since the content is already in place.
///
/// # Example
/// ```no_run
/// use treesync::executor::copy_file;
/// use treesync::logging::SyncLog;
/// use treesync::types::PathEntry;
/// use std::path::{Path, PathBuf};
///
/// let metadata = std::fs::metadata("source.txt")?;
/// let entry = PathEntry::from_metadata(PathBuf::from("source.txt"), &metadata)?;
/// copy_file(
///     Path::new("source.txt"),
///     Path::new("dest.txt"),
///     &entry,
///     false,
///     &SyncLog::disabled(),
/// )?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn copy_file(
    src: &Path,
    dest: &Path,
    entry: &PathEntry,
    dry_run: bool,
    log: &SyncLog,
) -> Result<FileOutcome, SyncError> {
    if dry_run {
        log.info(Action::Copy, &entry.path, "DRY_RUN: Would copy file");
        return Ok(FileOutcome::WouldCopy);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(stage_error(CopyStage::CreateDirs, parent))?;
    }

    let mut src_file = File::open(src).map_err(stage_error(CopyStage::OpenSource, src))?;
    let mut dest_file =
        File::create(dest).map_err(stage_error(CopyStage::CreateDestination, dest))?;

    let bytes =
        stream(&mut src_file, &mut dest_file).map_err(stage_error(CopyStage::Stream, dest))?;
    dest_file
        .sync_all()
        .map_err(stage_error(CopyStage::Stream, dest))?;

    // Close before touching metadata so nothing bumps the mtime afterwards
    drop(dest_file);

    preserve_metadata(dest, entry, log);

    log.info(Action::Copy, &entry.path, "File copied successfully");
    Ok(FileOutcome::Copied { bytes })
}

fn stage_error(stage: CopyStage, path: &Path) -> impl FnOnce(io::Error) -> SyncError + '_ {
    move |source| SyncError::Copy {
        stage,
        path: path.to_path_buf(),
        source,
    }
}

fn stream(reader: &mut impl Read, writer: &mut impl Write) -> io::Result<u64> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    writer.flush()?;
    Ok(total_bytes)
}

fn preserve_metadata(dest: &Path, entry: &PathEntry, log: &SyncLog) {
    let mtime = filetime::FileTime::from_system_time(entry.mtime);
    if let Err(e) = filetime::set_file_mtime(dest, mtime) {
        log.warn(dest, &e, "Error preserving modification time");
    }

    if let Err(e) = apply_permissions(dest, entry.permissions) {
        log.warn(dest, &e, "Error setting file permissions");
    }
}

#[cfg(unix)]
fn apply_permissions(dest: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dest, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn apply_permissions(dest: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = fs::metadata(dest)?.permissions();
    permissions.set_readonly(mode & 0o222 == 0);
    fs::set_permissions(dest, permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture::{actions, capturing_log};
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    #[test]
    fn test_stream_copies_across_buffer_boundaries() {
        let content: Vec<u8> = (0..COPY_BUFFER_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        let mut reader = Cursor::new(content.clone());
        let mut writer = Vec::new();

        let bytes = stream(&mut reader, &mut writer).expect("stream should succeed");

        assert_eq!(bytes, content.len() as u64);
        assert_eq!(writer, content);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src.txt");
        fs::write(&src, b"data").expect("write src");
        let dest = temp_dir.path().join("out/nested/dest.txt");

        let entry = PathEntry::file(PathBuf::from("src.txt"), 4, UNIX_EPOCH, 0o644);
        let (log, events) = capturing_log();
        let outcome = copy_file(&src, &dest, &entry, true, &log).expect("dry run succeeds");

        assert_eq!(outcome, FileOutcome::WouldCopy);
        assert!(!temp_dir.path().join("out").exists(), "dry run must not mkdir");
        assert_eq!(actions(&events), vec!["COPY"]);
    }

    #[test]
    fn test_missing_source_reports_open_stage() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let entry = PathEntry::file(PathBuf::from("gone.txt"), 1, UNIX_EPOCH, 0o644);

        let err = copy_file(
            &temp_dir.path().join("gone.txt"),
            &temp_dir.path().join("dest.txt"),
            &entry,
            false,
            &SyncLog::disabled(),
        )
        .expect_err("missing source must fail");

        assert!(matches!(
            err,
            SyncError::Copy {
                stage: CopyStage::OpenSource,
                ..
            }
        ));
    }

    #[test]
    fn test_destination_directory_in_the_way_reports_create_stage() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src.txt");
        fs::write(&src, b"data").expect("write src");
        let dest = temp_dir.path().join("occupied");
        fs::create_dir(&dest).expect("create blocking dir");

        let entry = PathEntry::file(PathBuf::from("src.txt"), 4, UNIX_EPOCH, 0o644);
        let err = copy_file(&src, &dest, &entry, false, &SyncLog::disabled())
            .expect_err("cannot create a file over a directory");

        assert!(matches!(
            err,
            SyncError::Copy {
                stage: CopyStage::CreateDestination,
                ..
            }
        ));
    }

    #[test]
    fn test_copy_uses_entry_mtime() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src.txt");
        fs::write(&src, b"data").expect("write src");
        let dest = temp_dir.path().join("dest.txt");

        let mtime = UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        let entry = PathEntry::file(PathBuf::from("src.txt"), 4, mtime, 0o644);
        let outcome =
            copy_file(&src, &dest, &entry, false, &SyncLog::disabled()).expect("copy succeeds");

        assert_eq!(outcome, FileOutcome::Copied { bytes: 4 });
        let dest_mtime = fs::metadata(&dest)
            .and_then(|m| m.modified())
            .expect("dest mtime");
        assert_eq!(dest_mtime, mtime);
    }
}
