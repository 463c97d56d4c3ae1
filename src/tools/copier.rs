//! Empty file copier: recreate every file of a directory as a zero-byte file

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("Please select both source and target directories.")]
    MissingDirectory,
    #[error("Source and target directories must be different.")]
    SameDirectory,
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl CopyError {
    /// Dialog title the GUI shows for this error
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingDirectory => "Missing Information",
            Self::SameDirectory => "Invalid Selection",
            Self::Io { .. } => "Error",
        }
    }

    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CopyEvent {
    Status(String),
    /// Completion in percent, 0.0..=100.0
    Progress(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CopyReport {
    pub created: usize,
    pub target: PathBuf,
}

/// Check the two directory inputs before starting a copy
pub fn validate(source: &str, target: &str) -> Result<(PathBuf, PathBuf), CopyError> {
    let (source, target) = (source.trim(), target.trim());
    if source.is_empty() || target.is_empty() {
        return Err(CopyError::MissingDirectory);
    }
    let (source, target) = (PathBuf::from(source), PathBuf::from(target));
    if source == target {
        return Err(CopyError::SameDirectory);
    }
    if let (Ok(a), Ok(b)) = (source.canonicalize(), target.canonicalize()) {
        if a == b {
            return Err(CopyError::SameDirectory);
        }
    }
    Ok((source, target))
}

/// Regular files directly inside `dir`, sorted by name
fn source_files(dir: &Path) -> Result<Vec<OsString>, CopyError> {
    let mut files: Vec<OsString> = fs::read_dir(dir)
        .map_err(CopyError::io(dir))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name())
        .collect();
    files.sort();
    Ok(files)
}

/// Create an empty file in `target` for every file in `source`.
/// Existing target files with the same name are truncated.
pub fn create_empty_copies(
    source: &Path,
    target: &Path,
    mut report: impl FnMut(CopyEvent),
) -> Result<CopyReport, CopyError> {
    if !target.exists() {
        fs::create_dir_all(target).map_err(CopyError::io(target))?;
        info!(target = %target.display(), "created target directory");
        report(CopyEvent::Status(format!(
            "Created target directory: {}",
            target.display()
        )));
    }

    let files = source_files(source)?;
    if files.is_empty() {
        report(CopyEvent::Status(format!("No files found in {}", source.display())));
        return Ok(CopyReport {
            created: 0,
            target: target.to_path_buf(),
        });
    }

    report(CopyEvent::Progress(0.0));
    let total = files.len();
    for (i, name) in files.iter().enumerate() {
        let path = target.join(name);
        File::create(&path).map_err(CopyError::io(&path))?;
        debug!(file = %path.display(), "created empty copy");

        let done = i + 1;
        report(CopyEvent::Progress(done as f32 / total as f32 * 100.0));
        report(CopyEvent::Status(format!(
            "Created: {} ({done}/{total})",
            name.to_string_lossy()
        )));
    }

    report(CopyEvent::Status(format!(
        "Completed! Created {total} empty files in {}",
        target.display()
    )));
    info!(created = total, source = %source.display(), target = %target.display(), "empty copy finished");
    Ok(CopyReport {
        created: total,
        target: target.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn run(source: &Path, target: &Path) -> (Result<CopyReport, CopyError>, Vec<CopyEvent>) {
        let mut events = Vec::new();
        let result = create_empty_copies(source, target, |e| events.push(e));
        (result, events)
    }

    #[test]
    fn test_validate() {
        assert!(matches!(validate("", "/tmp/x"), Err(CopyError::MissingDirectory)));
        assert!(matches!(validate("/tmp/x", "  "), Err(CopyError::MissingDirectory)));
        assert!(matches!(validate("/tmp/x", "/tmp/x"), Err(CopyError::SameDirectory)));
        assert!(validate("/tmp/x", "/tmp/y").is_ok());
    }

    #[test]
    fn test_validate_detects_same_directory_through_aliases() {
        let dir = tempdir().unwrap();
        let plain = dir.path().to_str().unwrap().to_string();
        let dotted = dir.path().join(".").to_str().unwrap().to_string();
        assert!(matches!(validate(&plain, &dotted), Err(CopyError::SameDirectory)));
    }

    #[test]
    fn test_error_titles() {
        assert_eq!(CopyError::MissingDirectory.title(), "Missing Information");
        assert_eq!(CopyError::SameDirectory.title(), "Invalid Selection");
    }

    #[test]
    fn test_creates_empty_copies() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("a.txt"), "content").unwrap();
        fs::write(src.path().join("b.bin"), [1u8, 2, 3]).unwrap();
        fs::create_dir(src.path().join("nested")).unwrap();
        let dst = tempdir().unwrap();
        let target = dst.path().join("out");

        let (result, events) = run(src.path(), &target);
        let report = result.unwrap();
        assert_eq!(report.created, 2);

        assert_eq!(fs::metadata(target.join("a.txt")).unwrap().len(), 0);
        assert_eq!(fs::metadata(target.join("b.bin")).unwrap().len(), 0);
        assert!(!target.join("nested").exists());

        assert_eq!(
            events.first(),
            Some(&CopyEvent::Status(format!("Created target directory: {}", target.display())))
        );
        assert!(events.contains(&CopyEvent::Status("Created: a.txt (1/2)".into())));
        assert!(events.contains(&CopyEvent::Progress(100.0)));
        assert_eq!(
            events.last(),
            Some(&CopyEvent::Status(format!("Completed! Created 2 empty files in {}", target.display())))
        );
    }

    #[test]
    fn test_truncates_existing_target_files() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("keep.txt"), "x").unwrap();
        let dst = tempdir().unwrap();
        fs::write(dst.path().join("keep.txt"), "old data").unwrap();

        let (result, events) = run(src.path(), dst.path());
        assert_eq!(result.unwrap().created, 1);
        assert_eq!(fs::read(dst.path().join("keep.txt")).unwrap(), Vec::<u8>::new());
        assert!(!events.iter().any(|e| matches!(e, CopyEvent::Status(s) if s.starts_with("Created target"))));
    }

    #[test]
    fn test_empty_source() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        let (result, events) = run(src.path(), dst.path());
        assert_eq!(result.unwrap().created, 0);
        assert_eq!(
            events,
            vec![CopyEvent::Status(format!("No files found in {}", src.path().display()))]
        );
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let dst = tempdir().unwrap();
        let missing = dst.path().join("nope");
        let (result, _) = run(&missing, &dst.path().join("out"));
        assert!(matches!(result, Err(CopyError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_copied_exactly() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.txt");
        let src = tempdir().unwrap();
        fs::write(src.path().join(name), "x").unwrap();
        let dst = tempdir().unwrap();

        let (result, events) = run(src.path(), dst.path());
        assert_eq!(result.unwrap().created, 1);
        assert_eq!(fs::metadata(dst.path().join(name)).unwrap().len(), 0);
        assert!(!dst.path().join("caf\u{FFFD}.txt").exists());
        assert!(events.contains(&CopyEvent::Status("Created: caf\u{FFFD}.txt (1/1)".into())));
    }
}
