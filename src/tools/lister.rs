//! Filename exporter: write the sorted file names of a directory to a text file

use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Verzeichnis nicht gefunden")]
    NotFound,
    #[error("Keine gültige Verzeichnis")]
    NotADirectory,
    #[error("Export fehlgeschlagen: {0}")]
    Io(#[from] io::Error),
}

/// `filenames_list_{timestamp}.txt` next to `folder`
pub fn default_output_path(folder: &Path, now: &DateTime<Local>) -> PathBuf {
    let dir = folder
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    dir.join(format!("filenames_list_{}.txt", now.format("%Y%m%d_%H%M%S")))
}

fn list_file_names(folder: &Path) -> io::Result<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if entry.path().is_file() {
            names.push(entry.file_name());
        }
    }
    names.sort();
    Ok(names)
}

fn write_listing(output: &Path, folder: &Path, names: &[OsString], now: &DateTime<Local>) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(output)?);
    writeln!(file, "Verzeichnis: {}", std::path::absolute(folder)?.display())?;
    writeln!(file, "Datum: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file, "Anzahl Dateien: {}", names.len())?;
    writeln!(file, "\n=== DATEINAMEN ===\n")?;
    // names are written byte for byte, even when they are not valid UTF-8
    for name in names {
        file.write_all(name.as_encoded_bytes())?;
        file.write_all(b"\n")?;
    }
    file.flush()
}

fn export(
    folder: &Path,
    output: Option<&Path>,
    now: &DateTime<Local>,
    status: &mut impl FnMut(String),
) -> Result<PathBuf, ExportError> {
    if !folder.exists() {
        return Err(ExportError::NotFound);
    }
    if !folder.is_dir() {
        return Err(ExportError::NotADirectory);
    }

    let names = list_file_names(folder)?;
    status(format!("{} Dateien gefunden. Exportiere...", names.len()));

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(folder, now));
    write_listing(&output, folder, &names, now)?;

    let absolute = std::path::absolute(&output)?;
    info!(folder = %folder.display(), output = %absolute.display(), files = names.len(), "exported filename list");
    Ok(absolute)
}

/// Export the names of the regular files in `folder`.
/// Without `output` a timestamped file is created next to the folder.
/// Every step is reported through `status`; returns the absolute output path.
pub fn export_filenames_list(
    folder: &Path,
    output: Option<&Path>,
    now: DateTime<Local>,
    mut status: impl FnMut(String),
) -> Result<PathBuf, ExportError> {
    status("Verarbeite Verzeichnis...".to_string());

    match export(folder, output, &now, &mut status) {
        Ok(path) => {
            status(format!("Export erfolgreich: {}", path.display()));
            Ok(path)
        }
        Err(e) => {
            error!(folder = %folder.display(), error = %e, "filename export failed");
            status(format!("FEHLER: {e}"));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_default_output_path() {
        let now = fixed_now();
        assert_eq!(
            default_output_path(Path::new("/data/photos"), &now),
            PathBuf::from("/data/filenames_list_20240309_140507.txt")
        );
        assert_eq!(
            default_output_path(Path::new("photos"), &now),
            PathBuf::from("./filenames_list_20240309_140507.txt")
        );
    }

    #[test]
    fn test_export_writes_sorted_listing() {
        let root = tempdir().unwrap();
        let folder = root.path().join("docs");
        fs::create_dir(&folder).unwrap();
        for name in ["zeta.txt", "Alpha.md", "beta.txt"] {
            fs::write(folder.join(name), "x").unwrap();
        }
        fs::create_dir(folder.join("subdir")).unwrap();

        let mut statuses = Vec::new();
        let path = export_filenames_list(&folder, None, fixed_now(), |s| statuses.push(s)).unwrap();

        assert_eq!(path, root.path().join("filenames_list_20240309_140507.txt"));
        let contents = fs::read_to_string(&path).unwrap();
        let expected = format!(
            "Verzeichnis: {}\nDatum: 2024-03-09 14:05:07\nAnzahl Dateien: 3\n\n=== DATEINAMEN ===\n\nAlpha.md\nbeta.txt\nzeta.txt\n",
            folder.display()
        );
        assert_eq!(contents, expected);

        assert_eq!(
            statuses,
            vec![
                "Verarbeite Verzeichnis...".to_string(),
                "3 Dateien gefunden. Exportiere...".to_string(),
                format!("Export erfolgreich: {}", path.display()),
            ]
        );
    }

    #[test]
    fn test_export_to_explicit_output() {
        let root = tempdir().unwrap();
        let output = root.path().join("list.txt");
        let path = export_filenames_list(root.path(), Some(&output), fixed_now(), |_| {}).unwrap();
        assert_eq!(path, output);
        assert!(fs::read_to_string(&output).unwrap().contains("Anzahl Dateien: 0"));
    }

    #[test]
    fn test_missing_folder() {
        let root = tempdir().unwrap();
        let mut statuses = Vec::new();
        let err = export_filenames_list(&root.path().join("none"), None, fixed_now(), |s| statuses.push(s))
            .unwrap_err();
        assert!(matches!(err, ExportError::NotFound));
        assert_eq!(statuses.last().unwrap(), "FEHLER: Verzeichnis nicht gefunden");
    }

    #[test]
    fn test_folder_is_a_file() {
        let root = tempdir().unwrap();
        let file = root.path().join("plain.txt");
        fs::write(&file, "").unwrap();
        let mut statuses = Vec::new();
        let err = export_filenames_list(&file, None, fixed_now(), |s| statuses.push(s)).unwrap_err();
        assert!(matches!(err, ExportError::NotADirectory));
        assert_eq!(statuses.last().unwrap(), "FEHLER: Keine gültige Verzeichnis");
    }

    #[test]
    fn test_unwritable_output() {
        let root = tempdir().unwrap();
        let output = root.path().join("missing_dir").join("list.txt");
        let mut statuses = Vec::new();
        let err = export_filenames_list(root.path(), Some(&output), fixed_now(), |s| statuses.push(s))
            .unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(statuses.last().unwrap().starts_with("FEHLER: Export fehlgeschlagen: "));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_listed_exactly() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = tempdir().unwrap();
        let folder = root.path().join("raw");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join(OsStr::from_bytes(b"caf\xe9.txt")), "").unwrap();
        fs::write(folder.join("b.txt"), "").unwrap();
        let output = root.path().join("list.txt");

        export_filenames_list(&folder, Some(&output), fixed_now(), |_| {}).unwrap();
        let contents = fs::read(&output).unwrap();
        assert!(contents.ends_with(b"\n\nb.txt\ncaf\xe9.txt\n"));
    }
}
