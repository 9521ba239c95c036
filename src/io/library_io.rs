use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::{Folder, Library, Snippet};

/// Error type for library file operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse library file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Load a library from a JSON file. A missing file is an empty library, so
/// first launch against a fresh path just works.
pub fn load_library(path: &Path) -> Result<Library, LibraryError> {
    if !path.exists() {
        return Ok(Library::default());
    }
    let text = fs::read_to_string(path).map_err(|e| LibraryError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let library: Library = serde_json::from_str(&text)?;
    Ok(library)
}

/// Save the library atomically: write a temp file next to the target, then
/// persist over it, so a crash mid-write never truncates the library.
pub fn save_library(path: &Path, library: &Library) -> Result<(), LibraryError> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, library)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| LibraryError::IoError(e.error))?;
    Ok(())
}

/// A small starter library for running the browser without a file.
pub fn sample_library() -> Library {
    let folders = vec![
        Folder::new("inbox", "Inbox"),
        Folder::new("rust", "Rust"),
        Folder::new("rust-async", "async").with_parent("rust"),
        Folder::new("shell", "Shell"),
    ];
    let snippets = vec![
        Snippet::new("hello", "hello world").in_folder("inbox"),
        Snippet::new("iter-chain", "iterator chains").in_folder("rust"),
        Snippet::new("match-guard", "match guards").in_folder("rust").pinned(),
        Snippet::new("select-loop", "select! loop").in_folder("rust-async"),
        Snippet::new("spawn", "task spawning").in_folder("rust-async").draft(),
        Snippet::new("xargs", "xargs patterns").in_folder("shell"),
        Snippet::new("scratch", "scratch pad"),
    ];
    Library {
        folders,
        snippets,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        let library = sample_library();
        save_library(&path, &library).unwrap();
        let loaded = load_library(&path).unwrap();

        assert_eq!(loaded.folders, library.folders);
        assert_eq!(loaded.snippets, library.snippets);
    }

    #[test]
    fn missing_file_is_an_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let library = load_library(&dir.path().join("nope.json")).unwrap();
        assert!(library.folders.is_empty());
        assert!(library.snippets.is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_library(&path),
            Err(LibraryError::ParseError(_))
        ));
    }
}
