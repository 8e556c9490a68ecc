//! Input discovery.
//!
//! Collects the files a batch will process: the top level of the source
//! directory by default, or the whole tree when recursive. The output root is
//! left out when it lives inside the source.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Options for discovering input files
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extension to match, without the dot (case-insensitive)
    pub extension: String,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Directory to leave out, e.g. an output root nested inside the source
    pub exclude: Option<PathBuf>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "mp3".to_string(),
            recursive: false,
            exclude: None,
        }
    }
}

/// Whether `path` has the given extension, ignoring case.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Collects the input files under `root`, sorted by path.
///
/// Only the top level is scanned unless `recursive` is set. Unreadable
/// entries below the root are skipped; an unreadable root is an error.
pub fn collect_input_files(root: &Path, options: &ScanOptions) -> io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", root.display()),
        ));
    }

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let exclude = options.exclude.as_ref();

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| exclude.is_none_or(|ex| entry.path() != ex.as_path()))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, &options.extension))
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(|s| s.to_string()))
            .collect()
    }

    fn populate(root: &Path) {
        File::create(root.join("b-song.mp3")).unwrap();
        File::create(root.join("A-LOUD.MP3")).unwrap(); // case-insensitive match
        File::create(root.join("music.flac")).unwrap(); // other extension
        File::create(root.join("notes.txt")).unwrap();
        fs::create_dir(root.join("folder.mp3")).unwrap(); // directories never match

        let subdir = root.join("subdir");
        fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("nested.mp3")).unwrap();
    }

    #[test]
    fn test_top_level_only_by_default() {
        let dir = tempdir().unwrap();
        populate(dir.path());

        let files = collect_input_files(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(names(&files), vec!["A-LOUD.MP3", "b-song.mp3"]);
    }

    #[test]
    fn test_recursive_scan_finds_nested() {
        let dir = tempdir().unwrap();
        populate(dir.path());

        let options = ScanOptions {
            recursive: true,
            ..Default::default()
        };
        let files = collect_input_files(dir.path(), &options).unwrap();
        assert_eq!(names(&files), vec!["A-LOUD.MP3", "b-song.mp3", "nested.mp3"]);
    }

    #[test]
    fn test_excluded_directory_is_skipped() {
        let dir = tempdir().unwrap();
        populate(dir.path());
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("Artist")).unwrap();
        File::create(out.join("Artist/Artist - Song.mp3")).unwrap();

        let options = ScanOptions {
            recursive: true,
            exclude: Some(out),
            ..Default::default()
        };
        let files = collect_input_files(dir.path(), &options).unwrap();
        assert!(!names(&files).contains(&"Artist - Song.mp3".to_string()));
    }

    #[test]
    fn test_missing_root_is_error() {
        let result = collect_input_files(Path::new("/nonexistent/input"), &ScanOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("x.Mp3"), "mp3"));
        assert!(!has_extension(Path::new("x.mp3.txt"), "mp3"));
        assert!(!has_extension(Path::new("mp3"), "mp3"));
    }
}
