//! Output layout for tagged copies.
//!
//! Files land at `{root}/{Artist}/{Artist} - {Title}.{ext}`. Names are made
//! filesystem-safe by deleting reserved characters, and writers targeting the
//! same path are serialized through [`TargetLocks`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::enrichment::domain::UNKNOWN_ARTIST;

/// Characters deleted from every generated path component
pub const RESERVED_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Removes every reserved character. Nothing is substituted.
pub fn sanitize_filename(name: &str) -> String {
    name.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect()
}

/// Directory name for an artist.
///
/// Sanitized like a filename so `AC/DC` can't create nested directories.
/// Names that would be empty or refer to `.`/`..` fall back to "Unknown Artist".
pub fn artist_dir_name(artist: &str) -> String {
    let sanitized = sanitize_filename(artist);
    let trimmed = sanitized.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        UNKNOWN_ARTIST.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `"{artist} - {title}.{extension}"` with reserved characters removed.
pub fn track_file_name(artist: &str, title: &str, extension: &str) -> String {
    sanitize_filename(&format!("{} - {}.{}", artist, title, extension))
}

/// Full target path for a resolved track under `root`.
pub fn target_path(root: &Path, artist: &str, title: &str, extension: &str) -> PathBuf {
    root.join(artist_dir_name(artist))
        .join(track_file_name(artist, title, extension))
}

/// Per-target-path write locks shared by all workers
#[derive(Debug, Default)]
pub struct TargetLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl TargetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `path`. Hold its guard for the whole
    /// check-write-publish sequence, then hand it back via [`Self::release`].
    pub fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }

    /// Drop our handle on `path`'s lock, removing the entry once nobody else
    /// holds it. Handles are only cloned under the map lock, so a count of
    /// one here means no other writer can be waiting on it.
    pub fn release(&self, path: &Path, lock: Arc<Mutex<()>>) {
        drop(lock);
        let mut locks = self.locks.lock();
        if locks.get(path).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(path);
        }
    }

    /// Run `f` while holding the lock for `path`.
    pub fn with_lock<T>(&self, path: &Path, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(path);
        let result = {
            let _guard = lock.lock();
            f()
        };
        self.release(path, lock);
        result
    }

    /// Number of paths currently tracked
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("AC/DC - T.N.T..mp3"), "ACDC - T.N.T..mp3");
        assert_eq!(sanitize_filename("What? <Live> \"2001\""), "What Live 2001");
        assert_eq!(sanitize_filename("a\\b:c*d|e"), "abcde");
        assert_eq!(sanitize_filename("Normal Name"), "Normal Name");
    }

    #[test]
    fn test_artist_dir_name() {
        assert_eq!(artist_dir_name("AC/DC"), "ACDC");
        assert_eq!(artist_dir_name("???"), UNKNOWN_ARTIST);
        assert_eq!(artist_dir_name(".."), UNKNOWN_ARTIST);
        assert_eq!(artist_dir_name("  Daft Punk "), "Daft Punk");
    }

    #[test]
    fn test_target_path_layout() {
        let path = target_path(Path::new("/out"), "Daft Punk", "One More Time", "mp3");
        assert_eq!(
            path,
            PathBuf::from("/out/Daft Punk/Daft Punk - One More Time.mp3")
        );
    }

    #[test]
    fn test_target_path_cannot_escape_root() {
        let path = target_path(Path::new("/out"), "../../etc", "passwd", "mp3");
        assert!(path.starts_with("/out"));
        assert_eq!(path.components().count(), 4);
    }

    #[test]
    fn test_same_path_shares_lock() {
        let locks = TargetLocks::new();
        let a = locks.lock_for(Path::new("/out/A/A - B.mp3"));
        let b = locks.lock_for(Path::new("/out/A/A - B.mp3"));
        let c = locks.lock_for(Path::new("/out/A/A - C.mp3"));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_released_lock_is_forgotten() {
        let locks = TargetLocks::new();
        let path = Path::new("/out/A/A - B.mp3");

        let first = locks.lock_for(path);
        let second = locks.lock_for(path);
        locks.release(path, first);
        assert_eq!(locks.len(), 1);

        locks.release(path, second);
        assert!(locks.is_empty());
    }

    #[test]
    fn test_with_lock_serializes_and_cleans_up() {
        let locks = Arc::new(TargetLocks::new());
        let inside = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let path = PathBuf::from("/out/A/A - B.mp3");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let path = path.clone();
                std::thread::spawn(move || {
                    locks.with_lock(&path, || {
                        use std::sync::atomic::Ordering;
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        std::thread::sleep(std::time::Duration::from_millis(2));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(locks.is_empty());
    }
}
