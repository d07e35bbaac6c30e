//! Cache filenames and maintenance.
//!
//! The cache is only a flat directory of downloaded rasters. There is no
//! index and no metadata sidecar, so deleting the whole tree at any time is
//! safe: the files are reconstructible by re-issuing the same queries.

use std::fs;
use std::path::Path;

use chrono::Local;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::Result;

/// Number of random characters appended to the timestamp. Six characters
/// keep 10 000 filenames generated within the same second collision-free
/// with better than 99.9% probability.
const TOKEN_LEN: usize = 6;

/// Generate a cache filename stem: a 14-digit local timestamp
/// (`YYYYMMDDHHMMSS`) followed by a short random token.
///
/// The timestamp keeps concurrent instances from colliding except within
/// the same second; the token makes collisions within a second improbable.
/// No existence check is performed before the file is written.
pub fn generate_filename() -> String {
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    format!("{timestamp}{token}")
}

/// Delete the cache directory and everything in it.
///
/// Calling this on a directory that does not exist is a no-op.
pub fn clear_cache<P: AsRef<Path>>(cache_dir: P) -> Result<()> {
    let cache_dir = cache_dir.as_ref();
    if cache_dir.exists() {
        fs::remove_dir_all(cache_dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn filename_is_timestamp_plus_token() {
        let name = generate_filename();
        assert_eq!(name.len(), 14 + TOKEN_LEN);
        assert!(name[..14].chars().all(|c| c.is_ascii_digit()));
        assert!(name[14..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn filenames_are_unique_under_rapid_generation() {
        let names: HashSet<String> = (0..10_000).map(|_| generate_filename()).collect();
        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn clear_cache_removes_directory_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("bathy_cache");
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join("20240101000000abcd.tiff"), b"raster").unwrap();

        clear_cache(&cache_dir).unwrap();
        assert!(!cache_dir.exists());

        // Second call on the removed directory is a no-op, not an error.
        clear_cache(&cache_dir).unwrap();
    }
}
