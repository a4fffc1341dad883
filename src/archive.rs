//! Raw page archive
//!
//! Optionally stores every fetched page body under
//! `<root>/<title_id>/<YYYYMMDD_HHMMSS>/` as zero-padded sequential files
//! (`0000000.html`, `0000001.html`, …). Purely observational: the crawl
//! never reads archived pages back, and archiving cannot change what gets
//! parsed.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Directory-name format for one crawl session (UTC)
const SESSION_DIR_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes the raw pages of one crawl session
#[derive(Debug)]
pub struct PageArchive {
    dir: PathBuf,
    pages_written: u32,
}

impl PageArchive {
    /// Creates the session directory `<root>/<title_id>/<timestamp>/`,
    /// including missing parents.
    pub fn create(
        root: &Path,
        title_id: &str,
        started_at: DateTime<Utc>,
    ) -> std::io::Result<Self> {
        let dir = root
            .join(title_id)
            .join(started_at.format(SESSION_DIR_FORMAT).to_string());
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            pages_written: 0,
        })
    }

    /// Writes one page body as the next sequential file and returns its path.
    pub fn write_page(&mut self, body: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.dir.join(format!("{:07}.html", self.pages_written));
        let mut file = fs::File::create(&path)?;
        file.write_all(body)?;
        file.flush()?;
        self.pages_written += 1;
        Ok(path)
    }

    /// Session directory pages are written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of pages written so far
    pub fn pages_written(&self) -> u32 {
        self.pages_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 3, 12, 17, 30, 5).unwrap()
    }

    #[test]
    fn test_create_builds_session_directory() {
        let root = tempfile::tempdir().unwrap();
        let archive = PageArchive::create(root.path(), "tt0000001", session_start()).unwrap();

        assert_eq!(
            archive.dir(),
            root.path().join("tt0000001").join("20200312_173005")
        );
        assert!(archive.dir().is_dir());
        assert_eq!(archive.pages_written(), 0);
    }

    #[test]
    fn test_pages_are_sequential_and_zero_padded() {
        let root = tempfile::tempdir().unwrap();
        let mut archive = PageArchive::create(root.path(), "tt0000001", session_start()).unwrap();

        let first = archive.write_page(b"<html>one</html>").unwrap();
        let second = archive.write_page(b"<html>two</html>").unwrap();

        assert_eq!(first.file_name().unwrap(), "0000000.html");
        assert_eq!(second.file_name().unwrap(), "0000001.html");
        assert_eq!(archive.pages_written(), 2);
        assert_eq!(fs::read(&first).unwrap(), b"<html>one</html>");
        assert_eq!(fs::read(&second).unwrap(), b"<html>two</html>");
    }

    #[test]
    fn test_two_sessions_do_not_collide() {
        let root = tempfile::tempdir().unwrap();
        let later = Utc.with_ymd_and_hms(2020, 3, 12, 17, 31, 0).unwrap();

        let first = PageArchive::create(root.path(), "tt0000001", session_start()).unwrap();
        let second = PageArchive::create(root.path(), "tt0000001", later).unwrap();

        assert_ne!(first.dir(), second.dir());
    }
}
