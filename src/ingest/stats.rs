use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub size: i64,
    pub row_count: Option<i64>,
}

/// Size and data row count of a file, or `None` when it is absent.
///
/// The first line is taken as the header. A file that cannot be read as
/// text keeps its size but gets no row count.
pub fn file_stats(path: &Path) -> Option<FileStats> {
    let metadata = fs::metadata(path).ok().filter(|m| m.is_file())?;
    let size = i64::try_from(metadata.len()).unwrap_or(i64::MAX);

    let row_count = match count_lines(path) {
        Ok(lines) => Some((lines - 1).max(0)),
        Err(e) => {
            warn!("Could not count rows in {}: {}", path.display(), e);
            None
        }
    };

    Some(FileStats { size, row_count })
}

fn count_lines(path: &Path) -> std::io::Result<i64> {
    let reader = BufReader::new(File::open(path)?);
    let mut count = 0;
    for line in reader.lines() {
        line?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_row_count_excludes_header() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cpu.csv", b"time,host\n1,a\n2,b\n3,c\n");
        let stats = file_stats(&path).unwrap();
        assert_eq!(stats.row_count, Some(3));
        assert_eq!(stats.size, 22);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "mem.csv", b"time,host\n1,a\n2,b");
        assert_eq!(file_stats(&path).unwrap().row_count, Some(2));
    }

    #[test]
    fn test_header_only_and_empty_files_never_go_negative() {
        let dir = TempDir::new().unwrap();
        let header = write(&dir, "net.csv", b"time,host\n");
        let empty = write(&dir, "empty.csv", b"");
        assert_eq!(file_stats(&header).unwrap().row_count, Some(0));
        assert_eq!(file_stats(&empty).unwrap().row_count, Some(0));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(file_stats(&dir.path().join("absent.csv")).is_none());
    }

    #[test]
    fn test_binary_file_has_size_but_no_rows() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "blob.csv", &[0xff, 0xfe, b'\n', 0xfd]);
        let stats = file_stats(&path).unwrap();
        assert_eq!(stats.size, 4);
        assert_eq!(stats.row_count, None);
    }
}
