//! Shared file writer for the file output layer

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::FileConfig;

/// Appends formatted events to a single log file.
///
/// If the file lock is poisoned the event is written to stderr instead.
#[derive(Clone)]
pub struct FileWriter {
    file: Arc<Mutex<BufWriter<File>>>,
}

impl FileWriter {
    pub fn new(config: &FileConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            file: Arc::new(Mutex::new(open_log_file(&config.path, config.append)?)),
        })
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriterGuard {
            file: self.file.clone(),
        }
    }
}

pub struct FileWriterGuard {
    file: Arc<Mutex<BufWriter<File>>>,
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.lock() {
            Ok(mut file) => file.write(buf),
            Err(_) => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl Drop for FileWriterGuard {
    fn drop(&mut self) {
        // one event per guard; flush so lines land promptly
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogFormat;
    use tempfile::TempDir;

    fn file_config(dir: &TempDir, append: bool) -> FileConfig {
        FileConfig::new(
            true,
            dir.path().join("nested").join("booking.log"),
            append,
            LogFormat::Json,
        )
    }

    #[test]
    fn test_writer_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, true);

        let writer = FileWriter::new(&config).unwrap();
        {
            let mut guard = writer.make_writer();
            guard.write_all(b"first line\n").unwrap();
        }

        let contents = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(contents, "first line\n");
    }

    #[test]
    fn test_writer_truncates_when_not_appending() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, false);
        std::fs::create_dir_all(config.path.parent().unwrap()).unwrap();
        std::fs::write(&config.path, "stale\n").unwrap();

        let writer = FileWriter::new(&config).unwrap();
        {
            let mut guard = writer.make_writer();
            guard.write_all(b"fresh\n").unwrap();
        }

        let contents = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(contents, "fresh\n");
    }
}
