//! File sink implementation

use crate::core::{LogRecord, LoggerError, Result, Sink, SIMPLE_FORMAT};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one comma-separated line per record to a file:
///
/// ```text
/// timestamp,0x<tid>,file:line,severity,component,message
/// ```
///
/// The handle is opened once, flushed after every line and closed when the
/// sink is dropped. A sink built with [`FileSink::disabled`] has no handle and
/// discards everything.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_open(path.clone(), e))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// A sink for `path` that never opened its file.
    pub fn disabled(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Render `record` as one file line, including the trailing newline.
    pub fn format_line(record: &LogRecord) -> String {
        format!(
            "{},0x{:x},{},{},{},{}\n",
            record.timestamp().format(SIMPLE_FORMAT),
            record.thread_id(),
            record.location(),
            record.severity(),
            record.component(),
            record.message()
        )
    }
}

impl Sink for FileSink {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(Self::format_line(record).as_bytes())?;
            writer.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
