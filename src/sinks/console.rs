//! Console sink implementation

use crate::core::{ConsoleFormat, LogRecord, Result, Sink};
#[cfg(feature = "console-color")]
use colored::Colorize;
use std::fmt::Write as _;
use std::io::Write;

/// Writes one line per record to stderr (or an injected writer).
///
/// Line layout: `[timestamp] [0x<tid>] [file:line] [severity] [component] message`,
/// where the first three fields are each omitted when switched off in the
/// [`ConsoleFormat`]. With color enabled the whole line is wrapped in the
/// severity color and reset at the end.
pub struct ConsoleSink {
    format: ConsoleFormat,
    writer: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_format(ConsoleFormat::default())
    }

    pub fn with_format(format: ConsoleFormat) -> Self {
        Self::with_writer(format, std::io::stderr())
    }

    /// Write to `writer` instead of stderr.
    pub fn with_writer(format: ConsoleFormat, writer: impl Write + Send + 'static) -> Self {
        Self {
            format,
            writer: Box::new(writer),
        }
    }

    pub fn format(&self) -> &ConsoleFormat {
        &self.format
    }

    /// Render `record` as a single line without the trailing newline.
    pub fn format_line(&self, record: &LogRecord) -> String {
        let mut line = String::with_capacity(64 + record.message().len());

        if self.format.timestamp {
            let _ = write!(
                line,
                "[{}] ",
                self.format.timestamp_format.format(record.timestamp())
            );
        }
        if self.format.thread_id {
            let _ = write!(line, "[0x{:x}] ", record.thread_id());
        }
        if self.format.source {
            let _ = write!(line, "[{}] ", record.location());
        }
        let _ = write!(
            line,
            "[{}] [{}] {}",
            record.severity(),
            record.component(),
            record.message()
        );

        self.colorize(line, record)
    }

    #[cfg(feature = "console-color")]
    fn colorize(&self, line: String, record: &LogRecord) -> String {
        if self.format.color {
            line.color(record.severity().color()).to_string()
        } else {
            line
        }
    }

    #[cfg(not(feature = "console-color"))]
    fn colorize(&self, line: String, _record: &LogRecord) -> String {
        line
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.format_line(record);
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
