use crate::core::message::Message;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Optional append-only copy of the transcript on disk.
pub struct TranscriptLog {
    file_path: Option<PathBuf>,
}

impl TranscriptLog {
    /// Open (creating if needed) the log file. `None` gives a log that drops everything.
    pub fn new(log_file: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = &log_file {
            Self::test_file_access(path)?;
        }
        Ok(TranscriptLog {
            file_path: log_file,
        })
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Write the header that separates one session from the next in the same file.
    pub fn start_session(
        &self,
        model: &str,
        started_at: DateTime<Local>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.write_block(&format!(
            "## Session started {} (model: {model})",
            started_at.format("%Y-%m-%d %H:%M:%S")
        ))
    }

    pub fn log_message(&self, message: &Message) -> Result<(), Box<dyn std::error::Error>> {
        self.write_block(&format!(
            "{}: {}",
            message.role.display_label(),
            message.content
        ))
    }

    fn write_block(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between entries, matching the on-screen spacing
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    fn test_file_access(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()?;
        Ok(())
    }
}

/// Mirror the newest transcript entry into the log. Write failures are
/// reported through tracing and never interrupt the conversation.
pub fn log_last_entry(log: &TranscriptLog, transcript: &[Message]) {
    if let Some(entry) = transcript.last() {
        if let Err(err) = log.log_message(entry) {
            warn!(error = %err, "failed to write transcript log");
        }
    }
}
