use super::Record;
use anyhow::Result;

/// Writes a record to an output destination with [`Recorder::write`].
///
/// The trainer writes one record per episode.
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record) -> Result<()>;

    /// Flushes buffered output, if any.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
