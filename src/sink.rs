//! Destinations for notification payloads.

use log::info;
use std::io::Write;

use crate::error::Result;

/// The class every notification payload is sent with.
pub const EVENT_CLASS: &str = "EVENT";

/// Receives formatted notifications.
///
/// `method` is the configured notifier, `class` is always [`EVENT_CLASS`], and `message` is the
/// JSON payload. What happens to the payload afterwards is up to the sink; no answer is
/// expected, and an error only gets logged.
pub trait Sink {
    /// Deliver one payload.
    fn notify(&mut self, method: &str, class: &str, message: &str) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn notify(&mut self, method: &str, class: &str, message: &str) -> Result<()> {
        (**self).notify(method, class, message)
    }
}

/// Writes every payload to the log at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl Sink for LogSink {
    fn notify(&mut self, method: &str, class: &str, message: &str) -> Result<()> {
        info!(target: "imap_notify::event", "{} {}: {}", method, class, message);
        Ok(())
    }
}

/// Writes payloads to a writer, one per line.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn notify(&mut self, _method: &str, _class: &str, message: &str) -> Result<()> {
        self.writer.write_all(message.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_writes_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.notify("log", EVENT_CLASS, "{\"event\":\"Login\"}").unwrap();
        sink.notify("log", EVENT_CLASS, "{}").unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "{\"event\":\"Login\"}\n{}\n"
        );
    }
}
