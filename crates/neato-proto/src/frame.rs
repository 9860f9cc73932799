use std::collections::HashMap;

use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::error::Result;
use crate::types::Command;

/// The byte separating concatenated command responses in a telemetry datagram (ASCII SUB).
pub const RECORD_SEPARATOR: u8 = 0x1A;

/// Response bodies of one datagram, keyed by the command name they echo.
///
/// Each body still starts with the echoed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Responses(HashMap<String, String>);

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    /// The response body for `command`, if this datagram carried one.
    pub fn get(&self, command: Command) -> Option<&str> {
        self.0.get(command.name()).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.0.insert(name.into(), body.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The command name a record echoes: everything before the first carriage return.
///
/// Records without a carriage return fall back to their first line.
fn record_name(record: &str) -> &str {
    match record.find('\r') {
        Some(end) => &record[..end],
        None => record.lines().next().unwrap_or(""),
    }
}

/// Split one telemetry datagram into per-command records.
///
/// When a command appears more than once, the later record wins.
/// Records without a name (e.g. the empty tail after a trailing separator) are dropped.
pub fn split_datagram(datagram: &[u8]) -> Responses {
    let mut responses = Responses::new();
    for chunk in datagram.split(|&b| b == RECORD_SEPARATOR) {
        let record = String::from_utf8_lossy(chunk);
        let name = record_name(&record).trim();
        if name.is_empty() {
            continue;
        }
        trace!(command = name, bytes = chunk.len(), "Split telemetry record");
        responses.insert(name.to_string(), record.to_string());
    }
    responses
}

/// Write one newline-terminated ASCII command to the control channel.
pub async fn write_command<W: AsyncWriteExt + Unpin>(writer: &mut W, command: &str) -> Result<()> {
    writer.write_all(command.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
