//! Decoding of the `name,value` tables most telemetry commands answer with.
//!
//! A response starts with the echoed command, may carry a few lines of
//! firmware chatter, then a header row (e.g. `Parameter,Value`) followed by
//! one comma-separated row per field:
//!
//! ```text
//! getmotors
//! Parameter,Value
//! Brush_RPM,0
//! LeftWheel_PositionInMM,-1234
//! ...
//! ```

use tracing::trace;

use crate::error::{NeatoError, Result};
use crate::types::{Command, FieldEntry, Preamble, ValueKind, UNKNOWN_COMMAND_MARKER};

/// Return the trimmed data lines of a response, with the preamble removed.
///
/// Fails with [`NeatoError::CommandRejected`] if the robot did not know the
/// command, and [`NeatoError::HeaderNotFound`] if the header row never appears.
pub fn data_lines(command: Command, body: &str) -> Result<Vec<&str>> {
    if body.contains(UNKNOWN_COMMAND_MARKER) {
        return Err(NeatoError::CommandRejected(command));
    }

    let lines: Vec<&str> = body.lines().map(str::trim).collect();
    match command.preamble() {
        Preamble::Header(header) => {
            let start = lines
                .iter()
                .position(|line| line.starts_with(header))
                .ok_or(NeatoError::HeaderNotFound { command, header })?;
            Ok(lines[start + 1..].to_vec())
        }
        Preamble::EchoLine => Ok(lines.into_iter().skip(1).collect()),
    }
}

/// Parse one `name,value[,...]` row. Malformed rows yield `None`.
pub fn parse_line(line: &str, kind: ValueKind) -> Option<FieldEntry> {
    let mut columns = line.split(',');
    let name = columns.next()?.trim();
    let value = columns.next()?;
    if name.is_empty() {
        return None;
    }
    Some(FieldEntry {
        name: name.to_string(),
        value: kind.parse(value)?,
    })
}

/// Decode a tabular response body into its field entries.
///
/// Rows that do not parse are skipped; they never fail the whole response.
pub fn decode_table(command: Command, body: &str, kind: ValueKind) -> Result<Vec<FieldEntry>> {
    let lines = data_lines(command, body)?;
    let mut entries = Vec::with_capacity(lines.len());
    for line in lines {
        match parse_line(line, kind) {
            Some(entry) => entries.push(entry),
            None => trace!(command = command.name(), line, "Skipping malformed row"),
        }
    }
    Ok(entries)
}
