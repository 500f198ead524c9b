use crate::interface_adapters::protocol::HostCommandDto;
use crate::use_cases::HostCommand;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug)]
pub enum ScriptError {
    Io(std::io::Error),
    SessionClosed,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::Io(e) => write!(f, "failed to read script: {e}"),
            ScriptError::SessionClosed => write!(f, "session stopped before the script ended"),
        }
    }
}

impl std::error::Error for ScriptError {}

impl From<std::io::Error> for ScriptError {
    fn from(e: std::io::Error) -> Self {
        ScriptError::Io(e)
    }
}

/// Feeds a JSON-lines script into the session, returning how many commands were sent.
///
/// Blank lines and lines starting with `#` are skipped. Malformed lines, including
/// ones that are not valid UTF-8, are logged with their line number and skipped.
pub async fn feed_script<R>(mut reader: R, command_tx: mpsc::Sender<HostCommand>) -> Result<u64, ScriptError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut line_no: u64 = 0;
    let mut sent: u64 = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping script line that is not UTF-8");
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let dto = match serde_json::from_str::<HostCommandDto>(trimmed) {
            Ok(dto) => dto,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed script line");
                continue;
            }
        };

        command_tx
            .send(HostCommand::from(dto))
            .await
            .map_err(|_| ScriptError::SessionClosed)?;
        sent += 1;
    }

    Ok(sent)
}
