use crate::interface_adapters::protocol::SessionReportDto;
use crate::use_cases::SessionReport;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::error;

/// Serializes each report once and writes it as a JSON line.
///
/// Returns the number of lines written once the session closes its sender.
pub async fn report_serializer<W>(
    mut report_rx: mpsc::Receiver<SessionReport>,
    mut out: W,
) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;
    while let Some(report) = report_rx.recv().await {
        let msg = SessionReportDto::from(report);
        let mut txt = match serde_json::to_string(&msg) {
            Ok(txt) => txt,
            Err(e) => {
                error!(error = ?e, "failed to serialize session report");
                continue;
            }
        };
        txt.push('\n');
        out.write_all(txt.as_bytes()).await?;
        written += 1;
    }
    out.flush().await?;
    Ok(written)
}
