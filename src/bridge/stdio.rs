//! Stdio transport — newline-delimited JSON, one request per line.
//!
//! The host reads a request, answers it with exactly one response line,
//! and only then reads the next. Frames go to the writer (stdout in the
//! binary); diagnostics go to the logger.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{Background, Request, Response};

/// Reply for a line that is not a known request.
pub const UNKNOWN_MESSAGE: &str = "Unknown message type";

/// Serve requests until the reader hits EOF.
///
/// Returns the number of lines answered. Only I/O errors on the
/// stream itself end the loop early; a line that is not UTF-8 gets the
/// unknown-message reply like any other undecodable line.
pub async fn serve<R, W>(mut reader: R, mut writer: W, background: &Background) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut answered = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Request>(trimmed) {
                    Ok(request) => background.handle(request).await,
                    Err(e) => {
                        log::warn!(
                            "[BRIDGE] Undecodable message ({}): {}",
                            e,
                            crate::text::truncate_chars(trimmed, 100)
                        );
                        Response::failure(UNKNOWN_MESSAGE)
                    }
                }
            }
            Err(e) => {
                log::warn!("[BRIDGE] Message is not UTF-8 ({} bytes): {}", buf.len(), e);
                Response::failure(UNKNOWN_MESSAGE)
            }
        };

        write_frame(&mut writer, &response).await?;
        answered += 1;
    }

    log::info!("[BRIDGE] Input closed after {} messages", answered);
    Ok(answered)
}

async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> std::io::Result<()> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
