//! Transcript loop
//!
//! Prints the opening line, then alternates a `You: ` prompt with the
//! controller's replies, each printed as `Bot: <reply>`.

use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use tax_assistant_agent::DialogueController;

/// Why the session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user said no or asked to exit
    Dialogue,
    /// Input closed
    EndOfInput,
    /// No input within the idle timeout
    IdleTimeout,
}

async fn say<W>(writer: &mut W, reply: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(format!("Bot: {}\n", reply).as_bytes()).await
}

/// Read one line, replacing invalid UTF-8 instead of failing. `None` at end of input.
async fn next_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Run one session until the dialogue ends, input ends or the user goes idle
pub async fn run_session<R, W>(
    controller: &mut DialogueController,
    mut reader: R,
    writer: &mut W,
    idle_timeout: Option<Duration>,
) -> std::io::Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    say(writer, controller.opening()).await?;

    loop {
        writer.write_all(b"You: ").await?;
        writer.flush().await?;

        let line = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, next_line(&mut reader, &mut buf)).await {
                Ok(line) => line?,
                Err(_) => {
                    tracing::info!(session = %controller.session_id(), ?limit, "Session idle, closing");
                    writer.write_all(b"\n").await?;
                    for reply in controller.close() {
                        say(writer, &reply).await?;
                    }
                    writer.flush().await?;
                    return Ok(SessionEnd::IdleTimeout);
                }
            },
            None => next_line(&mut reader, &mut buf).await?,
        };

        let Some(line) = line else {
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            tracing::info!(session = %controller.session_id(), "Input closed");
            return Ok(SessionEnd::EndOfInput);
        };

        let outcome = controller.handle(line.trim_end()).await;
        for reply in &outcome.replies {
            say(writer, reply).await?;
        }
        writer.flush().await?;

        if outcome.is_ended() {
            return Ok(SessionEnd::Dialogue);
        }
    }
}
