use drive_thru_sdk::session::{DriveThruSession, SessionReport};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = "customer> ";

/// Runs a local drive-thru conversation: one line per customer turn.
///
/// `/order` prints the current receipt, `/quit` or end of input closes the
/// session. A failed turn is reported and the conversation keeps going.
pub async fn run_console<R, W>(
    session: &DriveThruSession,
    input: R,
    out: &mut W,
) -> anyhow::Result<SessionReport>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    out.write_all(b"Welcome to Spice Route! Type your order, /order for the receipt, /quit to leave.\n")
        .await?;

    loop {
        out.write_all(PROMPT.as_bytes()).await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" => break,
            "/order" => {
                let receipt = session.desk().receipt().await;
                let json = serde_json::to_string_pretty(&receipt)?;
                out.write_all(format!("{}\n", json).as_bytes()).await?;
            }
            text => match session.handle_turn(text).await {
                Ok(reply) => {
                    out.write_all(format!("agent> {}\n", reply).as_bytes()).await?;
                }
                Err(e) => {
                    tracing::error!("Turn failed: {}", e);
                    out.write_all(format!("(the agent could not answer: {})\n", e).as_bytes())
                        .await?;
                }
            },
        }
    }

    let report = session.report().await;
    out.write_all(b"\n--- SESSION REPORT ---\n").await?;
    out.write_all(serde_json::to_string_pretty(&report)?.as_bytes())
        .await?;
    out.write_all(b"\n--- SESSION REPORT ---\n").await?;
    out.flush().await?;

    Ok(report)
}
