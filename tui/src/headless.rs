//! Headless mode
//!
//! Drives the Conductor from a line-oriented script instead of a terminal.
//! Every line is submitted as input; once a sequence starts the virtual
//! clock is advanced in frame-sized steps until the scene settles, so a
//! whole launch replays instantly. Each `ConductorMessage` is written as
//! one JSON line.

use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use mosaic_conductor::{LaunchConfig, SceneState};

use crate::conductor_client::ConductorClient;

/// Virtual frame length used to advance the clock
pub const FRAME: Duration = Duration::from_millis(16);

/// Summary of a headless run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HeadlessReport {
    /// Lines read from the script
    pub lines_read: usize,
    /// Messages written
    pub messages_written: usize,
    /// Scene state at the end
    pub final_state: SceneState,
}

/// Run a script against a fresh Conductor
pub async fn run_script<R, W>(
    config: &LaunchConfig,
    reader: R,
    writer: &mut W,
) -> Result<HeadlessReport>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut client = ConductorClient::new(config);
    let mut report = HeadlessReport::default();
    let max_frames = frames_to_settle(config);

    report.messages_written += flush(&mut client, writer).await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        report.lines_read += 1;
        if let Err(e) = client.submit(&line) {
            // The rejection also arrives as a Notify message.
            tracing::debug!(error = %e, input = %line, "input rejected");
        }

        let mut frames = 0;
        while client.state() != SceneState::Interactive
            && !client.state().is_terminal()
            && frames < max_frames
        {
            client.advance(FRAME);
            frames += 1;
        }
        if frames > 0 {
            tracing::info!(frames, state = %client.state(), "clock advanced");
        }

        report.messages_written += flush(&mut client, writer).await?;
    }

    client.teardown();
    writer.flush().await?;
    report.final_state = client.state();
    Ok(report)
}

/// Run against stdin and stdout
pub async fn run(config: &LaunchConfig) -> Result<HeadlessReport> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_script(config, stdin, &mut stdout).await
}

/// Upper bound on frames from trigger to reveal, with slack for rounding
fn frames_to_settle(config: &LaunchConfig) -> u32 {
    let total = config.timings.total_duration().as_millis();
    let frame = FRAME.as_millis();
    u32::try_from(total.div_ceil(frame)).unwrap_or(u32::MAX).saturating_add(2)
}

async fn flush<W: AsyncWrite + Unpin>(client: &mut ConductorClient, writer: &mut W) -> Result<usize> {
    let messages = client.recv_all();
    for msg in &messages {
        let json = msg.to_json()?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    Ok(messages.len())
}
