//! Copies input lines into the rotating writer.

use std::sync::Arc;

use platform_rotatelog::RotatingWriter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, info, warn};

use crate::error::PipeError;

/// Control messages from signal handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch to a new file now.
    Rotate,
    /// Stop reading and return.
    Shutdown,
}

/// Counters reported when the pump stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Lines written
    pub lines: u64,
    /// Bytes written, newlines included
    pub bytes: u64,
    /// Lines dropped because the write failed
    pub failed: u64,
    /// Explicit rotations performed
    pub rotations: u64,
}

/// Copy lines from `input` into `writer` until end of input or
/// [`Command::Shutdown`].
///
/// Writes and rotations do blocking file I/O and run on the blocking pool,
/// one at a time and in input order. Write failures are logged and counted;
/// they do not stop the pump.
///
/// # Errors
///
/// Returns [`PipeError::Read`] if reading the input fails.
pub async fn pump<R>(
    input: R,
    writer: Arc<RotatingWriter>,
    mut commands: mpsc::Receiver<Command>,
) -> Result<PumpStats, PipeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut stats = PumpStats::default();
    let mut commands_open = true;

    loop {
        tokio::select! {
            command = commands.recv(), if commands_open => match command {
                Some(Command::Rotate) => {
                    let sink = Arc::clone(&writer);
                    match task::spawn_blocking(move || sink.rotate()).await {
                        Ok(Ok(())) => {
                            stats.rotations += 1;
                            info!(file = ?writer.current_file_name(), "rotated on request");
                        }
                        Ok(Err(err)) => warn!(error = %err, "requested rotation failed"),
                        Err(err) => warn!(error = %err, "rotation task failed"),
                    }
                }
                Some(Command::Shutdown) => {
                    info!("shutdown requested");
                    break;
                }
                None => commands_open = false,
            },
            line = lines.next_line() => match line.map_err(PipeError::Read)? {
                Some(mut line) => {
                    line.push('\n');
                    let sink = Arc::clone(&writer);
                    match task::spawn_blocking(move || sink.write(line.as_bytes())).await {
                        Ok(Ok(n)) => {
                            stats.lines += 1;
                            stats.bytes += n as u64;
                        }
                        Ok(Err(err)) => {
                            stats.failed += 1;
                            warn!(error = %err, "dropped input line");
                        }
                        Err(err) => {
                            stats.failed += 1;
                            warn!(error = %err, "write task failed");
                        }
                    }
                }
                None => {
                    debug!("end of input");
                    break;
                }
            },
        }
    }

    Ok(stats)
}
