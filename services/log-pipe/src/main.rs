//! log-pipe - Main Entry Point

use std::sync::Arc;

use anyhow::Context;
use log_pipe::{Command, PipeConfig, pump};
use platform_rotatelog::{RotatingWriter, RotationEvent, init_tracing};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match PipeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            let coded = err.to_code_error();
            eprintln!("log-pipe: {coded}");
            return Err(err).context("loading configuration");
        }
    };
    init_tracing(&config.tracing, None).context("initializing tracing")?;

    let rotate = config
        .rotate
        .clone()
        .into_config()
        .with_handler(|event: &RotationEvent| {
            info!(previous = ?event.previous(), current = %event.current().display(), "log file rotated");
        });
    let writer = Arc::new(RotatingWriter::new(rotate).context("creating rotating writer")?);

    info!(pattern = %config.rotate.pattern, "Starting log-pipe");

    let (tx, rx) = mpsc::channel(8);
    spawn_signal_handlers(tx);

    let stats = pump(BufReader::new(tokio::io::stdin()), Arc::clone(&writer), rx).await;

    if let Err(err) = writer.close() {
        warn!(error = %err, "failed to close log file");
    }

    match stats {
        Ok(stats) => {
            info!(
                lines = stats.lines,
                bytes = stats.bytes,
                failed = stats.failed,
                rotations = stats.rotations,
                "log-pipe stopped"
            );
            Ok(())
        }
        Err(err) => {
            let coded = err.to_code_error();
            error!(code = coded.code(), error = %err, "log-pipe failed");
            Err(err.into())
        }
    }
}

fn spawn_signal_handlers(tx: mpsc::Sender<Command>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let hup_tx = tx.clone();
        tokio::spawn(async move {
            let mut hangup = match signal(SignalKind::hangup()) {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(error = %err, "SIGHUP handler unavailable");
                    return;
                }
            };
            while hangup.recv().await.is_some() {
                if hup_tx.send(Command::Rotate).await.is_err() {
                    break;
                }
            }
        });
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Command::Shutdown).await;
        }
    });
}
