//! `totpvault watch`: live codes driven by one shared countdown.
//!
//! Each credential gets a `LiveCode` on its own task; the tasks push fresh
//! codes over a channel and the display redraws on every countdown tick.
//! All leases are dropped on Ctrl-C, which stops the ticker.

use std::sync::Arc;

use console::Term;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cli::output;
use crate::cli::{find_credential, open_store, Cli};
use crate::config::Settings;
use crate::errors::{Result, TotpVaultError};
use crate::otp::{Countdown, LiveCode, SystemClock};
use crate::store::{Credential, CredentialRepository};

struct Row {
    name: String,
    code: String,
}

/// Execute the `watch` command.
pub fn execute(cli: &Cli, names: &[String]) -> Result<()> {
    let (settings, repo) = open_store(cli)?;

    let credentials = if names.is_empty() {
        repo.list()?
    } else {
        names
            .iter()
            .map(|n| find_credential(&repo, n))
            .collect::<Result<Vec<_>>>()?
    };

    if credentials.is_empty() {
        output::info("No credentials to watch.");
        output::tip("Run `totpvault add <NAME> <SECRET>` to add one.");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| TotpVaultError::CommandFailed(format!("failed to start runtime: {e}")))?;

    runtime.block_on(run(&settings, credentials))
}

async fn run(settings: &Settings, credentials: Vec<Credential>) -> Result<()> {
    let countdown = Countdown::with_clock(
        settings.period,
        settings.tick_interval(),
        Arc::new(SystemClock),
    );

    let (tx, mut rx) = mpsc::channel::<(usize, String)>(credentials.len().max(1));
    let mut rows = Vec::with_capacity(credentials.len());
    let mut workers: Vec<JoinHandle<()>> = Vec::with_capacity(credentials.len());

    for (index, credential) in credentials.into_iter().enumerate() {
        let mut live = LiveCode::new(credential.secret, settings.digits, countdown.attach()?);
        rows.push(Row {
            name: credential.name,
            code: live.code().to_string(),
        });

        let tx = tx.clone();
        workers.push(tokio::spawn(async move {
            while let Some(code) = live.next().await {
                if tx.send((index, code.to_string())).await.is_err() {
                    break;
                }
            }
        }));
    }
    drop(tx);

    let mut display = countdown.attach()?;
    let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let term = Term::stdout();
    let mut drawn = 0;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    debug!(rows = rows.len(), consumers = countdown.consumers(), "watch started");

    loop {
        if drawn > 0 {
            term.clear_last_lines(drawn)?;
        }
        let snapshot = display.snapshot();
        for row in &rows {
            term.write_line(&output::watch_line(&row.name, name_width, &row.code, &snapshot))?;
        }
        drawn = rows.len();

        tokio::select! {
            _ = &mut shutdown => break,
            Some((index, code)) = rx.recv() => {
                if let Some(row) = rows.get_mut(index) {
                    row.code = code;
                }
            }
            tick = display.changed() => {
                if tick.is_none() {
                    break;
                }
            }
        }
    }

    for worker in &workers {
        worker.abort();
    }
    for worker in workers {
        // Aborted tasks resolve to a cancellation error; the lease inside
        // is dropped either way.
        let _ = worker.await;
    }
    drop(display);

    debug!(ticking = countdown.is_ticking(), "watch stopped");
    Ok(())
}
