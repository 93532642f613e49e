//! Command-line front end: runs captured request files through editor tabs.
//!
//! Every file gets its own [`EditorTab`], spawned as a concurrent task, and all
//! tabs share one [`OverrideStore`]. The rewritten requests are collected and
//! written out in argument order once every task has finished.
//!
//! The same `--overrides` text is entered into every tab, and the store starts
//! empty at each run, so recall never changes what the command line produces.
//! A tab only applies recalled text when it is handed a store that was seeded
//! beforehand, as [`edit_request`] allows.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_std::{fs, task};
use clap::Parser;
use tracing::{debug, info, warn};

use crate::cookie::Outcome;
use crate::editor::EditorTab;
use crate::store::OverrideStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "cookieswap")]
pub struct Cli {
    /// Overrides the config's log_level; defaults to info
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON array of {"name", "value"} objects to apply to every request
    #[arg(short, long)]
    pub overrides: Option<PathBuf>,

    /// Raw HTTP request files
    #[arg(required = true)]
    pub requests: Vec<PathBuf>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let overrides = match &cli.overrides {
        Some(path) => Some(
            fs::read_to_string(path)
                .await
                .with_context(|| format!("reading overrides from {}", path.display()))?,
        ),
        None => None,
    };

    let store = Arc::new(OverrideStore::new());
    let messages = edit_requests(&store, &cli.requests, overrides).await?;

    write_messages(&mut std::io::stdout().lock(), &messages)?;

    info!(hosts = ?store.hosts(), "remembered overrides");
    Ok(())
}

/// Runs every file through its own tab and returns the messages in `paths` order.
pub async fn edit_requests(
    store: &Arc<OverrideStore>,
    paths: &[PathBuf],
    overrides: Option<String>,
) -> Result<Vec<Vec<u8>>> {
    // One tab per request, all sharing the same store
    let handles: Vec<_> = paths
        .iter()
        .cloned()
        .map(|path| {
            let store = Arc::clone(store);
            let overrides = overrides.clone();
            task::spawn(async move { edit_request(store, &path, overrides.as_deref()).await })
        })
        .collect();

    let mut messages = Vec::with_capacity(handles.len());
    for handle in handles {
        messages.push(handle.await?);
    }
    Ok(messages)
}

/// Runs one request through an editor tab and returns the message it ends up with.
///
/// `overrides`, when given, replaces whatever the tab recalled for the host.
/// With no text at all the request is returned as read.
pub async fn edit_request(
    store: Arc<OverrideStore>,
    path: &Path,
    overrides: Option<&str>,
) -> Result<Vec<u8>> {
    let raw = fs::read(path)
        .await
        .with_context(|| format!("reading request from {}", path.display()))?;

    let mut tab = EditorTab::new(store);
    tab.set_message(Some(&raw[..]));
    if let Some(text) = overrides {
        tab.set_text(text);
    }

    let path = path.display();
    if tab.text().is_empty() {
        debug!(%path, "no overrides to apply");
        return Ok(raw);
    }

    match tab.apply() {
        Some(Outcome::NoCookieHeader) => debug!(%path, "no Cookie header, left unchanged"),
        Some(Outcome::InvalidOverridePayload) => warn!(%path, "overrides rejected"),
        Some(Outcome::Applied) | None => {}
    }

    Ok(tab.message().map(<[u8]>::to_vec).unwrap_or(raw))
}

pub fn write_messages<W: Write>(out: &mut W, messages: &[Vec<u8>]) -> std::io::Result<()> {
    for message in messages {
        out.write_all(message)?;
    }
    out.flush()
}
