mod paths;
mod settings;
mod shell;

use std::env;
use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use retouch_preview::PreviewWriter;

use crate::settings::Settings;
use crate::shell::Shell;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let settings = Settings::load()?;
    let preview_dir = settings.preview_dir();
    let viewer = PreviewWriter::new(preview_dir.clone())?;
    info!(?preview_dir, "previews will be written here");

    let cwd = env::current_dir().context("resolve working directory")?;
    let mut shell = Shell::new(settings.session, viewer, cwd);
    shell.run(io::stdin().lock(), io::stdout().lock())
}
