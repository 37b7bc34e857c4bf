//! pagelib - prerender entry point

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use pagelib_cli::{load_config, prerender, Args, Command, USAGE};
use pagelib_transform::TransformConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the HTML
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Command::parse(std::env::args().skip(1))? {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Prerender(args) => run(&args),
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            load_config(&json).with_context(|| format!("loading config {}", path.display()))?
        }
        None => TransformConfig::default(),
    };

    let html = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    tracing::info!(input = %args.input.display(), bytes = html.len(), "prerendering");

    let (markup, _) = prerender(&html, &config)?;

    match &args.output {
        Some(path) => fs::write(path, markup).with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(markup.as_bytes()).context("writing to stdout")?;
            stdout.flush().context("writing to stdout")?;
        }
    }
    Ok(())
}
