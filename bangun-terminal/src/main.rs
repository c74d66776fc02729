//! Bangun Terminal - Rotating solid shapes
//!
//! Usage: bangun-terminal [shape-tag] [--config viewer.json] [--log bangun.log]
//!
//! Controls:
//!   - k/b/t/c/p/l: kubus, balok, tabung, kerucut, prisma, limas
//!   - 3-6: side count for prisma/limas
//!   - n: toggle the cube net
//!   - WASD / Arrow Keys: Rotate the shape
//!   - E/R: Roll rotation
//!   - Q/ESC: Quit

use bangun_core::ViewerConfig;
use bangun_terminal::TerminalApp;
use std::fs::{self, File};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    shape: Option<String>,
    config: Option<String>,
    log: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> io::Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--config" => &mut parsed.config,
            "--log" => &mut parsed.log,
            _ if arg.starts_with("--") => {
                return Err(invalid_input(format!("unknown option {arg}")));
            }
            _ => {
                parsed.shape = Some(arg);
                continue;
            }
        };
        let value = args
            .next()
            .ok_or_else(|| invalid_input(format!("{arg} expects a value")))?;
        *slot = Some(value);
    }
    Ok(parsed)
}

fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

/// Raw mode owns stdout, so logs only go to a file when asked for.
fn init_logging(path: &str) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(path: Option<&str>) -> io::Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("Failed to read config {path}: {e}")))?;
    ViewerConfig::from_json(&text).map_err(|e| invalid_input(e.to_string()))
}

fn main() -> io::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    if let Some(path) = args.log.as_deref() {
        init_logging(path)?;
    }

    let config = load_config(args.config.as_deref())?;
    tracing::info!(?config, "starting terminal viewer");

    let mut app = TerminalApp::new(config)?;
    if let Some(tag) = args.shape.as_deref() {
        app.preload(tag).map_err(|e| invalid_input(e.to_string()))?;
    }

    app.run()?;

    println!("Terima kasih!");
    Ok(())
}
