// Tabdock driver: restores a domain's panel layout, applies commands read from
// stdin one per line, and prints the workspace after each.

mod command;
mod shell;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tabdock_core::Domain;
use tabdock_session::{load_settings, FileStorage, WorkspaceSession};

use command::{Command, ParseCommandError};
use shell::Shell;

// ──────────────────────────────────────────────
// Arguments
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Options {
    domain: Domain,
    state_dir: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, Box<dyn Error>> {
    let mut options = Options {
        domain: Domain::Documents,
        state_dir: None,
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--domain" => {
                let name = args.next().ok_or("--domain needs a value")?;
                options.domain = Domain::from_name(&name).ok_or_else(|| format!("unknown domain '{name}'"))?;
            }
            "--state-dir" => {
                let dir = args.next().ok_or("--state-dir needs a value")?;
                options.state_dir = Some(PathBuf::from(dir));
            }
            other => return Err(format!("unexpected argument '{other}'").into()),
        }
    }
    Ok(options)
}

// ──────────────────────────────────────────────
// Entry point
// ──────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let options = parse_args(std::env::args().skip(1))?;
    let settings = load_settings();
    let storage = match options.state_dir.or_else(|| settings.state_dir.clone()) {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location().ok_or("cannot determine config directory")?,
    };
    log::info!("Layouts stored in {}", storage.dir().display());

    let session = WorkspaceSession::open(options.domain, storage);
    let mut shell = Shell::new(session, &settings);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", shell.render())?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseCommandError::Empty) => continue,
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if !shell.execute(command) {
            log::debug!("'{}' left the workspace unchanged", line.trim());
        }
        write!(out, "{}", shell.render())?;
        out.flush()?;
    }
    Ok(())
}
