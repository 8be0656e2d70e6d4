use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use blocksync::kernel::services::adapters::{load_settings, write_default_settings};
use blocksync::kernel::services::ports::Settings;
use blocksync::replay;

mod logging;

const USAGE: &str = "usage: blocksync <script.json> [--settings <file>] [--log-dir <dir>]\n       blocksync --write-settings <file>";

struct CliArgs {
    script: Option<PathBuf>,
    settings: Option<PathBuf>,
    write_settings: Option<PathBuf>,
    log_dir: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut script = None;
    let mut settings = None;
    let mut write_settings = None;
    let mut log_dir = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let value = args.next().ok_or("--settings needs a file")?;
                settings = Some(PathBuf::from(value));
            }
            "--write-settings" => {
                let value = args.next().ok_or("--write-settings needs a file")?;
                write_settings = Some(PathBuf::from(value));
            }
            "--log-dir" => {
                let value = args.next().ok_or("--log-dir needs a directory")?;
                log_dir = Some(PathBuf::from(value));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ if script.is_none() => script = Some(PathBuf::from(&arg)),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }

    if script.is_none() && write_settings.is_none() {
        return Err(USAGE.to_string());
    }
    Ok(CliArgs {
        script,
        settings,
        write_settings,
        log_dir,
    })
}

fn load_script(path: &Path) -> io::Result<replay::ReplayScript> {
    let data = std::fs::read_to_string(path)?;
    replay::parse_script(&data).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {}", path.display(), err),
        )
    })
}

fn run(args: &CliArgs) -> io::Result<bool> {
    if let Some(path) = &args.write_settings {
        write_default_settings(path)?;
        tracing::info!(path = %path.display(), "default settings written");
    }
    let Some(script_path) = &args.script else {
        return Ok(true);
    };

    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    let script = load_script(script_path)?;

    let report = replay::run(&script, &settings)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for op in &report.ops {
        serde_json::to_writer(&mut out, op)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    for (index, error) in &report.errors {
        eprintln!("step {index}: {error}");
    }
    Ok(report.errors.is_empty())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let logging = logging::init(args.log_dir.as_deref());

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %err, "replay failed");
            eprintln!("blocksync: {err}");
            if let Some(dir) = logging.as_ref().and_then(|guard| guard.log_dir()) {
                eprintln!("logs: {}", dir.display());
            }
            ExitCode::FAILURE
        }
    }
}
