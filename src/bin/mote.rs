use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use dev_server::config::load_mote_targets;
use dev_server::mote::MoteTask;
use dev_server::observability::logging;

#[derive(Parser)]
#[command(name = "mote")]
#[command(about = "Precompile mote templates into a namespaced JavaScript file", long_about = None)]
struct Cli {
    /// Config file holding the `[mote.<target>]` tables.
    #[arg(short, long, default_value = "devserver.toml")]
    config: PathBuf,

    /// Targets to build. All targets when empty.
    targets: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init("info");

    let targets = match load_mote_targets(&cli.config) {
        Ok(targets) => targets,
        Err(e) => {
            tracing::error!(config = %cli.config.display(), error = %e, "Failed to load mote targets");
            return ExitCode::FAILURE;
        }
    };

    let selected: Vec<_> = if cli.targets.is_empty() {
        targets.into_iter().collect()
    } else {
        let mut selected = Vec::new();
        for name in &cli.targets {
            match targets.get(name) {
                Some(target) => selected.push((name.clone(), target.clone())),
                None => {
                    tracing::error!(target = %name, "Unknown mote target");
                    return ExitCode::FAILURE;
                }
            }
        }
        selected
    };

    for (name, target) in selected {
        let result = MoteTask::new(target).and_then(|task| task.run());
        if let Err(e) = result {
            tracing::error!(target = %name, error = %e, "Template compilation failed");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
