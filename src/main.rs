use banter::core::config::{self, ResolvedConfig};
use banter::core::script::Script;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "banter", about = "Scripted conversational chat screen for the terminal")]
struct Args {
    /// Script to present (defaults to BANTER_SCRIPT, the config file, then the built-in welcome)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Where to write the debug log
    #[arg(long, default_value = "banter.log")]
    log_file: PathBuf,

    /// Validate the configuration and script, then exit without opening the screen
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize file logger; the terminal belongs to the chat screen
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Banter starting up");

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("banter: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(&file_config, args.script.as_deref());

    let script = match load_script(&resolved) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("banter: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.check {
        let source = resolved
            .script_path
            .as_ref()
            .map_or_else(|| "built-in welcome".to_string(), |p| p.display().to_string());
        println!(
            "{source}: {} steps, {} prompts, pace {}ms",
            script.steps.len(),
            script.prompt_count(),
            script.pace.as_millis()
        );
        return ExitCode::SUCCESS;
    }

    match banter::tui::run(resolved, script) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal error: {}", e);
            eprintln!("banter: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_script(resolved: &ResolvedConfig) -> Result<Script, banter::core::script::ScriptError> {
    match &resolved.script_path {
        Some(path) => Script::load(path),
        None => Script::welcome(),
    }
}
