mod cli;

use clap::Parser;
use cli::{Args, Command};
use sqldraft::config::{Config, LogLevel};
use sqldraft::generator::GeneratorError;
use sqldraft::logging;
use sqldraft::output::{render_history, render_json, render_templates, render_text};
use sqldraft::service::ScriptService;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::debug;

/// Exit status when the request produced the no-match sentinel
const NO_MATCH_EXIT: u8 = 2;

fn load_config(args: &Args) -> Result<Config, GeneratorError> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if let Some(library) = &args.library {
        config.library_dir = library.clone();
    }
    if args.verbose {
        config.logging.level = LogLevel::Debug;
        config.logging.console_output = true;
    }
    Ok(config)
}

async fn run(args: Args, mut config: Config) -> Result<ExitCode, GeneratorError> {
    match args.command {
        Command::Generate {
            request,
            user,
            json,
            no_audit,
            no_notify,
        } => {
            config.audit.enabled &= !no_audit;
            config.notification.enabled &= !no_notify;

            let service = ScriptService::from_config(&config).await?;
            let user = user.unwrap_or_else(|| config.default_user.clone());
            let result = service.handle(&request.join(" "), &user).await?;

            if json {
                println!("{}", render_json(&result)?);
            } else {
                println!("{}", render_text(&result, std::io::stdout().is_terminal()));
            }

            Ok(if result.is_no_match() {
                ExitCode::from(NO_MATCH_EXIT)
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Templates => {
            config.audit.enabled = false;
            let service = ScriptService::from_config(&config).await?;
            let library = service.library().await?;
            println!("{}", render_templates(&library));
            Ok(ExitCode::SUCCESS)
        }
        Command::History { limit } => {
            config.notification.enabled = false;
            let service = ScriptService::from_config(&config).await?;
            println!("{}", render_history(&service.history(limit).await?));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        }
    };
    debug!("sqldraft started with {:?}", args);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: could not start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    let result = runtime.block_on(run(args, config));
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
