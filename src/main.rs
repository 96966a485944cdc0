use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use harextractor::{Cli, HarExtractError, HarExtractor, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // clap cannot require an arg group only when --generate-config is absent.
    let Some(request) = cli.extraction_request() else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "one of --all, --b64, --nb64 or --type is required",
            )
            .exit()
    };

    let extractor = match HarExtractor::from_cli(&cli) {
        Ok(extractor) => extractor,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    match extractor.run(&request) {
        Ok(report) => {
            extractor.output_formatter().print_extraction_report(&report);
            0
        }
        Err(e) => {
            log::debug!("Run failed: {:?}", e);
            extractor.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "harextractor.toml".to_string());

    match HarExtractor::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  harextractor --file capture.har --all --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &HarExtractError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "harextractor=warn",
        1 => "harextractor=info",
        2 => "harextractor=debug",
        _ => "harextractor=trace",
    }
}

fn setup_logging(verbosity: u8) {
    // RUST_LOG still wins when set.
    let env = env_logger::Env::default().default_filter_or(log_filter(verbosity));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
