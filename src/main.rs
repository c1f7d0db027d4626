use anyhow::Result;
use benchskip::{
    cli::{Cli, Command, OutputFormat},
    config::SkipConfig,
    skiplist::{DuplicatePolicy, Exclusion, ExclusionStatus, SkipList},
};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for an excluded operator or implementation
const EXIT_EXCLUDED: u8 = 1;
/// Exit status when the skip list or config cannot be loaded
const EXIT_ERROR: u8 = 2;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else {
        // Duplicate-key warnings still reach stderr without --debug
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
            )
            .with_writer(std::io::stderr)
            .without_time()
            .init();
    }
}

/// Load the skip list from --skip-file, or by run mode through the config
fn load_skip_list(args: &Cli) -> Result<SkipList> {
    let mut config = match &args.config {
        Some(path) => SkipConfig::from_toml(path)?,
        None => SkipConfig::default(),
    };
    if args.strict {
        config.duplicate_keys = DuplicatePolicy::Reject;
    }

    match &args.skip_file {
        Some(path) => Ok(SkipList::from_file(path, &config.load_options())?),
        None => config.load_for_mode(args.mode.as_deref()),
    }
}

/// Answer a single operator/implementation query
fn run_check(
    skips: &SkipList,
    operator: &str,
    implementation: Option<&str>,
    format: OutputFormat,
) -> Result<bool> {
    let status = skips.status(operator);
    let active = match implementation {
        Some(implementation) => skips.is_active(operator, implementation),
        None => !skips.is_operator_excluded(operator),
    };

    match format {
        OutputFormat::Text => {
            let verdict = if active { "active" } else { "excluded" };
            match implementation {
                Some(implementation) => {
                    println!("{}: {}/{} ({})", verdict, operator, implementation, status)
                }
                None => println!("{}: {} ({})", verdict, operator, status),
            }
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "operator": operator,
                "implementation": implementation,
                "status": status,
                "active": active,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(active)
}

fn print_list(skips: &SkipList, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for entry in skips.iter() {
                match entry.exclusion {
                    Exclusion::Entire => println!("{} (entire operator)", entry.operator),
                    Exclusion::Implementations(_) => {
                        println!("{}", entry.operator);
                        for implementation in entry.exclusion.sorted_implementations() {
                            println!("  - {}", implementation);
                        }
                    }
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&skips.sorted())?);
        }
    }
    Ok(())
}

fn print_summary(skips: &SkipList) {
    let entire = skips
        .operators()
        .into_iter()
        .filter(|op| skips.status(op) == ExclusionStatus::Entire)
        .count();
    println!(
        "OK: {} operators ({} entire, {} partial)",
        skips.len(),
        entire,
        skips.len() - entire
    );
}

fn run(args: Cli) -> Result<ExitCode> {
    let skips = load_skip_list(&args)?;

    let code = match args.command {
        Command::Check {
            operator,
            implementation,
            format,
        } => {
            if run_check(&skips, &operator, implementation.as_deref(), format)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_EXCLUDED)
            }
        }
        Command::List { format } => {
            print_list(&skips, format)?;
            ExitCode::SUCCESS
        }
        Command::Validate => {
            print_summary(&skips);
            ExitCode::SUCCESS
        }
        Command::Fmt => {
            print!("{}", skips.to_yaml_string()?);
            ExitCode::SUCCESS
        }
    };
    Ok(code)
}

fn main() -> ExitCode {
    let args = Cli::parse();

    init_tracing(args.debug);

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
