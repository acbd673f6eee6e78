//! Gatekeep CLI (`gk`)
//!
//! 서버 없이 필터 컴파일 결과와 액션 규칙 판정을 확인하는 도구입니다.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "gk")]
#[command(author, version, about = "Gatekeep CLI - JSON filters and action rulesets", long_about = None)]
struct Cli {
    /// Entity schema file (overrides GK_SCHEMA_PATH)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Rulesets file (overrides GK_RULESETS_PATH)
    #[arg(long, global = true)]
    rulesets: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    // ─────────────────────────────────────────────────────────────────────────
    // Filter
    // ─────────────────────────────────────────────────────────────────────────
    /// Compile and evaluate JSON filters
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Policy
    // ─────────────────────────────────────────────────────────────────────────
    /// Evaluate action rulesets
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },
}

#[derive(Subcommand)]
enum FilterAction {
    /// Compile a filter to parameterized SQL
    Compile {
        /// Root entity tag
        #[arg(long, default_value = "appointment")]
        entity: String,

        /// Filter document (JSON object)
        filter: String,
    },

    /// Show the predicate tree a filter compiles to
    Explain {
        /// Root entity tag
        #[arg(long, default_value = "appointment")]
        entity: String,

        /// Filter document (JSON object)
        filter: String,
    },

    /// Apply a filter to JSON records in memory
    Match {
        /// Root entity tag
        #[arg(long, default_value = "appointment")]
        entity: String,

        /// Filter document (JSON object)
        filter: String,

        /// JSON file with an array of records
        #[arg(long)]
        records: PathBuf,
    },
}

#[derive(Subcommand)]
enum PolicyAction {
    /// Check whether a subject may perform an action
    Check {
        /// Action name
        #[arg(long)]
        action: String,

        /// Subject attributes file (JSON or YAML)
        #[arg(long)]
        subject: PathBuf,
    },

    /// List supported rule operators
    Operators,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // stdout은 명령 출력 전용
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::resolve(cli.schema, cli.rulesets);
    let format = cli.format;

    match cli.command {
        Commands::Filter { action } => {
            match action {
                FilterAction::Compile { entity, filter } => {
                    commands::filter::compile(&config, &entity, &filter, format)?
                }
                FilterAction::Explain { entity, filter } => {
                    commands::filter::explain(&config, &entity, &filter, format)?
                }
                FilterAction::Match {
                    entity,
                    filter,
                    records,
                } => commands::filter::match_records(&config, &entity, &filter, &records, format)?,
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Policy { action } => match action {
            PolicyAction::Check { action, subject } => {
                let allowed = commands::policy::check(&config, &action, &subject, format)?;
                Ok(if allowed {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                })
            }
            PolicyAction::Operators => {
                commands::policy::operators(format)?;
                Ok(ExitCode::SUCCESS)
            }
        },
    }
}
