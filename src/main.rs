use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;

use swagger_merge::merger::{self, MergeConfig, MergeOptions};
use swagger_merge::parser::parse_public_operations;

/// Merge Swagger 2.0 JSON files with security definitions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Glob pattern for input swagger files
    #[arg(long = "input-dir")]
    input_dir: String,

    /// Output file path
    #[arg(long)]
    output: PathBuf,

    /// API title
    #[arg(long)]
    title: String,

    /// API description
    #[arg(long, default_value = "")]
    description: String,

    /// API host
    #[arg(long, default_value = "localhost:8080")]
    host: String,

    /// API version written to info.version
    #[arg(long = "api-version", default_value = "1.0.0")]
    api_version: String,

    /// Comma-separated operationIds that don't require auth
    #[arg(long = "public-operations", default_value = "")]
    public_operations: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = Env::default().filter_or("RUST_LOG", if cli.verbose { "debug" } else { "info" });
    env_logger::init_from_env(env);

    debug!("Input pattern: {}", cli.input_dir);
    debug!("Output file: {:?}", cli.output);

    let config = MergeConfig {
        input_pattern: cli.input_dir,
        output: cli.output,
        options: MergeOptions {
            title: cli.title,
            description: cli.description,
            host: cli.host,
            version: cli.api_version,
            public_operations: parse_public_operations(&cli.public_operations),
        },
    };

    let summary = merger::merge(&config)?;

    println!("{}", summary);
    println!("Output: {}", config.output.display());

    Ok(())
}
