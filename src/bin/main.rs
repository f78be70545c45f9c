//! Cubist CLI - serve the cube API or compile requests to MDX
//!
//! Usage:
//!   cubist serve [--port <port>] [--config <file>]
//!   cubist compile <request.json> [--cube <name>]
//!   cubist validate <request.json>
//!   cubist metadata
//!
//! Examples:
//!   cubist serve --port 5000
//!   cubist compile demos/top_stores.json
//!   cubist compile demos/drill.json --cube Sales

use clap::{Parser, Subcommand};
use cubist::compile::{compile, CompileOptions};
use cubist::config::Settings;
use cubist::metadata;
use cubist::request::{validate, QueryRequest};
use cubist::web;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cubist")]
#[command(about = "Cubist - An analytical cube service that compiles requests to MDX")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service
    Serve {
        /// Port to bind (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a cubist.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Compile a request file to MDX and print it
    Compile {
        /// Path to a JSON query request
        file: PathBuf,

        /// Cube name to compile against (overrides configuration)
        #[arg(long)]
        cube: Option<String>,
    },

    /// Validate a request file without generating MDX
    Validate {
        /// Path to a JSON query request
        file: PathBuf,
    },

    /// Print the published cube catalog as JSON
    Metadata,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let mut settings = match load_settings(config) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Some(port) = port {
                settings.server.port = port;
            }

            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    eprintln!("Failed to start runtime: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            match runtime.block_on(web::serve(settings)) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Server error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Compile { file, cube } => {
            let request = match read_request(&file) {
                Ok(request) => request,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };

            let mut options = match load_settings(None) {
                Ok(settings) => CompileOptions::default().with_cube(&settings.cube.name),
                Err(_) => CompileOptions::default(),
            };
            if let Some(cube) = cube {
                options = options.with_cube(&cube);
            }

            match compile(&request, &options) {
                Ok(output) => {
                    println!("{}", output.mdx);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Compilation error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Validate { file } => {
            let request = match read_request(&file) {
                Ok(request) => request,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };

            match validate(&request) {
                Ok(()) => {
                    println!("Request is valid");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Invalid request: {}", e);
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Metadata => match serde_json::to_string_pretty(&metadata::published()) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to render metadata: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings, cubist::config::SettingsError> {
    match config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn read_request(file: &PathBuf) -> Result<QueryRequest, String> {
    let content =
        fs::read_to_string(file).map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse request: {}", e))
}
