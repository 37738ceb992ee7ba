use clap::{Arg, Command};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = Command::new("Student Data Pipeline")
        .version("1.0")
        .about("Event-triggered ETL from object storage into the warehouse")
        .subcommand(
            Command::new("serve")
                .about("Run the pipeline trigger server")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("Sets a custom config file"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("serve", serve_matches)) => {
            let config_path = serve_matches
                .get_one::<String>("config")
                .map(|s| s.as_str())
                .unwrap_or("config/pipeline.toml");

            if let Err(e) = pipeline::run_pipeline_server(config_path).await {
                eprintln!("Pipeline server error: {}", e);
                process::exit(1);
            }
        }
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
            process::exit(1);
        }
    }
}
