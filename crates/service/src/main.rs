use clap::Parser;
use service::cli::Args;
use service::spawn_service;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = spawn_service(&config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
