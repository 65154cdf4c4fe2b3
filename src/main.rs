use clap::Parser;

use tinylink::config::{Cli, Commands, StaticConfig, init_config};
use tinylink::runtime::run_server;
use tinylink::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output }) = &cli.command {
        match output {
            Some(path) => {
                StaticConfig::default()
                    .save_to_file(path)
                    .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
                println!("Sample configuration written to {}", path);
            }
            None => println!("{}", StaticConfig::generate_sample_config()),
        }
        return Ok(());
    }

    let mut config = match StaticConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);
    init_config(config.clone());

    // guard 必须存活到进程结束
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    run_server(&config, cli.seed_demo).await
}
