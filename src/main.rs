use clap::Parser;

use adscope::cli::{Cli, Commands, ConfigCommands};
use adscope::config::{DEFAULT_CONFIG_PATH, get_config, init_config_from};
use adscope::runtime::modes;
use adscope::system::logging::init_logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 生成配置不需要加载配置和日志
    if let Commands::Config {
        action: ConfigCommands::Generate { output, force },
    } = cli.command()
    {
        if let Err(e) = modes::generate_config(output.clone(), *force) {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_config_from(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));
    let config = get_config();

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command() {
        Commands::Seed => modes::run_seed().await,
        _ => modes::run_server().await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<adscope::errors::AdscopeError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}
