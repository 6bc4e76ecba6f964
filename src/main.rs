use anyhow::Context;
use clap::Parser;
use rescue_match::{build_pipeline, cli, config, directory, image_payload, server};
use cli::{Cli, Commands};
use config::Config;
use rescue_match_common::parse_location;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let provider = cli.ai_provider.unwrap_or(config.ai_provider);

    match cli.command {
        Commands::Serve { bind, directory } => {
            let directory_path = directory.unwrap_or_else(|| config.directory_path.clone());
            let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());

            tracing::info!(provider = %provider, directory = %directory_path.display(), "Starting rescue-match server");
            let pipeline = build_pipeline(&config, provider, &directory_path)
                .context("Failed to build matching pipeline")?;

            let router = server::create_router(server::AppState { pipeline }, config.max_body_bytes);
            server::serve(router, &bind_addr).await?;
        }

        Commands::Match { image, location, directory, output } => {
            println!("🦊 rescue-match - マッチング\n");

            let directory_path = directory.unwrap_or_else(|| config.directory_path.clone());
            let location = parse_location(&serde_json::Value::String(location))?;
            let image = image_payload::ImagePayload::from_file(&image)
                .with_context(|| format!("Failed to read image: {}", image.display()))?;

            let pipeline = build_pipeline(&config, provider, &directory_path)?;
            let response = pipeline.run(&image, location, None).await?;
            let json = serde_json::to_string_pretty(&response)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("✔ 結果を保存: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  プロバイダ: {}", config.ai_provider);
                println!("  モデル: {}", config.model);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  ディレクトリ: {}", config.directory_path.display());
                println!("  待ち受け: {}", config.bind_addr);
                println!("  最大件数: {}", config.max_results);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Directory { directory } => {
            let directory_path = directory.unwrap_or_else(|| config.directory_path.clone());
            let directory = directory::JsonDirectory::load(&directory_path)?;

            println!("団体ディレクトリ: {} ({}件)", directory_path.display(), directory.len());
            for entry in directory.entries() {
                let located = if entry.profile.coordinate.is_some() { "📍" } else { "  " };
                println!("  {} {}", located, entry.profile.name);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
