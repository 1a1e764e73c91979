use clap::Parser;
use fund_treemap::config::toml_config::{DisplayConfig, TomlConfig};
use fund_treemap::core::ConfigProvider;
use fund_treemap::utils::error::ErrorSeverity;
use fund_treemap::utils::{logger, validation::Validate};
use fund_treemap::{LocalStorage, TreemapEngine, TreemapPipeline, ValueFormat};

#[derive(Parser)]
#[command(name = "toml-treemap")]
#[command(about = "Render a fund treemap from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "treemap.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the display format from config
    #[arg(long, value_enum)]
    format: Option<ValueFormat>,

    /// Validate the configuration and print a summary without rendering
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(format) = args.format {
        let display = config.display.get_or_insert_with(DisplayConfig::default);
        display.format = Some(format.as_str().to_string());
        tracing::info!("🔧 Display format overridden to: {:?}", format);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be rendered");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TreemapPipeline::new(storage, config);
    let engine = TreemapEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Treemap generated");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Treemap build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    let settings = config.chart_settings();
    let size = config.chart_size();

    tracing::info!("📋 Configuration Summary:");
    match config.source() {
        Ok(source) => tracing::info!("  Source: {}", source),
        Err(e) => tracing::warn!("  Source: {}", e),
    }
    tracing::info!(
        "  Keys: name='{}', scale='{}'",
        settings.name_key,
        settings.scale_key
    );
    tracing::info!("  Format: {:?}", settings.format);
    tracing::info!("  Size: {}x{}", size.width, size.height);
    tracing::info!("  Output: {} {:?}", config.output_path(), config.output_formats());
}
