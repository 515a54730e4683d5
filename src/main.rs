use clap::Parser;
use pool_standings::config::SourceConfig;
use pool_standings::core::ConfigProvider;
use pool_standings::utils::error::RankingError;
use pool_standings::utils::{logger, validation::Validate};
use pool_standings::{CliConfig, DataSource, LocalStorage, RankingService, TomlConfig};

struct RunOptions {
    monitor: bool,
    print: bool,
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let outcome = match cli.config.clone() {
        Some(path) => {
            // TOML 設定優先於命令列旗標
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    logger::init_logger(cli.verbose, cli.json_logs);
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            logger::init_logger(cli.verbose, cli.json_logs || config.json_logs());
            tracing::info!("📁 Loaded configuration from: {}", path);

            let options = RunOptions {
                monitor: cli.monitor || config.monitoring_enabled(),
                print: cli.print,
                dry_run: cli.dry_run,
            };
            let source = config.source.clone();
            execute(config, source, options).await
        }
        None => {
            logger::init_logger(cli.verbose, cli.json_logs);
            let options = RunOptions {
                monitor: cli.monitor,
                print: cli.print,
                dry_run: cli.dry_run,
            };
            let source = cli.source_config();
            execute(cli, source, options).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Standings run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.severity().exit_code());
    }

    Ok(())
}

async fn execute<C>(config: C, source: SourceConfig, options: RunOptions) -> Result<(), RankingError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    tracing::info!("✅ Configuration validated");

    if options.dry_run {
        print_plan(&config, &source);
        return Ok(());
    }

    let data_source = DataSource::from_config(&source)?;
    let storage = LocalStorage::new(config.output_path());
    let service = RankingService::new_with_monitoring(data_source, storage, options.monitor);

    let run = service.run(&config).await?;

    if options.print {
        print!("{}", run.table.to_text());
    }
    if !run.anomalies.is_empty() {
        println!("⚠️ {} data issue(s) found, see log for details", run.anomalies.len());
    }
    for path in &run.written {
        println!("📁 Output saved to: {}", path);
    }

    Ok(())
}

fn print_plan<C: ConfigProvider>(config: &C, source: &SourceConfig) {
    println!("📋 Standings plan:");
    println!("  Scope: {}", config.scope());
    println!("  Policy: {}", config.policy());
    match (&source.base_url, &source.teams_file, &source.matches_file) {
        (Some(url), _, _) if source.kind == pool_standings::config::SourceKind::Http => {
            println!("  Source: {}", url);
            println!("  Token: {}", if source.token.is_some() { "set" } else { "none" });
        }
        (_, Some(teams), Some(matches)) => {
            println!("  Teams file: {}", teams);
            println!("  Matches file: {}", matches);
        }
        _ => println!("  Source: {:?}", source.kind),
    }
    println!("  Output: {}", config.output_path());
    let formats: Vec<String> = config
        .output_formats()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("  Formats: {}", formats.join(", "));
    if let Some(archive) = config.archive_name() {
        println!("  Archive: {}", archive);
    }
    println!("🔍 DRY RUN: nothing fetched or written");
}
