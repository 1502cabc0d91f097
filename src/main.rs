use clap::Parser;
use guided_crawl::nlp::Capabilities;
use guided_crawl::{Crawl, CrawlConfig};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match CrawlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => CrawlConfig::default(),
    };
    let config = args.apply(config.with_env_overrides());

    let capabilities = match Capabilities::load().await {
        Ok(capabilities) => capabilities,
        Err(e) => {
            ::log::error!("Failed to load language models: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!("Starting guided crawl of {}", args.url);
    let start_time = std::time::Instant::now();

    let result = Crawl::new(args.url.as_str(), args.instructions.as_str())
        .with_config(config)
        .with_capabilities(capabilities)
        .run()
        .await;

    let Some(result) = result else {
        ::log::error!("No results for {}", args.url);
        return ExitCode::FAILURE;
    };

    match result.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            ::log::error!("Failed to serialize results: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ::log::info!(
        "Crawl complete - {} documents in {:.2} seconds",
        result.results.len(),
        start_time.elapsed().as_secs_f64()
    );
    ExitCode::SUCCESS
}
