use clap::Parser;
use guided_crawl::{CrawlConfig, FetchMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "guided-crawl")]
#[command(about = "Crawls a site one hop deep and keeps the sentences that match your instructions")]
#[command(version)]
pub struct Args {
    /// Root URL to start from
    pub url: String,

    /// What to look for, in plain language
    pub instructions: String,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of candidate links to fetch and score
    #[arg(short, long)]
    pub link_limit: Option<usize>,

    /// Where to write the results document
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Render pages through a WebDriver browser instead of plain HTTP
    #[arg(long)]
    pub browser: bool,

    /// WebDriver endpoint used with --browser
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Number of selected links processed at once
    #[arg(short, long)]
    pub concurrency: Option<usize>,
}

impl Args {
    /// Layers the command-line overrides on top of `config`
    pub fn apply(&self, mut config: CrawlConfig) -> CrawlConfig {
        if let Some(link_limit) = self.link_limit {
            config.link_limit = link_limit;
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if self.browser {
            config.fetch_mode = FetchMode::Browser;
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.link_concurrency = concurrency;
        }
        config
    }
}
