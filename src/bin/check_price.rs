use clap::Parser;

use gasbar::config::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SELECTOR, DEFAULT_UNIT, DEFAULT_URL};
use gasbar::fetcher::{GasPriceFetcher, PriceSource};
use gasbar::refresh::{FetchResult, RefreshEvent, Trigger};

#[derive(Parser)]
#[command(name = "gasbar-check")]
#[command(about = "Fetch the current gas price once and print it", long_about = None)]
struct Cli {
    /// Page to scrape
    #[arg(long, env = "GASBAR_URL", default_value = DEFAULT_URL)]
    url: String,

    /// CSS selector of the element holding the price
    #[arg(long, env = "GASBAR_SELECTOR", default_value = DEFAULT_SELECTOR)]
    selector: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "GASBAR_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Unit appended to the price
    #[arg(long, env = "GASBAR_UNIT", default_value = DEFAULT_UNIT)]
    unit: String,

    /// Print the full refresh event as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let fetcher = GasPriceFetcher::new(
        cli.url,
        cli.selector,
        std::time::Duration::from_secs(cli.timeout_secs.max(1)),
    )?;

    let event = RefreshEvent::new(fetcher.fetch().await, Trigger::Manual, 1);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        match &event.result {
            FetchResult::Success { price } => println!("{price} {}", cli.unit),
            FetchResult::Failure { reason } => eprintln!("Fetch failed: {reason}"),
        }
    }

    if !event.result.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
