use market_core::Exchange;
use quote_feed::{sanitize_symbol, FeedConfig, QuoteService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quote_cli=info,quote_feed=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_bse = args.iter().any(|a| a == "--bse");
    let symbols: Vec<String> = args.into_iter().filter(|a| !a.starts_with("--")).collect();

    if symbols.is_empty() {
        eprintln!("usage: quote-cli [--bse] SYMBOL [SYMBOL ...]");
        std::process::exit(2);
    }
    for raw in &symbols {
        if sanitize_symbol(raw).is_none() {
            tracing::warn!(symbol = %raw, "invalid symbol, it will be skipped");
        }
    }

    let exchange = if use_bse { Exchange::Bse } else { Exchange::Nse };
    let config = FeedConfig::from_env();
    let service = QuoteService::new(&config);

    let quotes = service.get_bulk_quotes(&symbols, exchange).await;
    if quotes.is_empty() {
        tracing::warn!("no data from any source");
        return Ok(());
    }

    let mut sorted: Vec<_> = quotes.values().collect();
    sorted.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    for quote in sorted {
        println!(
            "{:<12} {:>10.2} {:>+7.2}%  [{}]",
            quote.symbol, quote.price, quote.change_pct, quote.source
        );
    }

    Ok(())
}
