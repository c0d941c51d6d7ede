use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local};
use std::env;
use std::sync::Arc;

use gastoscan::{
    aggregate_by_category, filter_tickets, history_order, price_trend, selection_total,
    yearly_analysis, Engine, ExtractedTicket, ExtractionRequest, ExtractionService, SqliteStore,
    TimeWindow, DEFAULT_TOP_ITEMS, MONTHS,
};

/// The CLI works on already-ingested data; scanning needs a configured
/// extraction backend, which the CLI does not ship.
struct UnconfiguredExtractor;

#[async_trait::async_trait]
impl ExtractionService for UnconfiguredExtractor {
    async fn extract(&self, _request: ExtractionRequest) -> gastoscan::Result<ExtractedTicket> {
        Err(gastoscan::EngineError::ExtractionService(
            "no extraction service configured".to_string(),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let db_path = env::var("GASTOSCAN_DB").unwrap_or_else(|_| "gastoscan.db".to_string());
    let store = Arc::new(SqliteStore::open(&db_path).context("failed to open database")?);
    let engine = Engine::new(Arc::new(UnconfiguredExtractor), store.clone(), store);

    match command {
        "history" => run_history(&engine).await?,
        "stats" => run_stats(&engine, &args[2..]).await?,
        "yearly" => run_yearly(&engine, &args[2..]).await?,
        "trend" => run_trend(&engine, &args[2..]).await?,
        "delete" => {
            let id = args
                .get(2)
                .ok_or_else(|| anyhow!("usage: gastoscan delete <id>"))?;
            engine.delete_ticket(id).await?;
            println!("✓ Ticket {} deleted", id);
        }
        "export" => run_export(&engine, &args[2..]).await?,
        "import" => run_import(&engine, &args[2..]).await?,
        _ => print_usage(),
    }

    Ok(())
}

fn print_usage() {
    println!("🧾 gastoscan {} - receipt expense engine", gastoscan::VERSION);
    println!();
    println!("Usage:");
    println!("  gastoscan history                purchase history, newest first");
    println!("  gastoscan stats [year] [month]   category totals for a period");
    println!("  gastoscan yearly [year]          category × month matrix");
    println!("  gastoscan trend <alias>          price history for one product");
    println!("  gastoscan delete <id>            delete a ticket");
    println!("  gastoscan export <file>          write a portable snapshot");
    println!("  gastoscan import <file>          import a portable snapshot");
    println!();
    println!("Database path comes from GASTOSCAN_DB (default: ./gastoscan.db)");
}

async fn run_history(engine: &Engine) -> Result<()> {
    let (tickets, _) = engine.state().await?;
    let summary = engine.summary().await?;

    println!(
        "🧾 {} tickets, ${:.2} total\n",
        summary.ticket_count, summary.total_spent
    );
    for ticket in history_order(&tickets) {
        println!(
            "  {}  {:<24} ${:>8.2}  [{}]",
            ticket.date.format("%Y-%m-%d"),
            ticket.store,
            ticket.total,
            ticket.id
        );
    }
    Ok(())
}

fn parse_window(args: &[String]) -> Result<TimeWindow> {
    match args {
        [] => Ok(TimeWindow::All),
        [year] => Ok(TimeWindow::Year {
            year: year.parse().context("bad year")?,
        }),
        [year, month, ..] => {
            let month: u32 = month.parse().context("bad month")?;
            if !(1..=12).contains(&month) {
                return Err(anyhow!("month must be 1-12"));
            }
            Ok(TimeWindow::Month {
                month0: month - 1,
                year: year.parse().context("bad year")?,
            })
        }
    }
}

async fn run_stats(engine: &Engine, args: &[String]) -> Result<()> {
    let (tickets, dictionary) = engine.state().await?;
    let window = parse_window(args)?;
    let filtered = filter_tickets(&tickets, &window);
    let breakdowns = aggregate_by_category(&filtered, &dictionary);

    println!("📊 Spend in selection: ${:.2}\n", selection_total(&breakdowns));
    for breakdown in &breakdowns {
        println!("  {:<24} ${:>8.2}", breakdown.category, breakdown.total);
        for item in breakdown.top_items(DEFAULT_TOP_ITEMS) {
            println!("      {:<22} ${:>7.2}", item.alias, item.total);
        }
    }
    Ok(())
}

async fn run_yearly(engine: &Engine, args: &[String]) -> Result<()> {
    let (tickets, dictionary) = engine.state().await?;
    let year = match args.first() {
        Some(y) => y.parse().context("bad year")?,
        None => Local::now().year(),
    };
    let analysis = yearly_analysis(&tickets, &dictionary, year);

    println!("📅 {} — grand total ${:.2}\n", year, analysis.grand_total());
    print!("  {:<24}", "Category");
    for month in MONTHS {
        print!(" {:>6.6}", month);
    }
    println!(" {:>9}", "Total");
    for row in &analysis.rows {
        print!("  {:<24}", row.category);
        for value in row.monthly {
            if value > 0.0 {
                print!(" {:>6.0}", value);
            } else {
                print!(" {:>6}", "-");
            }
        }
        println!(" {:>9.2}", row.total());
    }
    Ok(())
}

async fn run_trend(engine: &Engine, args: &[String]) -> Result<()> {
    let alias = args
        .first()
        .ok_or_else(|| anyhow!("usage: gastoscan trend <alias>"))?;
    let (tickets, dictionary) = engine.state().await?;
    let points = price_trend(&tickets, &dictionary, alias);

    if points.is_empty() {
        println!("No purchases recorded for {}", alias);
        return Ok(());
    }

    println!("📈 Price history: {}\n", alias);
    for point in &points {
        let marker = if point.is_multiple() {
            format!("  (×{} purchases)", point.purchases.len())
        } else {
            String::new()
        };
        println!("  {}  ${:.2}{}", point.day, point.price, marker);
        for purchase in &point.purchases {
            println!(
                "      {:<20} ${:>6.2}  {}",
                purchase.store, purchase.unit_price, purchase.original_name
            );
        }
    }
    Ok(())
}

async fn run_export(engine: &Engine, args: &[String]) -> Result<()> {
    let path = args
        .first()
        .ok_or_else(|| anyhow!("usage: gastoscan export <file>"))?;
    let snapshot = engine.export().await?;
    let text = gastoscan::encode(&snapshot)?;
    std::fs::write(path, text).context("failed to write snapshot file")?;
    println!(
        "✓ Exported {} tickets and {} dictionary entries to {}",
        snapshot.tickets.len(),
        snapshot.dictionary.len(),
        path
    );
    Ok(())
}

async fn run_import(engine: &Engine, args: &[String]) -> Result<()> {
    let path = args
        .first()
        .ok_or_else(|| anyhow!("usage: gastoscan import <file>"))?;
    let text = std::fs::read_to_string(path).context("failed to read snapshot file")?;
    let summary = engine.import_document(&text).await?;
    println!(
        "✓ Imported {} tickets and {} dictionary entries",
        summary.tickets, summary.entries
    );
    Ok(())
}
