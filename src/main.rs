// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use variance_ledger::{open_ledger, Ledger, LedgerConfig, VariancePercent};

fn main() -> Result<()> {
    // Logs go to stderr and only when asked for; the TUI owns stdout
    if env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let args: Vec<String> = env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let config = LedgerConfig::discover(config_path.as_deref(), Path::new("."))?;
    let ledger = open_ledger(config)?;

    let command = args
        .iter()
        .skip(1)
        .map(String::as_str)
        .find(|a| matches!(*a, "summary" | "export"));

    match command {
        Some("summary") => run_summary(&ledger),
        Some("export") => run_export(&ledger),
        _ => run_ui_mode(ledger),
    }
}

/// Print every category's totals row
fn run_summary(ledger: &Ledger) -> Result<()> {
    println!("📊 Variance Ledger - Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for category in ledger.categories() {
        let totals = ledger.totals(&category.id)?;
        let variance = totals.variance();
        let percent = match variance.variance_percent {
            VariancePercent::Value(v) => format!("{:.1}%", v),
            VariancePercent::DivisionAnomaly => "n/a".to_string(),
        };

        println!("\n{} ({} rows)", category.totals_label(), category.len());
        for (period, value) in totals.sum_per_period.iter() {
            println!("   {}  {:>12.2}", period, value);
        }
        println!("   Variance    {:>12.2}  ({})", variance.variance, percent);
    }

    Ok(())
}

/// Write the current tree as JSON to stdout
fn run_export(ledger: &Ledger) -> Result<()> {
    println!("{}", ledger.snapshot().to_json_pretty()?);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(ledger: Ledger) -> Result<()> {
    println!("🖥️  Loading Variance Ledger UI...\n");
    println!(
        "✓ Loaded {} categories, {} rows\n",
        ledger.categories().len(),
        ledger.snapshot().item_count()
    );
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(ledger);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_ledger: Ledger) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin ledger-server --features server");
    eprintln!("   Or print totals: variance-ledger summary");
    std::process::exit(1);
}
