use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use stockroom_core::display::{format_date, format_money};
use stockroom_core::{
    Config, FileStorage, Inventory, PreviewStorage, Query, RecordDraft, RecordId,
    Snapshot, StatusFilter, Storage,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(version, about = "Small inventory tracker with expiry and stock warnings", long_about = None)]
struct Cli {
    /// Inventory JSON file (overrides config)
    #[arg(long, global = true, env = "STOCKROOM_DATA")]
    data: Option<PathBuf>,

    /// Directory for inventory_export.xlsx / .csv (overrides config)
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    /// Open the inventory read-only
    #[arg(long, global = true)]
    preview: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List products, optionally searched and filtered
    List {
        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,
        /// all, good, low-stock, out-of-stock, near-expiry or expired
        #[arg(short, long, default_value = "all")]
        filter: StatusFilter,
    },
    /// Add a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        buy: String,
        #[arg(long)]
        sell: String,
        /// YYYY-MM-DD, leave out if the product doesn't expire
        #[arg(long, default_value = "")]
        expiry: String,
    },
    /// Change fields of a product; unspecified fields keep their value
    Edit {
        /// Id shown by `list`
        id: RecordId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        buy: Option<String>,
        #[arg(long)]
        sell: Option<String>,
        /// YYYY-MM-DD, or "" to clear
        #[arg(long)]
        expiry: Option<String>,
    },
    /// Delete a product
    Delete {
        /// Id shown by `list`
        id: RecordId,
    },
    /// Dashboard counters
    Stats,
    /// Expiry and stock warnings
    Warnings,
    /// Write inventory_export.xlsx and inventory_export.csv
    Export {
        /// Write a single file instead; format from extension (.xlsx, .csv, .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the inventory with 20 demo products
    Demo,
    /// Interactive terminal UI (default)
    Tui,
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists yet
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring config file: {}", e);
        Config::default()
    });
    if let Some(data) = cli.data.clone() {
        config.storage.data_file = data;
    }
    if let Some(dir) = cli.export_dir.clone() {
        config.storage.export_dir = dir;
    }
    config.storage.preview |= cli.preview;

    init_logging(log_target(interactive, &config));

    let storage: Box<dyn Storage> = if config.storage.preview {
        Box::new(PreviewStorage::new(&config.storage.data_file))
    } else {
        Box::new(FileStorage::new(
            &config.storage.data_file,
            &config.storage.export_dir,
        ))
    };
    let mut inventory = Inventory::open(storage, config.thresholds);
    tracing::debug!(
        "Opened {} with {} records",
        inventory.storage().describe(),
        inventory.len()
    );
    let now = chrono::Utc::now();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::List { search, filter } => {
            let query = Query::new().text(search).status(filter);
            print_list(&inventory, &query, &config, cli.json, now)?;
        }
        Commands::Add {
            name,
            quantity,
            buy,
            sell,
            expiry,
        } => {
            let draft = RecordDraft {
                name,
                quantity,
                buy_price: buy,
                sell_price: sell,
                expiry,
            };
            let (id, snapshot) = inventory.add(&draft, now)?;
            println!("✅ Product added successfully! (id {})", id);
            print_snapshot(&snapshot, &config, cli.json)?;
        }
        Commands::Edit {
            id,
            name,
            quantity,
            buy,
            sell,
            expiry,
        } => {
            let Some(existing) = inventory.get(id) else {
                println!("No product with id {}; nothing changed", id);
                return Ok(());
            };

            let mut draft = RecordDraft::from_record(existing);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(quantity) = quantity {
                draft.quantity = quantity;
            }
            if let Some(buy) = buy {
                draft.buy_price = buy;
            }
            if let Some(sell) = sell {
                draft.sell_price = sell;
            }
            if let Some(expiry) = expiry {
                draft.expiry = expiry;
            }

            if let Some(snapshot) = inventory.update(id, draft.to_record()?, now)? {
                println!("Updated product {}", id);
                print_snapshot(&snapshot, &config, cli.json)?;
            }
        }
        Commands::Delete { id } => {
            let name = inventory.get(id).map(|r| r.name.clone());
            match inventory.delete(id, now)? {
                Some(snapshot) => {
                    println!("Deleted “{}”", name.unwrap_or_default());
                    print_snapshot(&snapshot, &config, cli.json)?;
                }
                None => println!("No product with id {}; nothing changed", id),
            }
        }
        Commands::Stats => {
            let dash = inventory.dashboard(now);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&dash)?);
            } else {
                let symbol = &config.ui.currency_symbol;
                println!("Total Products: {}", dash.total);
                println!("Low Stock:      {}", dash.low_stock_count);
                println!("Out of Stock:   {}", dash.out_of_stock_count);
                println!("Expired:        {}", dash.expired_count);
                println!("Total Profit:   {}", format_money(symbol, dash.total_profit));
            }
        }
        Commands::Warnings => {
            let notices = inventory.notices(now);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&notices)?);
            } else if notices.is_empty() {
                println!("No warnings");
            } else {
                for notice in notices {
                    println!("{} {}", notice.category.emoji(), notice.message);
                }
            }
        }
        Commands::Export { output } => match output {
            Some(path) => {
                let rows = inventory
                    .export_to(&path)
                    .with_context(|| format!("Failed to export to {}", path.display()))?;
                println!("✅ Exported {} rows to {}", rows, path.display());
            }
            None => {
                let report = inventory.export().context("Export failed")?;
                for file in &report.files {
                    println!("✅ Exported {} rows to {}", report.rows, file.display());
                }
            }
        },
        Commands::Demo => {
            let snapshot = inventory
                .seed_demo(now)
                .context("Failed to generate demo data")?;
            println!("✅ Generated {} demo products", inventory.len());
            print_snapshot(&snapshot, &config, cli.json)?;
        }
        Commands::Config { init } => show_config(&config, init)?,
        Commands::Tui => {
            let app = stockroom_tui::App::new(
                inventory,
                config.ui.currency_symbol.clone(),
                Duration::from_secs(config.ui.toast_seconds),
            );
            stockroom_tui::run_tui(app)?;
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum LogTarget {
    Stderr,
    /// Under the TUI, where stderr output would trash the screen
    File(PathBuf),
    /// Read-only sessions write nothing next to the data file
    Off,
}

fn log_target(interactive: bool, config: &Config) -> LogTarget {
    if !interactive {
        LogTarget::Stderr
    } else if config.storage.preview {
        LogTarget::Off
    } else {
        LogTarget::File(log_file_for(&config.storage.data_file))
    }
}

fn init_logging(target: LogTarget) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockroom=info,stockroom_core=info,stockroom_tui=info".into());

    match target {
        LogTarget::Off => {}
        LogTarget::File(path) => {
            let file = match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
            {
                Ok(file) => file,
                Err(e) => {
                    eprintln!(
                        "Logging disabled: cannot open {}: {}",
                        path.display(),
                        e
                    );
                    return;
                }
            };
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print where the config lives and what is in effect, flags included
fn show_config(config: &Config, init: bool) -> anyhow::Result<()> {
    let path = Config::config_path()?;

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            Config::default()
                .save_to(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// `stockroom.log` next to the data file
fn log_file_for(data_file: &Path) -> PathBuf {
    data_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("stockroom.log")
}

fn print_list(
    inventory: &Inventory,
    query: &Query,
    config: &Config,
    json: bool,
    now: chrono::DateTime<chrono::Utc>,
) -> anyhow::Result<()> {
    let rows = inventory.view(query, now);

    if json {
        let values: Vec<_> = rows
            .iter()
            .map(|row| {
                serde_json::json!({
                    "id": row.id.get(),
                    "name": row.record.name,
                    "quantity": row.record.quantity,
                    "buyPrice": row.record.buy_price,
                    "sellPrice": row.record.sell_price,
                    "expiry": row.record.expiry_text(),
                    "profit": row.profit,
                    "status": row.status.key(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No products match");
        return Ok(());
    }

    let symbol = &config.ui.currency_symbol;
    println!(
        "{:>4}  {:<20} {:>5} {:>10} {:>10} {:>11} {:<10}  {}",
        "ID", "Name", "Qty", "Buy", "Sell", "Profit", "Expiry", "Status"
    );
    for row in &rows {
        println!(
            "{:>4}  {:<20} {:>5} {:>10} {:>10} {:>11} {:<10}  {}",
            row.id,
            row.record.name,
            row.record.quantity,
            format_money(symbol, row.record.buy_price),
            format_money(symbol, row.record.sell_price),
            format_money(symbol, row.profit),
            format_date(row.record.expiry),
            row.status.label(),
        );
    }
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({
            "dashboard": snapshot.dashboard,
            "notices": snapshot.notices,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let dash = &snapshot.dashboard;
    println!(
        "{} products • {} low • {} out • {} expired • profit {}",
        dash.total,
        dash.low_stock_count,
        dash.out_of_stock_count,
        dash.expired_count,
        format_money(&config.ui.currency_symbol, dash.total_profit)
    );
    for notice in &snapshot.notices {
        println!("{} {}", notice.category.emoji(), notice.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_logs_next_to_data_file() {
        let mut config = Config::default();
        config.storage.data_file = PathBuf::from("shop/inventory.json");
        assert_eq!(
            log_target(true, &config),
            LogTarget::File(PathBuf::from("shop/stockroom.log"))
        );
        assert_eq!(log_target(false, &config), LogTarget::Stderr);
    }

    #[test]
    fn test_preview_tui_writes_no_log_file() {
        let mut config = Config::default();
        config.storage.preview = true;
        assert_eq!(log_target(true, &config), LogTarget::Off);
    }

    #[test]
    fn test_bare_file_name_logs_in_current_dir() {
        assert_eq!(
            log_file_for(Path::new("inventory.json")),
            PathBuf::from("./stockroom.log")
        );
    }

    #[test]
    fn test_cli_parses_single_file_export() {
        let cli = Cli::try_parse_from(["stockroom", "--preview", "export", "-o", "out.csv"]).unwrap();
        assert!(cli.preview);
        assert!(matches!(
            cli.command,
            Some(Commands::Export { output: Some(ref p) }) if p == Path::new("out.csv")
        ));
    }
}
