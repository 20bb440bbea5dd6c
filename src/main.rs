use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use relief_supply::model::Location;
use relief_supply::query::geo::Coordinates;
use relief_supply::query::{self, FilterState, ItemFilter, Match};
use relief_supply::settings::Settings;
use relief_supply::sheet;
use relief_supply::source::{self, Origin};
use relief_supply::status;

#[derive(Parser)]
#[command(
    name = "relief_supply",
    about = "Relief supply directory: sheet extractor and query engine"
)]
struct Cli {
    /// Config file (default: ./relief-supply.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the sheet export into locations.json
    Extract {
        /// Local CSV export
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Remote CSV export URL (takes precedence over --input)
        #[arg(long)]
        url: Option<String>,
        /// Output path for the document
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Notice embedded in the document
        #[arg(long)]
        notification: Option<String>,
    },
    /// Filter and sort locations from a published document
    Query {
        /// Document path or URL (default: configured output)
        #[arg(short, long)]
        data: Option<String>,
        /// Status key (urgent, still-need, enough, no-data, gov, paused) or label; repeatable
        #[arg(short, long = "status")]
        statuses: Vec<String>,
        /// Exact item name, or "all"
        #[arg(short, long)]
        item: Option<String>,
        /// Viewer position "lat,lng"; sorts by distance
        #[arg(long, allow_hyphen_values = true)]
        near: Option<Coordinates>,
        /// Coordinate side table (default: configured path)
        #[arg(long)]
        coordinates: Option<PathBuf>,
    },
    /// List every item name in a document
    Items {
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Show category column ranges found in a sheet export
    Categories {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Extract {
            input,
            url,
            output,
            notification,
        } => {
            let origin = Origin::for_sheet(&settings, input, url);
            let text = source::read_text(&origin).await?;
            let extraction = sheet::extract(&text, &settings.layout);
            let categories = extraction.category_names().join(", ");

            let output = output.unwrap_or_else(|| settings.output.clone());
            let doc = extraction.into_document(
                chrono::Utc::now(),
                notification.or_else(|| settings.notification.clone()),
            );
            source::write_document(&output, &doc)?;

            info!(path = %output.display(), "Generated document");
            println!(
                "Generated {} with {} locations",
                output.display(),
                doc.locations.len()
            );
            println!("Categories found: {}", categories);
            Ok(())
        }
        Commands::Query {
            data,
            statuses,
            item,
            near,
            coordinates,
        } => {
            let origin = Origin::for_document(&settings, data);
            let doc = source::load_document(&origin).await?;

            let mut filter =
                FilterState::default().with_item(ItemFilter::from_arg(item.as_deref()));
            for s in &statuses {
                filter = filter.with_status(status::resolve_filter_value(s));
            }
            let table = match near {
                Some(viewer) => {
                    filter = filter.sorted_near(Some(viewer));
                    let path = coordinates.unwrap_or_else(|| settings.coordinates.clone());
                    source::load_coordinates(&path).await
                }
                None => None,
            };

            let matches = query::run(Some(&doc), &filter, table.as_ref());
            if let Some(notice) = &doc.notification {
                println!("{}\n", notice);
            }
            println!("Last update: {}", doc.last_update);
            if matches.is_empty() {
                println!("No locations match the filters.");
            }
            for (i, m) in matches.iter().enumerate() {
                print_match(i + 1, m);
            }
            println!("\nShowing {} / {} locations", matches.len(), doc.locations.len());
            Ok(())
        }
        Commands::Items { data } => {
            let origin = Origin::for_document(&settings, data);
            let doc = source::load_document(&origin).await?;
            let items = query::item_catalogue(Some(&doc));
            for name in &items {
                println!("{}", name);
            }
            println!("\n{} items", items.len());
            Ok(())
        }
        Commands::Categories { input, url } => {
            let origin = Origin::for_sheet(&settings, input, url);
            let text = source::read_text(&origin).await?;
            let extraction = sheet::extract(&text, &settings.layout);
            if extraction.header.categories.is_empty() {
                println!(
                    "No categories found on row {}.",
                    settings.layout.category_header_row + 1
                );
                return Ok(());
            }
            println!("{:<28} | {:<9} | Items", "Category", "Columns");
            println!("{}", "-".repeat(72));
            for c in &extraction.header.categories {
                let items: Vec<&str> = c.items.iter().map(|i| i.name.as_str()).collect();
                println!(
                    "{:<28} | {:<9} | {}",
                    truncate(&c.name, 28),
                    format!(
                        "{}-{}",
                        column_letter(c.columns.start),
                        column_letter(c.columns.end - 1)
                    ),
                    items.join(", ")
                );
            }
            let volunteers: Vec<&str> = extraction
                .header
                .volunteers
                .iter()
                .map(|v| v.kind.as_str())
                .collect();
            println!("\nVolunteer columns: {}", volunteers.join(", "));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn print_match(n: usize, m: &Match<'_>) {
    let loc: &Location = m.location;
    match m.distance_km {
        Some(km) => println!("{:>3}. {} ({:.1} km)", n, loc.name, km),
        None => println!("{:>3}. {}", n, loc.name),
    }
    if let Some(overall) = &loc.overall_status {
        println!("     所有物品 All Items: {}", overall);
    }
    for category in &loc.categories {
        let items: Vec<String> = category
            .items
            .iter()
            .map(|i| format!("{} {}", i.name, i.status))
            .collect();
        println!("     {}: {}", category.name, items.join(" | "));
    }
    if !loc.volunteers.is_empty() {
        let needs: Vec<String> = loc
            .volunteers
            .iter()
            .map(|v| format!("{} {}", v.kind, v.status))
            .collect();
        println!("     義工需求: {}", needs.join(" | "));
    }
}

/// Spreadsheet column name for a 0-based index (0 → A, 26 → AA).
fn column_letter(mut col: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
