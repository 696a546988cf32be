//! Listing Maker CLI - expand product sheets into per-SKU listings
//!
//! # Main Commands
//!
//! ```bash
//! listing-maker expand products.csv -o listings.csv   # Expand a sheet
//! listing-maker serve                                 # Start HTTP server (port 3000)
//! listing-maker template -o sample.csv                # Sample upload sheet
//! ```
//!
//! # Helper Commands
//!
//! ```bash
//! listing-maker preview products.csv      # Show the first expanded rows
//! listing-maker describe --name .. --category ..
//! listing-maker channels                  # List sales channels
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use listing_maker::{
    export, load_app_config, sample_csv, server, synthesize, AppConfig, ChannelCategory,
    ExpandOptions, ListingSchema, ParseOptions, ProductAttributes, Table,
};

#[derive(Parser)]
#[command(name = "listing-maker")]
#[command(about = "Expand product sheets into per-SKU marketplace listings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a product sheet into one row per size
    Expand {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sales channel the listings are for (repeatable)
        #[arg(short, long = "channel")]
        channels: Vec<String>,

        /// The sheet has no header row
        #[arg(long)]
        no_header: bool,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Print the first expanded rows without writing anything
    Preview {
        /// Input CSV file
        input: PathBuf,

        /// Number of rows to show (default: from config)
        #[arg(short, long)]
        rows: Option<usize>,

        /// The sheet has no header row
        #[arg(long)]
        no_header: bool,
    },

    /// Write the sample product sheet
    Template {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a description from product attributes
    Describe {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        color: String,
        #[arg(long, default_value = "")]
        fabric: String,
        #[arg(long, default_value = "")]
        brand: String,
        /// Comma-separated sizes
        #[arg(long, default_value = "")]
        sizes: String,
    },

    /// List supported sales channels
    Channels,

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: LISTING_MAKER_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match load_app_config() {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let schema = ListingSchema::marketplace();

    match command {
        Commands::Expand {
            input,
            output,
            channels,
            no_header,
            delimiter,
        } => {
            let options = ExpandOptions {
                parse: ParseOptions {
                    delimiter,
                    has_header: !no_header,
                },
                channels,
                default_channel: config.default_channel,
                preview_rows: config.preview_rows,
            };
            cmd_expand(&input, output.as_deref(), &schema, &options)
        }

        Commands::Preview {
            input,
            rows,
            no_header,
        } => {
            let options = ExpandOptions {
                parse: ParseOptions {
                    delimiter: None,
                    has_header: !no_header,
                },
                channels: Vec::new(),
                default_channel: config.default_channel,
                preview_rows: rows.unwrap_or(config.preview_rows),
            };
            cmd_preview(&input, &schema, &options)
        }

        Commands::Template { output } => {
            let csv = sample_csv(&schema)?;
            write_output(&csv, output.as_deref())
        }

        Commands::Describe {
            name,
            category,
            color,
            fabric,
            brand,
            sizes,
        } => {
            let attrs = ProductAttributes {
                name: &name,
                category: &category,
                color: &color,
                fabric: &fabric,
                brand: &brand,
                sizes: &sizes,
            };
            println!("{}", synthesize(&attrs));
            Ok(())
        }

        Commands::Channels => {
            cmd_channels();
            Ok(())
        }

        Commands::Serve { port } => {
            let config = AppConfig {
                port: port.unwrap_or(config.port),
                ..config
            };
            server::start_server(server::AppState::new(config, schema)).await?;
            Ok(())
        }
    }
}

fn cmd_expand(
    input: &Path,
    output: Option<&Path>,
    schema: &ListingSchema,
    options: &ExpandOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let result = listing_maker::expand_file(input, schema, options)?;

    eprintln!("   Encoding: {}", result.csv_info.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.csv_info.delimiter));
    eprintln!("   Products: {}", result.outcome.input_rows);
    eprintln!("   Listings: {}", result.outcome.output_rows());
    if result.outcome.excluded_count() > 0 {
        eprintln!(
            "   ⚠️  Skipped {} product(s) with no sizes",
            result.outcome.excluded_count()
        );
    }

    match output {
        Some(path) => {
            fs::write(path, &result.csv)?;
            eprintln!("💾 Output written to: {}", path.display());
        }
        None => {
            eprintln!("   Suggested file name: {}", result.file_name);
            print!("{}", result.csv);
        }
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_preview(
    input: &Path,
    schema: &ListingSchema,
    options: &ExpandOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = listing_maker::expand_file(input, schema, options)?;

    eprintln!(
        "📋 Showing {} of {} listings",
        result.preview.len(),
        result.outcome.output_rows()
    );
    print!("{}", export::write_csv(&result.preview)?);
    print_table_summary(&result.preview);
    Ok(())
}

/// Lead columns of the listing layout.
fn print_table_summary(table: &Table) {
    for (i, header) in table.headers.iter().take(3).enumerate() {
        eprintln!("   [{:2}] {}", i + 1, header);
    }
}

fn cmd_channels() {
    for category in [ChannelCategory::Ecommerce, ChannelCategory::QuickCommerce] {
        println!("{}:", category.label());
        for channel in category.channels() {
            println!("  - {}", channel.name);
        }
    }
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
