use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use product_catalog::{category_tabs, logging, Catalog, ProductQuery};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog", version)]
#[command(about = "Browse and query the financial product catalog")]
struct Cli {
    /// Catalog file (.json or .csv); the built-in sample is used when omitted
    #[arg(long, global = true, env = "CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CATALOG_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the products matching the given criteria as JSON
    Query {
        #[command(flatten)]
        query: ProductQuery,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Print the equivalent API URL instead of the results
        #[arg(long)]
        print_url: bool,
    },

    /// Show one product in detail
    Show { id: String },

    /// List the category tabs
    Categories,

    /// Interactive terminal browser (default)
    Browse,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);

    let catalog = load_catalog(cli.catalog.as_ref())?;

    match cli.command.unwrap_or(Command::Browse) {
        Command::Query {
            query,
            pretty,
            print_url,
        } => run_query(&catalog, &query, pretty, print_url),
        Command::Show { id } => run_show(&catalog, &id),
        Command::Categories => {
            for tab in category_tabs(&catalog) {
                println!("{}", tab);
            }
            Ok(())
        }
        Command::Browse => run_ui_mode(catalog),
    }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::load(path).with_context(|| format!("Failed to load catalog {:?}", path))?,
        None => Catalog::sample(),
    };
    tracing::debug!(products = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn run_query(catalog: &Catalog, query: &ProductQuery, pretty: bool, print_url: bool) -> Result<()> {
    if print_url {
        if query.is_empty() {
            println!("/api/products");
        } else {
            println!("/api/products?{}", query.to_query_string());
        }
        return Ok(());
    }

    let matches = catalog.evaluate(query)?;
    tracing::info!(matched = matches.len(), "query evaluated");

    let json = if pretty {
        serde_json::to_string_pretty(&matches)?
    } else {
        serde_json::to_string(&matches)?
    };
    println!("{}", json);

    Ok(())
}

fn run_show(catalog: &Catalog, id: &str) -> Result<()> {
    let product = catalog
        .get(id)
        .with_context(|| format!("No product with id {:?}", id))?;

    println!("{}", product.name);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Categoría:        {}", product.category);
    println!("Tipo:             {}", product.product_type);
    println!("Nivel de Riesgo:  {}", product.risk_label());
    println!("Tasa de Interés:  {}", product.display_rate());
    println!("\n{}", product.description);

    if !product.benefits.is_empty() {
        println!("\nBeneficios:");
        for benefit in &product.benefits {
            println!("  • {}", benefit);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(catalog: Catalog) -> Result<()> {
    let mut app = product_catalog::ui::App::new(catalog);
    product_catalog::ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_catalog: Catalog) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the query command: catalog query --category Tarjetas");
    std::process::exit(1);
}
