//! datadrill — ask the users/orders database plain-English questions
//!
//! # Usage
//!
//! ```bash
//! # Interpret and run a question
//! datadrill ask "show orders for laptop"
//!
//! # Show the SQL only
//! datadrill ask "users registered in 2023" --dry-run
//!
//! # Create tables, load sample data and serve HTTP
//! datadrill setup --seed && datadrill serve
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use datadrill::config::ConfigBuilder;
use datadrill::prelude::*;
use datadrill::server::{self, AppState};

#[derive(Parser)]
#[command(name = "datadrill")]
#[command(version)]
#[command(about = "Plain-English questions over users and orders", long_about = None)]
#[command(after_help = "EXAMPLES:
    datadrill ask 'how many users are there?'
    datadrill ask 'orders by price greater than 100' --format json
    datadrill explain 'find users named bob johnson'")]
struct Cli {
    /// Configuration file (defaults to ./datadrill.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database connection URL
    #[arg(long, env = "DATADRILL_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// HTTP bind address
    #[arg(long, env = "DATADRILL_BIND", global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a question and run it
    Ask {
        /// The question
        text: String,

        /// Don't execute, just show the generated SQL
        #[arg(short, long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show how a question is annotated and which rule handles it
    Explain {
        /// The question
        text: String,
    },
    /// List the rules in priority order
    Rules,
    /// Create the tables
    Setup {
        /// Also insert the sample users and orders
        #[arg(long)]
        seed: bool,
    },
    /// Run the HTTP server
    Serve,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datadrill=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Ask {
            text,
            dry_run,
            format,
        } => ask(&config, &text, dry_run, &format).await,
        Commands::Explain { text } => {
            explain(&Interpreter::from_config(&config.annotator), &text);
            Ok(())
        }
        Commands::Rules => {
            show_rules();
            Ok(())
        }
        Commands::Setup { seed } => setup(&config, seed).await,
        Commands::Serve => serve(config).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let mut builder = ConfigBuilder::from_config(config);
    if let Some(url) = &cli.database_url {
        builder = builder.database(url);
    }
    if let Some(bind) = &cli.bind {
        builder = builder.bind(bind);
    }
    Ok(builder.build())
}

async fn ask(config: &Config, text: &str, dry_run: bool, format: &OutputFormat) -> anyhow::Result<()> {
    let interpreter = Interpreter::from_config(&config.annotator);

    let Some(query) = interpreter.interpret(text) else {
        anyhow::bail!(server::NOT_UNDERSTOOD);
    };

    if dry_run {
        print_sql(&query);
        return Ok(());
    }

    let store = Store::connect(&config.database)
        .await
        .with_context(|| format!("connecting to {}", config.database.url))?;
    let result = store.fetch(&query).await?;
    format_output(&result, format);

    Ok(())
}

fn print_sql(query: &SqlQuery) {
    println!("{}", "Generated SQL:".green().bold());
    println!("{}", query.sql.white());

    if !query.params.is_empty() {
        println!();
        println!("{}", "Bindings:".cyan());
        for (i, value) in query.params.iter().enumerate() {
            println!("  ${} = {}", i + 1, value.to_string().yellow());
        }
    }
}

fn format_output(result: &QueryResult, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result).unwrap_or_default());
        }
        OutputFormat::Table => {
            if result.rows.is_empty() {
                println!("{}", "(no results)".dimmed());
                return;
            }

            let mut widths: Vec<usize> = result.columns.iter().map(|c| c.len()).collect();
            for row in &result.rows {
                for (w, val) in widths.iter_mut().zip(row) {
                    *w = (*w).max(val_to_string(val).len());
                }
            }

            let header: Vec<String> = result
                .columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:width$}", c, width = w))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in &result.rows {
                let cells: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(v, w)| format!("{:width$}", val_to_string(v), width = w))
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", result.rows.len().to_string().cyan());
        }
    }
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

fn explain(interpreter: &Interpreter, text: &str) {
    let explanation = interpreter.explain(text);

    println!("{} {}", "Query:".dimmed(), text.yellow());
    println!();

    println!("{}", "Tokens:".green().bold());
    for token in &explanation.annotation.tokens {
        let head = explanation
            .annotation
            .head_text(token)
            .unwrap_or_default();
        println!(
            "  {:>2} {:16} {:6} {:9} <- {}",
            token.index,
            token.text.white(),
            token.pos.to_string().cyan(),
            token.dep.to_string().dimmed(),
            head
        );
    }

    if !explanation.annotation.entities.is_empty() {
        println!();
        println!("{}", "Entities:".green().bold());
        for entity in &explanation.annotation.entities {
            println!("  {} {}", entity.label.to_string().cyan(), entity.text.white());
        }
    }

    println!();
    match explanation.rule {
        Some((priority, name)) => println!(
            "{} #{} {}",
            "Rule:".green().bold(),
            priority,
            name.cyan()
        ),
        None => println!("{} {}", "Rule:".green().bold(), "none triggered".dimmed()),
    }

    println!();
    match &explanation.sql {
        Some(query) => print_sql(query),
        None => println!("{}", server::NOT_UNDERSTOOD.yellow()),
    }
}

fn show_rules() {
    let catalog = RuleCatalog::standard();

    println!(
        "{:4} {:26} {}",
        "#".white().bold(),
        "Rule".white().bold(),
        "Triggers".white().bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    for rule in catalog.iter() {
        let joiner = match rule.trigger {
            datadrill::rules::Trigger::AllOf(_) => " + ",
            datadrill::rules::Trigger::AnyOf(_) => " | ",
        };
        println!(
            "{:4} {:26} {}",
            rule.priority.to_string().cyan(),
            rule.kind.name().yellow(),
            rule.trigger.phrases().join(joiner).dimmed()
        );
    }
}

async fn setup(config: &Config, seed: bool) -> anyhow::Result<()> {
    let store = Store::connect(&config.database)
        .await
        .with_context(|| format!("connecting to {}", config.database.url))?;

    store.bootstrap().await?;
    println!("{} Tables ready", "✓".green());

    if seed {
        let orders = store.seed().await?;
        println!("{} Sample data loaded ({} orders)", "✓".green(), orders);
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting DataDrill...");
    tracing::info!("  Database: {}", config.database.url);

    let store = Store::connect(&config.database)
        .await
        .with_context(|| format!("connecting to {}", config.database.url))?;

    let state = Arc::new(AppState {
        interpreter: Interpreter::from_config(&config.annotator),
        store,
    });

    server::serve(&config.server, state).await?;
    Ok(())
}
