mod app;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use context_agent::{
    fetch_review_insight, selections_for_hotels, ContextFragment, ContextRequest, DispatchMode,
    Selection,
};
use context_core::fragment::find_fragment;
use context_providers::review_insight::ReviewInsights;
use context_providers::{HOTEL_SEARCH_CONTEXT, REVIEW_INSIGHT_CONTEXT};
use ets_client::hotels_from_search_data;

use crate::app::{load_config, App};

#[derive(Parser)]
#[command(name = "travel-context")]
#[command(about = "Collects travel context for a prompt and asks the LLM for an answer")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    /// Config file (JSON or TOML); defaults to ~/.travel-context/config.json or ./config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dispatch mode: sequential or concurrent
    #[arg(long)]
    mode: Option<DispatchMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a prompt using the collected contexts
    Ask {
        prompt: String,
        #[command(flatten)]
        target: Target,
    },
    /// Print the context fragments collected for a prompt
    Contexts {
        prompt: String,
        #[command(flatten)]
        target: Target,
    },
    /// Search hotels for a prompt and list them
    Search { prompt: String },
    /// Search hotels, then fetch review insight for each result
    Insights {
        prompt: String,
        /// Only look at the first N hotels
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Review insight for a single hotel code instead of a search
        #[arg(long)]
        hotel_code: Option<String>,
    },
}

#[derive(clap::Args)]
struct Target {
    /// Selected hotel URL (social proof)
    #[arg(long)]
    hotel_url: Option<String>,
    /// Selected hotel code (review insight)
    #[arg(long)]
    hotel_code: Option<String>,
    /// Providers to register, comma separated
    #[arg(long, value_delimiter = ',')]
    providers: Vec<String>,
}

impl Target {
    fn request(&self, prompt: &str) -> ContextRequest {
        ContextRequest::new(prompt).with_selection(Selection {
            hotel_url: self.hotel_url.clone(),
            hotel_code: self.hotel_code.clone(),
        })
    }
}

const DEFAULT_PROVIDERS: &[&str] = &["ets_hotel_search", "emotion"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    let config = load_config(cli.config.as_deref())?;
    let app = App::new(config, cli.mode)?;

    match cli.command {
        Commands::Ask { prompt, target } => {
            app.register(&target.providers, DEFAULT_PROVIDERS)?;
            let answer = app.manager.respond_for(&target.request(&prompt)).await?;
            println!("{}", answer);
        }
        Commands::Contexts { prompt, target } => {
            app.register(&target.providers, DEFAULT_PROVIDERS)?;
            let contexts = app
                .manager
                .respond_with_contexts_for(&target.request(&prompt))
                .await;
            print_contexts(&contexts)?;
        }
        Commands::Search { prompt } => {
            app.register_required(&[HOTEL_SEARCH_CONTEXT])?;
            search(&app, &prompt).await?;
        }
        Commands::Insights {
            prompt,
            top,
            hotel_code,
        } => insights(&app, &prompt, top, hotel_code).await?,
    }

    Ok(())
}

fn print_contexts(contexts: &[ContextFragment]) -> anyhow::Result<()> {
    if contexts.is_empty() {
        println!("{}", "No provider produced context".yellow());
    }
    for fragment in contexts {
        println!("{}", format!("== {} ==", fragment.context_type).cyan());
        println!("{}", serde_json::to_string_pretty(&fragment.data)?);
    }
    Ok(())
}

async fn search(app: &App, prompt: &str) -> anyhow::Result<()> {
    let contexts = app.manager.respond_with_contexts(prompt).await;
    let Some(fragment) = find_fragment(&contexts, HOTEL_SEARCH_CONTEXT) else {
        anyhow::bail!("Hotel search failed; run with --debug for details");
    };

    let hotels = hotels_from_search_data(&fragment.data);
    println!("{}", format!("Found {} hotels", hotels.len()).green());
    for hotel in &hotels {
        let price = hotel
            .lowest_price()
            .map(|p| format!("{:.0}", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} ({}) rating: {} price: {}",
            hotel.hotel_name.as_deref().unwrap_or("?").bold(),
            hotel.hotel_code.as_deref().unwrap_or("?"),
            hotel.rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
            price
        );
    }
    Ok(())
}

async fn insights(
    app: &App,
    prompt: &str,
    top: usize,
    hotel_code: Option<String>,
) -> anyhow::Result<()> {
    if let Some(code) = hotel_code {
        app.register_required(&[REVIEW_INSIGHT_CONTEXT])?;
        match fetch_review_insight(&app.manager, &code, prompt).await {
            Some(insights) => print_insights(&insights),
            None => println!("{}", format!("No review insight for {}", code).yellow()),
        }
        return Ok(());
    }

    app.register_required(&[HOTEL_SEARCH_CONTEXT, REVIEW_INSIGHT_CONTEXT])?;
    let search_only = ContextRequest::new(prompt);
    let contexts = app.manager.respond_with_contexts_for(&search_only).await;
    let Some(fragment) = find_fragment(&contexts, HOTEL_SEARCH_CONTEXT) else {
        anyhow::bail!("Hotel search failed; run with --debug for details");
    };

    let hotels = hotels_from_search_data(&fragment.data);
    let selections: Vec<Selection> = selections_for_hotels(&hotels).into_iter().take(top).collect();
    println!(
        "{}",
        format!("Fetching review insight for {} hotels", selections.len()).cyan()
    );

    let fragments = app
        .manager
        .fan_out_contexts(REVIEW_INSIGHT_CONTEXT, prompt, selections)
        .await;
    for fragment in &fragments {
        if let Some(insights) = ReviewInsights::from_fragment(fragment) {
            print_insights(&insights);
        }
    }
    Ok(())
}

fn print_insights(insights: &ReviewInsights) {
    let score = |value: Option<f64>| {
        value
            .map(|v| format!("{:.0}", v))
            .unwrap_or_else(|| "-".to_string())
    };

    println!(
        "{} average: {} value: {} recommend: {}",
        insights.hotel_code.as_deref().unwrap_or("?").bold(),
        score(insights.average_score),
        score(insights.price_performance_score),
        insights
            .recommendation_rate
            .map(|r| format!("{:.0}%", r * 100.0))
            .unwrap_or_else(|| "-".to_string())
    );
    for flag in insights.flags.as_deref().unwrap_or_default() {
        println!(
            "    {} {}",
            flag.name.as_deref().or(flag.flag_type.as_deref()).unwrap_or("?"),
            flag.point.map(|p| p.to_string()).unwrap_or_default().dimmed()
        );
    }
}
