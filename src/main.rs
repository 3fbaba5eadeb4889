//! Trip Planner CLI
//!
//! Serves the planner form, or plans a single trip from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use trip_planner::{
    config::Config,
    links::{affiliate_widgets, booking_links, map_search_link},
    llm::{Prompts, TextGenerator, build_generator},
    render::RawHtml,
    server::{self, AppState},
    trip::{MAX_DAYS, MIN_DAYS, Month, TravelStyle, TripRequest},
};

/// Trip Planner - LLM-generated itineraries with booking links
#[derive(Parser)]
#[command(name = "trip-planner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web form
    Serve {
        /// Address to bind (overrides TRIP_BIND_ADDR / config file)
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Plan one trip and print the generated markdown
    Plan {
        #[command(flatten)]
        trip: TripArgs,

        /// Print the prompt before sending it
        #[arg(long)]
        print_prompt: bool,
    },

    /// Print the prompt for a trip without calling any backend
    Prompt {
        #[command(flatten)]
        trip: TripArgs,
    },

    /// Print booking links for a hotel
    Links {
        /// Hotel name
        #[arg(long)]
        hotel: String,

        /// City the hotel is in
        #[arg(long)]
        city: String,

        /// Also print affiliate widget URLs for this country
        #[arg(long)]
        country: Option<String>,
    },

    /// Test the configured generation backend
    Test,
}

#[derive(clap::Args)]
struct TripArgs {
    /// Destination city
    #[arg(long)]
    city: String,

    /// Destination country
    #[arg(long)]
    country: String,

    /// Trip length in days
    #[arg(
        short,
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u8).range(MIN_DAYS as i64..=MAX_DAYS as i64)
    )]
    days: u8,

    /// Travel month (e.g. "December" or "Dec")
    #[arg(short, long, default_value = "January")]
    month: String,

    /// Travel style: Budget, Standard, Luxury, Backpacking or Family
    #[arg(short, long, default_value = "Standard")]
    style: String,

    /// Currency label or symbol (e.g. "EUR" or "€")
    #[arg(long, default_value = "USD")]
    currency: String,

    /// Free-text interests
    #[arg(short, long, default_value = trip_planner::catalog::DEFAULT_INTERESTS)]
    interests: String,

    /// Include flights in the budget and suggestions
    #[arg(long)]
    flights: bool,
}

impl TripArgs {
    fn into_request(self) -> Result<TripRequest> {
        let style: TravelStyle = self.style.parse()?;
        let month: Month = self.month.parse()?;
        let currency = trip_planner::catalog::currency_symbol(&self.currency)
            .map(str::to_string)
            .unwrap_or(self.currency);

        let request = TripRequest::new(self.city, self.country)
            .with_days(self.days)
            .with_month(month)
            .with_style(style)
            .with_currency(currency)
            .with_interests(self.interests)
            .with_flights(self.flights);
        request.validate()?;
        Ok(request)
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper_util=off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Serve { addr } => cmd_serve(addr).await,
        Commands::Plan { trip, print_prompt } => cmd_plan(trip, print_prompt).await,
        Commands::Prompt { trip } => cmd_prompt(trip),
        Commands::Links {
            hotel,
            city,
            country,
        } => cmd_links(hotel, city, country),
        Commands::Test => cmd_test().await,
    }
}

/// Load and validate configuration; a missing API key stops the process here.
fn load_config() -> Result<Config> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn cmd_serve(addr: Option<String>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(addr) = addr {
        config.server.bind_addr = addr;
    }

    let bind_addr = config.bind_addr()?;
    let generator = build_generator(&config).context("Failed to create generation client")?;
    let state = Arc::new(AppState::new(
        generator,
        RawHtml::from_allow(config.server.allow_raw_html),
    ));

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    println!("Using {} backend", config.backend);
    println!("Open http://{} in your browser", listener.local_addr()?);

    server::serve(listener, state).await?;
    Ok(())
}

async fn cmd_plan(trip: TripArgs, print_prompt: bool) -> Result<()> {
    let request = trip.into_request()?;

    let config = load_config()?;
    let generator = build_generator(&config).context("Failed to create generation client")?;

    let prompt = Prompts::trip_plan(&request);
    if print_prompt {
        println!("{}", prompt);
        println!("{}", "─".repeat(60));
    }

    println!(
        "Planning a {}-day {} trip to {}, {} in {} (model: {})...\n",
        request.days,
        request.travel_style,
        request.city,
        request.country,
        request.month,
        generator.model()
    );

    let start = Instant::now();
    let result = generator.generate(&prompt).await;

    println!("{}", result.as_str());
    println!("\n{}", "─".repeat(60));
    println!("🗺️  {}", map_search_link(&request.city));
    for widget in affiliate_widgets(&request.city, &request.country) {
        println!("🏨 {}", widget.src);
    }
    println!("Finished in {:.2?}", start.elapsed());

    if !result.is_ok() {
        anyhow::bail!("generation failed");
    }
    Ok(())
}

fn cmd_prompt(trip: TripArgs) -> Result<()> {
    let request = trip.into_request()?;
    println!("{}", Prompts::trip_plan(&request));
    Ok(())
}

fn cmd_links(hotel: String, city: String, country: Option<String>) -> Result<()> {
    let links = booking_links(&hotel, &city);
    for (label, url) in links.entries() {
        println!("{:<12} {}", label, url);
    }

    if let Some(country) = country {
        for widget in affiliate_widgets(&city, &country) {
            println!("{:<12} {}", format!("{:?}", widget.kind), widget.src);
        }
    }
    Ok(())
}

async fn cmd_test() -> Result<()> {
    println!("Testing generation backend...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  Backend:   {}", config.backend);
    match config.backend {
        trip_planner::config::Backend::Hosted => {
            println!("  API Base:  {}", config.hosted.api_base);
            println!("  Model:     {}", config.hosted.model);
            println!(
                "  API Key:   {}...",
                config.hosted.api_key.chars().take(8).collect::<String>()
            );
        }
        trip_planner::config::Backend::Local => {
            println!("  Endpoint:  {}", config.local.endpoint);
            println!("  Model:     {}", config.local.model);
        }
    }
    println!("  Timeout:   {}s", config.generation.timeout_secs);
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let generator = build_generator(&config)?;

    println!("Sending test request...");
    let result = generator.generate(Prompts::connection_check()).await;
    match result.into_result() {
        Ok(text) if text.to_lowercase().contains("hello") => println!("Connection successful!"),
        Ok(text) => println!("Connected, but got an unexpected response: {}", text),
        Err(message) => println!("Connection failed: {}", message),
    }

    Ok(())
}
