use anyhow::Result;
use clap::{Parser, Subcommand};
use mealgen::cli::OutputFormat;
use mealgen_planner::GenerationRequest;

/// mealgen - Heart-healthy meal plans with a shopping list
#[derive(Parser)]
#[command(name = "mealgen")]
#[command(about = "Generate meal plans and shopping lists with Gemini", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Request a meal plan from a running server and print it
    Generate {
        /// Number of days to plan
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Number of people to cook for
        #[arg(long, default_value_t = 2)]
        people: u32,

        /// Ingredients to leave out, comma separated
        #[arg(long, default_value = "")]
        exclude: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Server base URL (overrides config file)
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Print the prompt that would be sent for a request
    Prompt {
        #[arg(long, default_value_t = 7)]
        days: u32,

        #[arg(long, default_value_t = 2)]
        people: u32,

        #[arg(long, default_value = "")]
        exclude: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = mealgen::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize observability (tracing + logging)
    mealgen::observability::init_observability(
        "mealgen",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
        &config.observability.format,
    )?;

    match cli.command {
        Commands::Serve { host, port } => mealgen::server::serve(config, host, port).await,
        Commands::Generate {
            days,
            people,
            exclude,
            format,
            endpoint,
        } => {
            let request = GenerationRequest::new(days, people, exclude)?;
            mealgen::cli::generate(config, request, format, endpoint).await
        }
        Commands::Prompt {
            days,
            people,
            exclude,
        } => mealgen::cli::prompt(&GenerationRequest::new(days, people, exclude)?),
    }
}
