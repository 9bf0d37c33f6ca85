use std::net::SocketAddr;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use pokergpt::config::{
    CompletionConfig, DEFAULT_ADDR, DEFAULT_API_BASE, DEFAULT_MODEL, ServerConfig,
};
use pokergpt::form::{self, AdviceForm, AdviceResult};
use pokergpt::situation::{OpponentField, SituationField};
use pokergpt::{HttpAdviceService, web};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pokergpt",
    version,
    about = "Poker hand advice from a chat-completion model",
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the advice proxy server
    Serve {
        /// Address to bind (HOST:PORT)
        #[arg(long, env = "POKERGPT_ADDR", default_value = DEFAULT_ADDR)]
        addr: String,

        /// Chat-completion API key
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Model used for analysis
        #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// Base URL of the chat-completion API
        #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },
    /// Submit a hand to a running server and print the advice
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Base URL of the advice server
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Total pot size in big blinds
    #[arg(long)]
    pot: String,

    /// Your hole cards, e.g. "Jc Td"
    #[arg(long)]
    hand: String,

    /// Your position, e.g. "Button"
    #[arg(long)]
    position: String,

    /// Community cards, e.g. "As Kh Qd"
    #[arg(long, default_value = "")]
    board: String,

    /// No community cards have been dealt
    #[arg(long, default_value_t = false)]
    preflop: bool,

    /// Opponent bet and seat as BET@POSITION (repeat for up to 5 opponents)
    #[arg(long = "opponent", value_parser = parse_opponent)]
    opponents: Vec<(String, String)>,

    /// Disable ANSI colors in output
    #[arg(long = "no-color", default_value_t = false)]
    no_color: bool,
}

fn parse_opponent(raw: &str) -> Result<(String, String), String> {
    let (bet, position) = raw
        .split_once('@')
        .ok_or_else(|| format!("expected BET@POSITION, got {raw:?}"))?;
    Ok((bet.trim().to_string(), position.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = color_eyre::install();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            addr,
            api_key,
            model,
            api_base,
        } => {
            let addr: SocketAddr = addr.parse()?;
            let config = ServerConfig {
                addr,
                completion: CompletionConfig {
                    api_key,
                    model,
                    api_base,
                },
            };
            web::serve(config).await?
        }
        Commands::Analyze(args) => run_analyze(args).await?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pokergpt=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut advice_form = AdviceForm::new();
    advice_form.set_field(SituationField::PotSize, args.pot);
    advice_form.set_field(SituationField::HandCards, args.hand);
    advice_form.set_field(SituationField::Position, args.position);
    advice_form.set_field(SituationField::CommunityCards, args.board);
    advice_form.set_preflop(args.preflop);
    advice_form.set_opponent_count(args.opponents.len().max(1))?;
    for (idx, (bet, position)) in args.opponents.into_iter().enumerate() {
        advice_form.set_opponent_field(idx, OpponentField::Bet, bet)?;
        advice_form.set_opponent_field(idx, OpponentField::Position, position)?;
    }

    let service = HttpAdviceService::new(&args.server);
    let shared = advice_form.shared();
    if args.no_color {
        println!("Analyzing...");
    } else {
        println!("{}", "Analyzing...".dimmed());
    }
    let result = form::submit(&shared, &service).await?;
    print_result(&result, args.no_color);
    Ok(())
}

fn print_result(result: &AdviceResult, no_color: bool) {
    match (result, no_color) {
        (AdviceResult::Advice(text), true) => println!("Advice: {text}"),
        (AdviceResult::Failure(text), true) => println!("{text}"),
        (AdviceResult::Advice(text), false) => {
            println!("{} {}", "Advice".bold().green(), text)
        }
        (AdviceResult::Failure(text), false) => println!("{}", text.bold().red()),
    }
}
