use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tweet_engagement::config::AppConfig;
use tweet_engagement::features::{schema_fingerprint, FEATURE_NAMES};
use tweet_engagement::server;
use tweet_engagement::{format_likes, EngagementContext, PredictionResult, RawTweetRequest};

#[derive(Parser)]
#[command(name = "tweet-engagement", about = "Tweet generator and engagement predictor")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Generate(GenerateArgs),
    Serve(ServeArgs),
    Schema,
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    #[arg(long)]
    company: String,
    #[arg(long, default_value = "announcement")]
    tweet_type: String,
    #[arg(long)]
    message: String,
    #[arg(long)]
    has_media: bool,
    #[arg(long)]
    hour: Option<i64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/engagement.toml")]
    path: PathBuf,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_logging();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = AppConfig::load(cli.config)?;
    if let Some(path) = config_path.as_ref() {
        tracing::debug!(path = %path.display(), exists = path.exists(), "resolved config path");
    }

    match cli.command {
        Command::Generate(args) => run_generate(&config, args),
        Command::Serve(args) => {
            let context = Arc::new(build_context(&config)?);
            let host = args.host.unwrap_or_else(|| config.server.host.clone());
            let port = args.port.unwrap_or(config.server.port);
            server::serve(context, &host, port).await
        }
        Command::Schema => {
            for (index, name) in FEATURE_NAMES.iter().enumerate() {
                println!("{:>2}  {}", index, name);
            }
            println!("fingerprint: {}", schema_fingerprint());
            Ok(())
        }
        Command::InitConfig(args) => {
            config.write(&args.path)?;
            println!("Wrote {}", args.path.display());
            Ok(())
        }
    }
}

fn run_generate(config: &AppConfig, args: GenerateArgs) -> Result<(), String> {
    let context = build_context(config)?;
    let raw = RawTweetRequest {
        company: Some(args.company),
        tweet_type: Some(args.tweet_type),
        message: Some(args.message),
        has_media: Some(args.has_media.into()),
        hour: args.hour.map(Into::into),
    };

    let seed = args.seed.or(context.settings().template_seed);
    let (request, _) = context.normalize_request(raw);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let tweet = context.generate(&request, &mut rng);
    let outcome = context.score(&request, tweet.clone());

    if args.details {
        if let Ok(forecast) = outcome.as_ref() {
            println!("Features:");
            for (name, value) in forecast.features.named() {
                println!("  {}: {}", name, value);
            }
            println!("Raw score: {}", forecast.prediction.raw);
            println!();
        }
    }

    let result = PredictionResult::from_outcome(tweet, outcome);
    if args.json {
        let payload = serde_json::to_string_pretty(&result)
            .map_err(|err| format!("failed to serialize result: {}", err))?;
        println!("{}", payload);
        return Ok(());
    }

    println!("Generated tweet: \"{}\"", result.generated_tweet);
    if result.success {
        println!(
            "Predicted likes: {}",
            format_likes(result.predicted_likes, context.settings().rounding)
        );
        Ok(())
    } else {
        Err(result
            .error
            .unwrap_or_else(|| "prediction failed".to_string()))
    }
}

fn build_context(config: &AppConfig) -> Result<EngagementContext, String> {
    EngagementContext::from_config(config).map_err(|err| err.to_string())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tweet_engagement=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
