use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use embedding_verifier::{verify, ClientConfig, EmbedClient, SimilarityPair, Thresholds};
use tracing::info;

/// Checks that a hosted embedding model ranks semantically related sentences
/// above unrelated ones.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Model id on the provider
    #[arg(long, default_value = "sentence-transformers/all-MiniLM-L6-v2")]
    model: String,

    /// Provider base URL; defaults to the hosted HuggingFace inference API
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token, if the provider requires one
    #[arg(long)]
    token: Option<String>,

    /// Minimum cosine similarity a related pair must reach
    #[arg(long, default_value_t = 0.8)]
    related_min: f32,

    /// Maximum cosine similarity an unrelated pair may reach
    #[arg(long, default_value_t = 0.6)]
    unrelated_max: f32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Fail fast instead of waiting for the provider to load the model
    #[arg(long)]
    no_wait: bool,
}

const TEXTS: [&str; 4] = [
    "React hooks useState for state management",
    "useState React hook manages local component state",
    "Python Django models for database operations",
    "JavaScript async await for asynchronous programming",
];

fn pairs() -> Vec<SimilarityPair> {
    vec![
        SimilarityPair::related(0, 1),
        SimilarityPair::unrelated(0, 2),
        SimilarityPair::unrelated(0, 3),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .model_id(args.model.as_str())
        .endpoint(args.endpoint)
        .token(args.token)
        .wait_for_model(!args.no_wait)
        .timeout(Duration::from_secs(args.timeout_secs))
        .build();

    info!(model = %args.model, "checking embedding similarity");

    let client = EmbedClient::new(config)?;
    let results = client.fetch_all(&TEXTS).await;

    let thresholds = Thresholds {
        related_min: args.related_min,
        unrelated_max: args.unrelated_max,
    };
    let report = verify(&results, &pairs(), &thresholds)?;

    for (index, text) in TEXTS.iter().enumerate() {
        println!("[{index}] {text}");
    }
    println!();

    for outcome in &report.outcomes {
        let SimilarityPair { a, b, label } = outcome.pair;
        let verdict = if outcome.passed { "ok" } else { "failed" };
        match (outcome.score, &outcome.error) {
            (Some(score), None) => {
                println!("pair ({a}, {b}) {label}: score {score:.3} -> {verdict}");
            }
            (Some(score), Some(err)) => {
                println!("pair ({a}, {b}) {label}: score {score:.3} -> {verdict} ({err})");
            }
            (None, Some(err)) => {
                println!("pair ({a}, {b}) {label}: {err} -> {verdict}");
            }
            (None, None) => {
                println!("pair ({a}, {b}) {label}: no score -> {verdict}");
            }
        }
    }

    println!();
    println!("verdict: {}", if report.passed { "pass" } else { "fail" });

    Ok(if report.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
