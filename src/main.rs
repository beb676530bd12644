//! leadqual - score a batch of leads or look up a profile from the command line.
//!
//! Scores are written to an in-memory store and printed as JSON on stdout;
//! logs go to stderr.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use leadqual::{Lead, LeadPipeline, LeadQualConfig, MemoryLeadStore};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "leadqual")]
#[command(about = "Score conference leads against an ideal customer profile")]
#[command(version)]
struct Args {
    /// YAML config file. Defaults apply when it does not exist.
    #[arg(short, long, default_value = "leadqual.yaml", env = "LEADQUAL_CONFIG")]
    config: PathBuf,

    /// JSON array of leads to score as one batch
    #[arg(required_unless_present = "enrich")]
    leads: Option<PathBuf>,

    /// Print the enrichment profile for this email instead of scoring
    #[arg(long, value_name = "EMAIL", conflicts_with = "leads")]
    enrich: Option<String>,

    /// Ideal customer description for this run only
    #[arg(long)]
    criteria: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = if args.config.exists() {
        LeadQualConfig::from_file(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?
    } else {
        LeadQualConfig::default()
    };
    config.apply_env();
    init_tracing(&config);

    if let Some(email) = args.enrich.as_deref() {
        let pipeline = LeadPipeline::from_config(&config, Arc::new(MemoryLeadStore::new()))?;
        let patch = pipeline.enrich_by_email(email).await;
        println!("{}", serde_json::to_string_pretty(&patch)?);
        return Ok(());
    }

    let path = args
        .leads
        .context("a leads file is required unless --enrich is given")?;
    let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let leads: Vec<Lead> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let store = Arc::new(MemoryLeadStore::from_leads(leads.iter().cloned()));
    let pipeline = LeadPipeline::from_config(&config, store.clone())?;
    tracing::info!(leads = leads.len(), "scoring batch");

    let summary = pipeline.score_event(&leads, args.criteria.as_deref()).await;
    let scored: Vec<_> = store
        .snapshot()
        .into_iter()
        .map(|lead| {
            json!({
                "id": lead.id,
                "email": lead.email,
                "score": lead.score,
                "aiSimilarityScore": lead.ai_similarity_score,
                "aiScoreExplanation": lead.ai_score_explanation,
            })
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "summary": summary, "leads": scored }))?
    );
    Ok(())
}

fn init_tracing(config: &LeadQualConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
