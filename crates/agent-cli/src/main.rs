//! newsdesk: financial headline digest with optional company research
//!
//! Reports go to stdout; logs go to stderr.

mod args;
mod models;
mod output;

use agent_core::CancellationFlag;
use agent_news::{NewsConfig, NewsDesk};
use anyhow::Context as _;
use args::Args;
use clap::Parser;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    agent_utils::init_tracing(&args.log_config());

    let mut config = NewsConfig::from_env().context("reading NEWSDESK_* environment")?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    info!(
        provider = %config.provider,
        fast_model = %config.fast_model,
        capable_model = %config.capable_model,
        "Starting newsdesk"
    );

    let provider = models::provider_for(config.provider)
        .with_context(|| format!("connecting to {}", config.provider))?;
    let desk = NewsDesk::from_config(&config, models::model_set(&provider, &config))?;

    let flag = CancellationFlag::new();
    let on_interrupt = flag.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping research after the current step");
            on_interrupt.cancel();
        }
    });

    let brief = desk
        .run_with_cancellation(&args.research_targets(), flag)
        .await?;

    for failure in &brief.source_failures {
        warn!(source = %failure.source_id, detail = %failure.detail, "Headline source failed");
    }

    println!("{}", output::render_reports(&brief));
    if args.show_transcript {
        print!("{}", output::render_transcripts(&brief.research));
    }

    Ok(())
}
