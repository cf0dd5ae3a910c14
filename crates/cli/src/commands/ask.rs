//! `tenderdesk ask` — run one question through the agent.

use std::sync::Arc;

use tenderdesk_agent::{AgentRunner, FastPath};
use tenderdesk_config::AppConfig;
use tenderdesk_core::run::RunState;
use tenderdesk_planner::OpenAiCompatPlanner;
use tenderdesk_tools::RecordStore;

pub async fn run(
    question: &str,
    max_steps: Option<u32>,
    trace: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    TENDERDESK_API_KEY=sk-...");
        eprintln!("    SILICONFLOW_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!(
            "    {}",
            AppConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let planner = Arc::new(
        OpenAiCompatPlanner::new("siliconflow", &config.base_url, api_key, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens),
    );
    let tools = Arc::new(tenderdesk_tools::default_registry(Arc::new(
        RecordStore::with_sample_data(),
    )));

    let fast_path = if config.agent.fast_path {
        FastPath::standard()
    } else {
        FastPath::disabled()
    };

    let agent = AgentRunner::new(planner, tools)
        .with_max_steps(max_steps.unwrap_or(config.agent.max_steps))
        .with_fast_path(fast_path);

    let ctx = agent.run(question).await;

    match &ctx.final_answer {
        Some(answer) => println!("{answer}"),
        None => eprintln!("The run failed without an answer."),
    }

    if trace {
        eprintln!();
        eprintln!("--- trace ({} steps, {}) ---", ctx.step_count, ctx.state);
        eprintln!("{}", ctx.trace());
    }

    if ctx.state == RunState::Error && ctx.final_answer.is_none() {
        return Err("agent run failed".into());
    }

    Ok(())
}
