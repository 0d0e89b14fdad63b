//! One-shot run from the command line: `research <query...>`.
//!
//! Stores the report like the web UI does and prints its markdown.

use anyhow::{Result, bail};
use dossier::{agent::Agent, config::Config, db, repositories::ReportRepository, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let query = query.trim();
    if query.is_empty() {
        bail!("usage: research <query>");
    }

    let config = Config::from_env()?;
    let pool = db::connect(config.database_url()).await?;
    let repo = ReportRepository::new(pool);
    let agent = Agent::from_config(&config, repo.clone())?;

    let report = agent.run(query).await?;
    println!("{}\n", report.summary_md);

    for (index, source) in repo.sources_for(report.id).await?.iter().enumerate() {
        println!(
            "[S{}] {} ({}) {}",
            index + 1,
            source.url,
            source.status.as_str(),
            source.note.as_deref().unwrap_or("")
        );
    }
    eprintln!("saved report {}", report.id);

    Ok(())
}
