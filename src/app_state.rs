use std::sync::Arc;

use crate::agent::Agent;
use crate::config::Config;
use crate::repositories::ReportRepository;
use crate::web::flash::FlashSigner;

#[derive(Clone)]
pub struct AppState {
    pub repo: ReportRepository,
    pub agent: Arc<Agent>,
    pub flash: Arc<FlashSigner>,
}

impl AppState {
    pub fn new(repo: ReportRepository, agent: Arc<Agent>, session_secret: &str) -> Self {
        Self {
            repo,
            agent,
            flash: Arc::new(FlashSigner::new(session_secret)),
        }
    }

    /// Production wiring: real search, extraction and LLM adapters.
    pub fn from_config(config: &Config, repo: ReportRepository) -> anyhow::Result<Self> {
        let agent = Agent::from_config(config, repo.clone())?;
        Ok(Self::new(repo, Arc::new(agent), config.session_secret()))
    }
}
