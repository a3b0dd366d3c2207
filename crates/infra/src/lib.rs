mod activity;
mod config;
mod repos;
mod system;

pub use activity::{ActivityProviderError, IUserActivityProvider, InMemoryUserActivityProvider};
pub use config::Config;
pub use repos::{
    IEventRepo, IRewardRepo, IRewardRequestRepo, InsertClaimError, Repos, RewardRequestQuery,
    StockDecrementOutcome, TransitionOutcome,
};
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::{info, warn};

#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub activity: Arc<dyn IUserActivityProvider>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub mongodb_uri: String,
    pub mongodb_database: String,
}

impl Context {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_mongodb(&params.mongodb_uri, &params.mongodb_database).await?;
        Ok(Self {
            repos,
            activity: Arc::new(InMemoryUserActivityProvider::new()),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            activity: Arc::new(InMemoryUserActivityProvider::new()),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> Context {
    let config = Config::new();
    match &config.mongodb_uri {
        Some(uri) => {
            info!("Connecting to mongodb database: {}", config.mongodb_database);
            Context::create(ContextParams {
                mongodb_uri: uri.clone(),
                mongodb_database: config.mongodb_database.clone(),
            })
            .await
            .expect("Mongodb credentials must be set and valid")
        }
        None => {
            warn!("MONGODB_URI is not set, falling back to the inmemory data store. All data is lost on shutdown.");
            Context::create_inmemory()
        }
    }
}
