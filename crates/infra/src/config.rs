use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Mongodb connection string. When absent the server falls back to
    /// the inmemory data store, which is only useful for local
    /// development and tests.
    pub mongodb_uri: Option<String>,
    /// Name of the mongodb database to use
    pub mongodb_database: String,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        let mongodb_uri = std::env::var("MONGODB_URI").ok();
        let mongodb_database =
            std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "festivo".into());
        Self {
            port,
            mongodb_uri,
            mongodb_database,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
