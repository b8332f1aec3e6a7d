//! Database Config

use clap::Args;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string. Without one the server keeps its data
    /// in memory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}
