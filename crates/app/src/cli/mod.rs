//! Operator commands.

use clap::{Args, Parser, Subcommand};
use shopfront_app::{
    context::AppContext,
    database::{self, Db},
    domain::orders::status::TransitionPolicy,
    storage::Repositories,
};

mod db;
mod product;
mod token;

#[derive(Debug, Parser)]
#[command(name = "shopfront-app", about = "Shopfront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    database: DatabaseArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,
}

impl DatabaseArgs {
    async fn connect(&self) -> Result<Db, String> {
        let url = self
            .database_url
            .as_deref()
            .ok_or("--database-url or DATABASE_URL is required")?;

        let pool = database::connect(url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;

        Ok(Db::new(pool))
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Schema management
    #[command(subcommand)]
    Db(db::DbCommand),

    /// Catalog maintenance
    #[command(subcommand)]
    Product(product::ProductCommand),

    /// Bearer tokens for the JSON API
    #[command(subcommand)]
    Token(token::TokenCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let db = self.database.connect().await?;

        match self.command {
            Commands::Db(command) => db::run(command, &db).await,
            Commands::Product(command) => product::run(command, &context(&db)).await,
            Commands::Token(command) => token::run(command, &context(&db)).await,
        }
    }
}

fn context(db: &Db) -> AppContext {
    AppContext::from_repositories(&Repositories::postgres(db), TransitionPolicy::default())
}
