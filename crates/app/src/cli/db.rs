use clap::Subcommand;
use shopfront_app::database::{self, Db};

#[derive(Debug, Subcommand)]
pub(crate) enum DbCommand {
    /// Apply pending migrations
    Migrate,
}

pub(crate) async fn run(command: DbCommand, db: &Db) -> Result<(), String> {
    match command {
        DbCommand::Migrate => {
            database::migrate(db.pool())
                .await
                .map_err(|error| format!("failed to run migrations: {error}"))?;

            println!("migrations applied");
        }
    }

    Ok(())
}
