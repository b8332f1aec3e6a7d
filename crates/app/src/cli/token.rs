use clap::Subcommand;
use shopfront_app::{
    auth::{AuthServiceError, UserTokenUuid},
    context::AppContext,
    domain::owners::UserUuid,
};

#[derive(Debug, Subcommand)]
pub(crate) enum TokenCommand {
    /// Issue a token; the plaintext is printed once and never stored
    Create {
        /// User the token authenticates as; generated when omitted
        #[arg(long)]
        user_uuid: Option<UserUuid>,

        /// Allow the token to manage products and order statuses
        #[arg(long)]
        admin: bool,
    },

    /// Revoke an active token
    Revoke {
        #[arg(long)]
        token_uuid: UserTokenUuid,
    },
}

pub(crate) async fn run(command: TokenCommand, app: &AppContext) -> Result<(), String> {
    match command {
        TokenCommand::Create { user_uuid, admin } => {
            let user = user_uuid.unwrap_or_else(UserUuid::new);

            let issued = app
                .auth
                .issue_token(user, admin)
                .await
                .map_err(|error| format!("failed to create token: {error}"))?;

            println!("token_uuid: {}", issued.metadata.uuid);
            println!("user_uuid: {}", issued.metadata.user_uuid);
            println!("is_admin: {}", issued.metadata.is_admin);
            println!("api_token: {}", issued.token);
        }
        TokenCommand::Revoke { token_uuid } => {
            match app
                .auth
                .revoke_token(token_uuid)
                .await
            {
                Ok(()) => println!("revoked token {token_uuid}"),
                Err(AuthServiceError::NotFound) => println!("token {token_uuid} was not active"),
                Err(error) => return Err(format!("failed to revoke token: {error}")),
            }
        }
    }

    Ok(())
}
