//! Account command - provisioning accounts from the command line.
//!
//! Sign-up is not exposed over HTTP, so this is how members come to exist.

use std::sync::Arc;

use crate::cli::args::{AccountAction, AccountArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{AuthService, Authenticator};

/// Execute the account command
pub async fn execute(args: AccountArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config.database_url).await?;
    let auth = Authenticator::new(Arc::new(Persistence::new(db.get_connection())), config);

    match args.action {
        AccountAction::Create {
            nickname,
            email,
            password,
        } => {
            let account = auth.register(nickname, email, password).await?;
            println!("Created account {} ({})", account.nickname, account.id);
        }
    }

    Ok(())
}
