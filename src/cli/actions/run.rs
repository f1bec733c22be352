use crate::cli::actions::{Action, account, admin, session, users};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Session(args) => session::execute(args).await,
        Action::Account(args) => account::execute(args).await,
        Action::Users(args) => users::execute(args).await,
        Action::Admin(args) => admin::execute(args).await,
    }
}
