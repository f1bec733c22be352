use crate::{
    cli::{
        actions::{Action, account, admin, session, users},
        commands::{self, connection},
        globals::GlobalArgs,
    },
    features::auth::types::UserId,
};
use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

/// The innermost subcommand's matches. Global arguments are propagated down,
/// so they are complete there wherever they were given.
#[must_use]
pub fn leaf(matches: &ArgMatches) -> &ArgMatches {
    let mut current = matches;
    while let Some((_, sub)) = current.subcommand() {
        current = sub;
    }
    current
}

fn globals(matches: &ArgMatches) -> GlobalArgs {
    let mut globals = GlobalArgs::new(
        matches
            .get_one::<String>(connection::ARG_HOST)
            .cloned()
            .unwrap_or_else(|| connection::DEFAULT_HOST.to_string()),
    );
    if let Some(url) = matches.get_one::<String>(connection::ARG_API_BASE_URL) {
        globals = globals.with_api_base_url(url.clone());
    }
    if let Some(path) = matches.get_one::<String>(connection::ARG_CREDENTIAL_FILE) {
        globals = globals.with_credential_file(PathBuf::from(path));
    }
    globals
}

fn string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: {id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    string(matches, id).map(SecretString::from)
}

fn user_id(matches: &ArgMatches) -> Result<UserId> {
    string(matches, "id").map(UserId::new)
}

/// # Errors
/// Returns an error if required arguments are missing or the subcommand is
/// unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let Some((name, sub)) = matches.subcommand() else {
        bail!("missing subcommand, see --help");
    };
    let globals = globals(leaf(matches));

    let action = match name {
        commands::session::CMD_WHOAMI => session_action(globals, session::Op::WhoAmI),
        commands::session::CMD_LOGIN => session_action(
            globals,
            session::Op::Login {
                username: string(sub, "username")?,
                password: secret(sub, "password")?,
            },
        ),
        commands::session::CMD_LOGOUT => session_action(globals, session::Op::Logout),
        commands::session::CMD_SOCIAL_LOGIN => session_action(
            globals,
            session::Op::SocialLogin {
                token: string(sub, "token")?,
            },
        ),
        commands::session::CMD_PING => session_action(globals, session::Op::Ping),
        commands::session::CMD_OPEN => session_action(
            globals,
            session::Op::Open {
                location: string(sub, "location")?,
            },
        ),
        commands::account::CMD_SIGNUP => account_action(
            globals,
            account::Op::Signup {
                email: string(sub, "email")?,
                name: string(sub, "name")?,
                password: secret(sub, "password")?,
                captcha_response: sub
                    .get_one::<String>("captcha-response")
                    .cloned()
                    .unwrap_or_default(),
            },
        ),
        commands::account::CMD_FORGOT_PASSWORD => account_action(
            globals,
            account::Op::ForgotPassword {
                email: string(sub, "email")?,
            },
        ),
        commands::account::CMD_RESET_PASSWORD => account_action(
            globals,
            account::Op::ResetPassword {
                code: string(sub, "code")?,
                password: secret(sub, "password")?,
                retype_password: secret(sub, "retype-password")?,
            },
        ),
        commands::account::CMD_VERIFY => account_action(
            globals,
            account::Op::Verify {
                id: user_id(sub)?,
                code: string(sub, "code")?,
            },
        ),
        commands::account::CMD_CHANGE_EMAIL => account_action(
            globals,
            account::Op::ChangeEmail {
                id: user_id(sub)?,
                code: string(sub, "code")?,
            },
        ),
        commands::account::CMD_RESEND_VERIFICATION => account_action(
            globals,
            account::Op::ResendVerification {
                id: sub.get_one::<String>("id").cloned().map(UserId::new),
            },
        ),
        commands::users::CMD_PROFILE => {
            users_action(globals, users::Op::Profile { id: user_id(sub)? })
        }
        commands::users::CMD_EDIT_USER => users_action(
            globals,
            users::Op::EditUser {
                id: user_id(sub)?,
                name: sub.get_one::<String>("name").cloned(),
                unverified: sub.get_one::<bool>("unverified").copied(),
                blocked: sub.get_one::<bool>("blocked").copied(),
                admin: sub.get_one::<bool>("admin").copied(),
            },
        ),
        commands::users::CMD_CHANGE_PASSWORD => users_action(
            globals,
            users::Op::ChangePassword {
                id: user_id(sub)?,
                old_password: secret(sub, "old-password")?,
                password: secret(sub, "password")?,
                retype_password: secret(sub, "retype-password")?,
            },
        ),
        commands::users::CMD_REQUEST_EMAIL_CHANGE => users_action(
            globals,
            users::Op::RequestEmailChange {
                id: user_id(sub)?,
                new_email: string(sub, "new-email")?,
                password: secret(sub, "password")?,
            },
        ),
        commands::users::CMD_API_KEY => {
            users_action(globals, users::Op::ApiKey { id: user_id(sub)? })
        }
        commands::admin::CMD_ADMIN => {
            let op = match sub.subcommand() {
                Some((commands::admin::CMD_FETCH, args)) => admin::Op::FetchUser {
                    email: string(args, "email")?,
                },
                Some((commands::admin::CMD_SWITCH, args)) => admin::Op::SwitchUser {
                    email: string(args, "email")?,
                },
                _ => bail!("missing admin subcommand, see --help"),
            };
            Action::Admin(admin::Args { globals, op })
        }
        other => bail!("unknown subcommand: {other}"),
    };

    Ok(action)
}

fn session_action(globals: GlobalArgs, op: session::Op) -> Action {
    Action::Session(session::Args { globals, op })
}

fn account_action(globals: GlobalArgs, op: account::Op) -> Action {
    Action::Account(account::Args { globals, op })
}

fn users_action(globals: GlobalArgs, op: users::Op) -> Action {
    Action::Users(users::Args { globals, op })
}
