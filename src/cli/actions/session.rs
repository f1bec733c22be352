use crate::{
    app::App,
    cli::{
        actions::{connect, print_alerts, rejected, report, users::print_profile},
        globals::GlobalArgs,
    },
    routes::{
        Route, about, home,
        login::{self, LoginDialog},
        social_login,
        users::{change_email, profile::ProfilePage, verify},
    },
};
use anyhow::{Result, anyhow};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

#[derive(Debug)]
pub enum Op {
    WhoAmI,
    Login {
        username: String,
        password: SecretString,
    },
    Logout,
    SocialLogin {
        token: String,
    },
    Ping,
    Open {
        location: String,
    },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub op: Op,
}

/// # Errors
/// Returns an error if the context cannot be loaded or the request fails.
pub async fn execute(args: Args) -> Result<()> {
    let Args { globals, op } = args;

    if matches!(op, Op::Logout) {
        return logout(&globals).await;
    }

    let mut app = connect(&globals).await?;

    match op {
        Op::WhoAmI => whoami(&mut app),
        Op::Login { username, password } => {
            let mut dialog = LoginDialog::new();
            dialog
                .form
                .set("username", username.as_str())
                .set("password", password.expose_secret());
            match dialog.login(&mut app).await {
                Ok(user) => {
                    info!(user_id = %user.id, "login completed");
                    println!("Signed in as {} ({})", user.email, user.id);
                    report(&mut app)
                }
                Err(err) => Err(rejected(&mut app, &dialog.form, err)),
            }
        }
        Op::SocialLogin { token } => {
            let result = social_login::show(&mut app, Some(token.as_str())).await;
            report(&mut app)?;
            result?;
            whoami(&mut app)
        }
        Op::Ping => {
            let result = app.ping().await;
            report(&mut app)?;
            result?;
            println!("pong");
            Ok(())
        }
        Op::Open { location } => open(&mut app, &location).await,
        Op::Logout => Ok(()),
    }
}

/// Prints the signed-in user, followed by the verification reminder when
/// it applies.
fn whoami(app: &mut App) -> Result<()> {
    match app.session.current_user() {
        Some(user) => println!("{} <{}> (id {})", user.name, user.email, user.id),
        None => {
            println!("Not signed in");
            return Ok(());
        }
    }
    if app.remind_unverified() {
        print_alerts(app);
        println!("`lemon resend-verification` mails the link again.");
    }
    Ok(())
}

async fn logout(globals: &GlobalArgs) -> Result<()> {
    match connect(globals).await {
        Ok(mut app) => login::logout(&mut app)?,
        Err(err) => {
            debug!("logging out without context: {err}");
            globals.credential_store().clear()?;
        }
    }
    println!("Signed out");
    Ok(())
}

/// Follows a client link the way the web front end would route it.
async fn open(app: &mut App, location: &str) -> Result<()> {
    let route = Route::parse(location);
    debug!(route = %route, "opening");

    match route {
        Route::Home => {
            home::show(app);
            whoami(app)
        }
        Route::About => {
            about::show(app);
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            println!("{}", env!("CARGO_PKG_DESCRIPTION"));
            Ok(())
        }
        Route::SocialLoginSuccess { token } => {
            let result = social_login::show(app, token.as_deref()).await;
            report(app)?;
            result?;
            whoami(app)
        }
        Route::Verify { id, code } => {
            let code = code.ok_or_else(|| anyhow!("Verification link has no code"))?;
            verify::verify(app, &id, &code).await;
            report(app)
        }
        Route::ChangeEmail { id, code } => {
            let code = code.ok_or_else(|| anyhow!("Email change link has no code"))?;
            change_email::change_email(app, &id, &code).await?;
            report(app)
        }
        Route::Profile { id } => {
            let page = ProfilePage::open(app, id.as_str()).await;
            report(app)?;
            print_profile(app, &page)
        }
        Route::ResetPassword { code } => {
            println!(
                "lemon reset-password --code {} --password <new> --retype-password <new>",
                code.unwrap_or_default()
            );
            Ok(())
        }
        other => {
            println!("{other} has a matching subcommand, see `lemon --help`");
            Ok(())
        }
    }
}
