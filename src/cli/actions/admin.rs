use crate::{
    cli::{
        actions::{connect, rejected, report, users::print_profile},
        globals::GlobalArgs,
    },
    routes::{Route, admin::AdminPage, users::profile::ProfilePage},
};
use anyhow::{Result, bail};

#[derive(Debug)]
pub enum Op {
    FetchUser { email: String },
    SwitchUser { email: String },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub op: Op,
}

/// # Errors
/// Returns an error if the viewer is not an admin or the lookup fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut app = connect(&args.globals).await?;
    if !AdminPage::permitted(&app) {
        bail!("Admin role required");
    }
    let mut page = AdminPage::new();

    match args.op {
        Op::FetchUser { email } => {
            page.form.set("email", email);
            let route = match page.fetch_user(&mut app).await {
                Ok(route) => route,
                Err(err) => return Err(rejected(&mut app, &page.form, err)),
            };
            let id = match route {
                Route::Profile { id } => id,
                other => bail!("Unexpected route {other}"),
            };
            let profile = ProfilePage::open(&mut app, id.as_str()).await;
            report(&mut app)?;
            print_profile(&app, &profile)
        }
        Op::SwitchUser { email } => {
            page.form.set("email", email);
            let result = page.switch_user(&mut app).await;
            report(&mut app)?;
            result?;
            if let Some(user) = app.session.current_user() {
                println!("Now signed in as {} ({})", user.email, user.id);
            }
            Ok(())
        }
    }
}
