use crate::{
    app::App,
    cli::{
        actions::{connect, rejected, report},
        globals::GlobalArgs,
    },
    features::{auth::types::UserId, users::types::edit_link},
    routes::users::{
        api_key::ApiKeyPage, change_email::RequestEmailChangePage,
        change_password::ChangePasswordPage, edit::EditUserPage, profile::ProfilePage,
    },
};
use anyhow::{Result, anyhow, bail};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub enum Op {
    Profile {
        id: UserId,
    },
    EditUser {
        id: UserId,
        name: Option<String>,
        unverified: Option<bool>,
        blocked: Option<bool>,
        admin: Option<bool>,
    },
    ChangePassword {
        id: UserId,
        old_password: SecretString,
        password: SecretString,
        retype_password: SecretString,
    },
    RequestEmailChange {
        id: UserId,
        new_email: String,
        password: SecretString,
    },
    ApiKey {
        id: UserId,
    },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub op: Op,
}

/// Prints a loaded profile with the flags the viewer gets for it.
///
/// # Errors
/// Returns an error when the profile could not be loaded.
pub fn print_profile(app: &App, page: &ProfilePage) -> Result<()> {
    let (Some(user), Some(flags)) = (page.user.as_ref(), page.flags(app)) else {
        bail!("User not found");
    };

    println!("id:     {}", user.id);
    println!("name:   {}", user.name);
    println!("email:  {}", user.email);
    println!("roles:  {}", page.roles().unwrap_or_default());
    println!("flags:  {}", serde_json::to_string(&flags)?);
    if flags.editable {
        println!("edit:   {}", edit_link(&user.id));
    }
    Ok(())
}

/// # Errors
/// Returns an error if the context cannot be loaded, the viewer lacks
/// permission, or the server rejects the request.
pub async fn execute(args: Args) -> Result<()> {
    let mut app = connect(&args.globals).await?;

    match args.op {
        Op::Profile { id } => {
            let page = ProfilePage::open(&mut app, id.as_str()).await;
            report(&mut app)?;
            print_profile(&app, &page)
        }
        Op::EditUser {
            id,
            name,
            unverified,
            blocked,
            admin,
        } => {
            let mut page = EditUserPage::open(&mut app, id.as_str()).await;
            report(&mut app)?;
            if !page.permitted(&app) {
                bail!("Not permitted to edit user {id}");
            }
            if let Some(name) = name {
                page.form.edit_field("name", name);
            }
            for (field, value) in [
                ("unverified", unverified),
                ("blocked", blocked),
                ("admin", admin),
            ] {
                if let Some(value) = value {
                    page.form.edit_field(field, value);
                }
            }
            match page.update(&mut app).await {
                Ok(_) => report(&mut app),
                Err(err) => Err(rejected(&mut app, &page.form, err)),
            }
        }
        Op::ChangePassword {
            id,
            old_password,
            password,
            retype_password,
        } => {
            let mut page = ChangePasswordPage::new(id);
            page.form
                .set("oldPassword", old_password.expose_secret())
                .set("password", password.expose_secret())
                .set("retypePassword", retype_password.expose_secret());
            match page.change_password(&mut app).await {
                Ok(_) => report(&mut app),
                Err(err) => Err(rejected(&mut app, &page.form, err)),
            }
        }
        Op::RequestEmailChange {
            id,
            new_email,
            password,
        } => {
            let mut page = RequestEmailChangePage::open(&mut app, id.as_str()).await;
            report(&mut app)?;
            page.form
                .set("newEmail", new_email)
                .set("password", password.expose_secret());
            match page.request_change(&mut app).await {
                Ok(_) => report(&mut app),
                Err(err) => Err(rejected(&mut app, &page.form, err)),
            }
        }
        Op::ApiKey { id } => {
            let mut page = ApiKeyPage::open(&mut app, id.as_str()).await;
            report(&mut app)?;
            let result = page.create_api_key(&mut app).await;
            report(&mut app)?;
            result?;
            let key = page
                .api_key()
                .ok_or_else(|| anyhow!("Server returned no API key"))?;
            println!("{key}");
            Ok(())
        }
    }
}
