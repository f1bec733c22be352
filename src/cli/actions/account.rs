use crate::{
    cli::{
        actions::{connect, rejected, report},
        globals::GlobalArgs,
    },
    features::auth::types::UserId,
    routes::{
        forgot_password::ForgotPasswordPage,
        reset_password::ResetPasswordPage,
        signup::SignupPage,
        users::{change_email, verify},
    },
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub enum Op {
    Signup {
        email: String,
        name: String,
        password: SecretString,
        captcha_response: String,
    },
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        code: String,
        password: SecretString,
        retype_password: SecretString,
    },
    Verify {
        id: UserId,
        code: String,
    },
    ChangeEmail {
        id: UserId,
        code: String,
    },
    ResendVerification {
        id: Option<UserId>,
    },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub op: Op,
}

/// # Errors
/// Returns an error if the context cannot be loaded or the server rejects the
/// request.
pub async fn execute(args: Args) -> Result<()> {
    let mut app = connect(&args.globals).await?;

    match args.op {
        Op::Signup {
            email,
            name,
            password,
            captcha_response,
        } => {
            let mut page = SignupPage::open(&mut app);
            page.form
                .set("email", email)
                .set("name", name)
                .set("password", password.expose_secret())
                .set("captchaResponse", captcha_response);
            match page.signup(&mut app).await {
                Ok(_) => report(&mut app),
                Err(err) => Err(rejected(&mut app, &page.form, err)),
            }
        }
        Op::ForgotPassword { email } => {
            let mut page = ForgotPasswordPage::open(&mut app);
            page.form.set("email", email);
            match page.forgot_password(&mut app).await {
                Ok(_) => report(&mut app),
                Err(err) => Err(rejected(&mut app, &page.form, err)),
            }
        }
        Op::ResetPassword {
            code,
            password,
            retype_password,
        } => {
            let mut page = ResetPasswordPage::new(Some(code));
            page.form
                .set("newPassword", password.expose_secret())
                .set("retypePassword", retype_password.expose_secret());
            match page.reset_password(&mut app).await {
                Ok(_) => report(&mut app),
                Err(err) => Err(rejected(&mut app, &page.form, err)),
            }
        }
        Op::Verify { id, code } => {
            verify::verify(&mut app, &id, &code).await;
            report(&mut app)
        }
        Op::ChangeEmail { id, code } => {
            change_email::change_email(&mut app, &id, &code).await?;
            report(&mut app)
        }
        Op::ResendVerification { id } => {
            let result = app.resend_verification_mail(id.as_ref()).await;
            report(&mut app)?;
            Ok(result?)
        }
    }
}
