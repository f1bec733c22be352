use clap::{Arg, ArgAction, Command};

pub const CMD_SIGNUP: &str = "signup";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";
pub const CMD_VERIFY: &str = "verify";
pub const CMD_CHANGE_EMAIL: &str = "change-email";
pub const CMD_RESEND_VERIFICATION: &str = "resend-verification";

fn password_arg(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(long).help(help).required(true)
}

fn code_arg() -> Arg {
    Arg::new("code")
        .long("code")
        .help("Code from the mail")
        .required(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_SIGNUP)
                .about("Create an account")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .env("LEMON_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(
                    Arg::new("captcha-response")
                        .long("captcha-response")
                        .help("reCAPTCHA response, when the server asks for one")
                        .default_value(""),
                ),
        )
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("Mail a password reset link")
                .arg(Arg::new("email").required(true)),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Set a new password with the code from the reset mail")
                .arg(code_arg())
                .arg(password_arg("password", "password", "New password"))
                .arg(password_arg(
                    "retype-password",
                    "retype-password",
                    "New password again",
                )),
        )
        .subcommand(
            Command::new(CMD_VERIFY)
                .about("Verify an email address")
                .arg(Arg::new("id").required(true))
                .arg(code_arg()),
        )
        .subcommand(
            Command::new(CMD_CHANGE_EMAIL)
                .about("Confirm a pending email change")
                .arg(Arg::new("id").required(true))
                .arg(code_arg()),
        )
        .subcommand(
            Command::new(CMD_RESEND_VERIFICATION)
                .about("Send the verification mail again")
                .arg(
                    Arg::new("id")
                        .help("User id (default: the signed-in user)")
                        .action(ArgAction::Set),
                ),
        )
}
