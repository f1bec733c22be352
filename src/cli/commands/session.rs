use clap::{Arg, Command};

pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_SOCIAL_LOGIN: &str = "social-login";
pub const CMD_PING: &str = "ping";
pub const CMD_OPEN: &str = "open";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(Command::new(CMD_WHOAMI).about("Show the signed-in user"))
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in with email and password")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .help("Email address")
                        .env("LEMON_USERNAME")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Password")
                        .env("LEMON_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Forget the stored credential"))
        .subcommand(
            Command::new(CMD_SOCIAL_LOGIN)
                .about("Complete a social login with the token handed back by the provider")
                .arg(Arg::new("token").required(true)),
        )
        .subcommand(Command::new(CMD_PING).about("Check that the API server answers"))
        .subcommand(
            Command::new(CMD_OPEN)
                .about("Follow a client link, e.g. one received by mail")
                .arg(
                    Arg::new("location")
                        .help("Path or URL, example: /users/1/verify?code=abc")
                        .required(true),
                ),
        )
}
