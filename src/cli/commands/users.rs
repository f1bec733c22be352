use clap::{Arg, Command};

pub const CMD_PROFILE: &str = "profile";
pub const CMD_EDIT_USER: &str = "edit-user";
pub const CMD_CHANGE_PASSWORD: &str = "change-password";
pub const CMD_REQUEST_EMAIL_CHANGE: &str = "request-email-change";
pub const CMD_API_KEY: &str = "api-key";

fn id_arg() -> Arg {
    Arg::new("id").help("User id").required(true)
}

fn role_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .help(help)
        .value_parser(clap::value_parser!(bool))
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_PROFILE)
                .about("Show a user profile")
                .arg(id_arg()),
        )
        .subcommand(
            Command::new(CMD_EDIT_USER)
                .about("Update a user's name and, for admins, roles")
                .arg(id_arg())
                .arg(Arg::new("name").long("name").help("New display name"))
                .arg(role_arg("unverified", "Set or clear the UNVERIFIED role"))
                .arg(role_arg("blocked", "Set or clear the BLOCKED role"))
                .arg(role_arg("admin", "Set or clear the ADMIN role")),
        )
        .subcommand(
            Command::new(CMD_CHANGE_PASSWORD)
                .about("Change a user's password")
                .arg(id_arg())
                .arg(Arg::new("old-password").long("old-password").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(
                    Arg::new("retype-password")
                        .long("retype-password")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_REQUEST_EMAIL_CHANGE)
                .about("Ask for a confirmation mail at a new address")
                .arg(id_arg())
                .arg(Arg::new("new-email").long("new-email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new(CMD_API_KEY)
                .about("Create a long-lived API key")
                .arg(id_arg()),
        )
}
