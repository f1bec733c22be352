use clap::{Arg, Command};

pub const CMD_ADMIN: &str = "admin";
pub const CMD_FETCH: &str = "fetch";
pub const CMD_SWITCH: &str = "switch";

fn email_arg() -> Arg {
    Arg::new("email").required(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command.subcommand(
        Command::new(CMD_ADMIN)
            .about("Administration")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(
                Command::new(CMD_FETCH)
                    .about("Look a user up by email")
                    .arg(email_arg()),
            )
            .subcommand(
                Command::new(CMD_SWITCH)
                    .about("Sign in as another user (good admins only)")
                    .arg(email_arg()),
            ),
    )
}
