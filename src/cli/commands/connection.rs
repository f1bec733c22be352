use clap::{Arg, Command};

pub const ARG_HOST: &str = "host";
pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_CREDENTIAL_FILE: &str = "credential-file";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_CREDENTIAL_FILE: &str = ".lemon-auth.json";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_HOST)
                .long("host")
                .help("Front end host name used to look up the API server")
                .default_value(DEFAULT_HOST)
                .env("LEMON_HOST")
                .global(true),
        )
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long("api-base-url")
                .help("API base URL, overrides the host lookup, example: http://localhost:8080")
                .env("LEMON_API_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_CREDENTIAL_FILE)
                .long("credential-file")
                .help("File holding the persisted credential")
                .default_value(DEFAULT_CREDENTIAL_FILE)
                .env("LEMON_CREDENTIAL_FILE")
                .global(true),
        )
}
