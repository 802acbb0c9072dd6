use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};
use std::path::PathBuf;

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("veriform")
        .about("Email verification service and route-helper form augmentor")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("VERIFORM_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("server")
                .about("Start the email verification HTTP service")
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Port to listen on")
                        .default_value("8080")
                        .env("VERIFORM_PORT")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    Arg::new("token-url")
                        .long("token-url")
                        .help("Token service base URL, example: https://tokens.tld:8200")
                        .env("VERIFORM_TOKEN_URL")
                        .required(true),
                )
                .arg(
                    Arg::new("session-url")
                        .long("session-url")
                        .help("Session service base URL used to resolve the authenticated principal")
                        .env("VERIFORM_SESSION_URL")
                        .required(true),
                )
                .arg(
                    Arg::new("dashboard-url")
                        .long("dashboard-url")
                        .help("Default post-verification destination")
                        .default_value("/dashboard")
                        .env("VERIFORM_DASHBOARD_URL"),
                ),
        )
        .subcommand(
            Command::new("augment")
                .about("Append form definitions to generated route-helper files")
                .arg(
                    Arg::new("root")
                        .short('r')
                        .long("root")
                        .help("Directory containing the generated route-helper files")
                        .default_value("resources/js/actions")
                        .env("VERIFORM_ACTIONS_ROOT")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}
