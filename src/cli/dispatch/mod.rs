use crate::cli::actions::Action;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    // Closure to return subcommand matches
    let sub_m = |subcommand| -> Result<&clap::ArgMatches> {
        matches
            .subcommand_matches(subcommand)
            .context("arguments not found")
    };

    match matches.subcommand_name() {
        Some("server") => {
            let matches = sub_m("server")?;

            Ok(Action::Server {
                port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
                token_url: matches
                    .get_one("token-url")
                    .map(|s: &String| s.to_string())
                    .ok_or_else(|| anyhow::anyhow!("missing required argument: --token-url"))?,
                session_url: matches
                    .get_one("session-url")
                    .map(|s: &String| s.to_string())
                    .ok_or_else(|| anyhow::anyhow!("missing required argument: --session-url"))?,
                dashboard_url: matches
                    .get_one("dashboard-url")
                    .map_or_else(|| "/dashboard".to_string(), |s: &String| s.to_string()),
            })
        }

        Some("augment") => {
            let matches = sub_m("augment")?;

            Ok(Action::Augment {
                root: matches
                    .get_one::<PathBuf>("root")
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from("resources/js/actions")),
            })
        }

        _ => Err(anyhow::anyhow!("no subcommand provided")),
    }
}
