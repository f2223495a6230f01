#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::Arg;
use clap::Command;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Transport;
use crate::domain::services::normalizer;
use crate::infrastructure::backends::worker::Worker;

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("RELAYCHAT_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("relaychat");
}

fn log_path() -> path::PathBuf {
    return log_dir().join("debug.log");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default().as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

/// Sends one message to the worker and prints the reply. Errors are printed
/// the same way the chat shows them.
async fn ask<T: Transport + ?Sized>(transport: &T, input: &str) -> Result<String> {
    let text = input.trim();
    if text.is_empty() {
        bail!("There is nothing to ask, the message is empty.");
    }

    let res = transport.send(text).await;
    if let Err(err) = &res {
        tracing::error!(error = %err, "Worker request failed");
    }

    let message = normalizer::reply_message(&res);
    if res.is_err() {
        bail!(message.text);
    }

    return Ok(message.text);
}

/// What to do once the command line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    StartChat,
    Exit(i32),
}

/// Runs `ask` and writes the reply to `out`, or the error to `err_out`.
async fn run_ask<T: Transport + ?Sized, O: io::Write, E: io::Write>(
    transport: &T,
    input: &str,
    out: &mut O,
    err_out: &mut E,
) -> Result<Outcome> {
    match ask(transport, input).await {
        Ok(reply) => {
            writeln!(out, "{reply}")?;
            return Ok(Outcome::Exit(0));
        }
        Err(err) => {
            writeln!(err_out, "{}", Paint::red(err))?;
            return Ok(Outcome::Exit(1));
        }
    }
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("RELAYCHAT_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "{} [default: {}]",
            ConfigKey::ConfigFile.description(),
            Config::default(ConfigKey::ConfigFile)
        ))
        .global(true);
}

fn arg_username() -> Arg {
    return Arg::new(ConfigKey::Username.to_string())
        .long(ConfigKey::Username.to_string())
        .env("RELAYCHAT_USERNAME")
        .num_args(1)
        .help(ConfigKey::Username.description())
        .global(true);
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Send a single message to the worker and print the reply.")
        .arg(
            Arg::new("text")
                .required(true)
                .num_args(1..)
                .help("Message to send."),
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start a new chat session.");
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Relaychat")
        .hide(true)
        .subcommand(Command::new("log-path").about("Output path to debug log file."))
        .subcommand(Command::new("enum-config").about("List config keys as strings."));
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nMessages are sent one at a time to the worker configured in {}.\nSet RUST_LOG=relaychat to write debug logs to {}.",
        env!("CARGO_PKG_DESCRIPTION"),
        Config::default(ConfigKey::ConfigFile),
        log_path().to_string_lossy()
    );

    return Command::new("relaychat")
        .about(about)
        .author("Relaychat contributors")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(subcommand_chat())
        .subcommand(subcommand_ask())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(arg_config_file())
        .arg(arg_username());
}

/// Parses the command line and runs any one-shot subcommand.
pub async fn parse() -> Result<Outcome> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    println!("{}", ConfigKey::VARIANTS.join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(Outcome::Exit(0));
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            let text = subcmd_matches
                .get_many::<String>("text")
                .map(|words| return words.cloned().collect::<Vec<String>>().join(" "))
                .unwrap_or_default();

            return run_ask(
                &Worker::default(),
                &text,
                &mut io::stdout(),
                &mut io::stderr(),
            )
            .await;
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        Some(("config", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("create", _)) => {
                    create_config_file().await?;
                }
                Some(("default", _)) => {
                    println!("{}", Config::serialize_default());
                }
                Some(("path", _)) => {
                    println!("{}", Config::default(ConfigKey::ConfigFile));
                }
                _ => {
                    subcommand_config().print_long_help()?;
                }
            }

            return Ok(Outcome::Exit(0));
        }
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(Outcome::StartChat);
}
