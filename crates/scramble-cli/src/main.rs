//! `scramble` — command-line client for the Scramblelist server.
//!
//! # Usage
//!
//! ```text
//! scramble participants add Alice --email alice@example.com
//! scramble exchanges create "Office 2026" --description "Budget: 20"
//! scramble --url http://localhost:5000 --user santa --password secret exchanges list
//! scramble --config ~/.config/scramblelist/cli.toml health
//! ```

mod client;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, NewExchangeBody};
use serde::Deserialize;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "scramble", about = "Command-line client for Scramblelist")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the scramblelist server (default: http://localhost:5000).
  #[arg(long, env = "SCRAMBLE_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "SCRAMBLE_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "SCRAMBLE_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Check that the server and its store are reachable.
  Health,
  /// Manage the roster.
  #[command(subcommand)]
  Participants(ParticipantsCommand),
  /// Draw and inspect exchanges.
  #[command(subcommand)]
  Exchanges(ExchangesCommand),
}

#[derive(Subcommand, Debug)]
enum ParticipantsCommand {
  /// List the roster.
  List,
  /// Add a participant.
  Add {
    name:  String,
    #[arg(long)]
    email: Option<String>,
  },
  /// Remove one participant by id.
  Remove { id: Uuid },
  /// Remove everyone from the roster.
  Clear,
}

#[derive(Subcommand, Debug)]
enum ExchangesCommand {
  /// List past exchanges, newest first.
  List,
  /// Show one exchange with its assignments.
  Show { id: Uuid },
  /// Draw a new exchange. Uses the whole roster unless `--participant` or
  /// `--from` is given.
  Create {
    title:        String,
    #[arg(long)]
    description:  Option<String>,
    /// Roster member to include; repeat for each.
    #[arg(long = "participant", value_name = "ID", conflicts_with = "from")]
    participants: Vec<Uuid>,
    /// Re-draw among the participants of an earlier exchange.
    #[arg(long, value_name = "EXCHANGE_ID")]
    from:         Option<Uuid>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:5000".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;
  let output = run(&client, args.command).await?;
  println!("{output}");
  Ok(())
}

async fn run(client: &ApiClient, command: Command) -> Result<String> {
  match command {
    Command::Health => {
      let health = client.health().await?;
      Ok(format!("{} (store {})", health.status, health.store))
    }

    Command::Participants(cmd) => match cmd {
      ParticipantsCommand::List => {
        Ok(render::roster(&client.list_participants().await?))
      }
      ParticipantsCommand::Add { name, email } => {
        let p = client.add_participant(&name, email.as_deref()).await?;
        Ok(format!("Added {}", render::participant_line(&p)))
      }
      ParticipantsCommand::Remove { id } => {
        client.remove_participant(id).await?;
        Ok(format!("Removed {id}"))
      }
      ParticipantsCommand::Clear => {
        let removed = client.clear_participants().await?;
        Ok(format!("Removed {removed} participants"))
      }
    },

    Command::Exchanges(cmd) => match cmd {
      ExchangesCommand::List => {
        Ok(render::summaries(&client.list_exchanges().await?))
      }
      ExchangesCommand::Show { id } => {
        Ok(render::exchange(&client.get_exchange(id).await?))
      }
      ExchangesCommand::Create { title, description, participants, from } => {
        let body = NewExchangeBody {
          title,
          description,
          participant_ids: (!participants.is_empty()).then_some(participants),
          from_exchange: from,
        };
        let exchange = client.create_exchange(&body).await?;
        Ok(format!("{}\n\n{}", exchange.exchange_id, render::exchange(&exchange)))
      }
    },
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_valid() { Args::command().debug_assert(); }

  #[test]
  fn create_collects_repeated_participants() {
    let a = Uuid::from_u128(1);
    let b = Uuid::from_u128(2);
    let args = Args::try_parse_from([
      "scramble",
      "exchanges",
      "create",
      "Office",
      "--participant",
      &a.to_string(),
      "--participant",
      &b.to_string(),
    ])
    .unwrap();

    match args.command {
      Command::Exchanges(ExchangesCommand::Create { title, participants, from, .. }) => {
        assert_eq!(title, "Office");
        assert_eq!(participants, vec![a, b]);
        assert_eq!(from, None);
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn participant_and_from_conflict() {
    let id = Uuid::from_u128(1).to_string();
    let result = Args::try_parse_from([
      "scramble",
      "exchanges",
      "create",
      "Office",
      "--participant",
      id.as_str(),
      "--from",
      id.as_str(),
    ]);
    assert!(result.is_err());
  }
}
