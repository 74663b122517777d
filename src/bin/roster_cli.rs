//! Command-line client for the roster backend.
//!
//! ```text
//! roster-cli roster get --gameweek 5 --user-id 1
//! roster-cli roster update --gameweek 5 --user-id 1 --add J34531:cap --add J45270:sub --delete J11111
//! roster-cli score --players J34531,J45270
//! ```

use clap::{Args, Parser, Subcommand};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(author, version, about = "Gameweek roster client", long_about = None)]
struct Cli {
    /// Base URL of the roster backend
    #[arg(long, env = "ROSTER_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// API key sent as x-api-key
    #[arg(long, env = "ROSTER_API_PSK")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Roster operations
    #[command(subcommand)]
    Roster(RosterCommand),
    /// Current gameweek score for a set of players
    Score {
        /// Comma-separated player ids
        #[arg(long, required = true)]
        players: String,
    },
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Show a stored roster
    Get(RosterTarget),
    /// Add and remove players
    Update {
        #[command(flatten)]
        target: RosterTarget,
        /// Player to add, as ID with optional `:sub` and `:cap` flags
        #[arg(long = "add")]
        add: Vec<String>,
        /// Player id to remove
        #[arg(long = "delete")]
        delete: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct RosterTarget {
    /// Game week number
    #[arg(long)]
    gameweek: u32,
    /// User ID
    #[arg(long)]
    user_id: String,
}

/// Parse `ID[:sub][:cap]` into an addition entry.
fn parse_addition(raw: &str) -> Result<Value, String> {
    let mut parts = raw.split(':');
    let id = parts
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| format!("missing player id in {:?}", raw))?;

    let mut is_substitute = false;
    let mut is_captain = false;
    for flag in parts {
        match flag {
            "sub" => is_substitute = true,
            "cap" => is_captain = true,
            other => return Err(format!("unknown flag {:?} in {:?}", other, raw)),
        }
    }

    Ok(json!({ "id": id, "is_substitute": is_substitute, "is_captain": is_captain }))
}

/// Pretty-print JSON bodies; anything else is shown as received.
fn render_body(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(body) => serde_json::to_string_pretty(&body).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    }
}

fn with_key(request: RequestBuilder, api_key: &Option<String>) -> RequestBuilder {
    match api_key {
        Some(key) => request.header("x-api-key", key),
        None => request,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::new();
    let base = cli.base_url.trim_end_matches('/');

    let request = match cli.command {
        Command::Score { players } => client
            .get(format!("{}/api/score", base))
            .query(&[("players", players)]),
        Command::Roster(RosterCommand::Get(target)) => client
            .get(format!("{}/api/roster", base))
            .query(&[
                ("gameweek", target.gameweek.to_string()),
                ("user_id", target.user_id),
            ]),
        Command::Roster(RosterCommand::Update { target, add, delete }) => {
            let add_players = add
                .iter()
                .map(|raw| parse_addition(raw))
                .collect::<Result<Vec<_>, _>>()?;
            client.post(format!("{}/api/roster", base)).json(&json!({
                "user_id": target.user_id,
                "gameweek": target.gameweek.to_string(),
                "add_players": add_players,
                "delete_players": delete,
            }))
        }
    };

    let response = with_key(request, &cli.api_key).send().await?;
    let status = response.status();
    let text = response.text().await?;
    println!("{}", render_body(&text));

    if !status.is_success() {
        return Err(format!("request failed with status {}", status).into());
    }
    Ok(())
}
