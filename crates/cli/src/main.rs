//! Waitroom CLI - Command-line interface for the Waitroom daemon
//! Reads the simulated queue and drives it with staff actions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "waitroom")]
#[command(about = "Waitroom queue simulator CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WAITROOM_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current queue state
    Status,

    /// Open the simulated live feed
    Start,

    /// Close the simulated live feed
    Stop,

    /// Apply one update now
    Refresh,

    /// Inject a staff action
    Inject {
        /// call_next, emergency or delay
        action: String,
    },

    /// Show recent notifications
    Events {
        /// Number of events to show
        #[arg(short = 'n', long, default_value = "20")]
        lines: usize,
    },

    /// Show simulator counters
    Stats,

    /// Print the queue state repeatedly
    Watch {
        /// Seconds between polls
        #[arg(short, long, default_value = "5")]
        interval: u64,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct QueueRow {
    #[tabled(rename = "patient")]
    patient_id: String,
    position: u32,
    #[tabled(rename = "wait (min)")]
    estimated_wait_time: u32,
    #[tabled(rename = "in queue")]
    total_patients: u32,
    #[tabled(rename = "status")]
    queue_status: String,
    #[tabled(rename = "urgency")]
    urgency_level: String,
    #[tabled(rename = "load %")]
    department_load: u32,
}

#[derive(Deserialize, Tabled)]
struct StatsRow {
    applied_updates: u64,
    periodic_ticks: u64,
    refreshes: u64,
    staff_actions: u64,
    events_emitted: u64,
    sessions_started: u64,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn connection_label(connection: &str) -> ColoredString {
    match connection {
        "connected" => connection.green().bold(),
        "connecting" => connection.yellow(),
        "error" => connection.red().bold(),
        _ => connection.dimmed(),
    }
}

/// One-line summary of a recorded notification
fn describe_event(event: &serde_json::Value) -> String {
    let kind = event["kind"].as_str().unwrap_or("unknown");
    match kind {
        "approaching-turn" => format!("{} (position {})", kind, event["position"]),
        "wait-time-changed" => format!(
            "{} ({} -> {} min)",
            kind, event["previous"], event["current"]
        ),
        "refreshed" => format!(
            "{} ({})",
            kind,
            event["update"].as_str().unwrap_or("unknown")
        ),
        "connection-lost" => format!(
            "{} ({})",
            kind,
            event["reason"].as_str().unwrap_or("no reason")
        ),
        _ => kind.to_string(),
    }
}

fn print_state(result: &serde_json::Value) -> Result<()> {
    let connection = result["connection"].as_str().unwrap_or("unknown");
    let row: QueueRow =
        serde_json::from_value(result["state"].clone()).context("Unexpected state payload")?;

    println!("  {} {}", "Feed:".bold(), connection_label(connection));
    if row.position <= 3 {
        println!("  {}", "Please stay close, you will be called soon".yellow().bold());
    }
    println!("{}", Table::new(vec![row]));
    Ok(())
}

fn print_update(result: &serde_json::Value) -> Result<()> {
    let update = &result["update"];
    println!(
        "{} {}",
        "✓ Applied".green().bold(),
        update["kind"].as_str().unwrap_or("update")
    );
    if let Some(message) = update["message"].as_str() {
        println!("  {}", message.italic());
    }
    let row: QueueRow =
        serde_json::from_value(result["state"].clone()).context("Unexpected state payload")?;
    println!("{}", Table::new(vec![row]));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let result = call_rpc(&cli.rpc_url, "queue.state.v1", json!({})).await?;
            print_state(&result)?;
        }

        Commands::Start => {
            let result = call_rpc(&cli.rpc_url, "queue.start.v1", json!({})).await?;
            let connection = result["connection"].as_str().unwrap_or("unknown");
            println!("  {} {}", "Feed:".bold(), connection_label(connection));
        }

        Commands::Stop => {
            let result = call_rpc(&cli.rpc_url, "queue.stop.v1", json!({})).await?;
            let connection = result["connection"].as_str().unwrap_or("unknown");
            println!("  {} {}", "Feed:".bold(), connection_label(connection));
        }

        Commands::Refresh => {
            let result = call_rpc(&cli.rpc_url, "queue.refresh.v1", json!({})).await?;
            print_update(&result)?;
        }

        Commands::Inject { action } => {
            let params = json!({ "action": action });
            match call_rpc(&cli.rpc_url, "queue.inject.v1", params).await {
                Ok(result) => print_update(&result)?,
                Err(e) => {
                    println!("  {} {}", "✗".red(), e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Events { lines } => {
            let result = call_rpc(&cli.rpc_url, "events.tail.v1", json!({ "lines": lines })).await?;
            let events = result["events"].as_array().cloned().unwrap_or_default();

            if events.is_empty() {
                println!("{}", "No events recorded yet".yellow());
            }
            for recorded in &events {
                println!(
                    "  {:>5}  {:>13}  {}",
                    recorded["sequence"],
                    recorded["event"]["at"],
                    describe_event(&recorded["event"])
                );
            }
            if let Some(dropped) = result["dropped"].as_u64().filter(|d| *d > 0) {
                println!("{}", format!("  ({} events dropped)", dropped).dimmed());
            }
        }

        Commands::Stats => {
            println!("{}", "Simulator Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    let connection = stats["connection"].as_str().unwrap_or("unknown");
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Feed:".bold(), connection_label(connection));
                    println!("  {} {}", "Patient:".bold(), stats["patient_id"]);
                    println!("  {} {}", "Journal:".bold(), stats["journal_len"]);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                    println!();
                    let row: StatsRow = serde_json::from_value(stats["simulator"].clone())
                        .context("Unexpected stats payload")?;
                    println!("{}", Table::new(vec![row]));
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "OFFLINE".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Watch { interval } => {
            let period = Duration::from_secs(interval.max(1));
            loop {
                let result = call_rpc(&cli.rpc_url, "queue.state.v1", json!({})).await?;
                print_state(&result)?;
                println!();
                tokio::select! {
                    _ = tokio::time::sleep(period) => {},
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inject() {
        let cli = Cli::try_parse_from(["waitroom", "inject", "call_next"]).unwrap();
        assert!(matches!(cli.command, Commands::Inject { ref action } if action == "call_next"));
        assert_eq!(cli.rpc_url, DEFAULT_RPC_URL);
    }

    #[test]
    fn test_parse_events_lines() {
        let cli = Cli::try_parse_from(["waitroom", "events", "-n", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::Events { lines: 5 }));
    }

    #[test]
    fn test_describe_event() {
        let turn = json!({"kind": "approaching-turn", "position": 3, "at": 1});
        assert_eq!(describe_event(&turn), "approaching-turn (position 3)");

        let wait = json!({"kind": "wait-time-changed", "previous": 45, "current": 60, "at": 1});
        assert_eq!(describe_event(&wait), "wait-time-changed (45 -> 60 min)");

        let connected = json!({"kind": "connected", "at": 1});
        assert_eq!(describe_event(&connected), "connected");
    }

    #[test]
    fn test_queue_row_ignores_extra_fields() {
        let state = json!({
            "patient_id": "P-1",
            "position": 8,
            "estimated_wait_time": 45,
            "total_patients": 23,
            "queue_status": "waiting",
            "urgency_level": "medium",
            "department_load": 75,
            "emergency": 3,
            "urgent": 8,
            "standard": 12,
            "total": 23,
            "last_updated": 1000
        });
        let row: QueueRow = serde_json::from_value(state).unwrap();
        assert_eq!(row.position, 8);
        assert_eq!(row.queue_status, "waiting");
    }
}
