//! revenue-forecast CLI: one JSON request in, one JSON envelope out.
//!
//! The request document is taken from the single positional argument, or
//! read from stdin to EOF when no argument is given. Success prints the
//! result envelope on stdout and exits 0; any failure prints
//! `{"error": <message>}` on stdout and exits 1. Nothing else is ever
//! written to stdout.

use clap::Parser;
use revenue_forecast::pipeline;
use revenue_forecast::request::ForecastRequest;
use revenue_forecast::Result;
use std::io::Read;

#[derive(Parser)]
#[command(name = "revenue-forecast")]
#[command(about = "Monthly revenue forecasting with ARIMA/SARIMA models")]
#[command(version)]
struct Cli {
    /// Request JSON; read from stdin when omitted.
    input: Option<String>,
}

fn read_request(cli: &Cli) -> std::io::Result<String> {
    match &cli.input {
        Some(input) => Ok(input.clone()),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run(input: &str) -> Result<String> {
    let request = ForecastRequest::from_json(input)?;
    let envelope = pipeline::run(&request)?;
    Ok(serde_json::to_string(&envelope).unwrap_or_else(|e| {
        // Envelope types only hold strings and numbers; reaching this
        // means a serializer bug, still reported through the contract.
        format!(r#"{{"error":"failed to serialize result: {e}"}}"#)
    }))
}

fn main() {
    let cli = Cli::parse();

    let input = match read_request(&cli) {
        Ok(input) => input,
        Err(e) => {
            println!(
                "{}",
                serde_json::json!({ "error": format!("failed to read input: {e}") })
            );
            std::process::exit(1);
        }
    };

    match run(&input) {
        Ok(envelope) => println!("{envelope}"),
        Err(e) => {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    }
}
