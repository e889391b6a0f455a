//! Risk scoring CLI.
//!
//! Reads assessment requests as JSON and prints one risk score per request.

use anyhow::{Context, Result};
use clap::Parser;
use fraud_risk_scoring::{AssessmentRequest, RiskEngine, RiskEngineConfig, RiskScore};
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fraud-risk-scoring")]
#[command(author, version, about = "Score client signals for fraud risk")]
struct Args {
    /// Request file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Treat input as newline-delimited JSON, one request per line
    #[arg(long)]
    ndjson: bool,

    /// Pretty-print results
    #[arg(long)]
    pretty: bool,

    /// Path to configuration file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// VPN range list (overrides config)
    #[arg(long)]
    vpn_list: Option<PathBuf>,

    /// Tor exit node list (overrides config)
    #[arg(long)]
    tor_list: Option<PathBuf>,

    /// Datacenter range list (overrides config)
    #[arg(long)]
    datacenter_list: Option<PathBuf>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(json: bool, level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr; stdout carries results
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, &args.log_level);

    let mut config = match &args.config {
        Some(path) => RiskEngineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RiskEngineConfig::default(),
    };
    if let Some(path) = args.vpn_list {
        config.reputation.vpn_list_path = Some(path);
    }
    if let Some(path) = args.tor_list {
        config.reputation.tor_list_path = Some(path);
    }
    if let Some(path) = args.datacenter_list {
        config.reputation.datacenter_list_path = Some(path);
    }

    let engine = RiskEngine::new(config)?;
    engine.warm_up();

    let content = read_input(&args.input)?;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut scored = 0usize;
    if args.ndjson {
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AssessmentRequest>(line) {
                Ok(request) => {
                    write_result(&mut out, &engine.assess(&request), args.pretty)?;
                    scored += 1;
                }
                Err(e) => warn!(line = idx + 1, error = %e, "Skipping malformed request"),
            }
        }
    } else {
        let request: AssessmentRequest =
            serde_json::from_str(&content).context("request is not valid JSON")?;
        write_result(&mut out, &engine.assess(&request), args.pretty)?;
        scored += 1;
    }

    out.flush()?;
    info!(requests = scored, "Scoring finished");
    Ok(())
}

fn write_result<W: Write>(out: &mut W, result: &RiskScore, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, result)?;
    } else {
        serde_json::to_writer(&mut *out, result)?;
    }
    writeln!(out)?;
    Ok(())
}
