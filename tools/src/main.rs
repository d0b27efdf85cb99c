//! ideasim: headless runner for the startup idea simulator.
//!
//! Usage:
//!   ideasim --query "Launch a fintech app in Lagos" [--seed 42] [--json]
//!   ideasim --history [--select N] [--json]
//!   ideasim --remote --api-base http://localhost:8000 --query "..."
//!   ideasim --ipc-mode [--remote]

mod render;

use anyhow::Result;
use ideasim_core::{
    adapter::ReportAdapter,
    backend::{MockBackend, RemoteBackend, SimulationBackend},
    client::ApiClient,
    config::{ApiConfig, GeneratorConfig},
    dashboard::{Dashboard, DashboardState, HistoryState, HistoryView, SubmitOutcome},
    generator::MockGenerator,
    history::HistoryRecord,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetQuery {
        query: String,
    },
    UseExample {
        index: usize,
    },
    Simulate {
        #[serde(default)]
        query: Option<String>,
    },
    DismissAlert,
    History,
    Select {
        index: usize,
    },
    CloseDetail,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    dashboard: DashboardState<'a>,
    history:   &'a HistoryState,
    selected:  Option<&'a HistoryRecord>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let remote = has_flag(&args, "--remote");
    let json = has_flag(&args, "--json");
    let seed = arg_value(&args, "--seed").and_then(|s| s.parse::<u64>().ok());
    let latency_ms = parse_arg(&args, "--latency-ms", 0u64);

    let config = match arg_value(&args, "--data-dir") {
        Some(dir) => GeneratorConfig::load(dir)?,
        None => GeneratorConfig::builtin(),
    };

    let backend: Arc<dyn SimulationBackend> = if remote {
        let api = match arg_value(&args, "--api-base") {
            Some(url) => ApiConfig::new(url)?,
            None => ApiConfig::from_env()?,
        };
        log::info!("using simulation service at {}", api.base_url());
        Arc::new(RemoteBackend::new(ApiClient::new(api), ReportAdapter::new(config)))
    } else {
        let generator = match seed {
            Some(seed) => MockGenerator::seeded(config, seed),
            None => MockGenerator::new(config),
        };
        log::info!("using mock generator, master seed {}", generator.master_seed());
        Arc::new(MockBackend::new(generator).with_latency(Duration::from_millis(latency_ms)))
    };

    if ipc_mode {
        return run_ipc_loop(backend).await;
    }

    if has_flag(&args, "--history") {
        let mut history = HistoryView::new(backend);
        history.load().await;
        if let Some(raw) = arg_value(&args, "--select") {
            let index: usize = raw.parse()?;
            if history.select(index).is_none() {
                log::warn!("no history record at index {index}");
            }
        }

        match (history.selected(), json) {
            (Some(record), true) => println!("{}", serde_json::to_string_pretty(record)?),
            (Some(record), false) => render::print_history_detail(record),
            (None, true) => println!("{}", serde_json::to_string_pretty(history.state())?),
            (None, false) => render::print_history(history.state()),
        }
        return Ok(());
    }

    let Some(query) = arg_value(&args, "--query") else {
        eprintln!("usage: ideasim --query \"<startup idea>\" [--seed N] [--remote] [--json]");
        eprintln!("       ideasim --history [--select N] [--remote] [--json]");
        eprintln!("       ideasim --ipc-mode [--remote]");
        return Ok(());
    };

    let mut dashboard = Dashboard::new(backend);
    dashboard.set_query(query);
    match dashboard.submit().await {
        SubmitOutcome::Blocked => {
            eprintln!("Nothing to simulate: the query is empty.");
        }
        SubmitOutcome::Failed => {
            anyhow::bail!("{}", dashboard.alert().unwrap_or("Simulation failed."));
        }
        SubmitOutcome::Completed => {
            if let Some(report) = dashboard.current() {
                if json {
                    println!("{}", serde_json::to_string_pretty(report)?);
                } else {
                    render::print_report(report);
                }
            }
        }
    }
    Ok(())
}

async fn run_ipc_loop(backend: Arc<dyn SimulationBackend>) -> Result<()> {
    let mut dashboard = Dashboard::new(backend.clone());
    let mut history = HistoryView::new(backend);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::SetQuery { query } => dashboard.set_query(query),
            IpcCommand::UseExample { index } => {
                if !dashboard.use_example(index) {
                    log::warn!("no example query at index {index}");
                }
            }
            IpcCommand::Simulate { query } => {
                if let Some(query) = query {
                    dashboard.set_query(query);
                }
                dashboard.submit().await;
            }
            IpcCommand::DismissAlert => {
                dashboard.take_alert();
            }
            IpcCommand::History => {
                history.load().await;
            }
            IpcCommand::Select { index } => {
                history.select(index);
            }
            IpcCommand::CloseDetail => history.close(),
        }

        let state = UiState {
            dashboard: dashboard.state(),
            history:   history.state(),
            selected:  history.selected(),
        };
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
