//! Live page inspector host: entry point.
//!
//! Waits for the embedding component to connect, tells it which page to load
//! and which script to inject, then relays the page's console output and DOM
//! inspection events and pushes CSS into the live page on command.
//!
//! # Usage
//!
//! ```text
//! inspector-host [OPTIONS]
//!
//! Options:
//!   --config <PATH>     TOML config file [default: platform config dir]
//!   --url <URL>         Page loaded into the sandbox [default: http://localhost:3000]
//!   --bind <IP>         Address for the component link [default: 127.0.0.1]
//!   --port <PORT>       Port for the component link [default: 24810]
//!   --log-level <LVL>   tracing filter when RUST_LOG is unset [default: info]
//!   --no-console        Do not read commands from stdin
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable            | Flag          |
//! |---------------------|---------------|
//! | `INSPECTOR_CONFIG`  | `--config`    |
//! | `INSPECTOR_URL`     | `--url`       |
//! | `INSPECTOR_BIND`    | `--bind`      |
//! | `INSPECTOR_PORT`    | `--port`      |
//! | `INSPECTOR_LOG`     | `--log-level` |
//!
//! Precedence, lowest first: built-in defaults, config file, environment,
//! command line.
//!
//! Log output goes to stderr; stdout carries console command output.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use inspector_host::domain::{HostConfig, HostState};
use inspector_host::infrastructure::config_file::{load_config_file, ConfigFile};
use inspector_host::infrastructure::console::run_console;
use inspector_host::infrastructure::{run_host_loop, run_server};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Live page inspector host.
///
/// Flags left unset fall back to the config file, then to built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "inspector-host",
    about = "Console capture, DOM inspection and live CSS for an embedded page",
    version
)]
struct Cli {
    /// TOML config file.  Must exist when given.
    #[arg(long, env = "INSPECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Address the sandbox loads.
    #[arg(long, env = "INSPECTOR_URL")]
    url: Option<String>,

    /// IP address the component link binds to.
    #[arg(long, env = "INSPECTOR_BIND")]
    bind: Option<String>,

    /// TCP port the component link listens on.
    #[arg(long, env = "INSPECTOR_PORT")]
    port: Option<u16>,

    /// `tracing` filter used when `RUST_LOG` is not set.
    #[arg(long, env = "INSPECTOR_LOG")]
    log_level: Option<String>,

    /// Do not read console commands from stdin.
    #[arg(long)]
    no_console: bool,
}

impl Cli {
    /// Layers the CLI flags over the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's or the flag's bind address is not an IP
    /// address.
    fn into_host_config(self, file: ConfigFile) -> anyhow::Result<HostConfig> {
        let mut config = file
            .into_host_config()
            .context("invalid configuration file")?;

        if let Some(url) = self.url {
            config.page_url = url;
        }
        if let Some(bind) = self.bind {
            let ip: IpAddr = bind
                .parse()
                .with_context(|| format!("invalid bind address: '{bind}'"))?;
            config.ws_bind_addr = SocketAddr::new(ip, config.ws_bind_addr.port());
        }
        if let Some(port) = self.port {
            config.ws_bind_addr.set_port(port);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed and layered over the config file into a
///    [`HostConfig`].
/// 2. `tracing_subscriber` is initialised (`RUST_LOG` or the configured level).
/// 3. The host loop task is spawned; it owns all host state.
/// 4. The console thread starts reading commands from stdin.
/// 5. A Ctrl+C handler clears the shared `running` flag.
/// 6. [`run_server`] accepts component connections until the flag clears.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Configuration ─────────────────────────────────────────────────────────
    //
    // `Cli::parse()` exits with a usage message on bad arguments.  The config
    // file is read before logging is up, so its errors go to `main`'s result.
    let cli = Cli::parse();
    let file = load_config_file(cli.config.as_deref()).context("failed to load configuration")?;
    let with_console = !cli.no_console;
    let config = cli.into_host_config(file)?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // RUST_LOG wins; otherwise the configured level.  Logs go to stderr so
    // they do not interleave with command output on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "live inspector host starting: page={}, link=ws://{}",
        config.page_url, config.ws_bind_addr
    );

    // ── Host loop ─────────────────────────────────────────────────────────────
    //
    // Bounded channel: a flood of page messages applies backpressure to the
    // session reader instead of growing memory without limit.
    let (events_tx, events_rx) = mpsc::channel(config.event_queue_capacity);
    let host = tokio::spawn(run_host_loop(events_rx, HostState::new(), std::io::stdout()));

    // ── Console reader ────────────────────────────────────────────────────────
    //
    // A plain thread: it is never joined, so a pending read does not delay
    // shutdown.
    if with_console {
        let tx = events_tx.clone();
        std::thread::Builder::new()
            .name("console".into())
            .spawn(move || match run_console(std::io::stdin().lock(), &tx) {
                Ok(n) => debug!(commands = n, "console input closed"),
                Err(e) => warn!("console input failed: {e}"),
            })
            .context("failed to start console thread")?;
    }

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    //
    // `Relaxed` is enough: the accept loop only needs to see the store
    // eventually, and it re-checks every 200 ms.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Component link ────────────────────────────────────────────────────────
    //
    // `events_tx` moves into the server; once it and every session task are
    // gone, the host loop's receiver reports the channel closed.
    run_server(Arc::new(config), events_tx, running).await?;

    // The console thread may still hold a sender; give the loop a moment only.
    match tokio::time::timeout(Duration::from_millis(500), host).await {
        Ok(Ok(state)) => info!(
            lines = state.logs.len(),
            errors = state.logs.error_count(),
            diagnostics = state.diagnostics.len(),
            "host loop finished"
        ),
        Ok(Err(e)) => warn!("host loop task failed: {e}"),
        Err(_) => debug!("host loop still has senders; exiting anyway"),
    }

    info!("live inspector host stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
