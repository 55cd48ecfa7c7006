//! Proxy and pipeline supervision.
//!
//! # Responsibilities
//! - Prepare the channel before either side starts
//! - Launch the proxy and run the pipeline alongside it
//! - Exit as soon as either side ends, propagating its status
//! - Forward termination signals to the proxy

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::config::ShipperConfig;
use crate::lifecycle::exit::ExitReason;
use crate::lifecycle::fifo::prepare_channel;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::pipeline::{self, PipelineError};

type PipelineHandle = JoinHandle<Result<std::convert::Infallible, PipelineError>>;

/// How long the proxy gets to exit after SIGTERM before it is killed.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(10);

/// Runs the proxy and the log-shipping pipeline as one unit.
pub struct Supervisor {
    config: ShipperConfig,
    shutdown: Shutdown,
    stop_grace: Duration,
}

impl Supervisor {
    pub fn new(config: ShipperConfig, shutdown: Shutdown) -> Self {
        Self {
            config,
            shutdown,
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }

    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    /// Create the channel, start both children, and wait for the first to end.
    pub async fn run(self) -> ExitReason {
        if let Err(e) = prepare_channel(Path::new(&self.config.channel.path)) {
            tracing::error!(error = %e, "Channel setup failed");
            return ExitReason::Setup(e.to_string());
        }

        // Subscribe before any child starts so no signal is missed.
        let mut shutdown = self.shutdown.subscribe();

        let mut proxy = match spawn_proxy(&self.config) {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(program = %self.config.proxy.program, error = %e, "Failed to start proxy");
                return ExitReason::Setup(format!("failed to start proxy: {e}"));
            }
        };
        tracing::info!(
            pid = proxy.id(),
            program = %self.config.proxy.program,
            "Proxy process started"
        );

        let mut shipper = tokio::spawn(pipeline::run_shipper(self.config.clone()));

        tokio::select! {
            status = proxy.wait() => {
                shipper.abort();
                match status {
                    Ok(status) => {
                        tracing::info!(%status, "Proxy process exited");
                        ExitReason::ProxyExited(status)
                    }
                    Err(e) => ExitReason::Setup(format!("failed to wait for proxy: {e}")),
                }
            }
            joined = &mut shipper => {
                let reason = pipeline_exit(joined);
                tracing::error!(reason = ?reason, "Log process exited");
                stop_proxy(&mut proxy, self.stop_grace).await;
                reason
            }
            cause = shutdown.recv() => {
                tracing::info!(cause = cause.unwrap_or("shutdown"), "Forwarding termination to proxy");
                let reason = stop_proxy(&mut proxy, self.stop_grace).await;
                shipper.abort();
                reason
            }
        }
    }
}

/// Run only the pipeline, for deployments where something else owns the proxy.
pub async fn ship(config: ShipperConfig, shutdown: Shutdown) -> ExitReason {
    let mut shutdown = shutdown.subscribe();
    let mut shipper: PipelineHandle = tokio::spawn(pipeline::run_shipper(config));

    tokio::select! {
        joined = &mut shipper => {
            let reason = pipeline_exit(joined);
            tracing::error!(reason = ?reason, "Log process exited");
            reason
        }
        cause = shutdown.recv() => {
            shipper.abort();
            ExitReason::Requested(cause.unwrap_or("shutdown"))
        }
    }
}

fn spawn_proxy(config: &ShipperConfig) -> std::io::Result<Child> {
    Command::new(&config.proxy.program)
        .args(&config.proxy.args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
}

fn pipeline_exit(
    joined: Result<Result<std::convert::Infallible, PipelineError>, tokio::task::JoinError>,
) -> ExitReason {
    match joined {
        Ok(Ok(never)) => match never {},
        Ok(Err(e)) => ExitReason::Pipeline(e),
        Err(e) => ExitReason::PipelinePanicked(e.to_string()),
    }
}

/// SIGTERM the proxy and wait up to `grace` for it, then SIGKILL it.
async fn stop_proxy(proxy: &mut Child, grace: Duration) -> ExitReason {
    if let Some(pid) = proxy.id() {
        if let Err(e) = signals::terminate(pid) {
            tracing::warn!(pid, error = %e, "SIGTERM failed, killing proxy");
            let _ = proxy.start_kill();
        }
    }

    let waited = match tokio::time::timeout(grace, proxy.wait()).await {
        Ok(waited) => waited,
        Err(_) => {
            tracing::warn!(
                grace_ms = grace.as_millis() as u64,
                "Proxy ignored SIGTERM, killing it"
            );
            let _ = proxy.start_kill();
            proxy.wait().await
        }
    };

    match waited {
        Ok(status) => {
            tracing::info!(%status, "Proxy process exited");
            ExitReason::ProxyExited(status)
        }
        Err(e) => ExitReason::Setup(format!("failed to wait for proxy: {e}")),
    }
}
