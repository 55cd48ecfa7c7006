//! Process exit statuses.
//!
//! | status      | cause                                          |
//! |-------------|------------------------------------------------|
//! | proxy's     | proxy exited (`128 + n` if killed by signal n) |
//! | 1           | setup failure (channel, proxy spawn, client)   |
//! | 2           | configuration error                            |
//! | 3           | channel closed or unreadable                   |
//! | 4           | delivery worker failed                         |

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use crate::pipeline::PipelineError;

pub const SETUP_FAILURE: u8 = 1;
pub const CONFIG_ERROR: u8 = 2;
pub const CHANNEL_FAILURE: u8 = 3;
pub const WORKER_FAILURE: u8 = 4;

/// Why the process is exiting.
#[derive(Debug)]
pub enum ExitReason {
    /// The supervised proxy exited on its own or after a forwarded signal.
    ProxyExited(ExitStatus),
    /// The shipping pipeline stopped.
    Pipeline(PipelineError),
    /// The pipeline task itself panicked.
    PipelinePanicked(String),
    /// Something needed before the children could run failed.
    Setup(String),
    /// Shutdown was requested while no proxy was supervised.
    Requested(&'static str),
}

impl ExitReason {
    pub fn code(&self) -> u8 {
        match self {
            ExitReason::ProxyExited(status) => status_code(*status),
            ExitReason::Pipeline(e) => pipeline_code(e),
            ExitReason::PipelinePanicked(_) => WORKER_FAILURE,
            ExitReason::Setup(_) => SETUP_FAILURE,
            ExitReason::Requested(_) => 0,
        }
    }
}

fn pipeline_code(error: &PipelineError) -> u8 {
    match error {
        PipelineError::Channel(_) | PipelineError::Ingest(_) => CHANNEL_FAILURE,
        PipelineError::Client(_) => SETUP_FAILURE,
        PipelineError::WorkerPanicked(_) | PipelineError::WorkerStopped => WORKER_FAILURE,
    }
}

fn status_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return (code & 0xff) as u8;
    }
    match status.signal() {
        Some(signal) => 128u8.wrapping_add(signal as u8),
        None => SETUP_FAILURE,
    }
}
