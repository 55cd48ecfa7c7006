//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (supervisor.rs):
//!     Load config → fifo.rs (fresh FIFO) → spawn proxy → run pipeline
//!
//! Exit (supervisor.rs, exit.rs):
//!     proxy exits        → propagate its status
//!     pipeline fails     → stop proxy, exit with pipeline status
//!
//! Signals (signals.rs, shutdown.rs):
//!     SIGTERM/SIGINT → Shutdown trigger → SIGTERM forwarded to proxy
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The pipeline has no graceful drain; the queue is in-memory only

pub mod exit;
pub mod fifo;
pub mod shutdown;
pub mod signals;
pub mod supervisor;

pub use exit::ExitReason;
pub use shutdown::Shutdown;
pub use supervisor::Supervisor;
