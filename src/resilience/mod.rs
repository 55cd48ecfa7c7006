//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Span delivery to collector:
//!     → attempt send
//!     → On failure: backoff.rs (fixed delay), then resend the same payload
//! ```
//!
//! # Design Decisions
//! - One retry policy: fixed interval, unlimited attempts
//! - No jitter

pub mod backoff;

pub use backoff::FixedBackoff;
