//! Span construction.
//!
//! # Data Flow
//! ```text
//! LogEntry
//!     → timestamp.rs (parse `time`)
//!     → translate.rs (field mapping, unit scaling)
//!     → model.rs (wire document, serialized as a one-span array)
//! ```

pub mod model;
pub mod timestamp;
pub mod translate;

pub use model::Span;
pub use translate::{SpanTranslator, TranslateError};
