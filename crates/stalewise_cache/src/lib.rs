//! Per-entry HTTP cache decisions.
//!
//! A [`CacheEntry`] wraps a cached response with its validators and
//! freshness window and answers three questions for the calling pipeline:
//! has it expired, must it be revalidated before serving, and may it be
//! served when the origin fails. Header parsing, conditional request
//! headers and the admission policy sit around that core.

pub mod clock;
pub mod conditional;
pub mod directives;
pub mod entry;
pub mod policy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use conditional::{conditional_headers, is_not_modified};
pub use directives::{CacheControl, ResponseMetadata};
pub use entry::{CacheEntry, Freshness};
pub use policy::{CachePolicy, FailureAction, RequestAction};
