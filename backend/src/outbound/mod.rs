//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local repositories guarded by one async lock per
//!   collection, plus the demo catalog seed.
//!
//! Adapters are thin translators with no business logic. Every write is a
//! compare-and-swap on the stored revision.

pub mod memory;
