//! Shared client helpers for Beacon.
//!
//! Single-purpose lookups with no internal state machine:
//!
//! - [`iso_timestamp`] - current instant for event records.
//! - [`client_version`] - installed client version, if known.
//! - [`AgentScope`] / [`current_agent_id`] - attribute instrumented calls
//!   to the agent that made them.

pub mod agent;
pub mod time;
pub mod version;

pub use agent::{current_agent_id, AgentScope};
pub use time::iso_timestamp;
pub use version::client_version;
