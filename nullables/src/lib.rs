//! Nullable infrastructure for deterministic testing.
//!
//! The wallet core reaches the outside world through the `RemoteNode` seam.
//! This crate provides a test-friendly implementation that:
//! - Serves scripted accounts, fee schedule and chain state
//! - Records every broadcast instead of sending it
//! - Can be told to fail in the ways a real node fails
//!
//! Usage: hand a `NullNode` to `Wallet::new` in tests.

pub mod clock;
pub mod node;

pub use clock::NullClock;
pub use node::NullNode;
