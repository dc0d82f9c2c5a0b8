//! Single-writer controller loop, its handle and events.

/// Controller tunables.
pub mod config;
/// Event stream types emitted by the controller.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
/// In-flight mutation keys.
pub mod pending;
/// Filter lifecycle state machine.
pub mod phase;
