//! Per-entity adapters: record shape, payload and filter fields.

/// Portal documents.
pub mod document;
/// Fuel cards.
pub mod fuel_card;
/// Toll devices.
pub mod toll_device;
/// Portal users.
pub mod user;
