//! Client-side list synchronization: a cached server collection, a
//! draft/applied filter pair, superseding remote searches, page windows and
//! confirmed create/update/delete kept consistent with the visible view.
//!
//! # Examples
//!
//! Filter commit and pagination without a runtime:
//! ```
//! use listsync::{
//!     core::filter::FilterCommit,
//!     engine::pagination::Pager,
//!     entities::fuel_card::FuelCard,
//!     record::Record,
//! };
//!
//! let mut filters = FilterCommit::new(FuelCard::FILTER_FIELDS);
//! filters.set_draft("pan", "  4000 ").expect("known field");
//! filters.set_draft("matricula", "").expect("known field");
//! assert!(filters.applied().is_blank());
//!
//! let query = filters.commit().to_query();
//! assert_eq!(query.get("pan"), Some("4000"));
//! assert_eq!(query.get("matricula"), None);
//!
//! let mut pager = Pager::new(25);
//! pager.set_page(2, 30);
//! assert!(pager.clamp_to(10));
//! assert_eq!(pager.current_page(), 1);
//! ```
//!
//! Runtime usage with a remote source:
//! ```no_run
//! use listsync::{
//!     engine::traits::{FixedAnswer, RemoteSource},
//!     notify::ToastQueue,
//!     runtime::{config::ControllerConfig, handle::spawn_controller},
//!     types::Presentation,
//! };
//!
//! # async fn run<S: RemoteSource>(source: S) -> Result<(), listsync::error::ControllerError> {
//! let cfg = ControllerConfig::for_presentation(Presentation::Constrained);
//! let toasts = ToastQueue::from_config(&cfg);
//! let handle = spawn_controller(source, FixedAnswer(true), toasts, cfg);
//! handle.load().await?;
//! handle.set_draft("pan", "4000").await?;
//! handle.commit().await?;
//! handle.wait_settled().await?;
//! let view = handle.snapshot().await?;
//! println!("{} of {} records", view.items.len(), view.visible_len);
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]

/// Authoritative in-memory state: filters and the collection store.
pub mod core;
/// Pagination, search planning and collaborator traits.
pub mod engine;
/// Per-entity adapters.
pub mod entities;
/// Error taxonomy and user-facing fallback messages.
pub mod error;
/// Notifications and the auto-dismissing toast queue.
pub mod notify;
/// Record contract and list request/response types.
pub mod record;
/// Controller runtime: loop, handle, events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
