//! Address-space service for the protocol core.
//!
//! Implements Browse, GetReferences, RegisterNodes, UnregisterNodes, Read,
//! Write, HistoryRead, and Call over a shared
//! [`NodeManager`](ua_nodes::NodeManager). Every operation reports through a
//! [`ServiceContext`] completion sink.
//!
//! # Modules
//!
//! - [`address_space`]: [`AddressSpace`] and [`ManagedAddressSpace`]
//! - [`context`]: [`ServiceContext`] and [`Completion`]
//! - [`history`]: History dispatcher and [`HistoryProvider`]
//! - [`method`]: Method invocation resolver
//! - [`config`]: [`ServiceConfig`]
//! - [`error`]: [`ServiceError`]

pub mod address_space;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod method;

pub use address_space::{AddressSpace, ManagedAddressSpace};
pub use config::{HistoryConfig, ServiceConfig, WindowBounds};
pub use context::{Completion, ServiceContext, ServiceOutcome};
pub use error::{ServiceError, ServiceResult};
pub use history::{filter_window, HistoryDispatcher, HistoryProvider, InMemoryHistory, NoHistory};
pub use method::{call_method, get_invocation_handler};
