//! JSON-RPC API Layer
//!
//! Exposes one patient's queue simulator over JSON-RPC 2.0 so the patient
//! view, the admin console and the CLI can read snapshots and drive the
//! simulated feed.

pub mod error;
pub mod handler;
pub mod journal;
pub mod server;
pub mod types;

pub use journal::EventJournal;
pub use server::{RpcServer, RpcServerConfig};
