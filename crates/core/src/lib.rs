// Waitroom Core - Queue Domain, Simulator & Ports
// NO RPC or terminal dependencies (adapters live in their own crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
