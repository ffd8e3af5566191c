//! Embedded web server exposing the diagram backend API.

mod server;
pub mod source;

pub use server::{router, serve, AppState};
