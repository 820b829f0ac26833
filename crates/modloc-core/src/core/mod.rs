//! Stateless data models and file I/O shared by the engine and workflows.

pub mod io;
pub mod models;
