//! Bookshelf application library
//!
//! Domain modules (books, urls) and the bootstrap that wires them into the
//! HTTP server.

pub mod bootstrap;
pub mod modules;
pub mod utils;

pub use modules::register_all;
