//! Thread order checker library.
//!
//! Walks the paginated threads listing of an email API and verifies that the
//! threads come back newest first.

pub mod config;
pub mod threads;
