pub mod artifact;
pub mod complaint;
pub mod config;
pub mod error;
pub mod location;
pub mod state;
