pub mod config;
pub mod cube;
pub mod error;
pub mod ids;
pub mod io;
pub mod link;
pub mod occurrence;
pub mod parallel;
