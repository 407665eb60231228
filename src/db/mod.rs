pub mod connection;
pub mod goal_repo;
pub mod migrations;

pub use connection::*;
