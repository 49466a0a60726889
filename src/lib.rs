pub mod cache;
pub mod config;
pub mod matcher;
pub mod model;
pub mod organize;
pub mod remote;
pub mod selection;
pub mod session;
