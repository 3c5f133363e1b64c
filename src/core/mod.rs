pub mod entity;
pub mod error;
pub mod graph;
pub mod naming;
pub mod navigate;
pub mod store;
pub mod types;
pub mod value;
