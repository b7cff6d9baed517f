pub mod account;
pub mod bag;
pub mod client;
pub mod clone_task;
pub mod config;
pub mod model;
pub mod procedures;
pub mod rpc;
pub mod rpc_socket;
