pub mod client;
pub mod config;
pub mod contract;
pub mod folder;
pub mod visit;
pub mod zmq;
