pub mod actions;
pub mod discovery;
pub mod network;
