pub mod device;
pub mod interface;
