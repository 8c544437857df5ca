//! Wire formats spoken by Gude PDUs.
//!
//! Everything here is pure byte/string handling, sockets live in `pductl-core`.

pub mod gbl;
pub mod linesensor;
pub mod telnet;
