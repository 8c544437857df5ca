use tracing::info;

/// Events under this target are written verbatim, without a level symbol.
pub const TARGET: &str = "pductl::print";

pub fn print(msg: &str) {
    info!(target: TARGET, raw_msg = msg);
}
