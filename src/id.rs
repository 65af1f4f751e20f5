//! ID generation utilities for gyre
//!
//! Every loop invocation gets a fresh identifier; state and memory carry it
//! so dumps from concurrent loops stay distinguishable.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a unique loop ID
///
/// Format: `gyre-{timestamp_ms}-{random_hex}`
/// Example: `gyre-1738300800123-a1b2`
pub fn generate_loop_id() -> String {
    let timestamp = now_ms();
    let random: u16 = rand::rng().random();
    format!("gyre-{}-{:04x}", timestamp, random)
}
