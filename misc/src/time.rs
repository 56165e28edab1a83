use chrono::Local;

/// Returns the current unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
    Local::now().timestamp() as u64
}
