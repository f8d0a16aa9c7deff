//! Time formatting helpers for log output.

use warden_types::Timestamp;

/// Format a duration in seconds to a short human-readable string.
pub fn format_duration(secs: u64) -> String {
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m {}s", secs / 60, secs % 60),
        3600..=86_399 => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
        _ => format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600),
    }
}

/// "in 30s" for a future expiration, "expired 5s ago" otherwise.
pub fn describe_expiration(expiration: Timestamp, now: Timestamp) -> String {
    let (exp, now) = (u64::from(expiration.as_secs()), u64::from(now.as_secs()));
    if exp > now {
        format!("in {}", format_duration(exp - now))
    } else {
        format!("expired {} ago", format_duration(now - exp))
    }
}
