pub mod engagement;
pub mod post;
pub mod social_graph;
pub mod spin;
pub mod user;

use time::OffsetDateTime;

/// Milliseconds since the Unix epoch, the unit of every `timestamp` field.
pub fn unix_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}
