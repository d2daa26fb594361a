//! Segment planning.

use super::Segment;

/// Number of connections worth opening for `total_size` bytes.
///
/// Starts at `max_connections` and drops one connection at a time while every
/// segment would end up smaller than `min_segment_size`. Never returns less
/// than 1.
pub fn connection_count(total_size: u64, max_connections: usize, min_segment_size: u64) -> usize {
    let mut count = max_connections.max(1);
    while count > 1 && (count as u64).saturating_mul(min_segment_size) > total_size {
        count -= 1;
    }
    count
}

/// Splits `[0, total_size)` into `count` contiguous segments.
///
/// Every segment is `total_size / count` bytes long except the last one, which
/// absorbs the remainder. Returns an empty plan if `total_size` or `count` is 0.
pub fn plan_segments(total_size: u64, count: usize) -> Vec<Segment> {
    if total_size == 0 || count == 0 {
        return Vec::new();
    }

    let count = (count as u64).min(total_size);
    let base = total_size / count;

    (0..count)
        .map(|i| {
            let start = i * base;
            let end = if i + 1 == count {
                total_size
            } else {
                start + base
            };
            Segment::new(i as usize, start, end)
        })
        .collect()
}
