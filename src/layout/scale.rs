/// Map an occurrence count onto `[min_scale, max_scale]`.
///
/// When every tag has the same count they all tie for most frequent and get
/// `max_scale`. Counts outside `[min_count, max_count]` are clamped.
pub fn normalize(
    count: u64,
    min_count: u64,
    max_count: u64,
    min_scale: f32,
    max_scale: f32,
) -> f32 {
    let (lo, hi) = if min_count <= max_count {
        (min_count, max_count)
    } else {
        (max_count, min_count)
    };
    if lo == hi {
        return max_scale;
    }
    let clamped = count.clamp(lo, hi);
    // u64 → f64 keeps precision for large counts before narrowing the ratio.
    let t = (clamped - lo) as f64 / (hi - lo) as f64;
    min_scale + (max_scale - min_scale) * t as f32
}
