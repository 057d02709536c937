//! Numeric helpers shared by the view state and hit-testing.

/// Default extra boundary used by [`point_in_rect`].
pub const DEFAULT_RECT_MARGIN: f64 = 0.5;

/// Restrict `n` to the closed range `[min, max]`.
#[must_use]
pub fn clamp(n: f64, min: f64, max: f64) -> f64 {
    if n > max {
        max
    } else if n < min {
        min
    } else {
        n
    }
}

/// Like [`clamp`], but the valid window is widened by `margin` on both sides.
#[must_use]
pub fn clamp_with_margin(n: f64, min: f64, max: f64, margin: f64) -> f64 {
    clamp(n, min - margin, max + margin)
}

/// Apply `delta` to `n` unless `n` is already out of range and `delta`
/// would push it further out.
///
/// A value above `max` refuses positive deltas but accepts non-positive
/// ones unchanged (it may overshoot back past `min`). The lower bound is
/// symmetric. In-range values always receive the full delta.
#[must_use]
pub fn rate_limited_clamp(n: f64, min: f64, max: f64, delta: f64) -> f64 {
    if (n > max && delta > 0.0) || (n < min && delta < 0.0) {
        n
    } else {
        n + delta
    }
}

/// Euclidean distance between `(xs[0], ys[0])` and `(xs[1], ys[1])`.
#[must_use]
pub fn distance(xs: [f64; 2], ys: [f64; 2]) -> f64 {
    (xs[1] - xs[0]).hypot(ys[1] - ys[0])
}

/// Inclusive containment test of `point` in the `[x, y, dx, dy]` rectangle,
/// with `margin` of tolerance on every edge.
#[must_use]
pub fn point_in_rect(rect: [f64; 4], point: [f64; 2], margin: f64) -> bool {
    let [x, y, dx, dy] = rect;
    x - margin <= point[0]
        && x + dx + margin >= point[0]
        && y - margin <= point[1]
        && y + dy + margin >= point[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_saturates_both_ends() {
        assert!((clamp(15.0, 0.0, 10.0) - 10.0).abs() < f64::EPSILON);
        assert!((clamp(-3.0, 0.0, 10.0) - 0.0).abs() < f64::EPSILON);
        assert!((clamp(4.0, 0.0, 10.0) - 4.0).abs() < f64::EPSILON);
        assert!((clamp(7.0, f64::NEG_INFINITY, f64::INFINITY) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_with_margin_allows_overshoot() {
        assert!((clamp_with_margin(10.5, 0.0, 10.0, 1.0) - 10.5).abs() < f64::EPSILON);
        assert!((clamp_with_margin(12.0, 0.0, 10.0, 1.0) - 11.0).abs() < f64::EPSILON);
        assert!((clamp_with_margin(-5.0, 0.0, 10.0, 1.0) + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_limited_clamp_refuses_further_excursion() {
        assert!((rate_limited_clamp(15.0, 0.0, 10.0, 5.0) - 15.0).abs() < f64::EPSILON);
        assert!((rate_limited_clamp(15.0, 0.0, 10.0, -20.0) + 5.0).abs() < f64::EPSILON);
        assert!((rate_limited_clamp(-5.0, 0.0, 10.0, -1.0) + 5.0).abs() < f64::EPSILON);
        assert!((rate_limited_clamp(-5.0, 0.0, 10.0, 3.0) + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_limited_clamp_passes_in_range_values() {
        assert!((rate_limited_clamp(5.0, 0.0, 10.0, 20.0) - 25.0).abs() < f64::EPSILON);
        assert!((rate_limited_clamp(5.0, 0.0, 10.0, -2.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((distance([0.0, 3.0], [0.0, 4.0]) - 5.0).abs() < 1e-12);
        assert!(distance([2.0, 2.0], [7.0, 7.0]).abs() < 1e-12);
    }

    #[test]
    fn point_in_rect_is_inclusive_with_margin() {
        let rect = [10.0, 10.0, 20.0, 5.0];
        assert!(point_in_rect(rect, [10.0, 10.0], 0.0));
        assert!(point_in_rect(rect, [30.0, 15.0], 0.0));
        assert!(!point_in_rect(rect, [30.4, 15.0], 0.0));
        assert!(point_in_rect(rect, [30.4, 15.0], DEFAULT_RECT_MARGIN));
        assert!(!point_in_rect(rect, [9.0, 12.0], DEFAULT_RECT_MARGIN));
    }
}
