//! Pure geometry helpers used by the visibility test and the policies.
//!
//! Bearings are measured in raw arena coordinates (`y` grows downward),
//! while headings move an agent along `(cos h, -sin h)`. The two frames are
//! deliberately left as they are: the view cone computed from a bearing is
//! mirrored across the agent's horizontal axis relative to its direction of
//! travel, and neighbor sets depend on that.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use creatures_types::Point;

/// Signed angle in `(-π, π]` from the reference `axis` to the direction
/// pointing from `origin` at `target`.
///
/// When both points share a horizontal coordinate the raw angle is `±π/2`
/// by vertical order instead of dividing by zero. Coincident points yield
/// `π/2 - axis`.
///
/// The final correction adds or subtracts `2π` once. That covers every raw
/// angle when `axis` lies in `[0, 2π)`; it is not a general modulo.
pub fn bearing_to(origin: Point, axis: f64, target: Point) -> f64 {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;

    let mut bearing = if dx != 0.0 {
        (dy / dx).atan()
    } else if target.y < origin.y {
        -FRAC_PI_2
    } else {
        FRAC_PI_2
    };

    // atan only covers the right half-plane
    if target.x < origin.x {
        bearing += PI;
    }

    let bearing = bearing - axis;
    if bearing > PI {
        bearing - TAU
    } else if bearing <= -PI {
        bearing + TAU
    } else {
        bearing
    }
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    (p.x - q.x).hypot(p.y - q.y)
}

/// Reduce an angle into `[0, 2π)`.
///
/// Tiny negative inputs can round up to exactly `2π` after the correction;
/// those fold to `0` so the upper bound stays open.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut reduced = angle % TAU;
    if reduced < 0.0 {
        reduced += TAU;
    }
    if reduced >= TAU { 0.0 } else { reduced }
}

/// Mean direction of a set of angles, normalized into `[0, 2π)`.
///
/// Returns `None` for an empty set or when the unit vectors cancel out.
pub fn circular_mean<I>(angles: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sin_sum, cos_sum) = angles
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(s, c), a| (s + a.sin(), c + a.cos()));

    if sin_sum.hypot(cos_sum) < 1e-9 {
        return None;
    }
    Some(normalize_angle(sin_sum.atan2(cos_sum)))
}
