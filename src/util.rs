use std::f64::consts::PI;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Wraps an angle into `(-π, π]`.
pub fn normalize_radian(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI { wrapped + 2.0 * PI } else { wrapped }
}

pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Absolute angle between two headings, in `[0, π]`.
pub fn heading_difference(yaw_a: f64, yaw_b: f64) -> f64 {
    let a = nalgebra::Vector2::new(yaw_a.cos(), yaw_a.sin());
    let b = nalgebra::Vector2::new(yaw_b.cos(), yaw_b.sin());
    // rounding can push the dot product just past ±1
    a.dot(&b).clamp(-1.0, 1.0).acos().abs()
}

/// Converts seconds to integer nanoseconds, rounding to the nearest tick.
pub fn seconds_to_nanos(seconds: f64) -> i64 {
    (seconds * 1e9).round() as i64
}

/// Lets one event through per `period`.
///
/// Used to rate-limit warnings that would otherwise fire on every frame.
pub struct Throttle {
    period: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(period: Duration) -> Throttle {
        Throttle {
            period,
            last: Mutex::new(None),
        }
    }

    /// Returns `true` if the caller may emit now, and records the emission.
    pub fn ready(&self) -> bool {
        let now = Instant::now();
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match *last {
            Some(prev) if now.duration_since(prev) < self.period => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}
