//! Ephemeral laser-pointer trail.

use kurbo::Point;
use std::collections::VecDeque;
use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// How long a trail point stays visible.
pub const TRAIL_TTL: Duration = Duration::from_millis(800);
/// Hard cap on buffered points, enforced FIFO regardless of expiry.
pub const MAX_TRAIL_POINTS: usize = 64;

/// A single point of the trail with its expiry time.
#[derive(Debug, Clone, Copy)]
struct TrailPoint {
    position: Point,
    expires_at: Instant,
}

/// Self-expiring point buffer behind the laser tool.
///
/// Rendered as a fading polyline; never touches the element store and never
/// appears in snapshots. There are no timers to cancel: expiry is swept
/// lazily and the whole buffer dies with its owner.
#[derive(Debug, Clone, Default)]
pub struct LaserTrail {
    points: VecDeque<TrailPoint>,
}

impl LaserTrail {
    /// Create an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a world point with the standard TTL.
    pub fn push(&mut self, position: Point) {
        self.push_at(position, Instant::now());
    }

    /// Drop expired points.
    pub fn sweep(&mut self) {
        self.sweep_at(Instant::now());
    }

    /// Live points with a fade factor in `(0, 1]` (1 = just pushed).
    pub fn fading(&self) -> Vec<(Point, f64)> {
        self.fading_at(Instant::now())
    }

    pub(crate) fn push_at(&mut self, position: Point, now: Instant) {
        if self.points.len() >= MAX_TRAIL_POINTS {
            self.points.pop_front();
        }
        self.points.push_back(TrailPoint {
            position,
            expires_at: now + TRAIL_TTL,
        });
    }

    pub(crate) fn sweep_at(&mut self, now: Instant) {
        self.points.retain(|p| p.expires_at > now);
    }

    pub(crate) fn fading_at(&self, now: Instant) -> Vec<(Point, f64)> {
        self.points
            .iter()
            .filter(|p| p.expires_at > now)
            .map(|p| {
                let remaining = p.expires_at.duration_since(now).as_secs_f64();
                (p.position, (remaining / TRAIL_TTL.as_secs_f64()).min(1.0))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
