use std::time::Duration;

use face_arena_core::Point;

/// Horizontal radius of the orbit around the followed player.
const ORBIT_RADIUS_X: f32 = 150.0;
/// Vertical radius of the orbit around the followed player.
const ORBIT_RADIUS_Y: f32 = 80.0;

/// Ability timer that fires once its interval has elapsed and then restarts
/// from zero.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cooldown {
    interval: Duration,
    elapsed: Duration,
}

impl Cooldown {
    pub(crate) const fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Accumulates `dt` and reports whether the ability fires this step.
    pub(crate) fn tick(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            return true;
        }
        false
    }
}

/// Elliptical path followed around the nearest player.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Orbit {
    angle: f32,
}

impl Orbit {
    /// Advances the angle by one radian per second and returns the new
    /// position around `center`.
    pub(crate) fn advance(&mut self, dt: Duration, center: Point) -> Point {
        self.angle += dt.as_secs_f32();
        self.position(center)
    }

    pub(crate) fn position(&self, center: Point) -> Point {
        center
            + Point::new(
                self.angle.cos() * ORBIT_RADIUS_X,
                self.angle.sin() * ORBIT_RADIUS_Y,
            )
    }

    pub(crate) fn angle(&self) -> f32 {
        self.angle
    }
}

/// Teleport ability: jumps to a player anchor and holds there briefly.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Teleport {
    cooldown: Cooldown,
    hold: Duration,
    destination: Point,
}

/// How long a boss stays put after teleporting.
const TELEPORT_HOLD: Duration = Duration::from_secs(1);

impl Teleport {
    pub(crate) const fn new(interval: Duration) -> Self {
        Self {
            cooldown: Cooldown::new(interval),
            hold: Duration::ZERO,
            destination: Point::ZERO,
        }
    }

    /// Advances the teleport timer. `pick` chooses the destination when the
    /// ability fires. Returns the held position while the hold lasts.
    pub(crate) fn step<F>(&mut self, dt: Duration, pick: F) -> Option<Point>
    where
        F: FnOnce() -> Option<Point>,
    {
        if self.cooldown.tick(dt) {
            if let Some(destination) = pick() {
                self.destination = destination;
                self.hold = TELEPORT_HOLD;
            }
        }

        if self.hold.is_zero() {
            return None;
        }
        self.hold = self.hold.saturating_sub(dt);
        Some(self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_fires_once_per_interval_and_restarts() {
        let mut cooldown = Cooldown::new(Duration::from_millis(300));
        let step = Duration::from_millis(100);

        assert!(!cooldown.tick(step));
        assert!(!cooldown.tick(step));
        assert!(cooldown.tick(step));
        assert!(!cooldown.tick(step));
    }

    #[test]
    fn large_steps_fire_at_most_once() {
        let mut cooldown = Cooldown::new(Duration::from_millis(100));
        assert!(cooldown.tick(Duration::from_secs(1)));
        assert!(!cooldown.tick(Duration::from_millis(50)));
    }

    #[test]
    fn orbit_traces_an_ellipse_around_the_center() {
        let mut orbit = Orbit::default();
        let center = Point::new(500.0, 400.0);
        assert_eq!(orbit.position(center), Point::new(650.0, 400.0));

        let quarter_turn = Duration::from_secs_f32(std::f32::consts::FRAC_PI_2);
        let position = orbit.advance(quarter_turn, center);
        assert!((position.x() - 500.0).abs() < 1e-3);
        assert!((position.y() - 480.0).abs() < 1e-3);
    }

    #[test]
    fn teleport_holds_for_one_second() {
        let mut teleport = Teleport::new(Duration::from_secs(5));
        let step = Duration::from_millis(100);
        let anchor = Point::new(10.0, 20.0);

        let positions: Vec<Option<Point>> = (0..70)
            .map(|_| teleport.step(step, || Some(anchor)))
            .collect();

        assert!(positions[..49].iter().all(Option::is_none));
        assert!(positions[49..59]
            .iter()
            .all(|position| *position == Some(anchor)));
        assert!(positions[59..].iter().all(Option::is_none));
    }
}
