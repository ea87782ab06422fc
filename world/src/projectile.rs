use face_arena_core::{
    PlayArea, Point, ProjectileId, ProjectileKind, ProjectileOwner, ProjectileSnapshot,
};

const SNAKE_WIGGLE_RATE: f32 = 10.0;
const SNAKE_WIGGLE_AMPLITUDE: f32 = 30.0;

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    kind: ProjectileKind,
    owner: ProjectileOwner,
    position: Point,
    velocity: Point,
    wiggle: f32,
}

impl Projectile {
    pub(crate) fn new(
        id: ProjectileId,
        kind: ProjectileKind,
        owner: ProjectileOwner,
        position: Point,
        velocity: Point,
    ) -> Self {
        Self {
            id,
            kind,
            owner,
            position,
            velocity,
            wiggle: 0.0,
        }
    }

    pub(crate) fn id(&self) -> ProjectileId {
        self.id
    }

    pub(crate) fn owner(&self) -> ProjectileOwner {
        self.owner
    }

    pub(crate) fn radius(&self) -> f32 {
        self.kind.radius()
    }

    /// Moves the projectile and reports whether it is still inside `area`.
    pub(crate) fn advance(&mut self, dt: f32, area: &PlayArea) -> bool {
        self.position += self.velocity * dt;
        if self.kind == ProjectileKind::Snake {
            self.wiggle += dt * SNAKE_WIGGLE_RATE;
            let lateral = Point::ZERO.direction_to(self.velocity).perpendicular();
            let offset = self.wiggle.sin() * SNAKE_WIGGLE_AMPLITUDE;
            self.position += lateral * (offset * dt);
        }
        area.contains(self.position)
    }

    pub(crate) fn overlaps(&self, center: Point, radius: f32) -> bool {
        self.position.distance(center) < self.radius() + radius
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind,
            owner: self.owner,
            position: self.position,
            velocity: self.velocity,
            radius: self.radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projectile_leaving_the_top_edge_expires_in_the_same_step() {
        let area = PlayArea::new(640.0, 480.0);
        let mut projectile = Projectile::new(
            ProjectileId::new(0),
            ProjectileKind::Laser,
            ProjectileOwner::Player,
            Point::new(0.0, 0.0),
            Point::new(0.0, -400.0),
        );

        assert!(!projectile.advance(0.016, &area));
    }

    #[test]
    fn snake_drifts_off_its_straight_line() {
        let area = PlayArea::new(1000.0, 1000.0);
        let mut projectile = Projectile::new(
            ProjectileId::new(0),
            ProjectileKind::Snake,
            ProjectileOwner::Boss,
            Point::new(500.0, 500.0),
            Point::new(0.0, 250.0),
        );

        assert!(projectile.advance(0.1, &area));
        assert!((projectile.snapshot().position.x() - 500.0).abs() > 1e-3);
    }
}
