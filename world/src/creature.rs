use face_arena_core::{CreatureId, CreatureKind, CreatureSnapshot, Point};

const DRAGON_WEAVE_RATE: f32 = 5.0;
const DRAGON_WEAVE_AMPLITUDE: f32 = 50.0;
const MENCHUBA_HOVER_RATE: f32 = 3.0;
const MENCHUBA_HOVER_AMPLITUDE: f32 = 20.0;
const MENCHUBA_AIM_LIFT: f32 = 30.0;

#[derive(Clone, Debug)]
pub(crate) struct Creature {
    id: CreatureId,
    kind: CreatureKind,
    position: Point,
    speed: f32,
    oscillation: f32,
}

impl Creature {
    pub(crate) fn new(id: CreatureId, kind: CreatureKind, position: Point, speed: f32) -> Self {
        Self {
            id,
            kind,
            position,
            speed,
            oscillation: 0.0,
        }
    }

    pub(crate) fn id(&self) -> CreatureId {
        self.id
    }

    pub(crate) fn kind(&self) -> CreatureKind {
        self.kind
    }

    pub(crate) fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn radius(&self) -> f32 {
        self.kind.radius()
    }

    pub(crate) fn displace(&mut self, offset: Point) {
        self.position += offset;
    }

    /// Steers toward `target` at constant speed, applying the variant's
    /// motion rule.
    pub(crate) fn advance(&mut self, dt: f32, target: Point) {
        match self.kind {
            CreatureKind::Dragon => {
                self.oscillation += dt * DRAGON_WEAVE_RATE;
                let weave = Point::new(self.oscillation.sin() * DRAGON_WEAVE_AMPLITUDE, 0.0);
                self.step_toward(target + weave, dt);
            }
            CreatureKind::Menchuba => {
                self.oscillation += dt * MENCHUBA_HOVER_RATE;
                let hover = self.oscillation.sin() * MENCHUBA_HOVER_AMPLITUDE;
                self.step_toward(target + Point::new(0.0, -MENCHUBA_AIM_LIFT), dt);
                self.position += Point::new(0.0, hover * dt);
            }
            _ => self.step_toward(target, dt),
        }
    }

    fn step_toward(&mut self, aim: Point, dt: f32) {
        let direction = self.position.direction_to(aim);
        self.position += direction * (self.speed * dt);
    }

    pub(crate) fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            radius: self.radius(),
            speed: self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walker_moves_straight_toward_target() {
        let mut creature = Creature::new(
            CreatureId::new(0),
            CreatureKind::Ghost,
            Point::new(0.0, 0.0),
            100.0,
        );
        creature.advance(0.5, Point::new(100.0, 0.0));

        assert!((creature.position().x() - 50.0).abs() < 1e-4);
        assert!(creature.position().y().abs() < 1e-4);
    }

    #[test]
    fn creature_on_its_target_stays_put() {
        let target = Point::new(40.0, 40.0);
        let mut creature = Creature::new(CreatureId::new(0), CreatureKind::Plain, target, 80.0);
        creature.advance(0.1, target);

        assert_eq!(creature.position(), target);
    }

    #[test]
    fn dragon_weaves_sideways() {
        let mut creature = Creature::new(
            CreatureId::new(0),
            CreatureKind::Dragon,
            Point::new(0.0, 0.0),
            120.0,
        );
        creature.advance(0.1, Point::new(0.0, 500.0));

        assert!(creature.position().x() > 0.0);
        assert!(creature.position().y() > 0.0);
    }
}
