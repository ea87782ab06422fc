use face_arena_core::{BossAbilities, BossKind, BossSlot, BossSnapshot, Point};

/// Health restored to a boss whenever it consumes a creature.
const CONSUME_HEAL: u32 = 5;

#[derive(Clone, Debug)]
pub(crate) struct Boss {
    slot: BossSlot,
    kind: BossKind,
    position: Point,
    health: u32,
    max_health: u32,
    heading: f32,
    words_collected: u32,
    abilities: BossAbilities,
}

impl Boss {
    pub(crate) fn new(slot: BossSlot, kind: BossKind, position: Point) -> Self {
        let max_health = kind.max_health();
        Self {
            slot,
            kind,
            position,
            health: max_health,
            max_health,
            heading: 0.0,
            words_collected: 0,
            abilities: BossAbilities::default(),
        }
    }

    pub(crate) fn kind(&self) -> BossKind {
        self.kind
    }

    pub(crate) fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn radius(&self) -> f32 {
        self.kind.radius()
    }

    pub(crate) fn health(&self) -> u32 {
        self.health
    }

    pub(crate) fn is_defeated(&self) -> bool {
        self.health == 0 && !self.kind.is_immortal()
    }

    /// Reports whether player projectiles currently pass through the boss.
    pub(crate) fn deflects_projectiles(&self) -> bool {
        self.abilities.shield || self.kind.is_immortal()
    }

    pub(crate) fn update(&mut self, position: Point, heading: f32, abilities: BossAbilities) {
        self.position = position;
        self.heading = heading;
        self.abilities = abilities;
    }

    pub(crate) fn wound(&mut self, hits: u32) {
        self.health = self.health.saturating_sub(hits);
    }

    pub(crate) fn consume(&mut self) {
        self.health = self
            .health
            .saturating_add(CONSUME_HEAL)
            .min(self.max_health);
        self.words_collected = self.words_collected.saturating_add(1);
    }

    pub(crate) fn snapshot(&self) -> BossSnapshot {
        BossSnapshot {
            slot: self.slot,
            kind: self.kind,
            position: self.position,
            radius: self.radius(),
            health: self.health,
            max_health: self.max_health,
            heading: self.heading,
            immortal: self.kind.is_immortal(),
            words_collected: self.words_collected,
            abilities: self.abilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumption_heals_up_to_max_health() {
        let mut boss = Boss::new(BossSlot::Phase, BossKind::SnowKing, Point::ZERO);
        boss.wound(3);
        boss.consume();

        assert_eq!(boss.health(), BossKind::SnowKing.max_health());
        assert_eq!(boss.snapshot().words_collected, 1);
    }

    #[test]
    fn immortal_boss_is_never_defeated() {
        let mut boss = Boss::new(BossSlot::Eternal, BossKind::Silver, Point::ZERO);
        boss.wound(u32::MAX);

        assert!(!boss.is_defeated());
        assert!(boss.deflects_projectiles());
    }
}
