#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Face Arena.
//!
//! The world owns every entity of a match: the player roster, creatures,
//! projectiles, the wave-scoped phase boss, and the eternal boss that lives for
//! the whole match. [`apply`] is the only mutation path; [`query`] exposes
//! read-only snapshots for systems and adapters.

mod boss;
mod combat;
mod creature;
mod player;
mod projectile;

use face_arena_core::{
    BossKind, BossSlot, Command, CreatureId, CreatureKind, DamageSource, Event, Phase, PlayArea,
    PlayerPose, PlayerSlot, Point, ProjectileId, ProjectileOwner,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use self::{
    boss::Boss, combat::Effect, creature::Creature, player::Player, projectile::Projectile,
};

const WORLD_SEED: u64 = 0x5f1c_a3e9_07d2_4b61;

/// Kills required per wave when no configuration overrides them.
pub const DEFAULT_KILL_THRESHOLDS: [u32; 10] = [20, 30, 40, 50, 60, 70, 80, 90, 100, 120];

/// Height above the anchor at which bosses appear.
const BOSS_SPAWN_LIFT: f32 = 150.0;
/// Height of the point the eternal boss first hovers above.
const ETERNAL_SPAWN_HEIGHT: f32 = 100.0;

#[derive(Clone, Debug)]
struct WaveProgress {
    thresholds: Vec<u32>,
    wave_index: usize,
    kills: u32,
    phase: Phase,
}

impl WaveProgress {
    fn new(thresholds: Vec<u32>) -> Self {
        Self {
            thresholds,
            wave_index: 0,
            kills: 0,
            phase: Phase::Minions,
        }
    }

    fn threshold(&self) -> Option<u32> {
        self.thresholds.get(self.wave_index).copied()
    }
}

/// Represents the complete state of a Face Arena match.
#[derive(Debug)]
pub struct World {
    area: PlayArea,
    players: Vec<Player>,
    creatures: Vec<Creature>,
    projectiles: Vec<Projectile>,
    phase_boss: Option<Boss>,
    eternal_boss: Boss,
    waves: WaveProgress,
    effects: Vec<Effect>,
    mirror_shield: bool,
    next_creature_id: u32,
    next_projectile_id: u32,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a new world using the default play area, waves, and seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(WORLD_SEED)
    }

    /// Creates a new world whose randomised creature speeds derive from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let area = PlayArea::default();
        let eternal_origin = Point::new(
            area.width() * 0.5,
            ETERNAL_SPAWN_HEIGHT - BOSS_SPAWN_LIFT,
        );
        Self {
            area,
            players: Vec::new(),
            creatures: Vec::new(),
            projectiles: Vec::new(),
            phase_boss: None,
            eternal_boss: Boss::new(BossSlot::Eternal, BossKind::Silver, eternal_origin),
            waves: WaveProgress::new(DEFAULT_KILL_THRESHOLDS.to_vec()),
            effects: Vec::new(),
            mirror_shield: false,
            next_creature_id: 0,
            next_projectile_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick_index: 0,
        }
    }

    fn sync_players(&mut self, poses: &[PlayerPose], out_events: &mut Vec<Event>) {
        while self.players.len() > poses.len() {
            if let Some(player) = self.players.pop() {
                out_events.push(Event::PlayerLeft {
                    player: player.slot(),
                });
            }
        }

        for (index, pose) in poses.iter().enumerate() {
            match self.players.get_mut(index) {
                Some(player) => player.sync(pose),
                None => {
                    let slot = PlayerSlot::new(index as u32);
                    self.players.push(Player::new(slot, pose));
                    out_events.push(Event::PlayerJoined { player: slot });
                }
            }
        }
    }

    fn spawn_creature(&mut self, kind: CreatureKind, position: Point) -> CreatureId {
        let id = CreatureId::new(self.next_creature_id);
        self.next_creature_id = self.next_creature_id.wrapping_add(1);
        let speed = match kind.fixed_speed() {
            Some(speed) => speed,
            None => {
                let (low, high) = CreatureKind::PLAIN_SPEED_RANGE;
                self.rng.gen_range(low..high)
            }
        };
        self.creatures
            .push(Creature::new(id, kind, position, speed));
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        id
    }

    fn boss_mut(&mut self, slot: BossSlot) -> Option<&mut Boss> {
        match slot {
            BossSlot::Phase => self.phase_boss.as_mut(),
            BossSlot::Eternal => Some(&mut self.eternal_boss),
        }
    }

    fn begin_boss_encounter(&mut self, kind: BossKind, out_events: &mut Vec<Event>) {
        if self.waves.phase != Phase::Minions {
            return;
        }

        let anchor = self
            .players
            .first()
            .map(Player::anchor)
            .unwrap_or_else(|| self.area.center());
        let origin = anchor + Point::new(0.0, -BOSS_SPAWN_LIFT);
        self.phase_boss = Some(Boss::new(BossSlot::Phase, kind, origin));

        self.waves.kills = 0;
        self.waves.phase = Phase::Boss(kind);
        self.creatures.clear();
        self.projectiles
            .retain(|projectile| projectile.owner() == ProjectileOwner::Boss);

        out_events.push(Event::PhaseChanged {
            phase: self.waves.phase,
        });
        out_events.push(Event::BossSpawned {
            slot: BossSlot::Phase,
            kind,
        });
    }

    fn complete_encounter(&mut self, out_events: &mut Vec<Event>) {
        if !matches!(self.waves.phase, Phase::Boss(_)) || self.phase_boss.is_some() {
            return;
        }

        self.waves.wave_index = self.waves.wave_index.saturating_add(1);
        self.waves.kills = 0;
        if self.waves.wave_index < self.waves.thresholds.len() {
            self.waves.phase = Phase::Minions;
        } else {
            self.waves.phase = Phase::Victory;
            self.creatures.clear();
            self.projectiles.clear();
            self.effects.clear();
        }

        out_events.push(Event::PhaseChanged {
            phase: self.waves.phase,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigurePlayArea { area } => {
            world.area = area;
        }
        Command::ConfigureWaves { kill_thresholds } => {
            world.waves.thresholds = kill_thresholds;
        }
        Command::SyncPlayers { poses } => {
            world.sync_players(&poses, out_events);
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            combat::advance(world, dt, out_events);
        }
        Command::SpawnCreature { kind, position } => {
            let creature = world.spawn_creature(kind, position);
            out_events.push(Event::CreatureSpawned { creature, kind });
        }
        Command::FireProjectile {
            kind,
            owner,
            origin,
            velocity,
        } => {
            let projectile = world.allocate_projectile_id();
            world
                .projectiles
                .push(Projectile::new(projectile, kind, owner, origin, velocity));
            out_events.push(Event::ProjectileFired {
                projectile,
                kind,
                owner,
            });
        }
        Command::Punch { position } => {
            combat::punch(world, position, out_events);
        }
        Command::SetMirrorShield { active } => {
            if world.mirror_shield != active {
                world.mirror_shield = active;
                out_events.push(Event::MirrorShieldChanged { active });
            }
        }
        Command::UpdateBoss {
            slot,
            position,
            heading,
            abilities,
        } => {
            if let Some(boss) = world.boss_mut(slot) {
                boss.update(position, heading, abilities);
            }
        }
        Command::PullCreatures {
            center,
            radius,
            distance,
        } => {
            for creature in &mut world.creatures {
                if creature.position().distance(center) < radius {
                    let offset = creature.position().direction_to(center) * distance;
                    creature.displace(offset);
                }
            }
        }
        Command::DisplaceCreature { creature, offset } => {
            if let Some(target) = world
                .creatures
                .iter_mut()
                .find(|candidate| candidate.id() == creature)
            {
                target.displace(offset);
            }
        }
        Command::ConsumeCreature { slot, creature } => {
            let Some(index) = world
                .creatures
                .iter()
                .position(|candidate| candidate.id() == creature)
            else {
                return;
            };
            let Some(boss) = world.boss_mut(slot) else {
                return;
            };
            boss.consume();
            let _ = world.creatures.remove(index);
            out_events.push(Event::CreatureConsumed { creature, slot });
        }
        Command::GazeStrike { player, damage } => {
            if world.mirror_shield {
                out_events.push(Event::GazeDeflected { player });
                return;
            }
            if let Some(target) = world.players.get_mut(player.index()) {
                combat::damage_player(
                    target,
                    damage,
                    combat::GAZE_GRACE,
                    DamageSource::Gaze,
                    out_events,
                );
            }
        }
        Command::ResolveBossCombat { slot } => {
            combat::resolve_boss(world, slot, out_events);
        }
        Command::BeginBossEncounter { boss } => {
            world.begin_boss_encounter(boss, out_events);
        }
        Command::CompleteEncounter => {
            world.complete_encounter(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use face_arena_core::{
        BossSlot, BossSnapshot, CreatureView, EffectSnapshot, Phase, PlayArea, PlayerView,
        ProjectileView, WaveSnapshot,
    };

    /// Rectangle bounding active projectiles.
    #[must_use]
    pub fn play_area(world: &World) -> PlayArea {
        world.area
    }

    /// Number of phase-scoped ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the player roster.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerView {
        PlayerView::from_snapshots(world.players.iter().map(|player| player.snapshot()).collect())
    }

    /// Captures a read-only view of the live creatures.
    #[must_use]
    pub fn creature_view(world: &World) -> CreatureView {
        CreatureView::from_snapshots(
            world
                .creatures
                .iter()
                .map(|creature| creature.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the active projectiles.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Snapshot of the boss occupying the slot, if present.
    #[must_use]
    pub fn boss(world: &World, slot: BossSlot) -> Option<BossSnapshot> {
        match slot {
            BossSlot::Phase => phase_boss(world),
            BossSlot::Eternal => Some(eternal_boss(world)),
        }
    }

    /// Snapshot of the wave-scoped boss, if one is active.
    #[must_use]
    pub fn phase_boss(world: &World) -> Option<BossSnapshot> {
        world.phase_boss.as_ref().map(|boss| boss.snapshot())
    }

    /// Snapshot of the eternal boss.
    #[must_use]
    pub fn eternal_boss(world: &World) -> BossSnapshot {
        world.eternal_boss.snapshot()
    }

    /// Progress through the configured waves.
    #[must_use]
    pub fn wave(world: &World) -> WaveSnapshot {
        WaveSnapshot {
            wave_index: world.waves.wave_index,
            wave_count: world.waves.thresholds.len(),
            kills: world.waves.kills,
            threshold: world.waves.threshold(),
            phase: world.waves.phase,
        }
    }

    /// Active phase of the wave state machine.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.waves.phase
    }

    /// Reports whether the mirror shield is raised.
    #[must_use]
    pub fn mirror_shield(world: &World) -> bool {
        world.mirror_shield
    }

    /// Transient visual markers that are still visible.
    #[must_use]
    pub fn effects(world: &World) -> Vec<EffectSnapshot> {
        world.effects.iter().map(|effect| effect.snapshot()).collect()
    }
}
