#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Face Arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate perception into
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Sub},
    time::Duration,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Face Arena.";

/// Number of lives every player starts with and respawns with.
pub const PLAYER_MAX_LIVES: u32 = 3;

/// Radius of the collision envelope surrounding each player anchor.
pub const PLAYER_BODY_RADIUS: f32 = 100.0;

/// Distance substituted for zero-length vectors before normalising.
pub const DEGENERATE_DISTANCE: f32 = 1e-6;

/// Offsets from a player anchor to the two eyes that emit lasers.
pub const EYE_OFFSETS: [Point; 2] = [Point::new(-40.0, -20.0), Point::new(40.0, -20.0)];

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the rectangle projectiles and creatures live in.
    ConfigurePlayArea {
        /// New play bounds measured in screen units.
        area: PlayArea,
    },
    /// Replaces the ordered list of kill thresholds, one per wave.
    ConfigureWaves {
        /// Kills required to summon each wave's boss.
        kill_thresholds: Vec<u32>,
    },
    /// Aligns the player roster with the faces reported this step.
    SyncPlayers {
        /// One pose per detected face, indexed by slot.
        poses: Vec<PlayerPose>,
    },
    /// Advances the phase-scoped simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a creature of the given kind appears at the position.
    SpawnCreature {
        /// Variant of the creature to create.
        kind: CreatureKind,
        /// Spawn location, usually just outside the play area.
        position: Point,
    },
    /// Requests that a projectile is launched.
    FireProjectile {
        /// Variant of the projectile.
        kind: ProjectileKind,
        /// Side that launched the projectile.
        owner: ProjectileOwner,
        /// Launch position.
        origin: Point,
        /// Velocity in screen units per second.
        velocity: Point,
    },
    /// Kills every creature overlapping a hand.
    Punch {
        /// Detected hand position.
        position: Point,
    },
    /// Raises or drops the mirror shield protecting players from gaze strikes.
    SetMirrorShield {
        /// Whether the shield should be active.
        active: bool,
    },
    /// Publishes the latest motion and ability state computed for a boss.
    UpdateBoss {
        /// Boss being updated.
        slot: BossSlot,
        /// New position of the boss.
        position: Point,
        /// Facing angle in radians, used for spinning visuals.
        heading: f32,
        /// Ability flags exposed to the renderer and combat resolver.
        abilities: BossAbilities,
    },
    /// Drags creatures inside a radius toward a centre point.
    PullCreatures {
        /// Point creatures are pulled toward.
        center: Point,
        /// Creatures closer than this radius are affected.
        radius: f32,
        /// Distance each affected creature travels.
        distance: f32,
    },
    /// Moves a single creature by the provided offset.
    DisplaceCreature {
        /// Creature being moved.
        creature: CreatureId,
        /// Offset applied to the creature position.
        offset: Point,
    },
    /// Removes a creature by feeding it to a boss.
    ConsumeCreature {
        /// Boss consuming the creature.
        slot: BossSlot,
        /// Creature being consumed.
        creature: CreatureId,
    },
    /// Resolves a gaze lock-on against a player.
    GazeStrike {
        /// Player locked by the gaze.
        player: PlayerSlot,
        /// Lives removed when the strike is not deflected.
        damage: u32,
    },
    /// Resolves contact damage and projectile hits for a boss.
    ResolveBossCombat {
        /// Boss whose collisions should be resolved.
        slot: BossSlot,
    },
    /// Enters the boss phase for the current wave.
    BeginBossEncounter {
        /// Boss variant to summon.
        boss: BossKind,
    },
    /// Advances to the next wave after the phase boss fell.
    CompleteEncounter,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the phase-scoped clock advanced.
    TimeAdvanced {
        /// Amount of simulated time that elapsed.
        dt: Duration,
    },
    /// A new face slot appeared.
    PlayerJoined {
        /// Slot assigned to the player.
        player: PlayerSlot,
    },
    /// A face slot disappeared because fewer faces were reported.
    PlayerLeft {
        /// Slot that was truncated.
        player: PlayerSlot,
    },
    /// A player lost lives.
    PlayerDamaged {
        /// Player that was hit.
        player: PlayerSlot,
        /// Origin of the damage.
        source: DamageSource,
        /// Lives remaining after the hit. A lethal hit reports the restored
        /// lives and is followed by [`Event::PlayerRespawned`].
        lives: u32,
    },
    /// A player ran out of lives and was restored to full.
    PlayerRespawned {
        /// Player that respawned.
        player: PlayerSlot,
    },
    /// A creature entered the world.
    CreatureSpawned {
        /// Identifier allocated to the creature.
        creature: CreatureId,
        /// Variant of the creature.
        kind: CreatureKind,
    },
    /// A creature was killed by a player action.
    CreatureKilled {
        /// Creature that died.
        creature: CreatureId,
        /// Variant of the creature.
        kind: CreatureKind,
        /// How the creature died.
        cause: KillCause,
    },
    /// A boss fed on a creature.
    CreatureConsumed {
        /// Creature that was consumed.
        creature: CreatureId,
        /// Boss that consumed it.
        slot: BossSlot,
    },
    /// A projectile entered the world.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Variant of the projectile.
        kind: ProjectileKind,
        /// Side that launched it.
        owner: ProjectileOwner,
    },
    /// A projectile left the play bounds.
    ProjectileExpired {
        /// Projectile that expired.
        projectile: ProjectileId,
    },
    /// A boss entered the world.
    BossSpawned {
        /// Slot the boss occupies.
        slot: BossSlot,
        /// Variant of the boss.
        kind: BossKind,
    },
    /// A boss was hit by player projectiles.
    BossDamaged {
        /// Boss that was hit.
        slot: BossSlot,
        /// Health remaining after the hits.
        health: u32,
    },
    /// The phase boss was destroyed.
    BossDefeated {
        /// Variant of the destroyed boss.
        kind: BossKind,
    },
    /// The wave state machine entered a new phase.
    PhaseChanged {
        /// Phase that is now active.
        phase: Phase,
    },
    /// The mirror shield was raised or dropped.
    MirrorShieldChanged {
        /// Whether the shield is active.
        active: bool,
    },
    /// A gaze strike was negated by the mirror shield.
    GazeDeflected {
        /// Player the gaze was aimed at.
        player: PlayerSlot,
    },
}

/// Position or direction in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Origin of the screen.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unit vector pointing toward the top of the screen.
    pub const UP: Self = Self::new(0.0, -1.0);

    /// Creates a new point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate, growing downward.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Creates a unit vector pointing along the provided angle in radians.
    #[must_use]
    pub fn from_angle(radians: f32) -> Self {
        Self::new(radians.cos(), radians.sin())
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Returns the unit vector pointing from `self` toward `target`.
    ///
    /// Coincident points divide by [`DEGENERATE_DISTANCE`] instead of zero and
    /// therefore yield the zero vector.
    #[must_use]
    pub fn direction_to(self, target: Self) -> Self {
        let delta = target - self;
        let distance = delta.length();
        let distance = if distance > 0.0 {
            distance
        } else {
            DEGENERATE_DISTANCE
        };
        delta * distance.recip()
    }

    /// Returns the vector rotated a quarter turn.
    #[must_use]
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Returns the vector scaled to unit length, or `None` when it is shorter
    /// than `min_length`.
    #[must_use]
    pub fn normalized(self, min_length: f32) -> Option<Self> {
        let length = self.length();
        if length < min_length || length <= 0.0 {
            None
        } else {
            Some(self * length.recip())
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Rectangle `[0, width] × [0, height]` that bounds active projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    width: f32,
    height: f32,
}

impl PlayArea {
    /// Creates a new play area with the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the play area.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the play area.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Centre of the play area.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Reports whether the point lies inside the bounds, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Anchor assigned to slot `index` of `count` when perception does not
    /// provide one: players are spread evenly along the horizontal midline.
    #[must_use]
    pub fn layout_anchor(&self, index: usize, count: usize) -> Point {
        let spacing = self.width / (count as f32 + 1.0);
        Point::new(spacing * (index as f32 + 1.0), self.height * 0.5)
    }

    /// Picks a random point `inset` units outside one of the four edges.
    ///
    /// The edge is chosen uniformly, then the position along it.
    pub fn border_point<R>(&self, rng: &mut R, inset: f32) -> Point
    where
        R: Rng + ?Sized,
    {
        let along_width = rng.gen::<f32>() * self.width;
        let along_height = rng.gen::<f32>() * self.height;
        match rng.gen_range(0..4_u8) {
            0 => Point::new(along_width, -inset),
            1 => Point::new(along_width, self.height + inset),
            2 => Point::new(-inset, along_height),
            _ => Point::new(self.width + inset, along_height),
        }
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Index of a tracked face within the current perception frame.
///
/// Slots are positional: slot `i` is the `i`-th face reported this step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerSlot(u32);

impl PlayerSlot {
    /// Creates a new player slot with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the slot.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the slot within the player roster.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier assigned to a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatureId(u32);

impl CreatureId {
    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Closed set of creature variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CreatureKind {
    /// Baseline walker with a randomised speed.
    Plain,
    /// Slow heavy walker.
    Snowie,
    /// Fast walker.
    FireSpinner,
    /// Quick spectral walker.
    Ghost,
    /// Large armoured walker.
    Ghast,
    /// Medium walker.
    Skeleton,
    /// Flier that weaves sideways around its target.
    Dragon,
    /// Caster walker.
    Caster,
    /// Hovering flier summoned by the eternal boss.
    Menchuba,
}

impl CreatureKind {
    /// Speed range, in units per second, used for [`CreatureKind::Plain`].
    pub const PLAIN_SPEED_RANGE: (f32, f32) = (50.0, 120.0);

    /// Collision radius of the variant.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Ghast => 30.0,
            Self::Dragon => 25.0,
            Self::Menchuba => 20.0,
            Self::Plain
            | Self::Snowie
            | Self::FireSpinner
            | Self::Ghost
            | Self::Skeleton
            | Self::Caster => 15.0,
        }
    }

    /// Fixed travel speed of the variant, or `None` when it is rolled at spawn.
    #[must_use]
    pub const fn fixed_speed(self) -> Option<f32> {
        match self {
            Self::Plain => None,
            Self::Snowie => Some(40.0),
            Self::FireSpinner => Some(80.0),
            Self::Ghost => Some(100.0),
            Self::Ghast => Some(30.0),
            Self::Skeleton => Some(70.0),
            Self::Dragon => Some(120.0),
            Self::Caster => Some(60.0),
            Self::Menchuba => Some(150.0),
        }
    }
}

/// Closed set of projectile variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Eye laser fired by players.
    Laser,
    /// Fireball thrown from a hand.
    Fireball,
    /// Laser fired by bosses.
    PurpleLaser,
    /// Projectile that wiggles perpendicular to its travel direction.
    ///
    /// No roster boss fires it; it is available to any
    /// [`Command::FireProjectile`] issuer.
    Snake,
}

impl ProjectileKind {
    /// Collision radius of the variant.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Laser => 5.0,
            Self::Fireball => 8.0,
            Self::PurpleLaser => 6.0,
            Self::Snake => 10.0,
        }
    }
}

/// Side that launched a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileOwner {
    /// Fired by a player gesture.
    Player,
    /// Fired by a boss ability.
    Boss,
}

/// Closed set of boss variants, in roster order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossKind {
    /// Summons Snowie minions.
    SnowKing,
    /// Summons FireSpinner minions.
    FlameWarden,
    /// Pulls nearby creatures toward itself.
    Vortex,
    /// Hovers above its target firing radial rings.
    Spinner,
    /// Periodically charges the nearest player.
    Ram,
    /// Fires aimed shots at the nearest player.
    Tracker,
    /// Teleports between players.
    Artical,
    /// Summons clones at the screen edge.
    Shadow,
    /// Fires jittered radial rings.
    AlienKing,
    /// Combines spawning, teleporting, shielding, and volleys.
    Madackeda,
    /// Immortal antagonist that drains colour, gazes, and chains creatures.
    Silver,
}

impl BossKind {
    /// Boss summoned at the end of each wave, indexed by wave.
    pub const ROSTER: [BossKind; 11] = [
        Self::SnowKing,
        Self::FlameWarden,
        Self::Vortex,
        Self::Spinner,
        Self::Ram,
        Self::Tracker,
        Self::Artical,
        Self::Shadow,
        Self::AlienKing,
        Self::Madackeda,
        Self::Silver,
    ];

    /// Boss summoned at the end of the provided wave, if the roster has one.
    #[must_use]
    pub fn for_wave(wave_index: usize) -> Option<Self> {
        Self::ROSTER.get(wave_index).copied()
    }

    /// Health the boss spawns with.
    #[must_use]
    pub const fn max_health(self) -> u32 {
        match self {
            Self::SnowKing | Self::Spinner | Self::Tracker => 30,
            Self::FlameWarden => 25,
            Self::Vortex | Self::Artical => 35,
            Self::Ram | Self::Shadow => 40,
            Self::AlienKing => 60,
            Self::Madackeda => 50,
            Self::Silver => 999_999,
        }
    }

    /// Collision radius of the boss.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Silver => 50.0,
            _ => 40.0,
        }
    }

    /// Reports whether projectiles can never kill the boss.
    #[must_use]
    pub const fn is_immortal(self) -> bool {
        matches!(self, Self::Silver)
    }

    /// Short display name of the boss.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SnowKing => "SnowKing",
            Self::FlameWarden => "FlameWarden",
            Self::Vortex => "VortexBoss",
            Self::Spinner => "SpinnerBoss",
            Self::Ram => "RamBoss",
            Self::Tracker => "TrackerBoss",
            Self::Artical => "ArticalBoss",
            Self::Shadow => "ShadowBoss",
            Self::AlienKing => "AlienKingBoss",
            Self::Madackeda => "MadackedaBoss",
            Self::Silver => "SilverBoss",
        }
    }
}

impl fmt::Display for BossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies which of the two concurrent bosses a message targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossSlot {
    /// The wave-scoped boss, absent during minion waves.
    Phase,
    /// The immortal boss present for the whole match.
    Eternal,
}

/// Phase of the wave/encounter state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Creatures spawn and kills accumulate toward the wave threshold.
    Minions,
    /// A phase boss is active.
    Boss(BossKind),
    /// Every configured wave has been cleared.
    Victory,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minions => f.write_str("minions"),
            Self::Boss(kind) => write!(f, "boss_{}", kind.name().trim_end_matches("Boss")),
            Self::Victory => f.write_str("victory"),
        }
    }
}

/// Way a creature died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KillCause {
    /// Hit by an active projectile.
    Projectile,
    /// Trapped by an open mouth.
    Capture,
    /// Struck by a hand.
    Punch,
}

impl KillCause {
    /// Reports whether the kill advances the wave counter.
    #[must_use]
    pub const fn counts_toward_wave(self) -> bool {
        matches!(self, Self::Projectile | Self::Capture)
    }
}

/// Origin of damage dealt to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// A creature reached the player.
    Creature,
    /// The player touched the phase boss.
    PhaseBoss,
    /// The player touched the eternal boss.
    EternalBoss,
    /// The eternal boss's gaze resolved against the player.
    Gaze,
}

/// Transient visual markers produced by player actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// A creature was swallowed by an open mouth.
    MouthCapture,
    /// A creature was punched by a hand.
    HandHit,
}

impl EffectKind {
    /// How long the marker stays visible.
    #[must_use]
    pub const fn lifetime(self) -> Duration {
        match self {
            Self::MouthCapture => Duration::from_millis(400),
            Self::HandHit => Duration::from_millis(300),
        }
    }
}

/// Ability state a boss exposes to combat and rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossAbilities {
    /// Projectiles pass harmlessly while raised.
    pub shield: bool,
    /// The boss is mid-charge.
    pub charging: bool,
    /// The boss is holding position after a teleport.
    pub teleported: bool,
    /// Player currently locked by the gaze.
    pub gaze_target: Option<PlayerSlot>,
    /// Creature currently held by the chain.
    pub chain_target: Option<CreatureId>,
    /// The colour drain is running.
    pub drain_active: bool,
    /// World saturation factor in `0.1..=1.0`.
    pub saturation: f32,
}

impl Default for BossAbilities {
    fn default() -> Self {
        Self {
            shield: false,
            charging: false,
            teleported: false,
            gaze_target: None,
            chain_target: None,
            drain_active: false,
            saturation: 1.0,
        }
    }
}

/// Facial metrics reported by the perception service for one face.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceMetrics {
    /// Head yaw in radians.
    #[serde(default)]
    pub yaw: f32,
    /// Head pitch in radians.
    #[serde(default)]
    pub pitch: f32,
    /// Head roll in radians.
    #[serde(default)]
    pub roll: f32,
    /// Vertical lip gap normalised by face size.
    #[serde(default)]
    pub mouth_open_ratio: f32,
    /// Both eyes are currently closed.
    #[serde(default)]
    pub eyes_closed: bool,
    /// Eyes transitioned from closed to open since the previous frame.
    #[serde(default)]
    pub blink: bool,
    /// Screen anchor of the face, when the sensor provides one.
    #[serde(default)]
    pub face_anchor: Option<Point>,
}

/// Everything the perception service observed in one step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerceptionFrame {
    /// Faces in detection order.
    #[serde(default)]
    pub faces: Vec<FaceMetrics>,
    /// Detected wrist positions.
    #[serde(default)]
    pub hands: Vec<Point>,
}

/// Per-step player state derived from one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPose {
    /// Screen anchor of the player.
    pub anchor: Point,
    /// Unit aim vector, absent when the head pose is near neutral.
    pub aim: Option<Point>,
    /// Vertical lip gap normalised by face size.
    pub mouth_open_ratio: f32,
    /// Both eyes are currently closed.
    pub eyes_closed: bool,
}

/// Immutable representation of a player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Slot of the player.
    pub slot: PlayerSlot,
    /// Screen anchor of the player.
    pub anchor: Point,
    /// Remaining lives in `1..=3`.
    pub lives: u32,
    /// Remaining invulnerability.
    pub invulnerability: Duration,
    /// Last non-trivial aim direction.
    pub aim: Point,
    /// Vertical lip gap normalised by face size.
    pub mouth_open_ratio: f32,
    /// Both eyes are currently closed.
    pub eyes_closed: bool,
}

/// Read-only snapshot describing every tracked player.
#[derive(Clone, Debug, Default)]
pub struct PlayerView {
    snapshots: Vec<PlayerSnapshot>,
}

impl PlayerView {
    /// Creates a new player view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PlayerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.slot);
        Self { snapshots }
    }

    /// Iterator over the captured player snapshots in slot order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &PlayerSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the player occupying the slot.
    #[must_use]
    pub fn get(&self, slot: PlayerSlot) -> Option<&PlayerSnapshot> {
        self.snapshots.get(slot.index())
    }

    /// Number of tracked players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no players are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Player whose anchor is closest to the point; ties favour lower slots.
    #[must_use]
    pub fn nearest(&self, point: Point) -> Option<&PlayerSnapshot> {
        self.snapshots.iter().fold(None, |best, candidate| match best {
            Some(current)
                if current.anchor.distance(point) <= candidate.anchor.distance(point) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PlayerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a creature's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreatureSnapshot {
    /// Unique identifier assigned to the creature.
    pub id: CreatureId,
    /// Variant of the creature.
    pub kind: CreatureKind,
    /// Current position.
    pub position: Point,
    /// Collision radius.
    pub radius: f32,
    /// Travel speed in units per second.
    pub speed: f32,
}

/// Read-only snapshot describing every live creature.
#[derive(Clone, Debug, Default)]
pub struct CreatureView {
    snapshots: Vec<CreatureSnapshot>,
}

impl CreatureView {
    /// Creates a new creature view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CreatureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured creature snapshots in identifier order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &CreatureSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the creature with the identifier, if it is alive.
    #[must_use]
    pub fn get(&self, id: CreatureId) -> Option<&CreatureSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Creature closest to the point; ties favour older creatures.
    #[must_use]
    pub fn nearest(&self, point: Point) -> Option<&CreatureSnapshot> {
        self.snapshots.iter().fold(None, |best, candidate| match best {
            Some(current)
                if current.position.distance(point) <= candidate.position.distance(point) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
    }

    /// Number of live creatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no creatures are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CreatureSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Variant of the projectile.
    pub kind: ProjectileKind,
    /// Side that launched the projectile.
    pub owner: ProjectileOwner,
    /// Current position.
    pub position: Point,
    /// Velocity in units per second.
    pub velocity: Point,
    /// Collision radius.
    pub radius: f32,
}

/// Read-only snapshot describing every active projectile.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in identifier order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of active projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a boss used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossSnapshot {
    /// Slot the boss occupies.
    pub slot: BossSlot,
    /// Variant of the boss.
    pub kind: BossKind,
    /// Current position.
    pub position: Point,
    /// Collision radius.
    pub radius: f32,
    /// Remaining health.
    pub health: u32,
    /// Health captured at spawn, for display.
    pub max_health: u32,
    /// Facing angle in radians.
    pub heading: f32,
    /// Projectiles can never kill the boss.
    pub immortal: bool,
    /// Creatures the boss has consumed.
    pub words_collected: u32,
    /// Ability flags published by the behaviour engine.
    pub abilities: BossAbilities,
}

/// Progress through the configured waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveSnapshot {
    /// Zero-based index of the current wave.
    pub wave_index: usize,
    /// Number of configured waves.
    pub wave_count: usize,
    /// Kills recorded during the current minion wave.
    pub kills: u32,
    /// Kills required to summon the current wave's boss.
    pub threshold: Option<u32>,
    /// Active phase.
    pub phase: Phase,
}

/// Transient visual marker exposed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// Variant of the marker.
    pub kind: EffectKind,
    /// Where the marker is drawn.
    pub position: Point,
    /// Time the marker has been visible.
    pub age: Duration,
}

#[cfg(test)]
mod tests {
    use super::{
        BossKind, FaceMetrics, PerceptionFrame, Phase, PlayArea, PlayerSlot, PlayerSnapshot,
        PlayerView, Point,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn perception_frame_round_trips_through_bincode() {
        let frame = PerceptionFrame {
            faces: vec![FaceMetrics {
                yaw: 0.25,
                pitch: -0.1,
                roll: 0.0,
                mouth_open_ratio: 0.05,
                eyes_closed: false,
                blink: true,
                face_anchor: Some(Point::new(320.0, 240.0)),
            }],
            hands: vec![Point::new(10.0, 20.0)],
        };
        assert_round_trip(&frame);
    }

    #[test]
    fn direction_to_coincident_point_is_zero() {
        let point = Point::new(5.0, 5.0);
        assert_eq!(point.direction_to(point), Point::ZERO);
    }

    #[test]
    fn direction_to_is_unit_length() {
        let direction = Point::ZERO.direction_to(Point::new(3.0, 4.0));
        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!((direction.x() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn contains_includes_edges() {
        let area = PlayArea::new(640.0, 480.0);
        assert!(area.contains(Point::new(0.0, 0.0)));
        assert!(area.contains(Point::new(640.0, 480.0)));
        assert!(!area.contains(Point::new(0.0, -0.1)));
    }

    #[test]
    fn border_points_lie_outside_the_visible_area() {
        let area = PlayArea::new(640.0, 480.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let point = area.border_point(&mut rng, 15.0);
            assert!(!area.contains(point), "{point:?} should be off-screen");
        }
    }

    #[test]
    fn layout_anchor_spreads_players_evenly() {
        let area = PlayArea::new(900.0, 600.0);
        assert_eq!(area.layout_anchor(0, 2), Point::new(300.0, 300.0));
        assert_eq!(area.layout_anchor(1, 2), Point::new(600.0, 300.0));
    }

    #[test]
    fn phase_labels_follow_boss_tags() {
        assert_eq!(Phase::Minions.to_string(), "minions");
        assert_eq!(Phase::Boss(BossKind::SnowKing).to_string(), "boss_SnowKing");
        assert_eq!(Phase::Boss(BossKind::Ram).to_string(), "boss_Ram");
        assert_eq!(Phase::Victory.to_string(), "victory");
    }

    #[test]
    fn roster_ends_with_silver() {
        assert_eq!(BossKind::for_wave(0), Some(BossKind::SnowKing));
        assert_eq!(BossKind::for_wave(10), Some(BossKind::Silver));
        assert_eq!(BossKind::for_wave(11), None);
        assert!(BossKind::Silver.is_immortal());
    }

    #[test]
    fn nearest_player_prefers_lower_slot_on_ties() {
        let snapshot = |slot: u32, x: f32| PlayerSnapshot {
            slot: PlayerSlot::new(slot),
            anchor: Point::new(x, 0.0),
            lives: 3,
            invulnerability: Duration::ZERO,
            aim: Point::UP,
            mouth_open_ratio: 0.0,
            eyes_closed: false,
        };
        let view = PlayerView::from_snapshots(vec![snapshot(1, 10.0), snapshot(0, -10.0)]);
        let nearest = view.nearest(Point::ZERO).expect("players exist");
        assert_eq!(nearest.slot, PlayerSlot::new(0));
    }
}
