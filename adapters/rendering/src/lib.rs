#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Face Arena adapters.
//!
//! Adapters never read the world directly while drawing. Each frame the
//! driver fills a [`Scene`] from world snapshots, and a [`RenderingBackend`]
//! draws it and reports the keyboard and mouse state as [`FrameInput`].

use anyhow::Result as AnyResult;
use face_arena_core::{BossKind, CreatureKind, EffectKind, Point, ProjectileKind};
use glam::Vec2;
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Blends the color towards its own luminance.
    ///
    /// A `saturation` of 1.0 leaves the color untouched and 0.0 yields grey.
    #[must_use]
    pub fn desaturate(self, saturation: f32) -> Self {
        if saturation >= 1.0 {
            return self;
        }
        let saturation = saturation.max(0.0);
        let grey = 0.299 * self.red + 0.587 * self.green + 0.114 * self.blue;

        Self {
            red: grey + (self.red - grey) * saturation,
            green: grey + (self.green - grey) * saturation,
            blue: grey + (self.blue - grey) * saturation,
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill color used for a creature variant.
#[must_use]
pub const fn creature_color(kind: CreatureKind) -> Color {
    match kind {
        CreatureKind::Plain => Color::from_rgb_u8(220, 60, 60),
        CreatureKind::Snowie => Color::from_rgb_u8(220, 240, 255),
        CreatureKind::FireSpinner => Color::from_rgb_u8(255, 140, 0),
        CreatureKind::Ghost => Color::from_rgb_u8(200, 200, 230),
        CreatureKind::Ghast => Color::from_rgb_u8(120, 110, 140),
        CreatureKind::Skeleton => Color::from_rgb_u8(235, 230, 210),
        CreatureKind::Dragon => Color::from_rgb_u8(40, 160, 70),
        CreatureKind::Caster => Color::from_rgb_u8(150, 60, 200),
        CreatureKind::Menchuba => Color::from_rgb_u8(90, 200, 190),
    }
}

/// Fill color used for a projectile variant.
#[must_use]
pub const fn projectile_color(kind: ProjectileKind) -> Color {
    match kind {
        ProjectileKind::Laser => Color::from_rgb_u8(255, 40, 40),
        ProjectileKind::Fireball => Color::from_rgb_u8(255, 150, 30),
        ProjectileKind::PurpleLaser => Color::from_rgb_u8(170, 60, 255),
        ProjectileKind::Snake => Color::from_rgb_u8(60, 220, 90),
    }
}

/// Body color used for a boss variant.
#[must_use]
pub const fn boss_color(kind: BossKind) -> Color {
    match kind {
        BossKind::SnowKing => Color::from_rgb_u8(170, 210, 255),
        BossKind::FlameWarden => Color::from_rgb_u8(230, 80, 20),
        BossKind::Vortex => Color::from_rgb_u8(70, 70, 200),
        BossKind::Spinner => Color::from_rgb_u8(200, 60, 200),
        BossKind::Ram => Color::from_rgb_u8(140, 90, 50),
        BossKind::Tracker => Color::from_rgb_u8(230, 200, 40),
        BossKind::Artical => Color::from_rgb_u8(80, 220, 255),
        BossKind::Shadow => Color::from_rgb_u8(50, 50, 60),
        BossKind::AlienKing => Color::from_rgb_u8(100, 255, 100),
        BossKind::Madackeda => Color::from_rgb_u8(180, 20, 60),
        BossKind::Silver => Color::from_rgb_u8(192, 192, 200),
    }
}

/// Ring color used for a transient effect marker.
#[must_use]
pub const fn effect_color(kind: EffectKind) -> Color {
    match kind {
        EffectKind::MouthCapture => Color::from_rgb_u8(255, 220, 60),
        EffectKind::HandHit => Color::from_rgb_u8(255, 255, 255),
    }
}

/// Converts a simulation point into a rendering vector.
#[must_use]
pub const fn to_vec2(point: Point) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

/// Input snapshot gathered by adapters before updating the scene.
///
/// Windowed runs without a camera emulate the face with the keyboard and
/// mouse; the driver turns this snapshot into a perception frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units, clamped to the play area.
    pub cursor_world_space: Option<Vec2>,
    /// Eyes are held closed this frame.
    pub eyes_closed: bool,
    /// Eyes reopened on this frame.
    pub blink: bool,
    /// Mouth is held open this frame.
    pub mouth_open: bool,
    /// Voice is held on this frame.
    pub voice: bool,
    /// Hand detected at the given world position this frame.
    pub hand: Option<Vec2>,
    /// Operator pressed the pause toggle on this frame.
    pub pause_toggle: bool,
    /// Operator asked the avatar to speak on this frame.
    pub speak: bool,
}

/// Timings reported by the driver after updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSimulationBreakdown {
    /// Time spent advancing the simulation.
    pub simulation: Duration,
    /// Time spent copying world snapshots into the scene.
    pub scene_population: Duration,
}

/// Tracked player drawn at its anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Screen anchor in world units.
    pub anchor: Vec2,
    /// Last non-trivial aim direction.
    pub aim: Vec2,
    /// Remaining lives.
    pub lives: u32,
    /// The player currently ignores damage.
    pub invulnerable: bool,
    /// The mouth is open wide enough to capture.
    pub mouth_open: bool,
    /// Both eyes are closed.
    pub eyes_closed: bool,
}

/// Creature drawn as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreaturePresentation {
    /// Centre in world units.
    pub position: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Fill color before desaturation.
    pub color: Color,
}

/// Projectile drawn as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre in world units.
    pub position: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Fill color before desaturation.
    pub color: Color,
}

/// Boss body plus the ability flags that change how it is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct BossPresentation {
    /// Display name.
    pub name: String,
    /// Centre in world units.
    pub position: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Facing angle in radians.
    pub heading: f32,
    /// Body color before desaturation.
    pub color: Color,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Projectiles cannot kill the boss.
    pub immortal: bool,
    /// Shield is raised.
    pub shield: bool,
    /// Boss is mid-charge.
    pub charging: bool,
    /// Boss is holding after a teleport.
    pub teleported: bool,
    /// Anchor of the player locked by the gaze.
    pub gaze_target: Option<Vec2>,
    /// Position of the creature held by the chain.
    pub chain_target: Option<Vec2>,
}

impl BossPresentation {
    /// Remaining health as a fraction of the spawn health.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

/// Expanding ring drawn where a player action landed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectPresentation {
    /// Centre in world units.
    pub position: Vec2,
    /// Ring color.
    pub color: Color,
    /// Fraction of the marker lifetime already elapsed.
    pub progress: f32,
}

/// Text overlay describing wave progress.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Zero-based wave index.
    pub wave_index: usize,
    /// Number of configured waves.
    pub wave_count: usize,
    /// Kills recorded during the minion wave.
    pub kills: u32,
    /// Kills needed to summon the boss.
    pub threshold: Option<u32>,
    /// Tag of the active phase.
    pub phase: String,
    /// The arena is paused.
    pub paused: bool,
    /// Every player is shielded from the gaze.
    pub mirror_shield: bool,
}

impl Default for HudPresentation {
    fn default() -> Self {
        Self {
            wave_index: 0,
            wave_count: 0,
            kills: 0,
            threshold: None,
            phase: String::from("minions"),
            paused: false,
            mirror_shield: false,
        }
    }
}

impl HudPresentation {
    /// Lines of text shown in the overlay, top to bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Wave {}/{}  {}",
            self.wave_index + 1,
            self.wave_count,
            self.phase
        )];
        if let Some(threshold) = self.threshold {
            lines.push(format!("Kills {}/{}", self.kills, threshold));
        }
        if self.mirror_shield {
            lines.push(String::from("Mirror shield"));
        }
        if self.paused {
            lines.push(String::from("PAUSED"));
        }
        lines
    }
}

/// Everything a backend draws in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width of the play area in world units.
    pub width: f32,
    /// Height of the play area in world units.
    pub height: f32,
    /// Tracked players.
    pub players: Vec<PlayerPresentation>,
    /// Live creatures.
    pub creatures: Vec<CreaturePresentation>,
    /// Active projectiles.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Wave-scoped boss, when one is active.
    pub phase_boss: Option<BossPresentation>,
    /// Immortal boss present for the whole match.
    pub eternal_boss: Option<BossPresentation>,
    /// Transient effect markers.
    pub effects: Vec<EffectPresentation>,
    /// Wave progress overlay.
    pub hud: HudPresentation,
    /// Saturation applied to every color, in `0.0..=1.0`.
    pub saturation: f32,
}

impl Scene {
    /// Creates an empty scene covering the play area.
    ///
    /// Returns an error when either dimension is not strictly positive.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            players: Vec::new(),
            creatures: Vec::new(),
            projectiles: Vec::new(),
            phase_boss: None,
            eternal_boss: None,
            effects: Vec::new(),
            hud: HudPresentation::default(),
            saturation: 1.0,
        })
    }

    /// Removes every entity so the scene can be refilled.
    pub fn clear(&mut self) {
        self.players.clear();
        self.creatures.clear();
        self.projectiles.clear();
        self.phase_boss = None;
        self.eternal_boss = None;
        self.effects.clear();
    }

    /// Clamps a world-space position to the play area.
    #[must_use]
    pub fn clamp_world_position(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.clamp(0.0, self.width),
            position.y.clamp(0.0, self.height),
        )
    }

    /// Top-left corner of the HUD in world units.
    ///
    /// Stream mode moves the overlay to the bottom edge so it does not cover
    /// the streamer's face.
    #[must_use]
    pub fn hud_origin(&self, stream_mode: bool) -> Vec2 {
        if stream_mode {
            Vec2::new(10.0, (self.height - 80.0).max(0.0))
        } else {
            Vec2::new(10.0, 30.0)
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
    /// Borderless overlay mode that hides creatures and the phase boss.
    pub stream_mode: bool,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
            stream_mode: false,
        }
    }

    /// Switches the presentation into stream mode.
    #[must_use]
    pub fn with_stream_mode(mut self, enabled: bool) -> Self {
        self.stream_mode = enabled;
        self
    }

    /// Reports whether creatures and the phase boss are drawn.
    #[must_use]
    pub const fn shows_minions(&self) -> bool {
        !self.stream_mode
    }
}

/// Rendering backend capable of presenting Face Arena scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the wall-clock frame
    /// delta and the per-frame input captured by the adapter, and refills the
    /// scene before it is drawn. An error returned by the closure stops the
    /// loop and is returned from `run`.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> AnyResult<FrameSimulationBreakdown>
            + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The play area must have a positive size.
    #[error("scene dimensions must be positive (received {width}x{height})")]
    InvalidDimensions {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_creation_rejects_empty_play_area() {
        assert!(Scene::new(1280.0, 720.0).is_ok());

        let error = Scene::new(0.0, 720.0).expect_err("zero width must be rejected");
        assert_eq!(
            error,
            RenderingError::InvalidDimensions {
                width: 0.0,
                height: 720.0
            }
        );
        assert!(Scene::new(640.0, f32::NAN).is_err());
    }

    #[test]
    fn desaturate_blends_towards_luminance() {
        let red = Color::from_rgb_u8(255, 0, 0);

        assert_eq!(red.desaturate(1.0), red);

        let grey = red.desaturate(0.0);
        assert!((grey.red - 0.299).abs() < 1e-6);
        assert!((grey.green - 0.299).abs() < 1e-6);
        assert!((grey.blue - 0.299).abs() < 1e-6);

        let faded = red.desaturate(0.1);
        assert!(faded.red < red.red);
        assert!(faded.green > 0.0);
        assert_eq!(faded.alpha, 1.0);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.5, 0.0, 1.0, 0.5).lighten(0.5);

        assert_eq!(color, Color::new(0.75, 0.5, 1.0, 0.5));
    }

    #[test]
    fn clear_keeps_the_hud_and_saturation() {
        let mut scene = Scene::new(640.0, 480.0).expect("valid scene");
        scene.creatures.push(CreaturePresentation {
            position: Vec2::new(10.0, 10.0),
            radius: 15.0,
            color: creature_color(CreatureKind::Plain),
        });
        scene.saturation = 0.4;
        scene.hud.kills = 7;

        scene.clear();

        assert!(scene.creatures.is_empty());
        assert_eq!(scene.saturation, 0.4);
        assert_eq!(scene.hud.kills, 7);
    }

    #[test]
    fn stream_mode_hides_minions_and_moves_the_hud() {
        let scene = Scene::new(1280.0, 720.0).expect("valid scene");
        let windowed = Presentation::new("Face Arena", Color::from_rgb_u8(0, 0, 0), scene);
        let stream = windowed.clone().with_stream_mode(true);

        assert!(windowed.shows_minions());
        assert!(!stream.shows_minions());
        assert_eq!(windowed.scene.hud_origin(false), Vec2::new(10.0, 30.0));
        assert_eq!(stream.scene.hud_origin(true), Vec2::new(10.0, 640.0));
    }

    #[test]
    fn hud_lines_follow_progress() {
        let hud = HudPresentation {
            wave_index: 1,
            wave_count: 10,
            kills: 12,
            threshold: Some(30),
            phase: String::from("minions"),
            paused: true,
            mirror_shield: false,
        };

        assert_eq!(
            hud.lines(),
            vec![
                String::from("Wave 2/10  minions"),
                String::from("Kills 12/30"),
                String::from("PAUSED"),
            ]
        );
    }

    #[test]
    fn boss_health_fraction_is_clamped() {
        let boss = BossPresentation {
            name: String::from("RamBoss"),
            position: Vec2::ZERO,
            radius: 40.0,
            heading: 0.0,
            color: boss_color(BossKind::Ram),
            health: 10,
            max_health: 40,
            immortal: false,
            shield: false,
            charging: false,
            teleported: false,
            gaze_target: None,
            chain_target: None,
        };

        assert_eq!(boss.health_fraction(), 0.25);
        assert_eq!(
            BossPresentation {
                max_health: 0,
                ..boss
            }
            .health_fraction(),
            0.0
        );
    }
}
