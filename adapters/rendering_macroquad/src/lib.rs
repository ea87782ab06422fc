#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Face Arena.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Without a camera the window doubles as the perception device: the mouse
//! aims, `Space` holds the eyes closed (releasing it blinks), `B` blinks,
//! `M` holds the mouth open, `V` holds the voice, and the left mouse button
//! places a hand at the cursor. `P` toggles pause, `S` speaks, and `Escape`
//! or `Q` quits.

use anyhow::Result;
use face_arena_core::EYE_OFFSETS;
use face_arena_rendering::{
    to_vec2, BossPresentation, Color, FrameInput, FrameSimulationBreakdown, Presentation,
    RenderingBackend, Scene,
};
use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_down, mouse_position, KeyCode, MouseButton,
};
use std::{
    collections::VecDeque,
    sync::mpsc,
    time::{Duration, Instant},
};
use tracing::info;

const HUD_FONT_SIZE: f32 = 28.0;
const HUD_LINE_HEIGHT: f32 = 30.0;

/// Derives blink edges from a held eyes-closed key.
///
/// Eyes reopening after being held closed count as a blink, matching what a
/// camera reports when a real player blinks.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct EyeLatch {
    closed: bool,
}

impl EyeLatch {
    /// Records this frame's key state and returns `(eyes_closed, blink)`.
    pub fn observe(&mut self, closed: bool) -> (bool, bool) {
        let blink = self.closed && !closed;
        self.closed = closed;
        (closed, blink)
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `P` toggles pause.
    pause_toggle: bool,
    /// `S` asks the avatar to speak.
    speak: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            pause_toggle: is_key_pressed(KeyCode::P),
            speak: is_key_pressed(KeyCode::S),
        }
    }
}

/// Raw device readings for one frame, in screen space.
#[derive(Clone, Copy, Debug, Default)]
struct InputObservations {
    cursor: Vec2,
    eyes_held: bool,
    blink_pressed: bool,
    mouth_held: bool,
    voice_held: bool,
    hand_held: bool,
}

impl InputObservations {
    fn poll() -> Self {
        let (cursor_x, cursor_y) = mouse_position();
        Self {
            cursor: Vec2::new(cursor_x, cursor_y),
            eyes_held: is_key_down(KeyCode::Space),
            blink_pressed: is_key_pressed(KeyCode::B),
            mouth_held: is_key_down(KeyCode::M),
            voice_held: is_key_down(KeyCode::V),
            hand_held: is_mouse_button_down(MouseButton::Left),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Per-frame timings fed to the [`FpsCounter`].
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;
        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            match self.frame_times.pop_front() {
                Some(removed) => {
                    self.window_duration = self.window_duration.saturating_sub(removed);
                }
                None => break,
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_scene_population: self.scene_population_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Result<FrameSimulationBreakdown> + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let shows_minions = presentation.shows_minions();
        let Presentation {
            window_title,
            clear_color,
            scene,
            stream_mode,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.width.round() as i32,
            window_height: scene.height.round() as i32,
            fullscreen: stream_mode,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (result_sender, result_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();
            let mut eye_latch = EyeLatch::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let frame_input = gather_frame_input_from_observations(
                    &scene,
                    &metrics_before,
                    InputObservations::poll(),
                    keyboard,
                    &mut eye_latch,
                );

                let simulation_breakdown = match update_scene(frame_dt, frame_input, &mut scene) {
                    Ok(breakdown) => breakdown,
                    Err(error) => {
                        let _ = result_sender.send(Err(error));
                        return;
                    }
                };

                let render_start = Instant::now();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                macroquad::window::clear_background(to_macroquad_color(
                    clear_color.desaturate(scene.saturation),
                ));
                draw_effects(&scene, &metrics);
                if shows_minions {
                    draw_creatures(&scene, &metrics);
                }
                draw_projectiles(&scene, &metrics);
                draw_players(&scene, &metrics);
                if shows_minions {
                    if let Some(boss) = &scene.phase_boss {
                        draw_boss(boss, scene.saturation, &metrics);
                    }
                }
                if let Some(boss) = &scene.eternal_boss {
                    draw_boss(boss, scene.saturation, &metrics);
                }
                draw_hud(&scene, &metrics, stream_mode);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(metrics) = fps_metrics {
                        info!(
                            fps = metrics.per_second,
                            trailing_fps = metrics.trailing_ten_seconds,
                            sim_ms = metrics.avg_simulation.as_secs_f64() * 1_000.0,
                            scene_ms = metrics.avg_scene_population.as_secs_f64() * 1_000.0,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame timings"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }

            let _ = result_sender.send(Ok(()));
        });

        result_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Maps world units onto the letterboxed window.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        if scene.width <= f32::EPSILON || scene.height <= f32::EPSILON {
            return Self {
                scale: 0.0,
                offset_x: 0.0,
                offset_y: 0.0,
            };
        }

        let scale = (screen_width / scene.width)
            .min(screen_height / scene.height)
            .max(0.0);
        Self {
            scale,
            offset_x: (screen_width - scene.width * scale) * 0.5,
            offset_y: (screen_height - scene.height * scale) * 0.5,
        }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + world.x * self.scale,
            self.offset_y + world.y * self.scale,
        )
    }

    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        ))
    }

    fn length(&self, world: f32) -> f32 {
        world * self.scale
    }
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &SceneMetrics,
    observations: InputObservations,
    keyboard: KeyboardShortcuts,
    eye_latch: &mut EyeLatch,
) -> FrameInput {
    let (eyes_closed, released) = eye_latch.observe(observations.eyes_held);
    let cursor_world_space = metrics
        .to_world(observations.cursor)
        .map(|position| scene.clamp_world_position(position));

    FrameInput {
        cursor_world_space,
        eyes_closed,
        blink: released || (observations.blink_pressed && !eyes_closed),
        mouth_open: observations.mouth_held,
        voice: observations.voice_held,
        hand: cursor_world_space.filter(|_| observations.hand_held),
        pause_toggle: keyboard.pause_toggle,
        speak: keyboard.speak,
    }
}

fn tint(color: Color, saturation: f32) -> macroquad::color::Color {
    to_macroquad_color(color.desaturate(saturation))
}

fn draw_creatures(scene: &Scene, metrics: &SceneMetrics) {
    for creature in &scene.creatures {
        let center = metrics.to_screen(creature.position);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            metrics.length(creature.radius),
            tint(creature.color, scene.saturation),
        );
    }
}

fn draw_projectiles(scene: &Scene, metrics: &SceneMetrics) {
    for projectile in &scene.projectiles {
        let center = metrics.to_screen(projectile.position);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            metrics.length(projectile.radius),
            tint(projectile.color, scene.saturation),
        );
    }
}

fn draw_effects(scene: &Scene, metrics: &SceneMetrics) {
    for effect in &scene.effects {
        let center = metrics.to_screen(effect.position);
        let progress = effect.progress.clamp(0.0, 1.0);
        let color = effect
            .color
            .with_alpha(1.0 - progress)
            .desaturate(scene.saturation);
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            metrics.length(20.0 + 40.0 * progress),
            3.0,
            to_macroquad_color(color),
        );
    }
}

fn draw_players(scene: &Scene, metrics: &SceneMetrics) {
    let body = Color::from_rgb_u8(80, 200, 255);
    let eye = Color::from_rgb_u8(255, 255, 255);
    let mouth = Color::from_rgb_u8(255, 80, 120);

    for player in &scene.players {
        let anchor = metrics.to_screen(player.anchor);
        let body_alpha = if player.invulnerable { 0.25 } else { 0.6 };
        macroquad::shapes::draw_circle_lines(
            anchor.x,
            anchor.y,
            metrics.length(face_arena_core::PLAYER_BODY_RADIUS),
            2.0,
            tint(body.with_alpha(body_alpha), scene.saturation),
        );

        for offset in EYE_OFFSETS {
            let center = metrics.to_screen(player.anchor + to_vec2(offset));
            if player.eyes_closed {
                let half = metrics.length(8.0);
                macroquad::shapes::draw_line(
                    center.x - half,
                    center.y,
                    center.x + half,
                    center.y,
                    2.0,
                    tint(eye, scene.saturation),
                );
            } else {
                macroquad::shapes::draw_circle(
                    center.x,
                    center.y,
                    metrics.length(6.0),
                    tint(eye, scene.saturation),
                );
            }
        }

        let mouth_center = metrics.to_screen(player.anchor + Vec2::new(0.0, 30.0));
        let mouth_radius = if player.mouth_open { 14.0 } else { 4.0 };
        macroquad::shapes::draw_circle(
            mouth_center.x,
            mouth_center.y,
            metrics.length(mouth_radius),
            tint(mouth, scene.saturation),
        );

        let aim_end = metrics.to_screen(player.anchor + player.aim * 60.0);
        macroquad::shapes::draw_line(
            anchor.x,
            anchor.y,
            aim_end.x,
            aim_end.y,
            1.5,
            tint(body, scene.saturation),
        );

        let _ = macroquad::text::draw_text(
            &"\u{2665}".repeat(player.lives as usize),
            anchor.x - metrics.length(30.0),
            anchor.y - metrics.length(110.0),
            HUD_FONT_SIZE,
            tint(mouth, scene.saturation),
        );
    }
}

fn draw_boss(boss: &BossPresentation, saturation: f32, metrics: &SceneMetrics) {
    let center = metrics.to_screen(boss.position);
    let radius = metrics.length(boss.radius);

    if let Some(target) = boss.gaze_target {
        let target = metrics.to_screen(target);
        macroquad::shapes::draw_line(
            center.x,
            center.y,
            target.x,
            target.y,
            2.0,
            tint(Color::from_rgb_u8(255, 0, 0).with_alpha(0.7), saturation),
        );
    }
    if let Some(target) = boss.chain_target {
        let target = metrics.to_screen(target);
        macroquad::shapes::draw_line(
            center.x,
            center.y,
            target.x,
            target.y,
            4.0,
            tint(Color::from_rgb_u8(160, 160, 170), saturation),
        );
    }

    let body = if boss.teleported {
        boss.color.lighten(0.4)
    } else {
        boss.color
    };
    macroquad::shapes::draw_circle(center.x, center.y, radius, tint(body, saturation));

    let facing = center + Vec2::new(boss.heading.cos(), boss.heading.sin()) * radius;
    macroquad::shapes::draw_line(
        center.x,
        center.y,
        facing.x,
        facing.y,
        3.0,
        tint(Color::from_rgb_u8(0, 0, 0), saturation),
    );

    if boss.shield {
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius + metrics.length(10.0),
            4.0,
            tint(Color::from_rgb_u8(120, 200, 255), saturation),
        );
    }
    if boss.charging {
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            3.0,
            tint(Color::from_rgb_u8(255, 40, 40), saturation),
        );
    }

    let label_y = center.y - radius - metrics.length(16.0);
    if !boss.immortal {
        let width = metrics.length(boss.radius * 2.0);
        let left = center.x - width * 0.5;
        let height = metrics.length(6.0);
        macroquad::shapes::draw_rectangle(
            left,
            label_y,
            width,
            height,
            tint(Color::from_rgb_u8(60, 0, 0), saturation),
        );
        macroquad::shapes::draw_rectangle(
            left,
            label_y,
            width * boss.health_fraction(),
            height,
            tint(Color::from_rgb_u8(0, 200, 60), saturation),
        );
    }
    let _ = macroquad::text::draw_text(
        &boss.name,
        center.x - radius,
        label_y - 4.0,
        HUD_FONT_SIZE * 0.75,
        tint(Color::from_rgb_u8(255, 255, 255), saturation),
    );
}

fn draw_hud(scene: &Scene, metrics: &SceneMetrics, stream_mode: bool) {
    let origin = metrics.to_screen(scene.hud_origin(stream_mode));
    let color = to_macroquad_color(Color::from_rgb_u8(255, 255, 255));
    for (index, line) in scene.hud.lines().iter().enumerate() {
        let _ = macroquad::text::draw_text(
            line,
            origin.x,
            origin.y + HUD_LINE_HEIGHT * index as f32,
            HUD_FONT_SIZE,
            color,
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(1280.0, 720.0).expect("valid scene")
    }

    fn observe(cursor: Vec2) -> InputObservations {
        InputObservations {
            cursor,
            ..InputObservations::default()
        }
    }

    #[test]
    fn scene_metrics_letterbox_the_play_area() {
        let metrics = SceneMetrics::from_scene(&scene(), 1280.0, 1000.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset_x, 0.0);
        assert_eq!(metrics.offset_y, 140.0);
        assert_eq!(
            metrics.to_screen(Vec2::new(640.0, 360.0)),
            Vec2::new(640.0, 500.0)
        );
    }

    #[test]
    fn cursor_maps_back_into_world_space() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 640.0, 360.0);
        let mut latch = EyeLatch::default();

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            observe(Vec2::new(320.0, 90.0)),
            KeyboardShortcuts::default(),
            &mut latch,
        );

        assert_eq!(input.cursor_world_space, Some(Vec2::new(640.0, 180.0)));
        assert_eq!(input.hand, None);
    }

    #[test]
    fn cursor_outside_the_play_area_is_clamped() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 1280.0, 720.0);
        let mut latch = EyeLatch::default();
        let observations = InputObservations {
            hand_held: true,
            ..observe(Vec2::new(-50.0, 900.0))
        };

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            observations,
            KeyboardShortcuts::default(),
            &mut latch,
        );

        assert_eq!(input.cursor_world_space, Some(Vec2::new(0.0, 720.0)));
        assert_eq!(input.hand, Some(Vec2::new(0.0, 720.0)));
    }

    #[test]
    fn releasing_held_eyes_blinks() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 1280.0, 720.0);
        let mut latch = EyeLatch::default();
        let held = InputObservations {
            eyes_held: true,
            ..InputObservations::default()
        };

        let closed = gather_frame_input_from_observations(
            &scene,
            &metrics,
            held,
            KeyboardShortcuts::default(),
            &mut latch,
        );
        assert!(closed.eyes_closed);
        assert!(!closed.blink);

        let reopened = gather_frame_input_from_observations(
            &scene,
            &metrics,
            InputObservations::default(),
            KeyboardShortcuts::default(),
            &mut latch,
        );
        assert!(!reopened.eyes_closed);
        assert!(reopened.blink);
    }

    #[test]
    fn blink_key_is_ignored_while_eyes_are_closed() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 1280.0, 720.0);
        let mut latch = EyeLatch::default();
        let observations = InputObservations {
            eyes_held: true,
            blink_pressed: true,
            ..InputObservations::default()
        };

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            observations,
            KeyboardShortcuts::default(),
            &mut latch,
        );

        assert!(!input.blink);
    }

    #[test]
    fn degenerate_screens_produce_no_cursor() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 0.0, 0.0);
        let mut latch = EyeLatch::default();

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            observe(Vec2::new(10.0, 10.0)),
            KeyboardShortcuts {
                pause_toggle: true,
                ..KeyboardShortcuts::default()
            },
            &mut latch,
        );

        assert_eq!(input.cursor_world_space, None);
        assert!(input.pause_toggle);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(250),
            simulation: Duration::from_millis(4),
            ..FrameBreakdown::default()
        };

        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());
        let metrics = counter.record_frame(frame).expect("one second elapsed");

        assert_eq!(metrics.per_second, 4.0);
        assert_eq!(metrics.trailing_ten_seconds, 4.0);
        assert_eq!(metrics.avg_simulation, Duration::from_millis(4));
        assert!(counter.record_frame(frame).is_none());
    }
}
