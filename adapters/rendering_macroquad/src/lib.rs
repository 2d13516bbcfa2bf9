#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Battle City.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

pub mod sprites;

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use battle_city_core::Direction;
use battle_city_rendering::{
    palette, Banner, ButtonEdge, FrameInput, HeldDirections, Hud, Presentation, Rect,
    RenderingBackend, Scene, SceneBullet, SceneTank, SceneWall, SpriteKey, CONTROLS_TEXT,
    HUD_HEIGHT, RESTART_HINT, TANK_SHEET_FRAMES,
};
use glam::Vec2;
use macroquad::input::{is_key_down, KeyCode};
use tracing::{debug, info, warn};

use self::sprites::{DrawParams, SpriteAtlas};

const HUD_FONT_SIZE: f32 = 28.0;
const FOOTER_FONT_SIZE: f32 = 14.0;
const BANNER_FONT_SIZE: f32 = 56.0;

/// Keys mapped to each movement direction.
const MOVEMENT_KEYS: [(Direction, [KeyCode; 2]); 4] = [
    (Direction::Up, [KeyCode::W, KeyCode::Up]),
    (Direction::Down, [KeyCode::S, KeyCode::Down]),
    (Direction::Left, [KeyCode::A, KeyCode::Left]),
    (Direction::Right, [KeyCode::D, KeyCode::Right]),
];

/// Converts raw key levels into per-frame input edges.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    held: HeldDirections,
    fire: ButtonEdge,
    restart: ButtonEdge,
}

impl KeyboardState {
    /// Samples key levels through `is_down` and produces this frame's input.
    pub fn sample(&mut self, mut is_down: impl FnMut(KeyCode) -> bool) -> FrameInput {
        for (direction, keys) in MOVEMENT_KEYS {
            let down = keys.into_iter().any(&mut is_down);
            self.held.observe(direction, down);
        }

        FrameInput {
            movement: self.held.current(),
            fire: self.fire.observe(is_down(KeyCode::Space)),
            restart: self.restart.observe(is_down(KeyCode::R)),
        }
    }

    /// Returns whether a quit key is down.
    pub fn quit_requested(mut is_down: impl FnMut(KeyCode) -> bool) -> bool {
        is_down(KeyCode::Escape) || is_down(KeyCode::Q)
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            manifest_path: SpriteAtlas::default_manifest_path(),
        }
    }
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

    /// Configures whether the backend shows a frame-rate readout in the HUD.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the manifest used to locate sprite assets.
    #[must_use]
    pub fn with_sprite_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

fn load_atlas(enabled: bool, manifest_path: &Path) -> Option<SpriteAtlas> {
    if !enabled {
        debug!("sprite loading disabled");
        return None;
    }

    match SpriteAtlas::from_manifest_path(manifest_path) {
        Ok(atlas) => {
            info!(
                textures = atlas.texture_count(),
                manifest = %manifest_path.display(),
                "sprite atlas loaded"
            );
            Some(atlas)
        }
        Err(error) => {
            warn!(
                error = %format!("{error:#}"),
                "sprite atlas unavailable, drawing primitives instead"
            );
            None
        }
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.total_width().round() as i32,
            window_height: scene.total_height().round() as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = load_atlas(load_sprites, &manifest_path);
            let background = to_macroquad_color(clear_color);
            let mut keyboard = KeyboardState::default();
            let mut fps_counter = FpsCounter::default();
            let mut fps_readout: Option<FpsMetrics> = None;

            loop {
                if KeyboardState::quit_requested(is_key_down) {
                    info!("quit requested");
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = keyboard.sample(is_key_down);

                update_scene(frame_dt, frame_input, &mut scene);

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                draw_walls(&scene.walls, &metrics, sprite_atlas.as_ref());
                draw_bullets(&scene.bullets, &metrics);
                draw_tanks(&scene.tanks, &metrics, sprite_atlas.as_ref());
                draw_hud(&scene.hud, &metrics);
                draw_footer(&metrics);

                if let Some(metrics_update) = fps_counter.record_frame(frame_dt) {
                    fps_readout = Some(metrics_update);
                }
                if show_fps {
                    if let Some(readout) = fps_readout {
                        draw_fps(readout, &metrics);
                    }
                }

                if let Some(banner) = scene.hud.banner {
                    draw_overlay(banner, &scene.hud, &metrics);
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Mapping from scene units to screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    width: f32,
    height: f32,
    arena_height: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let width = scene.total_width();
        let height = scene.total_height();
        let scale = if width <= f32::EPSILON || height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / width).min(screen_height / height)
        };
        let offset = Vec2::new(
            ((screen_width - width * scale) * 0.5).max(0.0),
            ((screen_height - height * scale) * 0.5).max(0.0),
        );

        Self {
            scale,
            offset,
            width,
            height,
            arena_height: scene.arena.y,
        }
    }

    /// Screen position of a point in window units.
    fn point(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    /// Screen rectangle of a rectangle in arena units.
    fn arena_rect(&self, rect: Rect) -> Rect {
        let shifted = rect.translated(Vec2::new(0.0, HUD_HEIGHT));
        Rect::new(self.point(shifted.origin), shifted.size * self.scale)
    }

    fn font_size(&self, size: f32) -> u16 {
        (size * self.scale).round().clamp(1.0, f32::from(u16::MAX)) as u16
    }
}

fn draw_rect(rect: Rect, color: battle_city_rendering::Color) {
    macroquad::shapes::draw_rectangle(
        rect.origin.x,
        rect.origin.y,
        rect.size.x,
        rect.size.y,
        to_macroquad_color(color),
    );
}

fn draw_walls(walls: &[SceneWall], metrics: &SceneMetrics, sprite_atlas: Option<&SpriteAtlas>) {
    for wall in walls {
        let target = metrics.arena_rect(wall.rect);
        let drawn = sprite_atlas.map_or(false, |atlas| {
            atlas.draw(SpriteKey::for_wall(wall.kind), DrawParams::new(target))
        });
        if !drawn {
            draw_rect(target, palette::wall(wall.kind));
        }
    }
}

fn draw_bullets(bullets: &[SceneBullet], metrics: &SceneMetrics) {
    for bullet in bullets {
        draw_rect(metrics.arena_rect(bullet.rect), bullet.color());
    }
}

fn draw_tanks(tanks: &[SceneTank], metrics: &SceneMetrics, sprite_atlas: Option<&SpriteAtlas>) {
    for tank in tanks {
        let body = metrics.arena_rect(tank.body);
        let params = DrawParams::new(body).with_frame(tank.sprite_frame(), TANK_SHEET_FRAMES);
        let drawn = sprite_atlas.map_or(false, |atlas| atlas.draw(SpriteKey::Tank, params));
        if !drawn {
            draw_rect(body, tank.color());
            draw_rect(metrics.arena_rect(tank.barrel), palette::BARREL);
        }
    }
}

fn draw_text(text: &str, position: Vec2, font_size: u16, color: battle_city_rendering::Color) {
    let _ = macroquad::text::draw_text(
        text,
        position.x,
        position.y,
        f32::from(font_size),
        to_macroquad_color(color),
    );
}

/// Draws `text` horizontally centred with its baseline at window height `y`.
fn draw_centred_text(
    text: &str,
    y: f32,
    font_size: f32,
    color: battle_city_rendering::Color,
    metrics: &SceneMetrics,
) {
    let size = metrics.font_size(font_size);
    let measured = macroquad::text::measure_text(text, None, size, 1.0);
    let anchor = metrics.point(Vec2::new(metrics.width * 0.5, y));
    draw_text(
        text,
        Vec2::new(anchor.x - measured.width * 0.5, anchor.y),
        size,
        color,
    );
}

fn draw_hud(hud: &Hud, metrics: &SceneMetrics) {
    let bar = Rect::new(
        metrics.point(Vec2::ZERO),
        Vec2::new(metrics.width, HUD_HEIGHT) * metrics.scale,
    );
    draw_rect(bar, palette::HUD_BAR);

    let size = metrics.font_size(HUD_FONT_SIZE);
    let baseline = 10.0 + HUD_FONT_SIZE * 0.75;
    draw_text(
        &hud.score_label(),
        metrics.point(Vec2::new(10.0, baseline)),
        size,
        palette::TEXT,
    );
    draw_text(
        &hud.lives_label(),
        metrics.point(Vec2::new(metrics.width - 150.0, baseline)),
        size,
        palette::TEXT,
    );
}

fn draw_footer(metrics: &SceneMetrics) {
    let baseline = HUD_HEIGHT + metrics.arena_height + 5.0 + FOOTER_FONT_SIZE;
    draw_centred_text(
        CONTROLS_TEXT,
        baseline,
        FOOTER_FONT_SIZE,
        palette::TEXT,
        metrics,
    );
}

fn draw_fps(readout: FpsMetrics, metrics: &SceneMetrics) {
    let text = format!(
        "FPS {:.0} ({:.0})",
        readout.per_second, readout.trailing_ten_seconds
    );
    draw_centred_text(&text, HUD_HEIGHT * 0.5 + 5.0, FOOTER_FONT_SIZE, palette::TEXT, metrics);
}

fn draw_overlay(banner: Banner, hud: &Hud, metrics: &SceneMetrics) {
    let screen = Rect::new(
        metrics.point(Vec2::ZERO),
        Vec2::new(metrics.width, metrics.height) * metrics.scale,
    );
    draw_rect(screen, palette::OVERLAY);

    let centre = metrics.height * 0.5;
    draw_centred_text(banner.title(), centre - 30.0, BANNER_FONT_SIZE, banner.color(), metrics);
    draw_centred_text(
        &format!("Final Score: {}", hud.score),
        centre + 20.0,
        HUD_FONT_SIZE,
        palette::TEXT,
        metrics,
    );
    draw_centred_text(RESTART_HINT, centre + 60.0, HUD_FONT_SIZE, palette::TEXT, metrics);
}

fn to_macroquad_color(color: battle_city_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
