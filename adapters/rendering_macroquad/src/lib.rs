#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the tower defence simulation.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

mod sprites;

use std::{path::PathBuf, sync::mpsc, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::Vec2 as MacroquadVec2,
};
use tower_defence_core::{FrameInput, Vector2};
use tower_defence_rendering::{
    render, Color, DrawSurface, Presentation, RenderingBackend, Scene, SpriteKey,
};

use self::sprites::SpriteAtlas;

const TOWER_HOTKEYS: [(KeyCode, u8); 4] = [
    (KeyCode::Key1, 1),
    (KeyCode::Key2, 2),
    (KeyCode::Key3, 3),
    (KeyCode::Key4, 4),
];

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    sprite_manifest: Option<PathBuf>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Loads sprites listed by the manifest at `path`; unlisted sprites are
    /// drawn with primitives.
    #[must_use]
    pub fn with_sprite_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.sprite_manifest = Some(path.into());
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            sprite_manifest,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.grid.width().round() as i32,
            window_height: scene.grid.height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let atlas = match sprite_manifest {
                Some(path) => match SpriteAtlas::from_manifest_path(&path).with_context(|| {
                    format!("failed to initialise sprites from {}", path.display())
                }) {
                    Ok(atlas) => Some(atlas),
                    Err(error) => {
                        let _ = init_sender.send(Err(error));
                        return;
                    }
                },
                None => None,
            };
            let _ = init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            loop {
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                macroquad::window::clear_background(background);
                let viewport = Viewport::fit(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                let dt = Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let (cursor_x, cursor_y) = mouse_position();
                let input = frame_input_from_observations(
                    &viewport,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    pressed_hotkey(),
                    is_key_pressed(KeyCode::P),
                );
                update_scene(dt, input, &mut scene);

                let viewport = Viewport::fit(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let mut surface = MacroquadSurface {
                    viewport,
                    atlas: atlas.as_ref(),
                };
                render(&scene, &mut surface);

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn pressed_hotkey() -> Option<u8> {
    TOWER_HOTKEYS
        .iter()
        .find(|(key, _)| is_key_pressed(*key))
        .map(|(_, digit)| *digit)
}

/// Maps world pixels onto the window, preserving the aspect ratio and
/// centring the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Viewport {
    scale: f32,
    offset: Vec2,
    world_size: Vec2,
}

impl Viewport {
    fn fit(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_size = Vec2::new(scene.grid.width(), scene.grid.height());
        if world_size.x <= f32::EPSILON || world_size.y <= f32::EPSILON {
            return Self {
                scale: 0.0,
                offset: Vec2::ZERO,
                world_size,
            };
        }
        let scale = (screen_width / world_size.x).min(screen_height / world_size.y);
        let offset = (Vec2::new(screen_width, screen_height) - world_size * scale) * 0.5;
        Self {
            scale,
            offset,
            world_size,
        }
    }

    fn to_screen(&self, world: Vec2) -> MacroquadVec2 {
        let screen = self.offset + world * self.scale;
        MacroquadVec2::new(screen.x, screen.y)
    }

    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let world = (screen - self.offset) / self.scale;
        let inside = world.x >= 0.0
            && world.y >= 0.0
            && world.x < self.world_size.x
            && world.y < self.world_size.y;
        inside.then_some(world)
    }
}

fn frame_input_from_observations(
    viewport: &Viewport,
    cursor: Vec2,
    primary_click: bool,
    tower_hotkey: Option<u8>,
    pause_toggle: bool,
) -> FrameInput {
    let cursor = viewport
        .to_world(cursor)
        .map(|world| Vector2::new(world.x, world.y));
    FrameInput {
        cursor,
        primary_click: primary_click && cursor.is_some(),
        tower_hotkey,
        pause_toggle,
    }
}

struct MacroquadSurface<'a> {
    viewport: Viewport,
    atlas: Option<&'a SpriteAtlas>,
}

impl MacroquadSurface<'_> {
    fn scaled(&self, length: f32) -> f32 {
        length * self.viewport.scale
    }
}

impl DrawSurface for MacroquadSurface<'_> {
    fn fill_rect(&mut self, top_left: Vec2, size: Vec2, color: Color) {
        let position = self.viewport.to_screen(top_left);
        macroquad::shapes::draw_rectangle(
            position.x,
            position.y,
            self.scaled(size.x),
            self.scaled(size.y),
            to_macroquad_color(color),
        );
    }

    fn stroke_rect(&mut self, top_left: Vec2, size: Vec2, thickness: f32, color: Color) {
        let position = self.viewport.to_screen(top_left);
        macroquad::shapes::draw_rectangle_lines(
            position.x,
            position.y,
            self.scaled(size.x),
            self.scaled(size.y),
            self.scaled(thickness).max(1.0),
            to_macroquad_color(color),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let position = self.viewport.to_screen(center);
        macroquad::shapes::draw_circle(
            position.x,
            position.y,
            self.scaled(radius),
            to_macroquad_color(color),
        );
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        let position = self.viewport.to_screen(center);
        macroquad::shapes::draw_circle_lines(
            position.x,
            position.y,
            self.scaled(radius),
            self.scaled(thickness).max(1.0),
            to_macroquad_color(color),
        );
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let start = self.viewport.to_screen(from);
        let end = self.viewport.to_screen(to);
        macroquad::shapes::draw_line(
            start.x,
            start.y,
            end.x,
            end.y,
            self.scaled(thickness).max(1.0),
            to_macroquad_color(color),
        );
    }

    fn text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        let position = self.viewport.to_screen(position);
        macroquad::text::draw_text(
            text,
            position.x,
            position.y,
            self.scaled(size).max(8.0),
            to_macroquad_color(color),
        );
    }

    fn blit(&mut self, sprite: SpriteKey, top_left: Vec2, size: Vec2, rotation: f32) -> bool {
        let Some(atlas) = self.atlas else {
            return false;
        };
        let position = self.viewport.to_screen(top_left);
        let size = MacroquadVec2::new(self.scaled(size.x), self.scaled(size.y));
        atlas.draw(sprite, position, size, rotation)
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
