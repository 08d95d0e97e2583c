//! Drawing surface abstraction and the frame draw routine.

use glam::Vec2;
use tower_defence_core::{CellKind, TowerTypeId};

use crate::{scene::TowerPresentation, Color, Scene};

/// Image assets a surface may provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Buildable ground tile.
    Ground,
    /// Path tile.
    Path,
    /// Tower base of the provided type.
    Tower(TowerTypeId),
    /// Enemy body.
    Enemy,
}

/// Primitive drawing operations backends implement.
pub trait DrawSurface {
    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, top_left: Vec2, size: Vec2, color: Color);

    /// Outlines an axis-aligned rectangle.
    fn stroke_rect(&mut self, top_left: Vec2, size: Vec2, thickness: f32, color: Color);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Outlines a circle.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color);

    /// Draws a line segment.
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);

    /// Draws text with its baseline starting at `position`.
    fn text(&mut self, text: &str, position: Vec2, size: f32, color: Color);

    /// Draws a sprite rotated around its centre.
    ///
    /// Returns `false` when the asset is unavailable, in which case the caller
    /// falls back to primitives.
    fn blit(&mut self, sprite: SpriteKey, top_left: Vec2, size: Vec2, rotation: f32) -> bool {
        let _ = (sprite, top_left, size, rotation);
        false
    }
}

const GROUND_COLOR: Color = Color::from_rgb_u8(42, 42, 42);
const PATH_COLOR: Color = Color::from_rgb_u8(139, 115, 85);
const BLOCKED_COLOR: Color = Color::from_rgb_u8(20, 20, 20);
const VALID_PREVIEW: Color = Color::new(0.0, 1.0, 0.0, 0.3);
const INVALID_PREVIEW: Color = Color::new(1.0, 0.0, 0.0, 0.3);
const RANGE_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.25);
const SLOW_RANGE_COLOR: Color = Color::new(0.68, 0.85, 0.9, 0.35);
const ENEMY_OUTLINE: Color = Color::from_rgb_u8(139, 0, 0);
const SLOW_OUTLINE: Color = Color::from_rgb_u8(173, 216, 230);
const POISON_OUTLINE: Color = Color::from_rgb_u8(0, 255, 0);
const HEALTH_BACKGROUND: Color = Color::from_rgb_u8(255, 0, 0);
const HEALTH_FOREGROUND: Color = Color::from_rgb_u8(0, 255, 0);
const EXPLOSION_FILL: Color = Color::from_rgb_u8(255, 165, 0);
const EXPLOSION_RING: Color = Color::from_rgb_u8(255, 100, 0);
const TEXT_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);

const BARREL_LENGTH: f32 = 30.0;
const BARREL_THICKNESS: f32 = 8.0;
const HEALTH_BAR_HEIGHT: f32 = 4.0;
const HEALTH_BAR_GAP: f32 = 8.0;
const HUD_FONT: f32 = 20.0;
const HUD_LINE: f32 = 30.0;
const BANNER_FONT: f32 = 48.0;

/// Draws the scene back to front: grid, placement preview, towers, enemies,
/// projectiles, explosions and finally the HUD.
pub fn render<S>(scene: &Scene, surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    draw_grid(scene, surface);
    draw_preview(scene, surface);
    for tower in &scene.towers {
        draw_tower(tower, scene.debug, surface);
    }
    draw_enemies(scene, surface);
    for projectile in &scene.projectiles {
        surface.fill_circle(projectile.center, projectile.size * 0.5, projectile.color);
    }
    draw_explosions(scene, surface);
    draw_hud(scene, surface);
}

fn draw_grid<S>(scene: &Scene, surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    let grid = &scene.grid;
    let size = Vec2::splat(grid.tile_size);
    for (top_left, kind) in grid.cells() {
        let (sprite, fallback) = match kind {
            CellKind::Path => (Some(SpriteKey::Path), PATH_COLOR),
            CellKind::Blocked => (None, BLOCKED_COLOR),
            CellKind::Empty | CellKind::Tower => (Some(SpriteKey::Ground), GROUND_COLOR),
        };
        let drawn = sprite.is_some_and(|sprite| surface.blit(sprite, top_left, size, 0.0));
        if !drawn {
            surface.fill_rect(top_left, size, fallback);
        }
        surface.stroke_rect(top_left, size, 1.0, grid.line_color);
    }
}

fn draw_preview<S>(scene: &Scene, surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    let Some(preview) = scene.preview else {
        return;
    };
    let size = Vec2::splat(preview.size);
    let (fill, outline) = if preview.valid {
        (VALID_PREVIEW, VALID_PREVIEW.with_alpha(1.0))
    } else {
        (INVALID_PREVIEW, INVALID_PREVIEW.with_alpha(1.0))
    };
    surface.fill_rect(preview.top_left, size, fill);
    surface.stroke_rect(preview.top_left, size, 2.0, outline);
    if preview.valid && preview.range > 0.0 {
        let center = preview.top_left + size * 0.5;
        surface.stroke_circle(center, preview.range, 1.0, RANGE_COLOR);
    }
}

fn draw_tower<S>(tower: &TowerPresentation, debug: bool, surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    let size = Vec2::splat(tower.size);
    if !surface.blit(SpriteKey::Tower(tower.kind), tower.top_left, size, 0.0) {
        surface.fill_rect(tower.top_left, size, tower.color);
        surface.stroke_rect(tower.top_left, size, 3.0, tower.barrel_color);
    }

    let center = tower.center();
    let heading = Vec2::from_angle(tower.angle);
    surface.line(
        center,
        center + heading * BARREL_LENGTH,
        BARREL_THICKNESS,
        tower.barrel_color,
    );

    if let Some(radius) = tower.slow_range {
        surface.stroke_circle(center, radius, 2.0, SLOW_RANGE_COLOR);
    }
    if debug {
        if let Some(radius) = tower.range {
            surface.stroke_circle(center, radius, 1.0, RANGE_COLOR);
        }
    }
}

fn draw_enemies<S>(scene: &Scene, surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    for enemy in &scene.enemies {
        let top_left = enemy.center - enemy.size * 0.5;
        if !surface.blit(SpriteKey::Enemy, top_left, enemy.size, 0.0) {
            surface.fill_rect(top_left, enemy.size, enemy.color);
        }
        let outline = if enemy.poisoned {
            POISON_OUTLINE
        } else if enemy.slowed {
            SLOW_OUTLINE
        } else {
            ENEMY_OUTLINE
        };
        surface.stroke_rect(top_left, enemy.size, 2.0, outline);

        let bar = Vec2::new(top_left.x, top_left.y - HEALTH_BAR_GAP);
        surface.fill_rect(bar, Vec2::new(enemy.size.x, HEALTH_BAR_HEIGHT), HEALTH_BACKGROUND);
        surface.fill_rect(
            bar,
            Vec2::new(enemy.size.x * enemy.health, HEALTH_BAR_HEIGHT),
            HEALTH_FOREGROUND,
        );
    }
}

fn draw_explosions<S>(scene: &Scene, surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    for explosion in &scene.explosions {
        let fade = 1.0 - explosion.progress;
        let radius = explosion.radius * (1.0 + explosion.progress * 0.5);
        surface.fill_circle(
            explosion.center,
            radius,
            EXPLOSION_FILL.with_alpha(fade * 0.5),
        );
        surface.stroke_circle(explosion.center, radius, 3.0, EXPLOSION_RING.with_alpha(fade));
    }
}

fn draw_hud<S>(scene: &Scene, surface: &mut S)
where
    S: DrawSurface + ?Sized,
{
    for (index, line) in scene.hud.lines().iter().enumerate() {
        let y = HUD_LINE * (index as f32 + 1.0);
        surface.text(line, Vec2::new(10.0, y), HUD_FONT, TEXT_COLOR);
    }
    if let Some(banner) = scene.hud.banner() {
        let center = Vec2::new(scene.grid.width(), scene.grid.height()) * 0.5;
        let offset = banner.len() as f32 * BANNER_FONT * 0.25;
        surface.text(
            banner,
            Vec2::new(center.x - offset, center.y),
            BANNER_FONT,
            TEXT_COLOR,
        );
    }
}

/// Single primitive captured by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// See [`DrawSurface::fill_rect`].
    FillRect {
        /// Top-left corner.
        top_left: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill colour.
        color: Color,
    },
    /// See [`DrawSurface::stroke_rect`].
    StrokeRect {
        /// Top-left corner.
        top_left: Vec2,
        /// Width and height.
        size: Vec2,
        /// Outline colour.
        color: Color,
    },
    /// See [`DrawSurface::fill_circle`].
    FillCircle {
        /// Centre.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill colour.
        color: Color,
    },
    /// See [`DrawSurface::stroke_circle`].
    StrokeCircle {
        /// Centre.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Outline colour.
        color: Color,
    },
    /// See [`DrawSurface::line`].
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Line colour.
        color: Color,
    },
    /// See [`DrawSurface::text`].
    Text {
        /// Rendered string.
        text: String,
        /// Baseline start.
        position: Vec2,
    },
    /// See [`DrawSurface::blit`].
    Blit {
        /// Requested asset.
        sprite: SpriteKey,
        /// Top-left corner.
        top_left: Vec2,
    },
}

/// Surface that records every call, for tests and headless inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
    sprites: Vec<SpriteKey>,
}

impl RecordingSurface {
    /// Creates a surface without any sprite assets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface that reports the provided sprites as available.
    #[must_use]
    pub fn with_sprites(sprites: Vec<SpriteKey>) -> Self {
        Self {
            calls: Vec::new(),
            sprites,
        }
    }

    /// Calls in the order they were issued.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Strings drawn through [`DrawSurface::text`].
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&mut self, top_left: Vec2, size: Vec2, color: Color) {
        self.calls.push(DrawCall::FillRect {
            top_left,
            size,
            color,
        });
    }

    fn stroke_rect(&mut self, top_left: Vec2, size: Vec2, _thickness: f32, color: Color) {
        self.calls.push(DrawCall::StrokeRect {
            top_left,
            size,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.calls.push(DrawCall::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, _thickness: f32, color: Color) {
        self.calls.push(DrawCall::StrokeCircle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, _thickness: f32, color: Color) {
        self.calls.push(DrawCall::Line { from, to, color });
    }

    fn text(&mut self, text: &str, position: Vec2, _size: f32, _color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            position,
        });
    }

    fn blit(&mut self, sprite: SpriteKey, top_left: Vec2, _size: Vec2, _rotation: f32) -> bool {
        if !self.sprites.contains(&sprite) {
            return false;
        }
        self.calls.push(DrawCall::Blit { sprite, top_left });
        true
    }
}
