#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for tower defence adapters.
//!
//! Backends receive a [`Scene`] built from a simulation snapshot and draw it
//! through the [`DrawSurface`] primitives with [`render`].

mod scene;
mod surface;

use std::time::Duration;

use anyhow::Result as AnyResult;
use tower_defence_core::{FrameInput, Rgb};

pub use scene::{
    to_vec2, EnemyPresentation, ExplosionPresentation, GridPresentation, Hud,
    PreviewPresentation, ProjectilePresentation, Scene, TowerPresentation,
};
pub use surface::{render, DrawCall, DrawSurface, RecordingSurface, SpriteKey};

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

    /// Creates an opaque color from a catalogue colour.
    #[must_use]
    pub const fn from_rgb(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red, rgb.green, rgb.blue)
    }

    /// Returns the same color with its alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
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
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Descriptor of the window a backend opens.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Background used behind the play area.
    pub const DEFAULT_CLEAR_COLOR: Color = Color::from_rgb_u8(26, 26, 26);

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
        }
    }
}

/// Rendering backend capable of presenting tower defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and replaces the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_colors_are_normalised() {
        let color = Color::from_rgb(Rgb::new(255, 0, 51));
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn lighten_moves_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.4).lighten(0.5);
        assert_eq!(color, Color::new(0.5, 0.75, 1.0, 0.4));
        assert_eq!(Color::new(0.2, 0.2, 0.2, 1.0).lighten(3.0).red, 1.0);
    }

    #[test]
    fn with_alpha_keeps_channels() {
        let color = Color::from_rgb_u8(255, 165, 0).with_alpha(0.5);
        assert_eq!(color.red, 1.0);
        assert_eq!(color.alpha, 0.5);
    }
}
