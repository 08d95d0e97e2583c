use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use tower_defence_core::TowerTypeId;
use tower_defence_rendering::SpriteKey;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Cache of textures loaded from a sprite manifest.
///
/// Manifests may list any subset of the known sprites; the renderer draws
/// primitives for the rest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Draws the sprite stretched over the destination rectangle, rotated
    /// around its centre.
    pub(crate) fn draw(
        &self,
        key: SpriteKey,
        position: MacroquadVec2,
        size: MacroquadVec2,
        rotation: f32,
    ) -> bool {
        let Some(texture) = self.textures.get(&key).copied() else {
            return false;
        };
        let params = DrawTextureParams {
            dest_size: Some(size),
            rotation,
            pivot: Some(position + size * 0.5),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(
            texture,
            position.x,
            position.y,
            macroquad::color::WHITE,
            params,
        );
        true
    }

    /// Number of textures stored in the atlas.
    #[cfg(test)]
    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut entries = Vec::with_capacity(manifest.sprites.len());
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)
            .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
        entries.push((key, base_path.join(relative_path)));
    }
    entries.sort_by_key(|(key, _)| sort_rank(*key));
    Ok(entries)
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match name {
        "ground" => Ok(SpriteKey::Ground),
        "path" => Ok(SpriteKey::Path),
        "enemy" => Ok(SpriteKey::Enemy),
        _ => {
            let Some(kind) = name.strip_prefix("tower.") else {
                bail!("unknown sprite key `{name}`");
            };
            let kind: TowerTypeId = kind
                .parse()
                .with_context(|| format!("unknown tower sprite `{name}`"))?;
            Ok(SpriteKey::Tower(kind))
        }
    }
}

fn sort_rank(key: SpriteKey) -> u8 {
    match key {
        SpriteKey::Ground => 0,
        SpriteKey::Path => 1,
        SpriteKey::Tower(kind) => 1 + kind.hotkey(),
        SpriteKey::Enemy => 10,
    }
}
