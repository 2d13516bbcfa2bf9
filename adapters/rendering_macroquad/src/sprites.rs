//! Texture cache backed by the sprite manifest.
//!
//! Sprites are optional. Manifest entries whose files cannot be loaded are
//! skipped with a warning and the renderer draws primitives for them instead.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use battle_city_rendering::{Color, Rect, RenderingError, SpriteKey};
use macroquad::{
    math::{Rect as MacroquadRect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, Texture2D},
};
use tracing::warn;

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawParams {
    /// Destination rectangle in screen-space pixels.
    pub target: Rect,
    /// Horizontal sheet frame to sample as `(index, frame_count)`.
    pub frame: Option<(u32, u32)>,
    /// Tint applied to the sprite.
    pub tint: Color,
}

impl DrawParams {
    /// Creates draw parameters covering `target` with the whole texture.
    #[must_use]
    pub fn new(target: Rect) -> Self {
        Self {
            target,
            frame: None,
            tint: Color::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Samples frame `index` out of `count` equally wide frames.
    #[must_use]
    pub fn with_frame(mut self, index: u32, count: u32) -> Self {
        self.frame = Some((index, count));
        self
    }

    /// Overrides the tint colour used when drawing the sprite.
    #[must_use]
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Source rectangle in texels for `frame` of a horizontal sheet.
fn sheet_source(texture_width: f32, texture_height: f32, frame: (u32, u32)) -> MacroquadRect {
    let (index, count) = frame;
    let frame_width = texture_width / count.max(1) as f32;
    MacroquadRect::new(frame_width * index as f32, 0.0, frame_width, texture_height)
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug, Default)]
pub struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads the default sprite manifest from disk.
    pub fn from_default_manifest() -> Result<Self> {
        Self::from_manifest_path(Self::default_manifest_path())
    }

    /// Loads sprites from the manifest located at the provided path.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Draws the requested sprite, returning `false` when the atlas lacks it.
    pub fn draw(&self, key: SpriteKey, params: DrawParams) -> bool {
        let Some(texture) = self.texture(key) else {
            return false;
        };

        let source = params
            .frame
            .map(|frame| sheet_source(texture.width(), texture.height(), frame));
        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(params.target.size.x, params.target.size.y)),
            source,
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            params.target.origin.x,
            params.target.origin.y,
            to_macroquad_color(params.tint),
            draw_params,
        );
        true
    }

    /// Returns whether the atlas contains the provided key.
    #[must_use]
    pub fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Returns the number of textures stored in the atlas.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Retrieves the texture associated with the provided key.
    #[must_use]
    pub fn texture(&self, key: SpriteKey) -> Option<Texture2D> {
        self.textures.get(&key).copied()
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
        Ok(Self::from_entries(entries, &mut loader))
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Self {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            match loader(key, &path) {
                Ok(texture) => {
                    let _ = textures.insert(key, texture);
                }
                Err(error) => warn!(
                    sprite = key.name(),
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "sprite unavailable, drawing primitives instead"
                ),
            }
        }
        Self { textures }
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
        return Err(RenderingError::UnsupportedManifestVersion {
            found: manifest.version,
            expected: SUPPORTED_MANIFEST_VERSION,
        }
        .into());
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key: SpriteKey = name.parse()?;
        let path = base_path.join(relative_path);
        if resolved.insert(key, path).is_some() {
            bail!("sprite manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}
