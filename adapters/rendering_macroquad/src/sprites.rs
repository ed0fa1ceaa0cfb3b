use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use balloon_defence_rendering::{resolve_sprite_entries, SpriteKey};
use macroquad::{
    text::{load_ttf_font_from_bytes, Font},
    texture::Texture2D,
};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Textures and the font named by the asset manifest.
pub(crate) struct GameAssets {
    atlas: SpriteAtlas,
    font: Font,
}

impl GameAssets {
    /// Loads every asset listed in the manifest at `path`.
    ///
    /// Paths inside the manifest are resolved relative to its directory. Any
    /// missing or unreadable file aborts loading.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read asset manifest at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let manifest = parse_manifest(&contents, &base)?;

        let atlas = SpriteAtlas::from_entries(manifest.sprites, &mut load_texture)?;
        let font = load_font(&manifest.font)
            .with_context(|| format!("failed to load font from {}", manifest.font.display()))?;
        tracing::info!(
            sprites = atlas.texture_count(),
            manifest = %path.display(),
            "assets loaded"
        );

        Ok(Self { atlas, font })
    }

    pub(crate) fn atlas(&self) -> &SpriteAtlas {
        &self.atlas
    }

    pub(crate) fn font(&self) -> Font {
        self.font.clone()
    }
}

/// Cache of textures keyed by sprite.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Retrieves the texture associated with the provided key.
    pub(crate) fn texture(&self, key: SpriteKey) -> Result<Texture2D> {
        self.textures
            .get(&key)
            .copied()
            .with_context(|| format!("sprite {key:?} missing from atlas"))
    }

    fn texture_count(&self) -> usize {
        self.textures.len()
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

fn load_texture(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    let image = decode_rgba(&bytes)?;
    Ok(Texture2D::from_rgba8(image.width, image.height, &image.pixels))
}

/// RGBA8 pixels ready for upload.
#[derive(Debug, PartialEq)]
struct DecodedImage {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

/// Decodes image bytes without touching the GPU.
///
/// Macroquad 0.3 panics on undecodable data; corrupt files must come back
/// as errors instead.
fn decode_rgba(bytes: &[u8]) -> Result<DecodedImage> {
    let rgba = image::load_from_memory(bytes)
        .context("failed to decode image data")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let width = u16::try_from(width).context("image wider than 65535 pixels")?;
    let height = u16::try_from(height).context("image taller than 65535 pixels")?;
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

fn load_font(path: &Path) -> Result<Font> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read font asset at {}", path.display()))?;
    load_ttf_font_from_bytes(&bytes).map_err(|error| anyhow!("invalid font data: {error:?}"))
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    font: String,
    sprites: HashMap<String, String>,
}

#[derive(Debug, PartialEq)]
struct ResolvedManifest {
    sprites: Vec<(SpriteKey, PathBuf)>,
    font: PathBuf,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<ResolvedManifest> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let entries = manifest
        .sprites
        .into_iter()
        .map(|(name, relative)| (name, base_path.join(relative)));
    let sprites = resolve_sprite_entries(entries).context("invalid sprite table")?;

    Ok(ResolvedManifest {
        sprites,
        font: base_path.join(manifest.font),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const FULL_MANIFEST: &str = r#"
        version = 1
        font = "fonts/Jersey25-Regular.ttf"

        [sprites]
        flower_third = "sprites/flowerthird.png"
        flower_second = "sprites/flowersecond.png"
        flower_first = "sprites/flowerfirst.png"
        tree = "sprites/tree.png"
        rock = "sprites/rock.png"
        bird = "sprites/bird.png"
        tumbleweed = "sprites/tumbleweed.png"
        base = "sprites/base.png"
        tower = "sprites/tower.png"
        enemy = "sprites/balloon.png"
        map = "sprites/map.png"
    "#;

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let parsed = parse_manifest(FULL_MANIFEST, Path::new("root")).expect("manifest parses");

        assert_eq!(parsed.font, PathBuf::from("root/fonts/Jersey25-Regular.ttf"));
        assert_eq!(parsed.sprites.len(), SpriteKey::ALL.len());
        assert_eq!(
            parsed.sprites[0],
            (SpriteKey::Map, PathBuf::from("root/sprites/map.png"))
        );
        assert_eq!(
            parsed.sprites[1],
            (SpriteKey::Enemy, PathBuf::from("root/sprites/balloon.png"))
        );
    }

    #[test]
    fn bundled_manifest_lists_every_sprite() {
        let parsed = parse_manifest(include_str!("../../../assets/manifest.toml"), Path::new("assets"))
            .expect("bundled manifest parses");
        assert_eq!(parsed.sprites.len(), SpriteKey::ALL.len());
        assert_eq!(parsed.font, PathBuf::from("assets/fonts/Jersey25-Regular.ttf"));
    }

    #[test]
    fn manifest_requires_every_sprite() {
        let manifest = FULL_MANIFEST.replace("tree = \"sprites/tree.png\"", "");
        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_rejects_unknown_sprites() {
        let manifest = format!("{FULL_MANIFEST}        music = \"GameMusic.wav\"\n");
        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_requires_font_and_version() {
        let manifest = FULL_MANIFEST.replace("font = \"fonts/Jersey25-Regular.ttf\"", "");
        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());

        let manifest = FULL_MANIFEST.replace("version = 1", "version = 2");
        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn atlas_loads_textures_in_canonical_order() {
        let parsed = parse_manifest(FULL_MANIFEST, Path::new("assets")).expect("manifest parses");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(parsed.sprites, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas loads with stub loader");

        assert_eq!(load_order.borrow().as_slice(), &SpriteKey::ALL);
        assert_eq!(atlas.texture_count(), SpriteKey::ALL.len());
        assert!(atlas.texture(SpriteKey::Bird).is_ok());
    }

    #[test]
    fn corrupt_image_bytes_are_an_error() {
        let error = decode_rgba(b"not a png").expect_err("garbage does not decode");
        assert!(format!("{error:#}").contains("failed to decode image data"));
    }

    #[test]
    fn png_bytes_decode_to_rgba() {
        let mut encoded = std::io::Cursor::new(Vec::new());
        let pixels = image::RgbaImage::from_pixel(2, 1, image::Rgba([255, 0, 0, 255]));
        image::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut encoded, image::ImageOutputFormat::Png)
            .expect("png encodes");

        let decoded = decode_rgba(encoded.get_ref()).expect("png decodes");
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 1);
        assert_eq!(decoded.pixels, vec![255, 0, 0, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn atlas_surfaces_loader_failures() {
        let entries = vec![(SpriteKey::Map, PathBuf::from("missing.png"))];
        let error = SpriteAtlas::from_entries(entries, &mut |_, path| {
            bail!("no such file: {}", path.display())
        })
        .expect_err("loader failure propagates");

        assert!(format!("{error:#}").contains("missing.png"));
    }
}
