//! Sprite atlas loading
//!
//! Reads a TexturePacker "hash" manifest (`spritesData.json`) and the atlas
//! image it names. Frames are looked up by their source filename, e.g.
//! `"birdUp.png"`.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Failure while loading or querying the sprite atlas
#[derive(Debug)]
pub enum AssetError {
    /// The file could not be read or fetched
    Fetch { path: String, reason: String },
    /// The manifest is not valid atlas JSON
    Manifest(serde_json::Error),
    /// The atlas image could not be decoded
    Image(image::ImageError),
    /// A frame the renderer needs is not in the manifest
    MissingFrame(String),
    /// A frame rectangle extends past the atlas image
    FrameOutOfBounds { name: String, image_size: (u32, u32) },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { path, reason } => write!(f, "failed to load {}: {}", path, reason),
            Self::Manifest(e) => write!(f, "invalid atlas manifest: {}", e),
            Self::Image(e) => write!(f, "invalid atlas image: {}", e),
            Self::MissingFrame(name) => write!(f, "atlas has no frame named {:?}", name),
            Self::FrameOutOfBounds { name, image_size } => write!(
                f,
                "frame {:?} lies outside the {}x{} atlas image",
                name, image_size.0, image_size.1
            ),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Manifest(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Manifest(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

// Manifest layout (only the fields we use; the rest is ignored)

#[derive(Debug, Deserialize)]
struct Manifest {
    frames: HashMap<String, ManifestFrame>,
    meta: ManifestMeta,
}

#[derive(Debug, Deserialize)]
struct ManifestFrame {
    frame: ManifestRect,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ManifestRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Debug, Deserialize)]
struct ManifestMeta {
    image: String,
}

/// One sub-image of the atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Size in texels
    pub width: f32,
    pub height: f32,
    /// Normalized texture rect: [u, v, du, dv]
    pub uv: [f32; 4],
}

/// Decoded atlas image plus its named frames
pub struct SpriteAtlas {
    frames: HashMap<String, Frame>,
    image: image::RgbaImage,
}

impl SpriteAtlas {
    /// Build an atlas from the manifest JSON and the encoded (PNG) atlas image
    pub fn from_bytes(manifest_json: &[u8], image_bytes: &[u8]) -> Result<Self, AssetError> {
        let manifest: Manifest = serde_json::from_slice(manifest_json)?;
        Self::from_manifest(manifest, image_bytes)
    }

    fn from_manifest(manifest: Manifest, image_bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory_with_format(image_bytes, image::ImageFormat::Png)?
            .to_rgba8();
        let (img_w, img_h) = image.dimensions();

        let mut frames = HashMap::with_capacity(manifest.frames.len());
        for (name, entry) in manifest.frames {
            let r = entry.frame;
            if r.x.saturating_add(r.w) > img_w || r.y.saturating_add(r.h) > img_h {
                return Err(AssetError::FrameOutOfBounds {
                    name,
                    image_size: (img_w, img_h),
                });
            }
            let frame = Frame {
                width: r.w as f32,
                height: r.h as f32,
                uv: [
                    r.x as f32 / img_w as f32,
                    r.y as f32 / img_h as f32,
                    r.w as f32 / img_w as f32,
                    r.h as f32 / img_h as f32,
                ],
            };
            frames.insert(name, frame);
        }

        log::info!(
            "Sprite atlas ready: {} frames, {}x{} image",
            frames.len(),
            img_w,
            img_h
        );

        Ok(Self { frames, image })
    }

    /// Look up a frame by its source filename
    pub fn frame(&self, name: &str) -> Result<Frame, AssetError> {
        self.frames
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::MissingFrame(name.to_string()))
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw RGBA8 pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Fetch the manifest, then the image it references (relative to the manifest)
pub async fn load_atlas(manifest_path: &str) -> Result<SpriteAtlas, AssetError> {
    log::info!("Loading sprite atlas from {}", manifest_path);

    let manifest_bytes = fetch_bytes(manifest_path).await?;
    let manifest: Manifest = serde_json::from_slice(&manifest_bytes)?;

    let image_path = resolve_relative(manifest_path, &manifest.meta.image);
    let image_bytes = fetch_bytes(&image_path).await?;

    SpriteAtlas::from_manifest(manifest, &image_bytes)
}

/// Resolve `name` against the directory part of `base` (works for URLs and paths)
fn resolve_relative(base: &str, name: &str) -> String {
    match base.rfind('/') {
        Some(i) => format!("{}/{}", &base[..i], name),
        None => name.to_string(),
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(path: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fail = |reason: String| AssetError::Fetch {
        path: path.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| fail("fetch did not return a Response".to_string()))?;
    if !response.ok() {
        return Err(fail(format!("HTTP {}", response.status())));
    }

    let body = response.array_buffer().map_err(|e| fail(format!("{:?}", e)))?;
    let buffer = JsFuture::from(body)
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_bytes(path: &str) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|e| AssetError::Fetch {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
