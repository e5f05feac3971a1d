//! Asset registry: fonts, text presets, preset backgrounds and decoded
//! images, built from configuration and refreshed on demand.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use carda_core::hash::{self, ContentHash};
use carda_core::notice::{self, Notice};
use carda_core::{AssetsConfig, CardaConfig, CardaResult, FrameBuffer};
use dashmap::DashMap;

use crate::image_loader;
use crate::presets::PresetRegistry;
use crate::text::TextRenderer;

/// Families offered when local fonts cannot be enumerated.
pub const FALLBACK_FONT_FAMILIES: [&str; 26] = [
    "Arial",
    "Helvetica",
    "Inter",
    "Verdana",
    "Tahoma",
    "Trebuchet MS",
    "Geneva",
    "Segoe UI",
    "Roboto",
    "Open Sans",
    "Times New Roman",
    "Georgia",
    "Garamond",
    "Palatino Linotype",
    "Impact",
    "Arial Black",
    "Courier New",
    "Lucida Console",
    "Comic Sans MS",
    "Brush Script MT",
    "Copperplate",
    "Papyrus",
    "system-ui",
    "monospace",
    "serif",
    "sans-serif",
];

/// File extensions listed as preset backgrounds.
pub const BACKGROUND_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "svg"];

/// Which preset background collection to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSet {
    General,
    Nations,
}

/// Well-known system font directories that exist on this machine.
pub fn system_font_dirs() -> Vec<PathBuf> {
    [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
        "C:\\Windows\\Fonts",
    ]
    .iter()
    .map(PathBuf::from)
    .filter(|p| p.is_dir())
    .collect()
}

fn list_backgrounds(dir: Option<&Path>) -> Vec<PathBuf> {
    let Some(dir) = dir else {
        return Vec::new();
    };
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Background presets not available in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| {
                    BACKGROUND_EXTENSIONS
                        .iter()
                        .any(|ext| e.eq_ignore_ascii_case(ext))
                })
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    paths
}

/// Decoded images kept before the least recently used one is dropped.
pub const MAX_CACHED_IMAGES: usize = 32;

struct CachedImage {
    frame: Arc<FrameBuffer>,
    last_used: AtomicU64,
}

/// Fonts, presets and images shared by every render.
pub struct AssetRegistry {
    config: AssetsConfig,
    text: TextRenderer,
    presets: PresetRegistry,
    image_cache: DashMap<ContentHash, CachedImage>,
    cache_clock: AtomicU64,
    general_backgrounds: Vec<PathBuf>,
    nation_backgrounds: Vec<PathBuf>,
    local_fonts: bool,
    fonts_notice_sent: bool,
    base_dir: Option<PathBuf>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry {
    /// An empty registry: built-in presets, no fonts, no backgrounds.
    pub fn new() -> Self {
        Self {
            config: AssetsConfig::default(),
            text: TextRenderer::new(),
            presets: PresetRegistry::new(),
            image_cache: DashMap::new(),
            cache_clock: AtomicU64::new(0),
            general_backgrounds: Vec::new(),
            nation_backgrounds: Vec::new(),
            local_fonts: false,
            fonts_notice_sent: false,
            base_dir: None,
        }
    }

    /// A registry for `config`. Nothing is loaded until [`refresh`](Self::refresh).
    pub fn from_config(config: &CardaConfig) -> Self {
        let mut registry = Self::new();
        registry.config = config.assets.clone();
        registry
            .text
            .set_default_family(config.render.default_font.clone());
        registry
    }

    /// Directory relative image sources are resolved against.
    pub fn set_base_dir(&mut self, dir: Option<PathBuf>) {
        self.base_dir = dir;
    }

    /// Rescan fonts, presets and backgrounds. Degraded resources produce
    /// notices; the font notice is raised only the first time local fonts
    /// turn out to be unavailable.
    pub fn refresh(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();

        self.text.clear();
        let mut loaded = 0;
        let mut readable = false;
        for dir in &self.config.font_dirs {
            match self.text.load_dir(dir) {
                Ok(n) => {
                    readable = true;
                    loaded += n;
                }
                Err(e) => tracing::warn!("Font directory unavailable: {}", e),
            }
        }
        self.local_fonts = readable && loaded > 0;
        if self.local_fonts {
            tracing::info!("Loaded {} font faces", loaded);
        } else if !self.fonts_notice_sent {
            self.fonts_notice_sent = true;
            notices.push(Notice::new(
                notice::LOCAL_FONTS_BLOCKED,
                "no readable font directory; using the built-in family list",
            ));
        }

        self.presets = PresetRegistry::new();
        if let Some(path) = self.config.text_presets.clone() {
            if let Err(e) = self.presets.load_json_file(&path) {
                tracing::warn!("Text presets not loaded: {}", e);
                notices.push(Notice::new(notice::OPERATION_FAILED, e.to_string()));
            }
        }

        self.general_backgrounds = list_backgrounds(self.config.general_backgrounds.as_deref());
        self.nation_backgrounds = list_backgrounds(self.config.nation_backgrounds.as_deref());
        tracing::debug!(
            "Preset backgrounds: {} general, {} nations",
            self.general_backgrounds.len(),
            self.nation_backgrounds.len()
        );
        notices
    }

    /// Whether fonts were enumerated from disk on the last refresh.
    pub fn local_fonts_available(&self) -> bool {
        self.local_fonts
    }

    /// Families to offer in a font picker.
    pub fn font_families(&self) -> Vec<String> {
        if self.local_fonts {
            self.text.families()
        } else {
            FALLBACK_FONT_FAMILIES.iter().map(|s| s.to_string()).collect()
        }
    }

    pub fn text(&self) -> &TextRenderer {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextRenderer {
        &mut self.text
    }

    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    pub fn presets_mut(&mut self) -> &mut PresetRegistry {
        &mut self.presets
    }

    pub fn backgrounds(&self, set: BackgroundSet) -> &[PathBuf] {
        match set {
            BackgroundSet::General => &self.general_backgrounds,
            BackgroundSet::Nations => &self.nation_backgrounds,
        }
    }

    /// Decode an image source, reusing earlier decodes of the same string.
    /// At most [`MAX_CACHED_IMAGES`] decodes are kept.
    pub fn image(&self, src: &str) -> CardaResult<Arc<FrameBuffer>> {
        let key = hash::hash_bytes(src.as_bytes());
        let tick = self.cache_clock.fetch_add(1, Ordering::Relaxed);
        if let Some(cached) = self.image_cache.get(&key) {
            cached.last_used.store(tick, Ordering::Relaxed);
            return Ok(cached.frame.clone());
        }
        let frame = Arc::new(image_loader::load_source(src, self.base_dir.as_deref())?);
        tracing::debug!("Decoded image {}x{} ({})", frame.width, frame.height, key);
        while self.image_cache.len() >= MAX_CACHED_IMAGES {
            let oldest = self
                .image_cache
                .iter()
                .min_by_key(|e| e.value().last_used.load(Ordering::Relaxed))
                .map(|e| *e.key());
            match oldest {
                Some(old) => {
                    self.image_cache.remove(&old);
                }
                None => break,
            }
        }
        self.image_cache.insert(
            key,
            CachedImage {
                frame: frame.clone(),
                last_used: AtomicU64::new(tick),
            },
        );
        Ok(frame)
    }

    pub fn cached_images(&self) -> usize {
        self.image_cache.len()
    }

    pub fn clear_image_cache(&self) {
        self.image_cache.clear();
    }
}
