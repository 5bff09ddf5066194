//! Configuration system
//!
//! [`VisualizerConfig`] is the runtime surface the host UI mutates and the
//! visualizer reads every frame. Any type implementing [`Config`] can be
//! loaded from or saved to `.toml` and `.ron` files.

use std::fmt;
use std::path::Path;

pub use serde::{Serialize, Deserialize};

use crate::render::primitives::PrimitiveSettings;

/// Lowest alpha the overlay accepts; fully transparent shapes are useless
pub const MIN_ALPHA: f32 = 0.01;

/// Highest alpha the overlay accepts
pub const MAX_ALPHA: f32 = 1.0;

/// Clamp `alpha` to `[MIN_ALPHA, MAX_ALPHA]`; NaN becomes fully opaque
pub fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        MAX_ALPHA
    } else {
        alpha.clamp(MIN_ALPHA, MAX_ALPHA)
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Which colliders pass the trigger filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerFilter {
    /// Show triggers and solid colliders
    #[default]
    All,
    /// Hide trigger volumes
    NoTriggers,
    /// Show trigger volumes only
    OnlyTriggers,
}

impl TriggerFilter {
    /// Next filter in the `All -> NoTriggers -> OnlyTriggers -> All` cycle
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::NoTriggers,
            Self::NoTriggers => Self::OnlyTriggers,
            Self::OnlyTriggers => Self::All,
        }
    }

    /// Whether a collider with the given trigger flag passes
    pub fn admits(self, is_trigger: bool) -> bool {
        match self {
            Self::All => true,
            Self::NoTriggers => !is_trigger,
            Self::OnlyTriggers => is_trigger,
        }
    }
}

impl fmt::Display for TriggerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::All => "All",
            Self::NoTriggers => "NoTriggers",
            Self::OnlyTriggers => "OnlyTriggers",
        };
        f.write_str(label)
    }
}

/// # Visualizer Configuration
///
/// Everything the per-frame poll reads. The host owns one instance, mutates
/// it from its UI and passes it to
/// [`CollisionVisualizer::poll`](crate::debug::CollisionVisualizer::poll)
/// each frame.
///
/// Missing fields in a config file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Master visibility toggle
    ///
    /// Defaults to `true`, so a default config draws from the first frame.
    /// Hosts that want the overlay hidden until toggled set it to `false`.
    pub visible: bool,
    /// Global alpha shared by every shape material, in `[0.01, 1.0]`
    pub alpha: f32,
    /// Trigger-volume filter
    pub trigger_filter: TriggerFilter,
    /// Record name labels for the text overlay
    pub show_names: bool,
    /// Radius of the per-frame overlap query around the observer
    pub query_radius: f32,
    /// Seconds an adapted mesh stays alive after creation
    pub mesh_release_delay: f32,
    /// Render layer every debug draw is submitted on
    pub render_layer: u32,
    /// Shader asset name materials are created with
    pub shader: String,
    /// Maximum cached heightfield meshes; `None` never evicts
    pub heightfield_cache_capacity: Option<usize>,
    /// Canonical mesh resolutions
    pub primitives: PrimitiveSettings,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            visible: true,
            alpha: 0.3,
            trigger_filter: TriggerFilter::All,
            show_names: false,
            query_radius: 100.0,
            mesh_release_delay: 0.5,
            render_layer: 31,
            shader: "Wireframe".to_string(),
            heightfield_cache_capacity: None,
            primitives: PrimitiveSettings::default(),
        }
    }
}

impl Config for VisualizerConfig {}

impl VisualizerConfig {
    /// Set the global alpha, clamped to `[MIN_ALPHA, MAX_ALPHA]`
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = clamp_alpha(alpha);
    }

    /// Advance the trigger filter and return the new value
    pub fn cycle_trigger_filter(&mut self) -> TriggerFilter {
        self.trigger_filter = self.trigger_filter.next();
        self.trigger_filter
    }

    /// Flip the name overlay and return the new value
    pub fn toggle_names(&mut self) -> bool {
        self.show_names = !self.show_names;
        self.show_names
    }

    /// Flip the master visibility and return the new value
    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Set canonical mesh resolutions
    pub fn with_primitives(mut self, primitives: PrimitiveSettings) -> Self {
        self.primitives = primitives;
        self
    }

    /// Bound the heightfield cache
    pub fn with_heightfield_cache_capacity(mut self, capacity: usize) -> Self {
        self.heightfield_cache_capacity = Some(capacity);
        self
    }
}
