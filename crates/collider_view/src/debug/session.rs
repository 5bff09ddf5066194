//! Host-facing debug session
//!
//! Owns the configuration and the visualizer, turns UI input into config
//! changes and handles frames where the host has no observer to query from.

use std::path::Path;

use log::{info, warn};

use crate::config::{Config, ConfigError, TriggerFilter, VisualizerConfig};
use crate::foundation::math::Vec3;
use crate::render::draw_queue::DebugRenderer;
use crate::spatial::CollisionWorld;

use super::collision_debug::{CollisionVisualizer, FrameStats, NameLabel};

/// Input events from the host's debug UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugInput {
    /// Show or hide every collider
    ToggleVisible,
    /// Advance `All -> NoTriggers -> OnlyTriggers -> All`
    CycleTriggerFilter,
    /// Show or hide name labels
    ToggleNames,
    /// Set the global alpha; clamped to `[0.01, 1.0]`
    SetAlpha(f32),
}

/// Configuration plus visualizer, driven once per frame by the host
#[derive(Debug)]
pub struct DebugSession {
    config: VisualizerConfig,
    visualizer: CollisionVisualizer,
    observer_missing: bool,
}

impl DebugSession {
    /// Create a session around `config`
    pub fn new(config: VisualizerConfig) -> Self {
        let visualizer = CollisionVisualizer::new(&config);
        Self {
            config,
            visualizer,
            observer_missing: false,
        }
    }

    /// Create a session from a `.toml` or `.ron` config file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = VisualizerConfig::load_from_file(path)?;
        let alpha = config.alpha;
        config.set_alpha(alpha);
        Ok(Self::new(config))
    }

    /// Apply one UI input
    pub fn handle_input(&mut self, input: DebugInput) {
        match input {
            DebugInput::ToggleVisible => {
                let visible = self.config.toggle_visible();
                info!("Collider visualization {}", if visible { "shown" } else { "hidden" });
            }
            DebugInput::CycleTriggerFilter => {
                let filter: TriggerFilter = self.config.cycle_trigger_filter();
                info!("Trigger filter: {}", filter);
            }
            DebugInput::ToggleNames => {
                let names = self.config.toggle_names();
                info!("Collider names {}", if names { "shown" } else { "hidden" });
            }
            DebugInput::SetAlpha(alpha) => self.config.set_alpha(alpha),
        }
    }

    /// Visualize one frame
    ///
    /// Returns `None` when there is no observer; the frame is skipped.
    pub fn update<W, R>(
        &mut self,
        observer: Option<Vec3>,
        world: &W,
        renderer: &mut R,
        now: f32,
    ) -> Option<FrameStats>
    where
        W: CollisionWorld + ?Sized,
        R: DebugRenderer + ?Sized,
    {
        let Some(observer) = observer else {
            if !self.observer_missing {
                warn!("No observer for collider visualization, skipping frames until one appears");
                self.observer_missing = true;
            }
            return None;
        };

        if self.observer_missing {
            info!("Observer found, resuming collider visualization");
            self.observer_missing = false;
        }

        Some(self.visualizer.poll(observer, &self.config, world, renderer, now))
    }

    /// Name labels recorded by the last visualized frame
    pub fn labels(&self) -> &[NameLabel] {
        self.visualizer.labels()
    }

    /// Current configuration
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Mutable configuration; changes take effect on the next update
    pub fn config_mut(&mut self) -> &mut VisualizerConfig {
        &mut self.config
    }

    /// Underlying visualizer
    pub fn visualizer(&self) -> &CollisionVisualizer {
        &self.visualizer
    }

    /// Mutable visualizer, for cache invalidation
    pub fn visualizer_mut(&mut self) -> &mut CollisionVisualizer {
        &mut self.visualizer
    }

    /// Whether the last update had no observer
    pub fn is_observer_missing(&self) -> bool {
        self.observer_missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_ALPHA;
    use crate::foundation::math::Transform;
    use crate::physics::collision::{ColliderShape, ShapeDescriptor};
    use crate::render::draw_queue::DrawQueue;
    use crate::render::primitives::PrimitiveSettings;
    use crate::spatial::ColliderRegistry;

    fn session() -> DebugSession {
        let settings = PrimitiveSettings {
            plane_vertices_x: 4,
            plane_vertices_z: 4,
            ..PrimitiveSettings::default()
        };
        DebugSession::new(VisualizerConfig::default().with_primitives(settings))
    }

    #[test]
    fn test_handle_input_updates_config() {
        let mut session = session();

        session.handle_input(DebugInput::ToggleVisible);
        assert!(!session.config().visible);

        session.handle_input(DebugInput::CycleTriggerFilter);
        assert_eq!(session.config().trigger_filter, TriggerFilter::NoTriggers);

        session.handle_input(DebugInput::ToggleNames);
        assert!(session.config().show_names);

        session.handle_input(DebugInput::SetAlpha(0.0));
        assert_eq!(session.config().alpha, MIN_ALPHA);
    }

    #[test]
    fn test_missing_observer_skips_frame() {
        let mut session = session();
        let mut registry = ColliderRegistry::new();
        registry.insert(ShapeDescriptor::new(ColliderShape::Sphere { radius: 1.0 }, &Transform::identity()));
        let mut queue = DrawQueue::new();

        assert!(session.update(None, &registry, &mut queue, 0.0).is_none());
        assert!(session.is_observer_missing());
        assert!(queue.is_empty());

        let stats = session.update(Some(Vec3::zeros()), &registry, &mut queue, 0.1).unwrap();
        assert!(!session.is_observer_missing());
        assert_eq!(stats.drawn, 1);
        assert_eq!(queue.len(), 1);
    }
}
