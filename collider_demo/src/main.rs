//! Collider Visualization Demo
//!
//! Headless run of the collision debug overlay:
//! - Random boxes, spheres and capsules drifting around the observer
//! - A convex hull and a trigger volume
//! - A rolling heightfield under everything
//! - Scripted UI input cycling through the overlay modes
//!
//! Usage: `collider_demo [config.toml|config.ron]`

use std::sync::Arc;

use collider_view::prelude::*;
use collider_view::render::primitives::generator::build_box;
use collider_view::render::primitives::PrimitiveSettings;
use log::{info, warn};

// Simulation settings
const FRAME_COUNT: u64 = 600;
const FRAME_TIME: f32 = 1.0 / 60.0;
const NUM_DRIFTERS: usize = 24;
const ARENA_SIZE: f32 = 60.0;
const DRIFT_SPEED: f32 = 4.0;

const TERRAIN_ID: HeightfieldId = HeightfieldId(1);

struct Drifter {
    entity: EntityHandle,
    transform: Transform,
    velocity: Vec3,
}

struct ColliderDemoApp {
    registry: ColliderRegistry,
    session: DebugSession,
    queue: DrawQueue,
    clock: FrameClock,
    drifters: Vec<Drifter>,
    observer: Vec3,
}

impl ColliderDemoApp {
    fn new(session: DebugSession) -> Self {
        let mut app = Self {
            registry: ColliderRegistry::new(),
            session,
            queue: DrawQueue::new(),
            clock: FrameClock::new(),
            drifters: Vec::new(),
            observer: Vec3::new(0.0, 5.0, 0.0),
        };
        app.spawn_scene();
        app
    }

    fn spawn_scene(&mut self) {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        for i in 0..NUM_DRIFTERS {
            let position = Vec3::new(
                rng.gen_range(-ARENA_SIZE..ARENA_SIZE),
                rng.gen_range(1.0..10.0),
                rng.gen_range(-ARENA_SIZE..ARENA_SIZE),
            );
            let velocity = Vec3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0))
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vec3::x)
                * DRIFT_SPEED;

            let shape = match i % 3 {
                0 => ColliderShape::Box {
                    half_extents: Vec3::new(
                        rng.gen_range(0.5..2.0),
                        rng.gen_range(0.5..2.0),
                        rng.gen_range(0.5..2.0),
                    ),
                    center: Vec3::zeros(),
                },
                1 => ColliderShape::Sphere {
                    radius: rng.gen_range(0.5..2.5),
                },
                _ => ColliderShape::Capsule {
                    radius: rng.gen_range(0.3..1.0),
                    height: rng.gen_range(1.5..4.0),
                    axis: CapsuleAxis::from_index(rng.gen_range(0..3)),
                    center: Vec3::zeros(),
                },
            };

            let transform = Transform::from_position(position);
            let entity = self
                .registry
                .insert(ShapeDescriptor::new(shape, &transform).with_name(&format!("drifter_{i}")));
            self.drifters.push(Drifter {
                entity,
                transform,
                velocity,
            });
        }

        self.registry.insert(
            ShapeDescriptor::new(
                ColliderShape::Mesh {
                    mesh: Arc::new(build_box()),
                    convex: true,
                },
                &Transform::from_position(Vec3::new(3.0, 1.0, 3.0)).with_scale(Vec3::new(2.0, 2.0, 2.0)),
            )
            .with_name("crate_hull"),
        );

        self.registry.insert(
            ShapeDescriptor::new(
                ColliderShape::Box {
                    half_extents: Vec3::new(4.0, 3.0, 4.0),
                    center: Vec3::new(0.0, 3.0, 0.0),
                },
                &Transform::from_position(Vec3::new(-8.0, 0.0, 0.0)),
            )
            .with_name("spawn_trigger")
            .as_trigger(),
        );

        let origin = Vec3::new(-ARENA_SIZE, 0.0, -ARENA_SIZE);
        self.registry.insert(
            ShapeDescriptor::new(
                ColliderShape::Heightfield {
                    id: TERRAIN_ID,
                    bounds: HeightfieldBounds {
                        origin,
                        size: Vec3::new(ARENA_SIZE * 2.0, 4.0, ARENA_SIZE * 2.0),
                    },
                },
                &Transform::from_position(origin),
            )
            .with_name("terrain"),
        );
        self.registry
            .set_height_fn(TERRAIN_ID, |xz| (xz.x * 0.1).sin() * (xz.y * 0.1).cos() * 2.0);

        info!("Spawned {} colliders", self.registry.len());
    }

    fn update_drifters(&mut self, delta_time: f32) {
        for drifter in &mut self.drifters {
            drifter.transform.position += drifter.velocity * delta_time;

            // Bounce off the arena walls
            for axis in [0, 2] {
                if drifter.transform.position[axis].abs() > ARENA_SIZE {
                    drifter.velocity[axis] = -drifter.velocity[axis];
                }
            }

            if let Some(shape) = self.registry.get_mut(drifter.entity) {
                shape.local_to_world = drifter.transform.to_matrix();
            }
        }
    }

    fn scripted_input(&mut self, frame: u64) {
        let input = match frame {
            120 => DebugInput::ToggleNames,
            240 => DebugInput::CycleTriggerFilter,
            300 => DebugInput::CycleTriggerFilter,
            360 => DebugInput::SetAlpha(0.8),
            420 => DebugInput::ToggleVisible,
            480 => DebugInput::ToggleVisible,
            _ => return,
        };
        self.session.handle_input(input);
    }

    fn run(mut self) {
        for frame in 0..FRAME_COUNT {
            self.clock.advance(FRAME_TIME);
            self.scripted_input(frame);
            self.update_drifters(self.clock.delta_time());

            // The observer blinks out for a few frames
            let observer = (!(200..210).contains(&frame)).then_some(self.observer);

            self.queue.clear();
            let stats = self
                .session
                .update(observer, &self.registry, &mut self.queue, self.clock.now());

            if frame % 60 == 0 {
                match stats {
                    Some(stats) => info!(
                        "t={:.1}s filter={} drawn={} filtered={} live={} labels={}",
                        self.clock.now(),
                        self.session.config().trigger_filter,
                        stats.drawn,
                        stats.filtered,
                        stats.live_meshes,
                        self.session.labels().len(),
                    ),
                    None => warn!("t={:.1}s no observer", self.clock.now()),
                }
            }
        }

        let cache = self.session.visualizer().heightfields().stats();
        info!(
            "Finished {} frames: {} heightfield builds, {} cache hits, {} recycled meshes",
            self.clock.frame_count(),
            cache.misses,
            cache.hits,
            self.session.visualizer().pool().free_count(),
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    collider_view::foundation::logging::init();

    let session = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading visualizer config from {}", path);
            DebugSession::from_config_file(&path)?
        }
        None => DebugSession::new(VisualizerConfig::default().with_primitives(PrimitiveSettings {
            plane_vertices_x: 256,
            plane_vertices_z: 256,
            ..PrimitiveSettings::default()
        })),
    };

    println!("=== Collider Visualization Demo ===");
    println!("Running {} headless frames", FRAME_COUNT);
    println!();

    ColliderDemoApp::new(session).run();
    Ok(())
}
