//! Marker Demo
//!
//! Drives a billboard manager against a scene for a handful of simulated
//! frames:
//! - Adds a batch of eye-facing city markers and a batch of ground decals
//! - Toggles the decals on and off every few frames
//! - Schedules a delayed removal of the cities and lets the scene clock catch up
//!
//! Usage: `marker_demo [config.toml|config.ron]`

use globe_scene::prelude::*;
use log::info;

const FRAME_TIME: f64 = 1.0 / 30.0;
const FRAME_COUNT: u32 = 60;
const TOGGLE_EVERY: u32 = 10;

/// Cities as (name, latitude, longitude) in degrees
const CITIES: [(&str, f64, f64); 5] = [
    ("Lisbon", 38.72, -9.14),
    ("Nairobi", -1.29, 36.82),
    ("Osaka", 34.69, 135.50),
    ("Quito", -0.18, -78.47),
    ("Reykjavik", 64.15, -21.94),
];

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] globe_scene::ConfigError),

    #[error("Billboard operation failed: {0}")]
    Billboard(#[from] BillboardError),
}

/// Point on the unit sphere for a latitude/longitude in degrees
fn geo_to_display(latitude: f64, longitude: f64) -> Point3d {
    let (lat, lon) = (latitude.to_radians(), longitude.to_radians());
    Point3d::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

fn load_config() -> Result<EngineConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Ok(EngineConfig::load_from_file(path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;

    let mut scene = Scene::with_config(config.scene.clone());
    let eye_shader = scene.register_shader(ShaderProgram::new(
        "billboard_eye",
        "shaders/billboard_eye.vert.spv",
        "shaders/billboard.frag.spv",
    ));
    let ground_shader = scene.register_shader(ShaderProgram::new(
        "billboard_ground",
        "shaders/billboard_ground.vert.spv",
        "shaders/billboard.frag.spv",
    ));
    let mut manager = BillboardManager::with_config(&scene, config.billboards.clone());
    let mut changes = ChangeSet::new();

    let cities: Vec<Billboard> = CITIES
        .iter()
        .map(|(_, lat, lon)| {
            Billboard::new(geo_to_display(*lat, *lon), Vec2::new(0.02, 0.02))
                .with_texture(TextureId(1))
                .selectable()
        })
        .collect();
    let city_info = BillboardInfo {
        draw_priority: 10,
        ..manager.default_info().clone()
    };
    let city_batch = manager.add_billboards(&cities, &city_info, eye_shader, &mut changes)?;
    info!("Added {} city markers as {}", city_batch.billboards.len(), city_batch.id);

    let decals: Vec<Billboard> = CITIES
        .iter()
        .map(|(_, lat, lon)| {
            Billboard::new(geo_to_display(*lat, *lon), Vec2::new(0.05, 0.05))
                .with_color(Color::rgba(40, 160, 255, 255))
        })
        .collect();
    let decal_info = BillboardInfo {
        orientation: BillboardOrientation::Ground,
        opacity: 0.6,
        ..Default::default()
    };
    let decal_batch = manager.add_billboards(&decals, &decal_info, ground_shader, &mut changes)?;

    let mut decals_on = true;
    for frame in 0..FRAME_COUNT {
        if frame > 0 && frame % TOGGLE_EVERY == 0 {
            decals_on = !decals_on;
            manager.enable_billboards(&[decal_batch.id], decals_on, &mut changes);
        }

        if frame == FRAME_COUNT / 2 {
            // Let the markers fade before they disappear
            let mut removal = ChangeSet::new();
            manager.remove_billboards(&[city_batch.id], &mut removal);
            let when = scene.time() + 0.5;
            for record in removal.drain() {
                changes.push_at(when, record.request);
            }
        }

        let report = scene.apply_changes(&mut changes);
        scene.advance_to(f64::from(frame + 1) * FRAME_TIME + config.scene.start_time);

        if report.applied > 0 || report.deferred > 0 {
            info!(
                "frame {:>2}: applied {}, deferred {}, {} objects, {} drawn",
                frame,
                report.applied,
                report.deferred,
                scene.object_count(),
                scene.enabled_objects().len()
            );
        }
    }

    manager.remove_all(&mut changes);
    scene.apply_changes(&mut changes);
    info!("Done, {} objects left in scene", scene.object_count());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    globe_scene::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
