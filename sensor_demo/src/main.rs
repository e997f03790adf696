//! Sensor volume demo
//!
//! Builds a small constellation of orbiting sensors, loads a few more from a
//! JSON document and runs the synchronizers headless for a simulated hour,
//! logging what the backend would have drawn.
//!
//! ```text
//! sensor_demo [config.toml|config.ron]
//! ```

use nalgebra::UnitQuaternion;
use rand::Rng;
use sensor_engine::prelude::*;
use sensor_engine::scene::{
    ConicSensorGraphics, CustomPatternSensorGraphics, RectangularSensorGraphics, SampledProperty,
};
use sensor_engine::sensors::SurfaceClass;
use sensor_engine::sync::BoundingSphereState;

const EARTH_RADIUS: f64 = 6_378_137.0;
const SATELLITES: usize = 9;
const DURATION_SECONDS: f64 = 3600.0;
const SAMPLE_SECONDS: f64 = 60.0;
const TICK_SECONDS: f64 = 10.0;

const GROUND_STATIONS: &str = r#"[
    {
        "id": "station-north",
        "position": [0.0, 0.0, 6356752.0],
        "orientation": [0.0, 0.0, 0.0, 1.0],
        "conicSensor": {
            "innerHalfAngle": 0.2,
            "outerHalfAngle": 1.2,
            "radius": 2000000.0,
            "showThroughEllipsoid": true,
            "lateralSurfaceMaterial": { "color": { "r": 0.2, "g": 0.6, "b": 1.0, "a": 0.3 } }
        }
    },
    {
        "id": "station-fan",
        "availability": "600/2400",
        "position": [6378137.0, 0.0, 0.0],
        "orientation": [0.0, 0.7071067811865476, 0.0, 0.7071067811865476],
        "customPatternSensor": {
            "radius": [
                { "interval": "600/1200", "value": 500000.0 },
                { "interval": "1200/2400", "value": 1500000.0 }
            ],
            "directions": { "unitSpherical": [0.0, 0.6, 1.0, 0.3, 2.0, 0.6, 3.0, 0.3, 4.0, 0.6, 5.0, 0.3] }
        }
    }
]"#;

/// Circular orbit sampled as position and nadir-pointing orientation
struct Orbit {
    radius: f64,
    inclination: f64,
    phase: f64,
    period: f64,
}

impl Orbit {
    fn random(rng: &mut impl Rng) -> Self {
        let altitude = rng.gen_range(500_000.0..2_000_000.0);
        let radius = EARTH_RADIUS + altitude;
        Self {
            radius,
            inclination: rng.gen_range(0.0..1.0),
            phase: rng.gen_range(0.0..std::f64::consts::TAU),
            // Kepler's third law with Earth's gravitational parameter
            period: std::f64::consts::TAU * (radius.powi(3) / 3.986_004_418e14).sqrt(),
        }
    }

    fn position(&self, seconds: f64) -> Vec3 {
        let angle = self.phase + std::f64::consts::TAU * seconds / self.period;
        let (sin_i, cos_i) = self.inclination.sin_cos();
        let (sin_a, cos_a) = angle.sin_cos();
        Vec3::new(cos_a, sin_a * cos_i, sin_a * sin_i) * self.radius
    }

    fn sample(&self) -> (SampledProperty<Vec3>, SampledProperty<Quat>) {
        let mut positions = SampledProperty::new();
        let mut orientations = SampledProperty::new();
        let mut seconds = 0.0;
        while seconds <= DURATION_SECONDS {
            let position = self.position(seconds);
            let nadir = -position;
            // Boresight is +Z; face_towards aligns it with the nadir vector
            let orientation = UnitQuaternion::face_towards(&nadir, &Vec3::z());
            positions.add_sample(JulianDate(seconds), position);
            orientations.add_sample(JulianDate(seconds), orientation);
            seconds += SAMPLE_SECONDS;
        }
        (positions, orientations)
    }
}

fn random_satellite(index: usize, rng: &mut impl Rng) -> Entity {
    let (positions, orientations) = Orbit::random(rng).sample();
    let entity = Entity::new(format!("sat-{index}"))
        .with_position(Some(Box::new(positions)))
        .with_orientation(Some(Box::new(orientations)));

    let reach = rng.gen_range(1_000_000.0..3_000_000.0);
    let tint = Color::new(rng.gen_range(0.2..1.0), rng.gen_range(0.2..1.0), rng.gen_range(0.2..1.0), 0.4);

    match index % 3 {
        0 => {
            let mut graphics = ConicSensorGraphics::new();
            graphics.shape.outer_half_angle = constant(rng.gen_range(0.1..0.6));
            graphics.radius = constant(reach);
            graphics.material = constant(MaterialSpec::Color(tint));
            entity.with_conic_sensor(graphics)
        }
        1 => {
            let mut graphics = RectangularSensorGraphics::new();
            graphics.shape.x_half_angle = constant(rng.gen_range(0.1..0.5));
            graphics.shape.y_half_angle = constant(rng.gen_range(0.05..0.3));
            graphics.radius = constant(reach);
            graphics.material = constant(MaterialSpec::Grid {
                cell_alpha: 0.1,
                line_count: [8, 8],
                line_thickness: [1.0, 1.0],
                color: tint,
            });
            entity.with_rectangular_sensor(graphics)
        }
        _ => {
            let lobes: usize = rng.gen_range(3..8);
            let directions: Vec<f64> = (0..lobes * 2)
                .flat_map(|i| {
                    let clock = std::f64::consts::TAU * i as f64 / (lobes * 2) as f64;
                    let cone = if i % 2 == 0 { 0.5 } else { 0.2 };
                    [clock, cone]
                })
                .collect();
            let mut graphics = CustomPatternSensorGraphics::new();
            graphics.radius = constant(reach);
            match DirectionEncoding::UnitSpherical(directions).to_polygon() {
                Ok(polygon) => graphics.shape.directions = constant(polygon),
                Err(err) => log::warn!("Skipping pattern for sat-{index}: {err}"),
            }
            entity.with_custom_pattern_sensor(graphics)
        }
    }
}

/// Classify the far edge of every drawn volume against the reference ellipsoid
fn log_horizon_coverage(
    config: &SensorEngineConfig,
    collection: &EntityCollection,
    visualizers: &SensorVisualizers,
) {
    let classifier = config.shadow_classifier();
    for (id, entity) in collection.iter() {
        let volumes = [
            visualizers.conic().volume(id),
            visualizers.rectangular().volume(id),
            visualizers.custom_pattern().volume(id),
        ];
        for volume in volumes.into_iter().flatten().filter(|volume| volume.show()) {
            let apex = volume.apex();
            let reach = volume.effective_radius();
            // Mesh corners are pushed past the radius; pull them back onto it
            let corners: Vec<Vec3> = volume
                .world_vertices()
                .into_iter()
                .filter_map(|corner| (corner - apex).try_normalize(0.0).map(|dir| apex + dir * reach))
                .collect();
            let (mut visible, mut outline) = (0, 0);
            for corner in &corners {
                let class = volume.classify_point(&classifier, corner);
                if class.is_visible() {
                    visible += 1;
                }
                if matches!(class, SurfaceClass::Visible { on_radius_outline: true, .. }) {
                    outline += 1;
                }
            }
            log::info!(
                "{}: {visible}/{} far-edge points drawn, {outline} on the radius outline",
                entity.name(),
                corners.len()
            );
        }
    }
}

fn load_config() -> Result<SensorEngineConfig, Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            SensorEngineConfig::load_from_file(&path)?
        }
        None => SensorEngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    sensor_engine::foundation::logging::init();

    let config = load_config()?;
    let mut backend = HeadlessBackend::new();
    let mut collection = EntityCollection::new();
    let mut visualizers = SensorVisualizers::new(&config);

    let mut rng = rand::thread_rng();
    for index in 0..SATELLITES {
        collection.add(random_satellite(index, &mut rng))?;
    }
    let report = ingest_document(GROUND_STATIONS, &mut collection)?;
    for (id, err) in &report.rejected {
        log::error!("Ground station {id} rejected: {err}");
    }
    log::info!("Scene has {} entities", collection.len());

    let mut commands = Vec::new();
    let mut totals = SyncStats::default();
    let mut frame_number = 0;
    let mut seconds = 0.0;
    while seconds <= DURATION_SECONDS {
        frame_number += 1;
        commands.clear();

        // Every tenth frame also renders a pick pass
        let mut frame = FrameState::scene_3d(frame_number);
        if frame_number % 10 == 0 {
            frame = frame.with_pick();
        }

        let stats = visualizers.update(&mut collection, JulianDate(seconds), &frame, &mut backend, &mut commands);
        totals += stats;

        if frame_number % 60 == 1 {
            log::info!(
                "t={seconds:>6.0}s visible={} rebuilt={} commands={} live_bytes={}",
                stats.visible,
                stats.rebuilt,
                commands.len(),
                backend.live_geometry_bytes()
            );
        }
        seconds += TICK_SECONDS;
    }

    if let Some(id) = collection.id_by_name("station-north") {
        match visualizers.bounding_sphere(id) {
            BoundingSphereState::Done(sphere) => {
                log::info!("station-north bounds: center={:?} radius={:.0}", sphere.center, sphere.radius);
            }
            other => log::info!("station-north bounds: {other:?}"),
        }
    }

    log_horizon_coverage(&config, &collection, &visualizers);

    visualizers.destroy(&mut backend);

    let backend_stats = backend.stats();
    log::info!(
        "Frames={frame_number} created={} destroyed={} rebuilt={}",
        totals.created,
        totals.destroyed,
        totals.rebuilt
    );
    log::info!(
        "Backend: primitives {}/{} geometry {}/{} pipelines {}",
        backend_stats.added,
        backend_stats.removed,
        backend_stats.uploads,
        backend_stats.releases,
        backend_stats.pipeline_builds
    );
    if backend.live_primitives() != 0 || backend.live_geometries() != 0 {
        log::error!("Resources leaked after teardown");
    }
    Ok(())
}
