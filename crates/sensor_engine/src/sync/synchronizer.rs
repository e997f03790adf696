//! Entity to sensor volume synchronization
//!
//! A [`SensorSynchronizer`] keeps one [`SensorVolume`] per tracked entity
//! and pushes resolved entity properties into it each tick. Work is cut
//! down at two levels:
//!
//! 1. The collection change feed decides which entities are tracked at all.
//! 2. Per entry, every resolved value is compared against the value last
//!    pushed, and only differences reach the volume.
//!
//! Volumes are created lazily on an entity's first visible tick and
//! destroyed whenever the entity stops being tracked.

use std::ops::AddAssign;

use crate::core::config::{SensorDefaults, SensorEngineConfig};
use crate::foundation::collections::{EntityId, SecondaryMap};
use crate::foundation::math::{model_matrix, Quat, Vec3};
use crate::foundation::time::JulianDate;
use crate::geometry::BoundingSphere;
use crate::render::{DrawCommand, FrameState, RenderBackend};
use crate::scene::{value_of, value_or, ChangeSet, Entity, EntityCollection};
use crate::sensors::material::MaterialUpdate;
use crate::sensors::{BoundarySampler, Color, MaterialAllocator, MaterialSpec, SensorVolume};
use super::kinds::SensorKind;

/// Availability of an entity's sensor bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingSphereState {
    /// Bounds are known
    Done(BoundingSphere),
    /// The entity is tracked but has no drawable volume yet
    Pending,
    /// The entity is not tracked by this synchronizer
    Failed,
}

/// Per-tick synchronizer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Entities tracked after the tick
    pub tracked: usize,
    /// Entities visible this tick
    pub visible: usize,
    /// Volumes created this tick
    pub created: usize,
    /// Volumes destroyed this tick
    pub destroyed: usize,
    /// Geometry rebuilds this tick
    pub rebuilt: usize,
}

impl AddAssign for SyncStats {
    fn add_assign(&mut self, other: Self) {
        self.tracked += other.tracked;
        self.visible += other.visible;
        self.created += other.created;
        self.destroyed += other.destroyed;
        self.rebuilt += other.rebuilt;
    }
}

#[derive(Debug, Clone)]
struct SyncContext {
    sampler: BoundarySampler,
    far_radius: f64,
    defaults: SensorDefaults,
}

impl SyncContext {
    fn default_material(&self) -> MaterialSpec {
        MaterialSpec::Color(self.defaults.material_color)
    }
}

/// Values last pushed into a volume
#[derive(Debug)]
struct Applied<S> {
    position: Option<Vec3>,
    orientation: Option<Quat>,
    shape: Option<S>,
    radius: Option<f64>,
    show_intersection: Option<bool>,
    intersection_color: Option<Color>,
    intersection_width: Option<f64>,
    show_through_ellipsoid: Option<bool>,
    material: Option<MaterialSpec>,
}

impl<S> Default for Applied<S> {
    fn default() -> Self {
        Self {
            position: None,
            orientation: None,
            shape: None,
            radius: None,
            show_intersection: None,
            intersection_color: None,
            intersection_width: None,
            show_through_ellipsoid: None,
            material: None,
        }
    }
}

enum Outcome {
    Hidden,
    Visible { created: bool },
}

#[derive(Debug)]
struct SyncEntry<K: SensorKind> {
    volume: Option<SensorVolume>,
    applied: Applied<K::Snapshot>,
}

impl<K: SensorKind> SyncEntry<K> {
    fn new() -> Self {
        Self {
            volume: None,
            applied: Applied::default(),
        }
    }

    fn hide(&mut self) {
        if let Some(volume) = self.volume.as_mut() {
            volume.set_show(false);
        }
    }

    fn apply(
        &mut self,
        id: EntityId,
        entity: &Entity,
        time: JulianDate,
        context: &SyncContext,
        materials: &mut MaterialAllocator,
        backend: &mut dyn RenderBackend,
    ) -> Outcome {
        let Some(graphics) = K::graphics(entity) else {
            self.hide();
            return Outcome::Hidden;
        };

        let shown = entity.is_showing()
            && entity.is_available(time)
            && value_or(&graphics.show, time, true);
        let pose = if shown {
            value_of(&entity.position, time).zip(value_of(&entity.orientation, time))
        } else {
            None
        };
        let Some((position, orientation)) = pose else {
            self.hide();
            return Outcome::Hidden;
        };

        let created = self.volume.is_none();
        let volume = self.volume.get_or_insert_with(|| {
            SensorVolume::create(backend, materials.create(context.default_material()))
                .with_owner(id)
                .with_far_radius(context.far_radius)
        });
        if created {
            log::debug!("Created {} sensor volume {:?} for {id:?}", K::NAME, volume.id());
        }
        volume.set_show(true);

        let applied = &mut self.applied;

        if applied.position != Some(position) || applied.orientation != Some(orientation) {
            volume.set_model_matrix(model_matrix(&position, &orientation));
            applied.position = Some(position);
            applied.orientation = Some(orientation);
        }

        let shape = K::resolve_shape(&graphics.shape, time);
        if applied.shape.as_ref() != Some(&shape) {
            let result = K::boundary(&shape, &context.sampler).and_then(|boundary| volume.set_boundary(boundary));
            if let Err(err) = result {
                log::warn!("{} sensor {id:?} has an invalid shape, drawing nothing: {err}", K::NAME);
                volume.clear_boundary();
            }
            applied.shape = Some(shape);
        }

        let radius = value_or(&graphics.radius, time, f64::INFINITY);
        if applied.radius != Some(radius) {
            if let Err(err) = volume.set_radius(radius) {
                log::warn!("{} sensor {id:?} keeps its previous radius: {err}", K::NAME);
            }
            applied.radius = Some(radius);
        }

        let defaults = &context.defaults;

        let show_intersection = value_or(&graphics.show_intersection, time, defaults.show_intersection);
        if applied.show_intersection != Some(show_intersection) {
            volume.set_show_intersection(show_intersection);
            applied.show_intersection = Some(show_intersection);
        }

        let intersection_color = value_or(&graphics.intersection_color, time, defaults.intersection_color);
        if applied.intersection_color != Some(intersection_color) {
            volume.set_intersection_color(intersection_color);
            applied.intersection_color = Some(intersection_color);
        }

        let intersection_width = value_or(&graphics.intersection_width, time, defaults.intersection_width);
        if applied.intersection_width != Some(intersection_width) {
            if let Err(err) = volume.set_intersection_width(intersection_width) {
                log::warn!("{} sensor {id:?} keeps its previous outline width: {err}", K::NAME);
            }
            applied.intersection_width = Some(intersection_width);
        }

        let show_through_ellipsoid =
            value_or(&graphics.show_through_ellipsoid, time, defaults.show_through_ellipsoid);
        if applied.show_through_ellipsoid != Some(show_through_ellipsoid) {
            volume.set_show_through_ellipsoid(show_through_ellipsoid);
            applied.show_through_ellipsoid = Some(show_through_ellipsoid);
        }

        let material = value_or(&graphics.material, time, context.default_material());
        if applied.material.as_ref() != Some(&material) {
            match materials.update(volume.material(), &material) {
                MaterialUpdate::Unchanged => {}
                MaterialUpdate::Uniforms(updated) | MaterialUpdate::Replaced(updated) => {
                    volume.set_material(updated);
                }
            }
            applied.material = Some(material);
        }

        Outcome::Visible { created }
    }
}

/// Maps entities carrying one sensor kind onto sensor volumes
#[derive(Debug)]
pub struct SensorSynchronizer<K: SensorKind> {
    tracked: SecondaryMap<EntityId, SyncEntry<K>>,
    context: SyncContext,
    materials: MaterialAllocator,
    stats: SyncStats,
}

impl<K: SensorKind> SensorSynchronizer<K> {
    /// Create a synchronizer with sampling and defaults from `config`
    pub fn new(config: &SensorEngineConfig) -> Self {
        Self {
            tracked: SecondaryMap::new(),
            context: SyncContext {
                sampler: config.sampler(),
                far_radius: config.volume.far_radius,
                defaults: config.defaults.clone(),
            },
            materials: MaterialAllocator::new(),
            stats: SyncStats::default(),
        }
    }

    /// Whether an entity carries everything this kind needs to be tracked
    pub fn is_complete(entity: &Entity) -> bool {
        K::graphics(entity).is_some() && entity.position.is_some() && entity.orientation.is_some()
    }

    /// Apply a batch of collection changes to the tracked set
    pub fn on_collection_changed(
        &mut self,
        collection: &EntityCollection,
        changes: &ChangeSet,
        backend: &mut dyn RenderBackend,
    ) {
        for &id in changes.added.iter().chain(&changes.changed) {
            match collection.get(id) {
                Some(entity) if Self::is_complete(entity) => {
                    if !self.tracked.contains_key(id) {
                        self.tracked.insert(id, SyncEntry::new());
                        log::trace!("Tracking {id:?} as a {} sensor", K::NAME);
                    }
                }
                _ => self.untrack(id, backend),
            }
        }
        for &id in &changes.removed {
            self.untrack(id, backend);
        }
    }

    /// Resolve properties at `time` and push changes into the volumes
    pub fn update(
        &mut self,
        collection: &EntityCollection,
        time: JulianDate,
        backend: &mut dyn RenderBackend,
    ) {
        let Self {
            tracked,
            context,
            materials,
            stats,
        } = self;

        stats.visible = 0;
        for (id, entry) in tracked.iter_mut() {
            let outcome = match collection.get(id) {
                Some(entity) => entry.apply(id, entity, time, context, materials, backend),
                None => {
                    entry.hide();
                    Outcome::Hidden
                }
            };
            if let Outcome::Visible { created } = outcome {
                stats.visible += 1;
                if created {
                    stats.created += 1;
                }
            }
        }
    }

    /// Update every volume and collect its draw commands
    pub fn render(
        &mut self,
        frame: &FrameState,
        backend: &mut dyn RenderBackend,
        commands: &mut Vec<DrawCommand>,
    ) {
        for (id, entry) in self.tracked.iter_mut() {
            let Some(volume) = entry.volume.as_mut() else {
                continue;
            };
            let before = volume.geometry_rebuilds();
            if let Err(err) = volume.update(frame, backend, commands) {
                log::warn!("{} sensor volume of {id:?} failed to update: {err}", K::NAME);
            }
            self.stats.rebuilt += (volume.geometry_rebuilds() - before) as usize;
        }
    }

    /// Run one full tick: change feed, property resolution, volume updates
    pub fn tick(
        &mut self,
        changes: &ChangeSet,
        collection: &EntityCollection,
        time: JulianDate,
        frame: &FrameState,
        backend: &mut dyn RenderBackend,
        commands: &mut Vec<DrawCommand>,
    ) -> SyncStats {
        self.stats = SyncStats::default();
        self.on_collection_changed(collection, changes, backend);
        self.update(collection, time, backend);
        self.render(frame, backend, commands);
        self.stats.tracked = self.tracked.len();
        log::trace!("{} sensors: {:?}", K::NAME, self.stats);
        self.stats
    }

    /// Counters of the most recent tick
    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Number of tracked entities
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Whether an entity is tracked
    pub fn is_tracked(&self, id: EntityId) -> bool {
        self.tracked.contains_key(id)
    }

    /// The volume created for an entity, if any
    pub fn volume(&self, id: EntityId) -> Option<&SensorVolume> {
        self.tracked.get(id).and_then(|entry| entry.volume.as_ref())
    }

    /// Number of volumes currently alive
    pub fn live_volumes(&self) -> usize {
        self.tracked.values().filter(|entry| entry.volume.is_some()).count()
    }

    /// World-space bounds of an entity's sensor
    pub fn bounding_sphere(&self, id: EntityId) -> BoundingSphereState {
        let Some(entry) = self.tracked.get(id) else {
            return BoundingSphereState::Failed;
        };
        entry
            .volume
            .as_ref()
            .filter(|volume| volume.show())
            .and_then(SensorVolume::world_bounding_sphere)
            .map_or(BoundingSphereState::Pending, BoundingSphereState::Done)
    }

    /// Destroy every volume and forget all tracked entities
    pub fn destroy(&mut self, backend: &mut dyn RenderBackend) {
        let mut destroyed = 0;
        for (_, entry) in self.tracked.drain() {
            if let Some(mut volume) = entry.volume {
                volume.destroy(backend);
                destroyed += 1;
            }
        }
        if destroyed > 0 {
            log::info!("Destroyed {destroyed} {} sensor volume(s)", K::NAME);
        }
    }

    fn untrack(&mut self, id: EntityId, backend: &mut dyn RenderBackend) {
        let Some(entry) = self.tracked.remove(id) else {
            return;
        };
        if let Some(mut volume) = entry.volume {
            volume.destroy(backend);
            self.stats.destroyed += 1;
        }
        log::trace!("Stopped tracking {id:?} as a {} sensor", K::NAME);
    }
}

impl<K: SensorKind> Default for SensorSynchronizer<K> {
    fn default() -> Self {
        Self::new(&SensorEngineConfig::default())
    }
}

impl<K: SensorKind> Drop for SensorSynchronizer<K> {
    fn drop(&mut self) {
        let live = self.live_volumes();
        if live > 0 {
            log::warn!(
                "{} sensor synchronizer dropped with {live} live volume(s); call destroy to release them",
                K::NAME
            );
        }
    }
}
