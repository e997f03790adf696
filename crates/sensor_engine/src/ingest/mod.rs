//! # Scene Document Ingestion
//!
//! Loads [`SensorPacket`]s from JSON into an [`EntityCollection`].
//!
//! Packets are validated while they are converted into properties: a
//! negative radius, an out-of-range half-angle or a boundary with fewer
//! than three directions rejects the whole packet before the entity is
//! touched. Fields a packet leaves out keep their current values.

pub mod packet;

pub use packet::{
    CommonSensorPacket, ConicSensorPacket, CustomPatternSensorPacket, IntervalValue, PacketValue,
    RectangularSensorPacket, SensorPacket,
};

use std::fmt;

use thiserror::Error;

use crate::foundation::collections::EntityId;
use crate::foundation::math::{Quat, Quaternion, Vec3};
use crate::foundation::time::{ParseIntervalError, TimeInterval};
use crate::scene::{
    ConstantProperty, Entity, EntityCollection, Property, PropertySlot, SceneError, SensorGraphics,
    TimeIntervalCollectionProperty,
};
use crate::sensors::sampler::{validate_conic_half_angle, validate_rectangular_half_angle};
use crate::sensors::{validate_radius, validate_width, BoundaryPolygon, Color, MaterialSpec, SensorError};

/// Errors raised while ingesting packets
#[derive(Error, Debug)]
pub enum IngestError {
    /// The document is not valid JSON for the packet schema
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A sensor parameter was rejected
    #[error("Invalid sensor parameter: {0}")]
    Sensor(#[from] SensorError),

    /// A delete packet named an entity that does not exist
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// An interval string could not be parsed
    #[error(transparent)]
    InvalidInterval(#[from] ParseIntervalError),

    /// An orientation quaternion had zero length or non-finite components
    #[error("Invalid orientation: {0:?}")]
    InvalidOrientation([f64; 4]),

    /// The collection refused the entity
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Outcome of ingesting a document
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Entities created or updated, in document order
    pub applied: Vec<EntityId>,
    /// Entities deleted
    pub deleted: Vec<EntityId>,
    /// Packets that were rejected, by packet id
    pub rejected: Vec<(String, IngestError)>,
}

impl PacketValue<f64> {
    fn validated(&self, check: impl Fn(f64) -> Result<f64, SensorError>) -> IngestResult<PropertySlot<f64>> {
        self.to_property(|value| Ok(check(*value)?))
    }
}

impl<T> PacketValue<T> {
    /// Convert into a property, mapping every value through `convert`
    pub fn to_property<U, F>(&self, convert: F) -> IngestResult<PropertySlot<U>>
    where
        U: Clone + fmt::Debug + 'static,
        F: Fn(&T) -> IngestResult<U>,
    {
        let property: Box<dyn Property<U>> = match self {
            Self::Constant(value) => Box::new(ConstantProperty::new(convert(value)?)),
            Self::Intervals(values) => {
                let mut property = TimeIntervalCollectionProperty::new();
                for entry in values {
                    let interval: TimeInterval = entry.interval.parse()?;
                    property.push(interval, convert(&entry.value)?);
                }
                Box::new(property)
            }
        };
        Ok(Some(property))
    }
}

impl<T: Clone + fmt::Debug + 'static> PacketValue<T> {
    /// Convert into a property without transforming values
    pub fn to_plain_property(&self) -> IngestResult<PropertySlot<T>> {
        self.to_property(|value| Ok(value.clone()))
    }
}

fn orientation(value: &[f64; 4]) -> IngestResult<Quat> {
    let [x, y, z, w] = *value;
    let quaternion = Quaternion::new(w, x, y, z);
    let norm = quaternion.norm();
    if !(norm.is_finite() && norm > 0.0) {
        return Err(IngestError::InvalidOrientation(*value));
    }
    Ok(Quat::new_normalize(quaternion))
}

fn convert<T, U>(
    value: &Option<PacketValue<T>>,
    convert: impl Fn(&T) -> IngestResult<U>,
) -> IngestResult<Option<PropertySlot<U>>>
where
    U: Clone + fmt::Debug + 'static,
{
    value.as_ref().map(|v| v.to_property(convert)).transpose()
}

fn plain<T: Clone + fmt::Debug + 'static>(value: &Option<PacketValue<T>>) -> IngestResult<Option<PropertySlot<T>>> {
    value.as_ref().map(PacketValue::to_plain_property).transpose()
}

/// Validate an optional packet value into a property slot
fn validated_slot(
    value: &Option<PacketValue<f64>>,
    check: impl Fn(f64) -> Result<f64, SensorError>,
) -> IngestResult<Option<PropertySlot<f64>>> {
    value.as_ref().map(|v| v.validated(&check)).transpose()
}

/// Converted shared properties, ready to assign
struct CommonUpdate {
    show: Option<PropertySlot<bool>>,
    radius: Option<PropertySlot<f64>>,
    show_intersection: Option<PropertySlot<bool>>,
    intersection_color: Option<PropertySlot<Color>>,
    intersection_width: Option<PropertySlot<f64>>,
    show_through_ellipsoid: Option<PropertySlot<bool>>,
    material: Option<PropertySlot<MaterialSpec>>,
}

impl CommonUpdate {
    fn from_packet(packet: &CommonSensorPacket) -> IngestResult<Self> {
        Ok(Self {
            show: plain(&packet.show)?,
            radius: validated_slot(&packet.radius, validate_radius)?,
            show_intersection: plain(&packet.show_intersection)?,
            intersection_color: plain(&packet.intersection_color)?,
            intersection_width: validated_slot(&packet.intersection_width, validate_width)?,
            show_through_ellipsoid: plain(&packet.show_through_ellipsoid)?,
            material: plain(&packet.lateral_surface_material)?,
        })
    }

    fn assign<S>(self, graphics: &mut SensorGraphics<S>) {
        if let Some(show) = self.show {
            graphics.show = show;
        }
        if let Some(radius) = self.radius {
            graphics.radius = radius;
        }
        if let Some(show_intersection) = self.show_intersection {
            graphics.show_intersection = show_intersection;
        }
        if let Some(color) = self.intersection_color {
            graphics.intersection_color = color;
        }
        if let Some(width) = self.intersection_width {
            graphics.intersection_width = width;
        }
        if let Some(show_through) = self.show_through_ellipsoid {
            graphics.show_through_ellipsoid = show_through;
        }
        if let Some(material) = self.material {
            graphics.material = material;
        }
    }
}

struct ConicUpdate {
    common: CommonUpdate,
    inner_half_angle: Option<PropertySlot<f64>>,
    outer_half_angle: Option<PropertySlot<f64>>,
    minimum_clock_angle: Option<PropertySlot<f64>>,
    maximum_clock_angle: Option<PropertySlot<f64>>,
}

struct RectangularUpdate {
    common: CommonUpdate,
    x_half_angle: Option<PropertySlot<f64>>,
    y_half_angle: Option<PropertySlot<f64>>,
}

struct CustomPatternUpdate {
    common: CommonUpdate,
    directions: Option<PropertySlot<BoundaryPolygon>>,
}

/// Everything a packet changes, fully validated
struct EntityUpdate {
    show: Option<bool>,
    availability: Option<TimeInterval>,
    position: Option<PropertySlot<Vec3>>,
    orientation: Option<PropertySlot<Quat>>,
    conic: Option<ConicUpdate>,
    rectangular: Option<RectangularUpdate>,
    custom_pattern: Option<CustomPatternUpdate>,
}

impl EntityUpdate {
    fn from_packet(packet: &SensorPacket) -> IngestResult<Self> {
        let conic = packet
            .conic_sensor
            .as_ref()
            .map(|p| -> IngestResult<ConicUpdate> {
                Ok(ConicUpdate {
                    common: CommonUpdate::from_packet(&p.common)?,
                    inner_half_angle: validated_slot(&p.inner_half_angle, |v| validate_conic_half_angle("innerHalfAngle", v))?,
                    outer_half_angle: validated_slot(&p.outer_half_angle, |v| validate_conic_half_angle("outerHalfAngle", v))?,
                    minimum_clock_angle: plain(&p.minimum_clock_angle)?,
                    maximum_clock_angle: plain(&p.maximum_clock_angle)?,
                })
            })
            .transpose()?;

        let rectangular = packet
            .rectangular_sensor
            .as_ref()
            .map(|p| -> IngestResult<RectangularUpdate> {
                Ok(RectangularUpdate {
                    common: CommonUpdate::from_packet(&p.common)?,
                    x_half_angle: validated_slot(&p.x_half_angle, |v| validate_rectangular_half_angle("xHalfAngle", v))?,
                    y_half_angle: validated_slot(&p.y_half_angle, |v| validate_rectangular_half_angle("yHalfAngle", v))?,
                })
            })
            .transpose()?;

        let custom_pattern = packet
            .custom_pattern_sensor
            .as_ref()
            .map(|p| -> IngestResult<CustomPatternUpdate> {
                Ok(CustomPatternUpdate {
                    common: CommonUpdate::from_packet(&p.common)?,
                    directions: convert(&p.directions, |encoding| Ok(encoding.to_polygon()?))?,
                })
            })
            .transpose()?;

        Ok(Self {
            show: packet.show,
            availability: packet.availability.as_deref().map(str::parse::<TimeInterval>).transpose()?,
            position: convert(&packet.position, |[x, y, z]| Ok(Vec3::new(*x, *y, *z)))?,
            orientation: convert(&packet.orientation, orientation)?,
            conic,
            rectangular,
            custom_pattern,
        })
    }

    fn assign(self, entity: &mut Entity) {
        if let Some(show) = self.show {
            entity.show = show;
        }
        if let Some(availability) = self.availability {
            entity.availability = Some(availability);
        }
        if let Some(position) = self.position {
            entity.position = position;
        }
        if let Some(orientation) = self.orientation {
            entity.orientation = orientation;
        }

        if let Some(update) = self.conic {
            let graphics = entity.conic_sensor.get_or_insert_with(SensorGraphics::new);
            update.common.assign(graphics);
            let shape = &mut graphics.shape;
            if let Some(v) = update.inner_half_angle {
                shape.inner_half_angle = v;
            }
            if let Some(v) = update.outer_half_angle {
                shape.outer_half_angle = v;
            }
            if let Some(v) = update.minimum_clock_angle {
                shape.minimum_clock_angle = v;
            }
            if let Some(v) = update.maximum_clock_angle {
                shape.maximum_clock_angle = v;
            }
        }

        if let Some(update) = self.rectangular {
            let graphics = entity.rectangular_sensor.get_or_insert_with(SensorGraphics::new);
            update.common.assign(graphics);
            if let Some(v) = update.x_half_angle {
                graphics.shape.x_half_angle = v;
            }
            if let Some(v) = update.y_half_angle {
                graphics.shape.y_half_angle = v;
            }
        }

        if let Some(update) = self.custom_pattern {
            let graphics = entity.custom_pattern_sensor.get_or_insert_with(SensorGraphics::new);
            update.common.assign(graphics);
            if let Some(v) = update.directions {
                graphics.shape.directions = v;
            }
        }
    }
}

/// Outcome of a single packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketOutcome {
    /// Entity created or updated
    Applied(EntityId),
    /// Entity removed
    Deleted(EntityId),
}

/// Apply one packet to the collection
///
/// The packet is validated in full before any entity is created, changed or
/// deleted.
pub fn apply_packet(packet: &SensorPacket, collection: &mut EntityCollection) -> IngestResult<PacketOutcome> {
    if packet.delete {
        let id = collection
            .id_by_name(&packet.id)
            .ok_or_else(|| IngestError::UnknownEntity(packet.id.clone()))?;
        collection.remove(id);
        log::debug!("Deleted entity '{}'", packet.id);
        return Ok(PacketOutcome::Deleted(id));
    }

    let update = EntityUpdate::from_packet(packet)?;

    let id = match collection.id_by_name(&packet.id) {
        Some(id) => id,
        None => {
            log::debug!("Creating entity '{}'", packet.id);
            collection.add(Entity::new(packet.id.clone()))?
        }
    };
    if let Some(entity) = collection.get_mut(id) {
        update.assign(entity);
    }
    Ok(PacketOutcome::Applied(id))
}

/// Ingest a JSON array of packets
///
/// A malformed document fails as a whole. Individually invalid packets are
/// logged and reported without stopping the remaining ones.
pub fn ingest_document(json: &str, collection: &mut EntityCollection) -> IngestResult<IngestReport> {
    let packets: Vec<SensorPacket> = serde_json::from_str(json)?;
    let mut report = IngestReport::default();

    for packet in &packets {
        match apply_packet(packet, collection) {
            Ok(PacketOutcome::Applied(id)) => report.applied.push(id),
            Ok(PacketOutcome::Deleted(id)) => report.deleted.push(id),
            Err(err) => {
                log::warn!("Rejected packet '{}': {err}", packet.id);
                report.rejected.push((packet.id.clone(), err));
            }
        }
    }

    log::info!(
        "Ingested {} packet(s): {} applied, {} deleted, {} rejected",
        packets.len(),
        report.applied.len(),
        report.deleted.len(),
        report.rejected.len()
    );
    Ok(report)
}
