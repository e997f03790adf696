//! Time-sampled properties
//!
//! Every parameter an entity exposes to the synchronizers is a
//! [`Property`]: something that may or may not have a value at a given
//! scene time. Three implementations cover what ingestion produces:
//!
//! - [`ConstantProperty`]: one value for all time
//! - [`TimeIntervalCollectionProperty`]: piecewise-constant values over intervals
//! - [`SampledProperty`]: interpolated between timestamped samples

use std::fmt;

use crate::foundation::math::{Quat, Vec3};
use crate::foundation::time::{JulianDate, TimeInterval};

/// A value that varies over scene time
pub trait Property<T>: fmt::Debug {
    /// Value at `time`, or `None` when undefined there
    fn value(&self, time: JulianDate) -> Option<T>;

    /// Whether the value is the same at every time
    fn is_constant(&self) -> bool {
        false
    }
}

/// An optional, type-erased property as stored on entities and graphics
pub type PropertySlot<T> = Option<Box<dyn Property<T>>>;

/// Resolve a slot, falling back to `default` when absent or undefined
pub fn value_or<T>(slot: &PropertySlot<T>, time: JulianDate, default: T) -> T {
    value_of(slot, time).unwrap_or(default)
}

/// Resolve a slot, yielding `None` when absent or undefined
pub fn value_of<T>(slot: &PropertySlot<T>, time: JulianDate) -> Option<T> {
    slot.as_ref().and_then(|property| property.value(time))
}

/// Wrap a value in a constant property slot
pub fn constant<T>(value: T) -> PropertySlot<T>
where
    T: Clone + fmt::Debug + 'static,
{
    Some(Box::new(ConstantProperty::new(value)))
}

/// A property with a single value
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantProperty<T> {
    value: T,
}

impl<T> ConstantProperty<T> {
    /// Create a constant property
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone + fmt::Debug> Property<T> for ConstantProperty<T> {
    fn value(&self, _time: JulianDate) -> Option<T> {
        Some(self.value.clone())
    }

    fn is_constant(&self) -> bool {
        true
    }
}

/// Piecewise-constant values over time intervals
///
/// Intervals are searched in insertion order and the first one containing
/// the requested time wins.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeIntervalCollectionProperty<T> {
    intervals: Vec<(TimeInterval, T)>,
}

impl<T> Default for TimeIntervalCollectionProperty<T> {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }
}

impl<T> TimeIntervalCollectionProperty<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interval
    pub fn push(&mut self, interval: TimeInterval, value: T) {
        self.intervals.push((interval, value));
    }

    /// Builder form of [`push`](Self::push)
    pub fn with_interval(mut self, interval: TimeInterval, value: T) -> Self {
        self.push(interval, value);
        self
    }

    /// Number of intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether no interval is defined
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl<T: Clone + fmt::Debug> Property<T> for TimeIntervalCollectionProperty<T> {
    fn value(&self, time: JulianDate) -> Option<T> {
        self.intervals
            .iter()
            .find(|(interval, _)| interval.contains(time))
            .map(|(_, value)| value.clone())
    }
}

/// Values that can be blended between two samples
pub trait Interpolate: Clone {
    /// Blend from `self` to `other` by `t` in `[0, 1]`
    fn interpolate(&self, other: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self.lerp(other, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        // Antipodal rotations have no unique path; snap to the nearer sample
        self.try_slerp(other, t, 1.0e-12)
            .unwrap_or_else(|| if t < 0.5 { *self } else { *other })
    }
}

/// Timestamped samples with interpolation between neighbours
///
/// Times outside the sampled range are undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledProperty<T> {
    samples: Vec<(JulianDate, T)>,
}

impl<T> Default for SampledProperty<T> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
        }
    }
}

impl<T: Interpolate> SampledProperty<T> {
    /// Create an empty property
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sample, keeping samples ordered by time
    ///
    /// A sample at an existing time replaces it.
    pub fn add_sample(&mut self, time: JulianDate, value: T) {
        let index = self.samples.partition_point(|(t, _)| t.0 < time.0);
        match self.samples.get_mut(index) {
            Some(existing) if existing.0 == time => existing.1 = value,
            _ => self.samples.insert(index, (time, value)),
        }
    }

    /// Builder form of [`add_sample`](Self::add_sample)
    pub fn with_sample(mut self, time: JulianDate, value: T) -> Self {
        self.add_sample(time, value);
        self
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples exist
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<T: Interpolate + fmt::Debug> Property<T> for SampledProperty<T> {
    fn value(&self, time: JulianDate) -> Option<T> {
        let (first_time, _) = self.samples.first()?;
        let (last_time, _) = self.samples.last()?;
        if time.0 < first_time.0 || time.0 > last_time.0 {
            return None;
        }

        let index = self.samples.partition_point(|(t, _)| t.0 <= time.0);
        if index == 0 {
            return None;
        }
        let (t0, v0) = &self.samples[index - 1];
        if t0.0 == time.0 || index == self.samples.len() {
            return Some(v0.clone());
        }
        let (t1, v1) = &self.samples[index];
        let t = (time.0 - t0.0) / (t1.0 - t0.0);
        Some(v0.interpolate(v1, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_property() {
        let slot = constant(4.0_f64);
        assert_eq!(value_of(&slot, JulianDate(-1.0e9)), Some(4.0));
        assert!(slot.as_ref().is_some_and(|p| p.is_constant()));
    }

    #[test]
    fn test_absent_slot_uses_default() {
        let slot: PropertySlot<f64> = None;
        assert_eq!(value_or(&slot, JulianDate(0.0), 7.0), 7.0);
        assert_eq!(value_of(&slot, JulianDate(0.0)), None);
    }

    #[test]
    fn test_interval_collection_first_match_wins() {
        let property = TimeIntervalCollectionProperty::new()
            .with_interval(TimeInterval::closed(JulianDate(0.0), JulianDate(10.0)), 1.0_f64)
            .with_interval(TimeInterval::closed(JulianDate(5.0), JulianDate(20.0)), 2.0);

        assert_eq!(property.value(JulianDate(7.0)), Some(1.0));
        assert_eq!(property.value(JulianDate(15.0)), Some(2.0));
        assert_eq!(property.value(JulianDate(25.0)), None);
    }

    #[test]
    fn test_sampled_linear_interpolation() {
        let property = SampledProperty::new()
            .with_sample(JulianDate(10.0), Vec3::new(10.0, 0.0, 0.0))
            .with_sample(JulianDate(0.0), Vec3::zeros());

        assert_relative_eq!(property.value(JulianDate(2.5)).unwrap(), Vec3::new(2.5, 0.0, 0.0));
        assert_relative_eq!(property.value(JulianDate(10.0)).unwrap(), Vec3::new(10.0, 0.0, 0.0));
        assert!(property.value(JulianDate(-0.1)).is_none());
        assert!(property.value(JulianDate(10.1)).is_none());
    }

    #[test]
    fn test_sampled_replaces_duplicate_time() {
        let mut property = SampledProperty::new();
        property.add_sample(JulianDate(1.0), 1.0_f64);
        property.add_sample(JulianDate(1.0), 3.0);
        assert_eq!(property.len(), 1);
        assert_eq!(property.value(JulianDate(1.0)), Some(3.0));
    }

    #[test]
    fn test_sampled_orientation_slerp() {
        let property = SampledProperty::new()
            .with_sample(JulianDate(0.0), Quat::identity())
            .with_sample(JulianDate(1.0), Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI));

        let halfway = property.value(JulianDate(0.5)).unwrap();
        assert_relative_eq!(halfway.angle(), HALF_PI * 0.5, epsilon = 1e-12);
    }
}
