//! Surface probing: the collaborator trait, the per-tick sampler, and a set
//! of analytic surfaces used by the runner and tests.
//!
//! The body never caches a sample. Every tick it asks a [`SurfaceProbe`]
//! along its current negative up and either receives a [`SurfaceSample`] or
//! nothing at all.

use glam::Vec3;
use ordered_float::OrderedFloat;

use crate::vector_math::try_unit;
use crate::DEGENERATE_EPSILON;

/// Result of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Unit surface normal at the hit point.
    pub normal: Vec3,
    /// Distance from the probe origin to the hit point.
    pub distance: f32,
}

/// Anything that can answer a bounded ray query against world geometry.
///
/// Implementations should return the *nearest* hit along `direction`
/// within `max_distance`, or `None`.
#[cfg_attr(test, mockall::automock)]
pub trait SurfaceProbe: Send + Sync {
    /// Casts a ray from `origin` along unit `direction`.
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceSample>;
}

/// Probes below a body, rejecting malformed answers from the collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSampler {
    max_distance: f32,
}

impl SurfaceSampler {
    /// Creates a sampler with the given probe length.
    #[must_use]
    pub const fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }

    /// Maximum probe length.
    #[must_use]
    pub const fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Samples the surface along `-up` from `position`.
    ///
    /// Hits with a zero or non-finite normal, or a distance outside
    /// `[0, max_distance]`, count as "no surface".
    #[must_use]
    pub fn sample_below(
        &self,
        probe: &dyn SurfaceProbe,
        position: Vec3,
        up: Vec3,
    ) -> Option<SurfaceSample> {
        let down = try_unit(-up)?;
        let hit = probe.probe(position, down, self.max_distance)?;
        if !hit.distance.is_finite() || hit.distance < 0.0 || hit.distance > self.max_distance {
            return None;
        }
        let normal = try_unit(hit.normal)?;
        Some(SurfaceSample {
            normal,
            distance: hit.distance,
        })
    }
}

/// One-sided infinite plane. Only rays approaching the front face hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSurface {
    point: Vec3,
    normal: Vec3,
}

impl PlaneSurface {
    /// Plane through `point` facing `normal`. A degenerate normal faces `+Y`.
    #[must_use]
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: try_unit(normal).unwrap_or(Vec3::Y),
        }
    }
}

impl SurfaceProbe for PlaneSurface {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceSample> {
        let denom = direction.dot(self.normal);
        if denom > -DEGENERATE_EPSILON {
            return None;
        }
        let distance = (self.point - origin).dot(self.normal) / denom;
        (0.0..=max_distance)
            .contains(&distance)
            .then_some(SurfaceSample {
                normal: self.normal,
                distance,
            })
    }
}

/// Outer shell of a sphere. Probes starting inside report the shell directly
/// outward at distance zero so a body that has dipped below the surface
/// re-aligns instead of losing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSurface {
    center: Vec3,
    radius: f32,
}

impl SphereSurface {
    /// Sphere of `radius` around `center`.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl SurfaceProbe for SphereSurface {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceSample> {
        let offset = origin - self.center;
        let c = offset.length_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return try_unit(offset).map(|normal| SurfaceSample {
                normal,
                distance: 0.0,
            });
        }
        let b = offset.dot(direction);
        let discriminant = b * b - c;
        if b > 0.0 || discriminant < 0.0 {
            return None;
        }
        let distance = -b - discriminant.sqrt();
        if distance > max_distance {
            return None;
        }
        let hit = origin + direction * distance;
        try_unit(hit - self.center).map(|normal| SurfaceSample { normal, distance })
    }
}

/// Solid axis-aligned box; rays report the face they enter through.
///
/// Like [`SphereSurface`], a probe starting inside reports the closest face
/// at distance zero, which lets a body that walks into a wall adopt the
/// wall as its new floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSurface {
    min: Vec3,
    max: Vec3,
}

impl BoxSurface {
    /// Box spanning the two corners (in any order).
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    fn nearest_face_normal(&self, point: Vec3) -> Vec3 {
        [
            (point.x - self.min.x, Vec3::NEG_X),
            (self.max.x - point.x, Vec3::X),
            (point.y - self.min.y, Vec3::NEG_Y),
            (self.max.y - point.y, Vec3::Y),
            (point.z - self.min.z, Vec3::NEG_Z),
            (self.max.z - point.z, Vec3::Z),
        ]
        .into_iter()
        .min_by_key(|(gap, _)| OrderedFloat(*gap))
        .map_or(Vec3::Y, |(_, normal)| normal)
    }
}

impl SurfaceProbe for BoxSurface {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceSample> {
        if self.contains(origin) {
            return Some(SurfaceSample {
                normal: self.nearest_face_normal(origin),
                distance: 0.0,
            });
        }
        let slabs = [
            (origin.x, direction.x, self.min.x, self.max.x, Vec3::X),
            (origin.y, direction.y, self.min.y, self.max.y, Vec3::Y),
            (origin.z, direction.z, self.min.z, self.max.z, Vec3::Z),
        ];
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;
        let mut normal = Vec3::ZERO;
        for (o, d, lo, hi, axis) in slabs {
            if d.abs() < DEGENERATE_EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (near, far, face) = if d > 0.0 {
                ((lo - o) / d, (hi - o) / d, -axis)
            } else {
                ((hi - o) / d, (lo - o) / d, axis)
            };
            if near > enter {
                enter = near;
                normal = face;
            }
            exit = exit.min(far);
        }
        if enter > exit || enter < 0.0 || enter > max_distance || normal == Vec3::ZERO {
            return None;
        }
        Some(SurfaceSample {
            normal,
            distance: enter,
        })
    }
}

/// Union of surfaces answering with the nearest hit.
#[derive(Default)]
pub struct SurfaceSet {
    surfaces: Vec<Box<dyn SurfaceProbe>>,
}

impl std::fmt::Debug for SurfaceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceSet")
            .field("surfaces", &self.surfaces.len())
            .finish()
    }
}

impl SurfaceSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface, returning the set for chaining.
    #[must_use]
    pub fn with(mut self, surface: impl SurfaceProbe + 'static) -> Self {
        self.surfaces.push(Box::new(surface));
        self
    }

    /// Number of surfaces in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl SurfaceProbe for SurfaceSet {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceSample> {
        self.surfaces
            .iter()
            .filter_map(|s| s.probe(origin, direction, max_distance))
            .min_by_key(|hit| OrderedFloat(hit.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mockall::predicate::always;
    use rstest::rstest;

    #[rstest]
    #[case::above(Vec3::new(0.0, 1.0, 0.0), Some(1.0))]
    #[case::on_surface(Vec3::ZERO, Some(0.0))]
    #[case::too_far(Vec3::new(0.0, 5.0, 0.0), None)]
    #[case::beneath(Vec3::new(0.0, -1.0, 0.0), None)]
    fn plane_probe_distance(#[case] origin: Vec3, #[case] expected: Option<f32>) {
        let floor = PlaneSurface::new(Vec3::ZERO, Vec3::Y);
        let hit = floor.probe(origin, Vec3::NEG_Y, 2.0);
        assert_eq!(hit.map(|h| h.distance), expected);
    }

    #[test]
    fn plane_ignores_parallel_rays() {
        let floor = PlaneSurface::new(Vec3::ZERO, Vec3::Y);
        assert!(floor.probe(Vec3::Y, Vec3::X, 10.0).is_none());
    }

    #[test]
    fn sphere_hit_reports_radial_normal() {
        let sphere = SphereSurface::new(Vec3::ZERO, 5.0);
        let origin = Vec3::new(0.0, 0.0, 6.0);
        let hit = sphere
            .probe(origin, Vec3::NEG_Z, 2.0)
            .expect("probe should hit the shell");
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.normal.distance(Vec3::Z), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn sphere_probe_from_inside_points_outward() {
        let sphere = SphereSurface::new(Vec3::ZERO, 5.0);
        let hit = sphere
            .probe(Vec3::new(4.9, 0.0, 0.0), Vec3::NEG_X, 1.0)
            .expect("inside probe reports the shell");
        assert_eq!(hit.distance, 0.0);
        assert_relative_eq!(hit.normal.distance(Vec3::X), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn sphere_pointing_away_misses() {
        let sphere = SphereSurface::new(Vec3::ZERO, 1.0);
        assert!(sphere.probe(Vec3::new(0.0, 2.0, 0.0), Vec3::Y, 10.0).is_none());
    }

    #[rstest]
    #[case::top_face(Vec3::new(0.5, 2.0, 0.5), Vec3::NEG_Y, Vec3::Y, 1.0)]
    #[case::side_face(Vec3::new(-1.0, 0.5, 0.5), Vec3::X, Vec3::NEG_X, 1.0)]
    #[case::far_face(Vec3::new(0.5, 0.5, 3.0), Vec3::NEG_Z, Vec3::Z, 2.0)]
    fn box_reports_entry_face(
        #[case] origin: Vec3,
        #[case] direction: Vec3,
        #[case] normal: Vec3,
        #[case] distance: f32,
    ) {
        let block = BoxSurface::new(Vec3::ZERO, Vec3::ONE);
        let hit = block
            .probe(origin, direction, 5.0)
            .expect("probe should hit the box");
        assert_eq!(hit.normal, normal);
        assert_relative_eq!(hit.distance, distance, epsilon = 1e-5);
    }

    #[rstest]
    #[case::near_wall_face(Vec3::new(0.05, 0.5, 0.5), Vec3::NEG_X)]
    #[case::near_top_face(Vec3::new(0.5, 0.9, 0.5), Vec3::Y)]
    fn box_probe_from_inside_reports_nearest_face(#[case] origin: Vec3, #[case] normal: Vec3) {
        let block = BoxSurface::new(Vec3::ZERO, Vec3::ONE);
        let hit = block
            .probe(origin, Vec3::NEG_Y, 1.0)
            .expect("inside probe reports a face");
        assert_eq!(hit.normal, normal);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn box_misses_beside_it() {
        let block = BoxSurface::new(Vec3::ZERO, Vec3::ONE);
        assert!(block.probe(Vec3::new(3.0, 2.0, 0.5), Vec3::NEG_Y, 5.0).is_none());
    }

    #[test]
    fn set_prefers_nearest_hit() {
        let set = SurfaceSet::new()
            .with(PlaneSurface::new(Vec3::ZERO, Vec3::Y))
            .with(BoxSurface::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0)));
        let hit = set
            .probe(Vec3::new(0.0, 1.5, 0.0), Vec3::NEG_Y, 3.0)
            .expect("both surfaces are below");
        assert_relative_eq!(hit.distance, 0.5, epsilon = 1e-5);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn sampler_probes_along_negative_up() {
        let mut probe = MockSurfaceProbe::new();
        probe
            .expect_probe()
            .withf(|_, direction, max| *direction == Vec3::NEG_X && (*max - 2.0).abs() < 1e-6)
            .times(1)
            .returning(|_, _, _| {
                Some(SurfaceSample {
                    normal: Vec3::new(2.0, 0.0, 0.0),
                    distance: 0.5,
                })
            });
        let sample = SurfaceSampler::new(2.0)
            .sample_below(&probe, Vec3::ZERO, Vec3::X)
            .expect("mock returns a hit");
        assert_eq!(sample.normal, Vec3::X);
    }

    #[rstest]
    #[case::zero_normal(Vec3::ZERO, 0.5)]
    #[case::nan_normal(Vec3::NAN, 0.5)]
    #[case::beyond_range(Vec3::Y, 9.0)]
    #[case::negative_distance(Vec3::Y, -0.5)]
    fn sampler_discards_malformed_hits(#[case] normal: Vec3, #[case] distance: f32) {
        let mut probe = MockSurfaceProbe::new();
        probe
            .expect_probe()
            .with(always(), always(), always())
            .returning(move |_, _, _| Some(SurfaceSample { normal, distance }));
        let sample = SurfaceSampler::new(2.0).sample_below(&probe, Vec3::ZERO, Vec3::Y);
        assert!(sample.is_none());
    }
}
