use glam::Vec3;
use log::trace;

use super::{
    contact::{CollisionInfo, ContactPoint},
    primitives::{
        box_vs_sphere, capsule_segment, closest_point_on_segment, closest_points_between_segments,
        sphere_vs_sphere,
    },
    sat::{SATAlgorithm, SatBox},
};
use crate::{
    core::{
        rigidbody::Collidable,
        types::Transform,
        volume::{Volume, VolumeKind},
    },
    utils::math::unit_or,
};

/// Pair routine: receives volumes in the order named by its table entry.
type PairFn = fn(&Volume, &Transform, &Volume, &Transform) -> Option<ContactPoint>;

#[derive(Clone, Copy)]
struct PairEntry {
    routine: PairFn,
    /// The routine expects the operands in the opposite order.
    swap: bool,
}

const fn direct(routine: PairFn) -> PairEntry {
    PairEntry {
        routine,
        swap: false,
    }
}

const fn mirrored(routine: PairFn) -> PairEntry {
    PairEntry {
        routine,
        swap: true,
    }
}

/// Indexed by `[kind_a][kind_b]`; every unordered pair has exactly one
/// routine, and the mirrored cell reuses it with `swap` set.
const DISPATCH: [[PairEntry; VolumeKind::COUNT]; VolumeKind::COUNT] = [
    // A = AABB
    [
        direct(aabb_aabb),
        mirrored(obb_aabb),
        direct(aabb_sphere),
        mirrored(capsule_aabb),
    ],
    // A = OBB
    [
        direct(obb_aabb),
        direct(obb_obb),
        direct(obb_sphere),
        mirrored(capsule_obb),
    ],
    // A = Sphere
    [
        mirrored(aabb_sphere),
        mirrored(obb_sphere),
        direct(sphere_sphere),
        mirrored(capsule_sphere),
    ],
    // A = Capsule
    [
        direct(capsule_aabb),
        direct(capsule_obb),
        direct(capsule_sphere),
        direct(capsule_capsule),
    ],
];

/// Narrow phase dispatcher producing one contact per overlapping pair.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Tests two bodies. Bodies without a volume never collide.
    /// The result's `a`/`b` follow the argument order.
    pub fn test_collision<A, B>(body_a: &A, body_b: &B) -> Option<CollisionInfo>
    where
        A: Collidable + ?Sized,
        B: Collidable + ?Sized,
    {
        let volume_a = body_a.volume()?;
        let volume_b = body_b.volume()?;

        let point =
            Self::collide_volumes(volume_a, body_a.transform(), volume_b, body_b.transform())?;
        Some(CollisionInfo {
            a: body_a.id(),
            b: body_b.id(),
            point,
        })
    }

    /// Tests two volumes; the contact normal points from A to B.
    pub fn collide_volumes(
        volume_a: &Volume,
        transform_a: &Transform,
        volume_b: &Volume,
        transform_b: &Transform,
    ) -> Option<ContactPoint> {
        let entry = DISPATCH[volume_a.kind().index()][volume_b.kind().index()];
        if entry.swap {
            (entry.routine)(volume_b, transform_b, volume_a, transform_a).map(ContactPoint::swapped)
        } else {
            (entry.routine)(volume_a, transform_a, volume_b, transform_b)
        }
    }

    /// Whether any routine can ever report a contact for this pair of kinds.
    pub fn is_supported(kind_a: VolumeKind, kind_b: VolumeKind) -> bool {
        !matches!(
            (kind_a, kind_b),
            (VolumeKind::Capsule, VolumeKind::Aabb)
                | (VolumeKind::Aabb, VolumeKind::Capsule)
                | (VolumeKind::Capsule, VolumeKind::Obb)
                | (VolumeKind::Obb, VolumeKind::Capsule)
        )
    }
}

/// Fallback normal for coincident centres: the direction between the body
/// origins, or +Y when those coincide too.
fn separation_fallback(transform_a: &Transform, transform_b: &Transform) -> Vec3 {
    unit_or(transform_b.position - transform_a.position, Vec3::Y)
}

fn aabb_aabb(a: &Volume, ta: &Transform, b: &Volume, tb: &Transform) -> Option<ContactPoint> {
    let (size_a, size_b) = match (a, b) {
        (Volume::Aabb { half_extents: a }, Volume::Aabb { half_extents: b }) => (*a, *b),
        _ => return None,
    };

    let delta = tb.position - ta.position;
    let total = size_a + size_b;
    if !(delta.x.abs() < total.x && delta.y.abs() < total.y && delta.z.abs() < total.z) {
        return None;
    }

    let max_a = ta.position + size_a;
    let min_a = ta.position - size_a;
    let max_b = tb.position + size_b;
    let min_b = tb.position - size_b;

    // Coincident opposite faces on an axis with no centre offset lean toward
    // the first non-zero offset component, so swapped calls stay mirrored.
    let lean = [delta.x, delta.y, delta.z]
        .into_iter()
        .find(|component| *component != 0.0)
        .unwrap_or(-1.0);

    let mut penetration = f32::MAX;
    let mut best_axis = Vec3::ZERO;
    for (i, axis) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().enumerate() {
        let toward_negative = max_b[i] - min_a[i];
        let toward_positive = max_a[i] - min_b[i];
        let (distance, face) = if toward_negative < toward_positive {
            (toward_negative, -axis)
        } else if toward_positive < toward_negative {
            (toward_positive, axis)
        } else if lean > 0.0 {
            (toward_positive, axis)
        } else {
            (toward_negative, -axis)
        };

        if distance < penetration {
            penetration = distance;
            best_axis = face;
        }
    }

    Some(ContactPoint::new(Vec3::ZERO, Vec3::ZERO, best_axis, penetration))
}

fn sphere_sphere(a: &Volume, ta: &Transform, b: &Volume, tb: &Transform) -> Option<ContactPoint> {
    let (Volume::Sphere { radius: radius_a }, Volume::Sphere { radius: radius_b }) = (a, b) else {
        return None;
    };
    sphere_vs_sphere(ta.position, *radius_a, tb.position, *radius_b, Vec3::Y)
}

fn obb_obb(a: &Volume, ta: &Transform, b: &Volume, tb: &Transform) -> Option<ContactPoint> {
    let (Volume::Obb { half_extents: size_a }, Volume::Obb { half_extents: size_b }) = (a, b) else {
        return None;
    };
    SATAlgorithm::intersect_boxes(&SatBox::oriented(ta, *size_a), &SatBox::oriented(tb, *size_b))
}

/// The AABB rides through SAT as an unrotated box; its contact offset is
/// not meaningful and is zeroed.
fn obb_aabb(a: &Volume, ta: &Transform, b: &Volume, tb: &Transform) -> Option<ContactPoint> {
    let (size_a, size_b) = match (a, b) {
        (Volume::Obb { half_extents: a }, Volume::Aabb { half_extents: b }) => (*a, *b),
        _ => return None,
    };
    let mut contact = SATAlgorithm::intersect_boxes(
        &SatBox::oriented(ta, size_a),
        &SatBox::axis_aligned(tb, size_b),
    )?;
    contact.local_b = Vec3::ZERO;
    Some(contact)
}

fn aabb_sphere(a: &Volume, ta: &Transform, b: &Volume, tb: &Transform) -> Option<ContactPoint> {
    let (Volume::Aabb { half_extents }, Volume::Sphere { radius }) = (a, b) else {
        return None;
    };
    let hit = box_vs_sphere(*half_extents, tb.position - ta.position, *radius)?;
    Some(ContactPoint::new(
        hit.closest,
        -hit.normal * *radius,
        hit.normal,
        hit.penetration,
    ))
}

fn obb_sphere(a: &Volume, ta: &Transform, b: &Volume, tb: &Transform) -> Option<ContactPoint> {
    let (Volume::Obb { half_extents }, Volume::Sphere { radius }) = (a, b) else {
        return None;
    };
    let local_center = ta.inverse_transform_point(tb.position);
    let hit = box_vs_sphere(*half_extents, local_center, *radius)?;
    let normal = ta.orientation * hit.normal;
    Some(ContactPoint::new(
        ta.orientation * hit.closest,
        -normal * *radius,
        normal,
        hit.penetration,
    ))
}

fn capsule_capsule(a: &Volume, ta: &Transform, b: &Volume, tb: &Transform) -> Option<ContactPoint> {
    let (
        Volume::Capsule {
            half_height: half_a,
            radius: radius_a,
        },
        Volume::Capsule {
            half_height: half_b,
            radius: radius_b,
        },
    ) = (a, b)
    else {
        return None;
    };

    let (a0, a1) = capsule_segment(ta, *half_a);
    let (b0, b1) = capsule_segment(tb, *half_b);
    let (best_a, best_b) = closest_points_between_segments(a0, a1, b0, b1);

    let fallback = separation_fallback(ta, tb);
    let contact = sphere_vs_sphere(best_a, *radius_a, best_b, *radius_b, fallback)?;
    Some(ContactPoint::new(
        best_a - ta.position + contact.local_a,
        best_b - tb.position + contact.local_b,
        contact.normal,
        contact.penetration,
    ))
}

fn capsule_sphere(a: &Volume, ta: &Transform, b: &Volume, tb: &Transform) -> Option<ContactPoint> {
    let (
        Volume::Capsule {
            half_height,
            radius: capsule_radius,
        },
        Volume::Sphere { radius },
    ) = (a, b)
    else {
        return None;
    };

    let (bottom, top) = capsule_segment(ta, *half_height);
    let on_axis = closest_point_on_segment(bottom, top, tb.position);
    let fallback = separation_fallback(ta, tb);
    let contact = sphere_vs_sphere(on_axis, *capsule_radius, tb.position, *radius, fallback)?;
    Some(ContactPoint::new(
        on_axis - ta.position + contact.local_a,
        contact.local_b,
        contact.normal,
        contact.penetration,
    ))
}

/// Unsupported: capsules never report contacts against axis-aligned boxes.
fn capsule_aabb(_: &Volume, _: &Transform, _: &Volume, _: &Transform) -> Option<ContactPoint> {
    trace!("capsule vs AABB is unsupported, reporting no contact");
    None
}

/// Unsupported: capsules never report contacts against oriented boxes.
fn capsule_obb(_: &Volume, _: &Transform, _: &Volume, _: &Transform) -> Option<ContactPoint> {
    trace!("capsule vs OBB is unsupported, reporting no contact");
    None
}
