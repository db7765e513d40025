//! Closest-hit resolution over an ordered candidate list.

use glam::{Mat4, Vec3};
use vrinteract_core::{Ray, Raycast};

/// Nearest hit among several candidates.
#[derive(Debug)]
pub struct Intersection<'a, T: ?Sized> {
    /// Candidate that was hit.
    pub object: &'a T,
    /// Position of the candidate in the input sequence.
    pub index: usize,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

impl<T: ?Sized> Clone for Intersection<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Intersection<'_, T> {}

/// Query every candidate in order and keep the nearest hit.
///
/// Comparison is strict, so the earliest candidate wins a tie. Callers order
/// candidates by priority.
pub fn resolve_closest<'a, T, I>(candidates: I, ray: &Ray) -> Option<Intersection<'a, T>>
where
    T: Raycast + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    candidates
        .into_iter()
        .enumerate()
        .fold(None, |closest, (index, object)| {
            let Some(hit) = object.raycast(ray) else {
                return closest;
            };
            match closest {
                Some(best) if best.distance <= hit.distance => Some(best),
                _ => Some(Intersection {
                    object,
                    index,
                    point: hit.point,
                    distance: hit.distance,
                }),
            }
        })
}

/// Pointer ray of a controller: origin at its world position, direction along
/// its forward axis (-Z) turned by the rotation part of `world`.
pub fn controller_ray(world: &Mat4) -> Ray {
    let (_, rotation, translation) = world.to_scale_rotation_translation();
    Ray::new(translation, rotation * Vec3::NEG_Z)
}
