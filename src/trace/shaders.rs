//! Miss/closest-hit/any-hit shader variants for [`super::RayTracer`].
//!
//! Grounded in `raytracer_renderer.cpp`'s `black_shader` and its
//! `closest_hit_shader` lambda (Monte-Carlo diffuse bounce), plus the
//! direct-lighting-with-shadows variant described alongside them.

use nalgebra::Vector3;
use rand::Rng;

use crate::color::FColor;
use crate::trace::{Light, Payload, Ray, RayTracer, Triangle};

/// Always returns black. What the source installs by default.
pub fn black_miss_shader(_ray: &Ray) -> Payload {
    Payload {
        t: -1.0,
        bary: Vector3::zeros(),
        color: FColor::BLACK,
    }
}

/// Simple sky gradient from white at the horizon to blue overhead, based on
/// `ray.direction.y`.
pub fn sky_miss_shader(ray: &Ray) -> Payload {
    let t = 0.5 * (ray.direction.y + 1.0);
    let color = FColor::WHITE * (1.0 - t) + FColor::new(0.5, 0.7, 1.0) * t;
    Payload {
        t: -1.0,
        bary: Vector3::zeros(),
        color,
    }
}

/// Payload carrying `t = -1` and no color, used by the shadow sub-tracer's
/// any-hit/miss pair to answer "nothing is in the way" without touching
/// `color` semantics of the primary tracer's shading.
pub fn occlusion_miss_shader(_ray: &Ray) -> Payload {
    Payload {
        t: -1.0,
        bary: Vector3::zeros(),
        color: FColor::BLACK,
    }
}

/// Shadow sub-tracer any-hit shader: the first hit found is treated as full
/// occlusion, independent of `t`.
pub fn shadow_any_hit_shader<R>(
    _tracer: &RayTracer<R>,
    _ray: &Ray,
    payload: &Payload,
    _triangle: &Triangle,
) -> Payload {
    *payload
}

/// Monte-Carlo diffuse closest-hit shader: starts from the triangle's
/// emissive term and adds one recursive bounce in a cosine-weighted-ish
/// (rejection-free, biased) hemisphere direction around the shading normal.
pub fn diffuse_closest_hit_shader<R: Clone + Default + Send + Sync + From<FColor>>(
    tracer: &RayTracer<R>,
    ray: &Ray,
    payload: &Payload,
    triangle: &Triangle,
    depth: usize,
) -> Payload {
    let mut result = *payload;
    result.color = triangle.emissive;

    let position = ray.position + ray.direction * payload.t;
    let normal = triangle.na * payload.bary.x + triangle.nb * payload.bary.y + triangle.nc * payload.bary.z;

    let mut rng = rand::thread_rng();
    let mut rand_direction = Vector3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    if rand_direction.dot(&normal) < 0.0 {
        rand_direction = -rand_direction;
    }

    let new_ray = Ray::new(position, rand_direction);
    let next = tracer.trace_ray(&new_ray, depth, 1000.0, 0.001);
    result.color += next.color * triangle.diffuse * normal.dot(&new_ray.direction).max(0.0);

    result
}

/// Direct-lighting-with-shadows closest-hit shader. `shadow_tracer` shares
/// the primary tracer's acceleration structure (cloned once at setup) with
/// an any-hit shader installed, so a shadow ray stops at the first occluder
/// instead of searching for the nearest one. Takes ownership of both so the
/// returned closure can be boxed as a `'static` shader.
pub fn direct_lighting_closest_hit_shader<R: Clone + Default + Send + Sync + From<FColor> + 'static>(
    shadow_tracer: RayTracer<R>,
    lights: Vec<Light>,
) -> impl Fn(&RayTracer<R>, &Ray, &Payload, &Triangle, usize) -> Payload + Send + Sync + 'static {
    move |_tracer, ray, payload, triangle, _depth| {
        let mut color = triangle.emissive;

        let position = ray.position + ray.direction * payload.t;
        let normal =
            triangle.na * payload.bary.x + triangle.nb * payload.bary.y + triangle.nc * payload.bary.z;

        for light in &lights {
            let to_light_vec = light.position - position;
            let distance = to_light_vec.norm();
            let to_light = to_light_vec / distance;

            let shadow_ray = Ray::new(position, to_light);
            let occlusion = shadow_tracer.trace_ray(&shadow_ray, 1, distance - 1e-3, 1e-3);
            if occlusion.t >= 0.0 {
                continue; // occluded
            }

            color += light.color * triangle.diffuse * normal.dot(&to_light).max(0.0);
        }

        Payload {
            t: payload.t,
            bary: payload.bary,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::UColor;

    #[test]
    fn shadow_any_hit_passes_payload_through() {
        let tracer: RayTracer<UColor> = RayTracer::new();
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0));
        let payload = Payload {
            t: 2.5,
            bary: Vector3::new(0.2, 0.3, 0.5),
            color: FColor::BLACK,
        };
        let triangle = Triangle::new(
            &crate::vertex::Vertex::new(Vector3::new(-1.0, -1.0, 5.0)),
            &crate::vertex::Vertex::new(Vector3::new(1.0, -1.0, 5.0)),
            &crate::vertex::Vertex::new(Vector3::new(0.0, 1.0, 5.0)),
        );
        let result = shadow_any_hit_shader(&tracer, &ray, &payload, &triangle);
        assert_eq!(result.t, 2.5);
    }

    #[test]
    fn sky_miss_shader_is_white_at_horizon() {
        let ray = Ray::new(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0));
        let payload = sky_miss_shader(&ray);
        assert_eq!(payload.color, FColor::WHITE);
    }
}
