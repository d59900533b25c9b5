//! Ray tracer: Möller–Trumbore intersection, one AABB per mesh shape,
//! Halton-jittered accumulation, and pluggable miss/closest-hit/any-hit
//! shaders.
//!
//! Grounded in `renderer/raytracer/raytracer.h`. The source installs
//! `closest_hit_shader`/`any_hit_shader` as closures that capture the
//! `raytracer` instance itself (for recursive `trace_ray` calls on bounced
//! rays); Rust can't express a self-referential closure field directly, so
//! shaders here take the tracer as an explicit first argument instead of
//! capturing it. See DESIGN.md.

pub mod shaders;

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::color::FColor;
use crate::resource::Resource;
use crate::vertex::Vertex;

pub struct Ray {
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(position: Vector3<f32>, direction: Vector3<f32>) -> Ray {
        Ray {
            position,
            direction: direction.normalize(),
        }
    }
}

/// Intersection result. `t < 0` signals a miss; `bary` is `(weight_a,
/// weight_b, weight_c)`.
#[derive(Debug, Clone, Copy)]
pub struct Payload {
    pub t: f32,
    pub bary: Vector3<f32>,
    pub color: FColor,
}

impl Default for Payload {
    fn default() -> Payload {
        Payload {
            t: -1.0,
            bary: Vector3::zeros(),
            color: FColor::BLACK,
        }
    }
}

/// One triangle's world-space geometry and flat-shaded material, baked out
/// of three [`Vertex`]es at acceleration-structure build time.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub a: Vector3<f32>,
    pub b: Vector3<f32>,
    pub c: Vector3<f32>,
    pub ba: Vector3<f32>,
    pub ca: Vector3<f32>,
    pub na: Vector3<f32>,
    pub nb: Vector3<f32>,
    pub nc: Vector3<f32>,
    pub ambient: FColor,
    pub diffuse: FColor,
    pub emissive: FColor,
}

impl Triangle {
    pub fn new(va: &Vertex, vb: &Vertex, vc: &Vertex) -> Triangle {
        let (a, b, c) = (va.pos.xyz(), vb.pos.xyz(), vc.pos.xyz());
        Triangle {
            a,
            b,
            c,
            ba: b - a,
            ca: c - a,
            na: va.norm,
            nb: vb.norm,
            nc: vc.norm,
            ambient: va.ambient,
            diffuse: va.diffuse,
            emissive: va.emissive,
        }
    }
}

/// An axis-aligned bounding box over one shape's triangles, used as a
/// coarse prune before the per-triangle intersection test.
#[derive(Debug, Clone, Default)]
pub struct Aabb {
    triangles: Vec<Triangle>,
    min: Vector3<f32>,
    max: Vector3<f32>,
}

impl Aabb {
    pub fn add_triangle(&mut self, triangle: Triangle) {
        if self.triangles.is_empty() {
            self.min = triangle.a;
            self.max = triangle.a;
        }
        self.max = self.max.sup(&triangle.a).sup(&triangle.b).sup(&triangle.c);
        self.min = self.min.inf(&triangle.a).inf(&triangle.b).inf(&triangle.c);
        self.triangles.push(triangle);
    }

    pub fn get_triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Slab test: true if the ray's entry into every axis happens no later
    /// than its exit from any axis.
    pub fn aabb_test(&self, ray: &Ray) -> bool {
        let inv_dir = Vector3::new(1.0 / ray.direction.x, 1.0 / ray.direction.y, 1.0 / ray.direction.z);
        let t0 = (self.max - ray.position).component_mul(&inv_dir);
        let t1 = (self.min - ray.position).component_mul(&inv_dir);

        let t_min = t0.inf(&t1);
        let t_max = t0.sup(&t1);

        t_min.max() <= t_max.min()
    }
}

/// A point light, used by the direct-lighting-with-shadows closest-hit
/// shader variant.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub position: Vector3<f32>,
    pub color: FColor,
}

pub type MissShader = dyn Fn(&Ray) -> Payload + Send + Sync;
pub type ClosestHitShader<R> =
    dyn Fn(&RayTracer<R>, &Ray, &Payload, &Triangle, usize) -> Payload + Send + Sync;
pub type AnyHitShader<R> = dyn Fn(&RayTracer<R>, &Ray, &Payload, &Triangle) -> Payload + Send + Sync;

/// CPU ray tracer. `R` is the render-target pixel type.
pub struct RayTracer<R> {
    width: usize,
    height: usize,

    render_target: Option<Resource<R>>,
    history: Option<Resource<FColor>>,

    vertex_buffers: Vec<Vec<Vertex>>,
    index_buffers: Vec<Vec<u32>>,
    pub acceleration_structures: Vec<Aabb>,

    pub miss_shader: Option<Box<MissShader>>,
    pub closest_hit_shader: Option<Box<ClosestHitShader<R>>>,
    pub any_hit_shader: Option<Box<AnyHitShader<R>>>,
}

impl<R: Clone + Default + Send + Sync + From<FColor>> RayTracer<R> {
    pub fn new() -> RayTracer<R> {
        RayTracer {
            width: 1920,
            height: 1080,
            render_target: None,
            history: None,
            vertex_buffers: Vec::new(),
            index_buffers: Vec::new(),
            acceleration_structures: Vec::new(),
            miss_shader: None,
            closest_hit_shader: None,
            any_hit_shader: None,
        }
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.history = Some(Resource::new_2d(width, height));
    }

    pub fn set_render_target(&mut self, target: Resource<R>) {
        self.render_target = Some(target);
    }

    pub fn set_vertex_buffers(&mut self, buffers: Vec<Vec<Vertex>>) {
        self.vertex_buffers = buffers;
    }

    pub fn set_index_buffers(&mut self, buffers: Vec<Vec<u32>>) {
        self.index_buffers = buffers;
    }

    /// Builds one [`Aabb`] per vertex/index buffer pair.
    pub fn build_acceleration_structure(&mut self) {
        self.acceleration_structures.clear();
        for (vertices, indices) in self.vertex_buffers.iter().zip(&self.index_buffers) {
            let mut aabb = Aabb::default();
            for tri in indices.chunks(3) {
                if tri.len() < 3 {
                    continue;
                }
                aabb.add_triangle(Triangle::new(
                    &vertices[tri[0] as usize],
                    &vertices[tri[1] as usize],
                    &vertices[tri[2] as usize],
                ));
            }
            self.acceleration_structures.push(aabb);
        }
    }

    pub fn clear(&mut self, clear_value: R) {
        if let Some(target) = self.render_target.as_mut() {
            target.clear(clear_value);
        }
        if let Some(history) = self.history.as_mut() {
            history.clear(FColor::BLACK);
        }
    }

    pub fn render_target(&self) -> &Resource<R> {
        self.render_target.as_ref().expect("render target not set")
    }

    pub fn into_render_target(self) -> Resource<R> {
        self.render_target.expect("render target not set")
    }

    /// Halton(2,3) sequence jitter, offset to `[-0.5, 0.5)`, used to
    /// decorrelate per-frame sample positions within a pixel.
    pub fn get_jitter(frame_id: usize) -> (f32, f32) {
        fn halton(mut index: usize, base: usize) -> f32 {
            let mut result = -0.5;
            let mut fraction = 1.0 / base as f32;
            while index > 0 {
                result += (index % base) as f32 * fraction;
                fraction /= base as f32;
                index /= base;
            }
            result
        }
        (halton(frame_id + 1, 2), halton(frame_id + 1, 3))
    }

    /// Traces `accumulation_num` jittered frames of primary rays through a
    /// pinhole camera defined by `position`/`direction`/`right`/`up`/`fov`,
    /// averaging their color into the history buffer and converting the
    /// result into the render target.
    pub fn ray_generation(
        &mut self,
        position: Vector3<f32>,
        direction: Vector3<f32>,
        right: Vector3<f32>,
        up: Vector3<f32>,
        fov: f32,
        depth: usize,
        accumulation_num: usize,
    ) {
        let (w, h) = (self.width, self.height);
        let aspect = w as f32 / h as f32;
        let tan_half_fov = (fov / 2.0).tan();

        for frame_id in 0..accumulation_num {
            log::info!("tracing frame {}/{}", frame_id + 1, accumulation_num);
            let (jx, jy) = Self::get_jitter(frame_id);

            let frame: Vec<FColor> = (0..w * h)
                .into_par_iter()
                .map(|i| {
                    let (x, y) = (i % w, i / w);
                    let mut u = (2.0 * x as f32 + jx) / w as f32 - 1.0;
                    let v = (2.0 * y as f32 + jy) / h as f32 - 1.0;
                    u *= aspect;
                    u *= tan_half_fov;
                    let v = v * tan_half_fov;

                    let primary_direction = direction + right * u - up * v;
                    let ray = Ray::new(position, primary_direction);
                    self.trace_ray(&ray, depth, 1000.0, 0.001).color
                })
                .collect();

            let history = self.history.as_mut().expect("viewport not set");
            for (i, color) in frame.into_iter().enumerate() {
                *history.item_mut(i) += color / accumulation_num as f32;
            }
        }

        let history = self.history.as_ref().expect("viewport not set");
        let target = self.render_target.as_mut().expect("render target not set");
        for i in 0..history.len() {
            *target.item_mut(i) = R::from(*history.item(i));
        }
    }

    /// Walks every acceleration structure for the closest triangle `ray`
    /// hits within `[min_t, max_t]`, dispatching to the any-hit shader on
    /// first hit if installed, and otherwise to the closest-hit or miss
    /// shader once every structure has been tested.
    pub fn trace_ray(&self, ray: &Ray, depth: usize, max_t: f32, min_t: f32) -> Payload {
        let miss = || (self.miss_shader.as_ref().expect("miss shader must be set"))(ray);

        if depth == 0 {
            return miss();
        }
        let depth = depth - 1;

        let mut closest = Payload {
            t: max_t,
            ..Default::default()
        };
        let mut closest_triangle: Option<&Triangle> = None;

        for aabb in &self.acceleration_structures {
            if !aabb.aabb_test(ray) {
                continue;
            }

            for triangle in aabb.get_triangles() {
                let payload = self.intersection_shader(triangle, ray);

                if payload.t >= min_t && closest.t > payload.t {
                    closest = payload;
                    closest_triangle = Some(triangle);
                    if let Some(any_hit) = &self.any_hit_shader {
                        return any_hit(self, ray, &payload, triangle);
                    }
                }
            }
        }

        match (closest_triangle, &self.closest_hit_shader) {
            (Some(triangle), Some(shader)) => shader(self, ray, &closest, triangle, depth),
            _ => miss(),
        }
    }

    /// Möller–Trumbore ray-triangle intersection. Returns a payload with
    /// `t == -1` on miss.
    pub fn intersection_shader(&self, triangle: &Triangle, ray: &Ray) -> Payload {
        const TOLERANCE: f32 = 1e-8;

        let pvec = ray.direction.cross(&triangle.ca);
        let determinant = pvec.dot(&triangle.ba);
        if determinant > -TOLERANCE && determinant < TOLERANCE {
            return Payload::default();
        }
        let inv_det = 1.0 / determinant;

        let tvec = ray.position - triangle.a;
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return Payload::default();
        }

        let qvec = tvec.cross(&triangle.ba);
        let v = ray.direction.dot(&qvec) * inv_det;
        if v < 0.0 || v + u > 1.0 {
            return Payload::default();
        }
        let w = 1.0 - v - u;

        Payload {
            t: triangle.ca.dot(&qvec) * inv_det,
            bary: Vector3::new(w, u, v),
            color: FColor::BLACK,
        }
    }
}

impl<R: Clone + Default + Send + From<FColor>> Default for RayTracer<R> {
    fn default() -> Self {
        RayTracer::new()
    }
}
