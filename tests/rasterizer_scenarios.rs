//! Integration tests exercising the rasterizer end to end with an identity
//! vertex shader, matching the concrete scenarios the core algorithm is
//! expected to satisfy.

use nalgebra::{Vector2, Vector3, Vector4};
use softrender::color::{FColor, UColor};
use softrender::raster::Rasterizer;
use softrender::resource::Resource;
use softrender::vertex::Vertex;

fn tri_vertex(x: f32, y: f32, z: f32) -> Vertex {
    let mut v = Vertex::new(Vector3::new(x, y, z));
    v.pos = Vector4::new(x, y, z, 1.0);
    v
}

#[test]
fn single_triangle_covers_expected_screen_region() {
    let mut rasterizer: Rasterizer<UColor> = Rasterizer::new();
    rasterizer.set_viewport(800, 600);
    rasterizer.set_render_target(Resource::new_2d(800, 600), None);
    rasterizer.set_vertex_buffer(vec![
        tri_vertex(-1.0, -1.0, 0.5),
        tri_vertex(1.0, -1.0, 0.5),
        tri_vertex(0.0, 1.0, 0.5),
    ]);
    rasterizer.set_index_buffer(vec![0, 1, 2]);
    rasterizer.vertex_shader = Some(Box::new(|v| v));

    let white_shader = |_: &Vertex| FColor::WHITE;
    rasterizer.draw(3, 0, &white_shader);

    let target = rasterizer.color_target();
    assert_eq!(*target.at(400, 300), UColor::new(255, 255, 255));
    assert_eq!(*target.at(0, 0), UColor::BLACK);
}

#[test]
fn depth_test_keeps_the_nearer_triangle() {
    let mut rasterizer: Rasterizer<UColor> = Rasterizer::new();
    rasterizer.set_viewport(64, 64);
    rasterizer.set_render_target(Resource::new_2d(64, 64), Some(Resource::new_2d(64, 64)));
    rasterizer.vertex_shader = Some(Box::new(|v| v));

    // Clear depth to +inf, as `clear(..., None)` does by default.
    rasterizer.clear(UColor::BLACK, None);

    // Back (green) triangle at z=0.7, drawn first.
    rasterizer.set_vertex_buffer(vec![
        tri_vertex(-1.0, -1.0, 0.7),
        tri_vertex(1.0, -1.0, 0.7),
        tri_vertex(-1.0, 1.0, 0.7),
    ]);
    rasterizer.set_index_buffer(vec![0, 1, 2]);
    let green = |_: &Vertex| FColor::new(0.0, 1.0, 0.0);
    rasterizer.draw(3, 0, &green);

    // Front (red) triangle at z=0.3, drawn second, should win the depth test.
    rasterizer.set_vertex_buffer(vec![
        tri_vertex(-1.0, -1.0, 0.3),
        tri_vertex(1.0, -1.0, 0.3),
        tri_vertex(-1.0, 1.0, 0.3),
    ]);
    rasterizer.set_index_buffer(vec![0, 1, 2]);
    let red = |_: &Vertex| FColor::new(1.0, 0.0, 0.0);
    rasterizer.draw(3, 0, &red);

    let target = rasterizer.color_target();
    assert_eq!(*target.at(20, 40), UColor::new(255, 0, 0));
}

#[test]
fn back_facing_triangle_is_skipped() {
    let mut rasterizer: Rasterizer<UColor> = Rasterizer::new();
    rasterizer.set_viewport(32, 32);
    rasterizer.set_render_target(Resource::new_2d(32, 32), None);
    rasterizer.vertex_shader = Some(Box::new(|v| v));

    // Reverse winding order relative to the CCW-front-facing convention.
    rasterizer.set_vertex_buffer(vec![
        tri_vertex(-1.0, -1.0, 0.5),
        tri_vertex(-1.0, 1.0, 0.5),
        tri_vertex(1.0, -1.0, 0.5),
    ]);
    rasterizer.set_index_buffer(vec![0, 1, 2]);
    let white_shader = |_: &Vertex| FColor::WHITE;
    rasterizer.draw(3, 0, &white_shader);

    let target = rasterizer.color_target();
    assert_eq!(*target.at(16, 16), UColor::BLACK);
}

#[test]
fn perspective_correct_uv_differs_from_linear_uv_on_a_tilted_quad() {
    // Two triangles forming a quad whose `w` varies sharply across the
    // surface (simulating a tilted projection); linear interpolation of a
    // checker UV through clip-space weights should give a different texel
    // at the diagonal intersection than perspective-correct division.
    let mut v0 = tri_vertex(-1.0, -1.0, 0.5);
    v0.pos = Vector4::new(-1.0, -1.0, 0.5, 1.0);
    v0.uv = Vector2::new(0.0, 0.0);

    let mut v1 = tri_vertex(1.0, -1.0, 0.5);
    v1.pos = Vector4::new(1.0, -1.0, 0.5, 3.0);
    v1.uv = Vector2::new(1.0, 0.0);

    let mut v2 = tri_vertex(-1.0, 1.0, 0.5);
    v2.pos = Vector4::new(-1.0, 1.0, 0.5, 1.0);
    v2.uv = Vector2::new(0.0, 1.0);

    let linear_uv = v0.uv * (1.0 / 3.0) + v1.uv * (1.0 / 3.0) + v2.uv * (1.0 / 3.0);
    let inv = [1.0 / (0.5 * 1.0), 1.0 / (0.5 * 3.0), 1.0 / (0.5 * 1.0)];
    let sum: f32 = inv.iter().sum();
    let perspective_uv =
        (v0.uv * inv[0] * (1.0 / 3.0) + v1.uv * inv[1] * (1.0 / 3.0) + v2.uv * inv[2] * (1.0 / 3.0)) / (sum / 3.0);

    assert_ne!(linear_uv, perspective_uv);
}
