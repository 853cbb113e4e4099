use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, interpolate3, is_inside_triangle, lerp,
    perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::{Interpolatable, Shader};
use nalgebra::{Point2, Vector3, Vector4};
use rayon::prelude::*;

/// Barycentric distance from an edge under which a wireframe fragment is kept.
const WIREFRAME_THRESHOLD: f32 = 0.02;

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum CullMode {
    Back,
    Front,
    None,
}

/// Draws triangles and line segments onto a [`FrameBuffer`].
///
/// The state is per draw call: the renderer builds one from each material.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    pub cull_mode: CullMode,
    pub wireframe: bool,
    /// Coverage in `[0, 1]`; below 1 fragments are blended over the buffer.
    pub opacity: f32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

type ClipVertex<V> = (Vector4<f32>, V);

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
            wireframe: false,
            opacity: 1.0,
        }
    }

    /// Rasterizes one clip-space triangle after Sutherland-Hodgman clipping
    /// against the six frustum planes.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        // A triangle clipped by six planes has at most nine corners.
        let mut polygon: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        let mut scratch: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        polygon.extend(clip_coords.iter().copied().zip(varyings.iter().copied()));

        // (axis, sign): inside when sign * p[axis] <= p.w
        const PLANES: [(usize, f32); 6] = [
            (0, 1.0),
            (0, -1.0),
            (1, 1.0),
            (1, -1.0),
            (2, 1.0),
            (2, -1.0),
        ];

        for &(axis, sign) in &PLANES {
            if polygon.is_empty() {
                return;
            }
            clip_polygon_against_plane(&polygon, &mut scratch, axis, sign);
            std::mem::swap(&mut polygon, &mut scratch);
        }

        if polygon.len() < 3 {
            return;
        }

        // The clipped polygon is convex: fan it out from the first corner.
        let first = polygon[0];
        for pair in polygon[1..].windows(2) {
            self.rasterize_clipped(
                framebuffer,
                shader,
                &[first.0, pair[0].0, pair[1].0],
                &[first.1, pair[0].1, pair[1].1],
            );
        }
    }

    /// Draws a line segment with per-endpoint colors.
    ///
    /// Only the near plane is clipped in clip space; the screen-space walk
    /// discards samples outside the buffer.
    pub fn rasterize_line(
        &self,
        framebuffer: &FrameBuffer,
        clip_coords: &[Vector4<f32>; 2],
        colors: &[Vector3<f32>; 2],
    ) {
        let Some(((a, color_a), (b, color_b))) =
            clip_segment_near((clip_coords[0], colors[0]), (clip_coords[1], colors[1]))
        else {
            return;
        };

        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;
        let ndc_a = apply_perspective_division(&a);
        let ndc_b = apply_perspective_division(&b);
        let sa = ndc_to_screen(ndc_a.x, ndc_a.y, width, height);
        let sb = ndc_to_screen(ndc_b.x, ndc_b.y, width, height);

        // DDA: one sample per step along the major axis.
        let delta = sb - sa;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0);
        // Guard against segments that project to enormous lengths.
        if steps > (width + height) * 8.0 {
            return;
        }
        let steps = steps as usize;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let p = sa + delta * t;
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (p.x as usize, p.y as usize);
            if !framebuffer.in_bounds(x, y) {
                continue;
            }

            // Depth and color interpolate perspective-correctly between the endpoints.
            let inv_wa = 1.0 / a.w;
            let inv_wb = 1.0 / b.w;
            let inv_w = lerp(inv_wa, inv_wb, t);
            let tc = t * inv_wb / inv_w;
            let depth = lerp(ndc_a.z, ndc_b.z, t) * 0.5 + 0.5;

            if framebuffer.depth_test_and_update(x, y, depth) {
                framebuffer.blend_pixel(x, y, lerp(color_a, color_b, tc), self.opacity);
            }
        }
    }

    /// Rasterizes a triangle already inside the frustum.
    fn rasterize_clipped<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;

        if clip_coords.iter().any(|c| c.w.abs() < 1e-6) {
            return;
        }
        let w_values = clip_coords.map(|c| c.w);
        let screen = clip_coords.map(|c| {
            let ndc = apply_perspective_division(&c);
            ndc_to_screen(ndc.x, ndc.y, width, height)
        });

        // Screen Y points down, so counter-clockwise triangles have negative area here.
        let edge1 = screen[1] - screen[0];
        let edge2 = screen[2] - screen[1];
        let signed_area = edge1.x * edge2.y - edge1.y * edge2.x;
        match self.cull_mode {
            CullMode::Back if signed_area >= 0.0 => return,
            CullMode::Front if signed_area <= 0.0 => return,
            _ => {}
        }

        let (min_x, min_y, max_x, max_y) = bounding_box(&screen);
        if max_x < 0
            || max_y < 0
            || min_x >= framebuffer.buffer_width as i32
            || min_y >= framebuffer.buffer_height as i32
        {
            return;
        }
        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(framebuffer.buffer_width as i32 - 1) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(framebuffer.buffer_height as i32 - 1) as usize;

        let z_values = clip_coords.map(|c| c.z);

        // Rows vary in length, so let rayon balance them.
        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(bary) = barycentric_coordinates(center, screen[0], screen[1], screen[2])
                else {
                    continue;
                };
                if !is_inside_triangle(bary) {
                    continue;
                }
                if self.wireframe
                    && bary.x > WIREFRAME_THRESHOLD
                    && bary.y > WIREFRAME_THRESHOLD
                    && bary.z > WIREFRAME_THRESHOLD
                {
                    continue;
                }
                let Some(corrected) = perspective_correct_barycentric(bary, w_values) else {
                    continue;
                };

                let z_clip = interpolate3(&z_values, corrected);
                let w_clip = interpolate3(&w_values, corrected);
                let depth = (z_clip / w_clip) * 0.5 + 0.5;

                if framebuffer.depth_test_and_update(x, y, depth) {
                    let color = shader.fragment(interpolate3(varyings, corrected));
                    framebuffer.blend_pixel(x, y, color, self.opacity);
                }
            }
        });
    }
}

/// Clips a polygon against `sign * p[axis] <= p.w`, writing into `output`.
fn clip_polygon_against_plane<V: Interpolatable>(
    input: &[ClipVertex<V>],
    output: &mut Vec<ClipVertex<V>>,
    axis: usize,
    sign: f32,
) {
    output.clear();
    let Some(&last) = input.last() else {
        return;
    };

    let is_inside = |p: &Vector4<f32>| sign * p[axis] <= p.w + 1e-6;
    let mut prev = last;
    let mut prev_inside = is_inside(&prev.0);

    for &curr in input {
        let curr_inside = is_inside(&curr.0);
        if curr_inside != prev_inside {
            if let Some(hit) = intersect_edge_plane(prev, curr, axis, sign) {
                output.push(hit);
            }
        }
        if curr_inside {
            output.push(curr);
        }
        prev = curr;
        prev_inside = curr_inside;
    }
}

/// Intersection of edge `a -> b` with the plane `sign * p[axis] = p.w`.
#[inline(always)]
fn intersect_edge_plane<V: Interpolatable>(
    a: ClipVertex<V>,
    b: ClipVertex<V>,
    axis: usize,
    sign: f32,
) -> Option<ClipVertex<V>> {
    let denom = sign * (b.0[axis] - a.0[axis]) - (b.0.w - a.0.w);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (a.0.w - sign * a.0[axis]) / denom;
    if !t.is_finite() {
        return None;
    }
    Some((lerp(a.0, b.0, t), lerp(a.1, b.1, t)))
}

/// Clips a segment against the near plane (`-z <= w`).
fn clip_segment_near(
    a: ClipVertex<Vector3<f32>>,
    b: ClipVertex<Vector3<f32>>,
) -> Option<(ClipVertex<Vector3<f32>>, ClipVertex<Vector3<f32>>)> {
    let inside = |p: &Vector4<f32>| -p.z <= p.w;
    match (inside(&a.0), inside(&b.0)) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (true, false) => intersect_edge_plane(a, b, 2, -1.0).map(|hit| (a, hit)),
        (false, true) => intersect_edge_plane(a, b, 2, -1.0).map(|hit| (hit, b)),
    }
}

fn bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
    (min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Vertex;
    use approx::assert_relative_eq;

    /// Passes clip coordinates straight through and paints a flat color.
    struct Flat;

    impl Shader for Flat {
        type Varying = Vector3<f32>;

        fn vertex(&self, vertex: &Vertex, color: Vector3<f32>) -> (Vector4<f32>, Vector3<f32>) {
            (vertex.position.to_homogeneous(), color)
        }

        fn fragment(&self, varying: Vector3<f32>) -> Vector3<f32> {
            varying
        }
    }

    fn covered(fb: &FrameBuffer) -> usize {
        (0..fb.height)
            .flat_map(|y| (0..fb.width).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y).is_some_and(|c| c.norm() > 0.0))
            .count()
    }

    fn ccw_triangle() -> [Vector4<f32>; 3] {
        [
            Vector4::new(-0.5, -0.5, 0.0, 1.0),
            Vector4::new(0.5, -0.5, 0.0, 1.0),
            Vector4::new(0.0, 0.5, 0.0, 1.0),
        ]
    }

    #[test]
    fn front_facing_triangle_is_drawn() {
        let fb = FrameBuffer::new(16, 16, 1);
        let red = Vector3::new(1.0, 0.0, 0.0);
        Rasterizer::new().rasterize_triangle(&fb, &Flat, &ccw_triangle(), &[red; 3]);
        assert!(covered(&fb) > 0);
        let center = fb.get_pixel(8, 8).unwrap();
        assert_relative_eq!(center, red, epsilon = 1e-5);
    }

    #[test]
    fn back_facing_triangle_is_culled() {
        let fb = FrameBuffer::new(16, 16, 1);
        let [a, b, c] = ccw_triangle();
        let red = Vector3::new(1.0, 0.0, 0.0);
        Rasterizer::new().rasterize_triangle(&fb, &Flat, &[a, c, b], &[red; 3]);
        assert_eq!(covered(&fb), 0);

        let mut both = Rasterizer::new();
        both.cull_mode = CullMode::None;
        both.rasterize_triangle(&fb, &Flat, &[a, c, b], &[red; 3]);
        assert!(covered(&fb) > 0);
    }

    #[test]
    fn line_behind_the_camera_is_dropped() {
        let fb = FrameBuffer::new(16, 16, 1);
        let white = Vector3::new(1.0, 1.0, 1.0);
        let behind = [
            Vector4::new(0.0, 0.0, -1.2, -1.0),
            Vector4::new(0.5, 0.5, -1.5, -1.0),
        ];
        let rasterizer = Rasterizer::new();
        rasterizer.rasterize_line(&fb, &behind, &[white; 2]);
        assert_eq!(covered(&fb), 0);

        let visible = [
            Vector4::new(-0.8, 0.0, 0.0, 1.0),
            Vector4::new(0.8, 0.0, 0.0, 1.0),
        ];
        rasterizer.rasterize_line(&fb, &visible, &[white; 2]);
        assert!(covered(&fb) >= 12);
    }
}
