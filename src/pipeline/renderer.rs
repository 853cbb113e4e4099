use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{Face, LineSegments, Mesh};
use crate::core::pipeline::Shader;
use crate::core::rasterizer::{CullMode, Rasterizer};
use crate::pipeline::shaders::{BasicShader, PhongShader};
use crate::scene::catalog::Scene;
use crate::scene::material::Material;
use crate::scene::node::Shape;
use log::debug;
use nalgebra::{Matrix4, Vector3, Vector4};
use std::time::Instant;

/// Draws a [`Scene`] into its own frame buffer.
pub struct Renderer {
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    /// `sample_count`: 1 for no AA, 2 for 2x2 SSAA, etc.
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height, sample_count),
        }
    }

    /// Clears to the scene background and draws every visible shape.
    ///
    /// Opaque shapes go first; translucent ones are blended over them in a
    /// second walk, in graph order.
    pub fn render(&mut self, scene: &Scene) {
        let start = Instant::now();
        self.framebuffer.clear(scene.background.to_vector());

        let view_projection = scene.camera.view_projection();
        let mut drawn = 0usize;
        for translucent in [false, true] {
            scene.root.visit(&mut |node, world| {
                let Some(shape) = &node.shape else {
                    return;
                };
                if (node.material.opacity() < 1.0) != translucent {
                    return;
                }
                match shape {
                    Shape::Mesh(mesh) => self.draw_mesh(scene, mesh, &node.material, world, &view_projection),
                    Shape::Lines(lines) => self.draw_lines(lines, &node.material, &(view_projection * world)),
                }
                drawn += 1;
            });
        }
        debug!("Rendered {drawn} shapes in {:?}", start.elapsed());
    }

    fn draw_mesh(
        &self,
        scene: &Scene,
        mesh: &Mesh,
        material: &Material,
        world: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
    ) {
        let rasterizer = rasterizer_for(material);
        match material {
            Material::Basic(_) => {
                let shader = BasicShader::new(view_projection * world);
                self.draw_triangles(mesh, material, &shader, rasterizer);
            }
            Material::Phong(phong) => {
                let shader = PhongShader::new(
                    *world,
                    *view_projection,
                    scene.camera.position,
                    &scene.lights,
                    scene.ambient.to_vector(),
                    phong,
                );
                self.draw_triangles(mesh, material, &shader, rasterizer);
            }
        }
    }

    fn draw_triangles<S: Shader>(&self, mesh: &Mesh, material: &Material, shader: &S, rasterizer: Rasterizer) {
        let vertices = mesh.vertices();
        for face in mesh.faces() {
            let mut clip = [Vector4::zeros(); 3];
            let mut colors = [Vector3::zeros(); 3];
            for corner in 0..3 {
                colors[corner] = corner_color(mesh, face, corner, material);
            }
            let varyings = std::array::from_fn(|corner| {
                let vertex = &vertices[face.indices[corner] as usize];
                let (position, varying) = shader.vertex(vertex, colors[corner]);
                clip[corner] = position;
                varying
            });
            rasterizer.rasterize_triangle(&self.framebuffer, shader, &clip, &varyings);
        }
    }

    fn draw_lines(&self, lines: &LineSegments, material: &Material, mvp: &Matrix4<f32>) {
        let rasterizer = rasterizer_for(material);
        let own_colors = material.uses_vertex_colors();
        let base = material.base_color().to_vector();

        for ((start, start_color), (end, end_color)) in lines.segments() {
            let clip = [mvp * start.to_homogeneous(), mvp * end.to_homogeneous()];
            let colors = if own_colors {
                [start_color.to_vector(), end_color.to_vector()]
            } else {
                [base; 2]
            };
            rasterizer.rasterize_line(&self.framebuffer, &clip, &colors);
        }
    }
}

fn rasterizer_for(material: &Material) -> Rasterizer {
    Rasterizer {
        cull_mode: if material.double_sided() {
            CullMode::None
        } else {
            CullMode::Back
        },
        wireframe: material.wireframe(),
        opacity: material.opacity(),
    }
}

/// Face corner color, then vertex color, then the material color. The first
/// two only count for materials that show vertex colors.
fn corner_color(mesh: &Mesh, face: &Face, corner: usize, material: &Material) -> Vector3<f32> {
    if material.uses_vertex_colors() {
        if let Some(colors) = face.corner_colors {
            return colors[corner].to_vector();
        }
        if let Some(color) = mesh.vertices()[face.indices[corner] as usize].color {
            return color.to_vector();
        }
    }
    material.base_color().to_vector()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::Config;
    use crate::scene::catalog::{SceneKind, build};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small(kind: SceneKind) -> Scene {
        let mut config = Config::default();
        config.render.width = 64;
        config.render.height = 48;
        build(kind, &config, &mut StdRng::seed_from_u64(5)).unwrap()
    }

    #[test]
    fn polygon_center_shows_inner_color() {
        let scene = small(SceneKind::Polygon);
        let mut renderer = Renderer::new(64, 48, 1);
        renderer.render(&scene);
        // Just up and left of the center, clear of the axes.
        let near_center = renderer.framebuffer.get_pixel(31, 23).unwrap();
        assert!(near_center.x > 0.7 && near_center.z < 0.3, "{near_center:?}");
    }

    #[test]
    fn background_fills_empty_pixels() {
        let mut scene = small(SceneKind::Triangle);
        scene.background = crate::core::color::Color::rgb(0.0, 0.0, 0.25);
        let mut renderer = Renderer::new(64, 48, 1);
        renderer.render(&scene);
        assert_eq!(renderer.framebuffer.get_pixel(0, 0), Some(Vector3::new(0.0, 0.0, 0.25)));
    }
}
