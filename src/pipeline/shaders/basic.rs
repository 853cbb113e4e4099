use crate::core::geometry::Vertex;
use crate::core::pipeline::Shader;
use nalgebra::{Matrix4, Vector3, Vector4};

/// Unlit shader: every fragment shows its interpolated corner color.
pub struct BasicShader {
    /// Model-View-Projection matrix.
    pub mvp_matrix: Matrix4<f32>,
}

impl BasicShader {
    pub fn new(mvp_matrix: Matrix4<f32>) -> Self {
        Self { mvp_matrix }
    }
}

impl Shader for BasicShader {
    type Varying = Vector3<f32>;

    fn vertex(&self, vertex: &Vertex, color: Vector3<f32>) -> (Vector4<f32>, Self::Varying) {
        (self.mvp_matrix * vertex.position.to_homogeneous(), color)
    }

    fn fragment(&self, varying: Self::Varying) -> Vector3<f32> {
        varying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn passes_color_through() {
        let shader = BasicShader::new(Matrix4::new_translation(&Vector3::new(1.0, 0.0, 0.0)));
        let red = Vector3::new(1.0, 0.0, 0.0);
        let (clip, varying) = shader.vertex(&Vertex::new(Point3::origin()), red);
        assert_eq!(clip, Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(shader.fragment(varying), red);
    }
}
