use crate::core::color::Color;

/// How a shape is shaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Unlit: the surface shows its color as is.
    Basic(BasicMaterial),
    /// Lit by the scene lights with the Phong reflection model.
    Phong(PhongMaterial),
}

impl Default for Material {
    fn default() -> Self {
        Material::Basic(BasicMaterial::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
    /// Use face corner or vertex colors instead of `color`.
    pub vertex_colors: bool,
    pub wireframe: bool,
    pub opacity: f32,
    pub double_sided: bool,
}

impl Default for BasicMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            vertex_colors: false,
            wireframe: false,
            opacity: 1.0,
            double_sided: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhongMaterial {
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
    pub wireframe: bool,
    pub double_sided: bool,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            diffuse: Color::rgb(0.8, 0.8, 0.8),
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            wireframe: false,
            double_sided: false,
        }
    }
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Material::Basic(BasicMaterial {
            color,
            ..Default::default()
        })
    }

    /// Unlit material that shows the per-corner or per-vertex colors.
    pub fn vertex_colored() -> Self {
        Material::Basic(BasicMaterial {
            vertex_colors: true,
            ..Default::default()
        })
    }

    pub fn phong(diffuse: Color) -> Self {
        Material::Phong(PhongMaterial {
            diffuse,
            ..Default::default()
        })
    }

    /// Phong without a highlight, for matte surfaces.
    pub fn lambert(diffuse: Color) -> Self {
        Material::Phong(PhongMaterial {
            diffuse,
            specular: Color::BLACK,
            ..Default::default()
        })
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        match &mut self {
            Material::Basic(m) => m.wireframe = wireframe,
            Material::Phong(m) => m.wireframe = wireframe,
        }
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        match &mut self {
            Material::Basic(m) => m.double_sided = double_sided,
            Material::Phong(m) => m.double_sided = double_sided,
        }
        self
    }

    /// Only unlit materials blend; the value is clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        if let Material::Basic(m) = &mut self {
            m.opacity = opacity.clamp(0.0, 1.0);
        }
        self
    }

    pub fn base_color(&self) -> Color {
        match self {
            Material::Basic(m) => m.color,
            Material::Phong(m) => m.diffuse,
        }
    }

    pub fn uses_vertex_colors(&self) -> bool {
        matches!(self, Material::Basic(m) if m.vertex_colors)
    }

    pub fn wireframe(&self) -> bool {
        match self {
            Material::Basic(m) => m.wireframe,
            Material::Phong(m) => m.wireframe,
        }
    }

    pub fn double_sided(&self) -> bool {
        match self {
            Material::Basic(m) => m.double_sided,
            Material::Phong(m) => m.double_sided,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Material::Basic(m) => m.opacity,
            Material::Phong(_) => 1.0,
        }
    }
}
