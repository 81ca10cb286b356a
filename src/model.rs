//! A textured mesh loaded from disk.
//!
//! A [`Model`] only exists once both its mesh and its texture have loaded,
//! so there is no half-loaded state to check before drawing.

use std::path::Path;

use tracing::info;

use crate::display::Display;
use crate::error::RenderResult;
use crate::mesh::Mesh;
use crate::render::Renderer;
use crate::texture::Texture;

pub struct Model {
    name: String,
    mesh: Mesh,
    texture: Texture,
}

impl Model {
    pub fn new(name: impl Into<String>, mesh: Mesh, texture: Texture) -> Self {
        Self {
            name: name.into(),
            mesh,
            texture,
        }
    }

    /// Load an OBJ mesh and its texture.
    ///
    /// Textures with a `.tga` extension go through the built-in RLE decoder;
    /// anything else is handed to the `image` crate.
    pub fn load(
        name: impl Into<String>,
        obj_path: impl AsRef<Path>,
        texture_path: impl AsRef<Path>,
    ) -> RenderResult<Self> {
        let name = name.into();
        let mesh = Mesh::from_obj(obj_path)?;

        let texture_path = texture_path.as_ref();
        let is_tga = texture_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"));
        let texture = if is_tga {
            Texture::from_tga_file(texture_path)?
        } else {
            Texture::from_image_file(texture_path)?
        };

        info!(
            name = %name,
            triangles = mesh.triangle_count(),
            texture_width = texture.width(),
            texture_height = texture.height(),
            "Model loaded"
        );
        Ok(Self::new(name, mesh, texture))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Bind this model's texture and draw its mesh.
    ///
    /// The texture stays bound afterwards. Returns the number of pixels
    /// written.
    pub fn draw<'t, D: Display>(&'t self, renderer: &mut Renderer<'t, D>) -> usize {
        renderer.bind_texture(Some(self.texture.sampler()));
        renderer.draw_mesh(&self.mesh)
    }
}
