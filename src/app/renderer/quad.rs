//! Full-screen quad geometry

use wgpu::util::DeviceExt;
use wgpu::{Buffer, Device, RenderPass};

/// Vertex with a clip-space position
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Corners in clip space: top right, bottom right, bottom left, top left
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [1.0, 1.0, 0.0],
    },
    Vertex {
        position: [1.0, -1.0, 0.0],
    },
    Vertex {
        position: [-1.0, -1.0, 0.0],
    },
    Vertex {
        position: [-1.0, 1.0, 0.0],
    },
];

/// Two triangles sharing the top-right/bottom-left diagonal
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Static vertex and index buffers for the quad
pub struct QuadMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

impl QuadMesh {
    /// Uploads the quad once; the buffers are never written again
    pub fn new(device: &Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: QUAD_INDICES.len() as u32,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Records the indexed draw. The caller binds the pipeline first.
    pub fn draw(&self, rpass: &mut RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_covers_clip_space() {
        for vertex in &QUAD_VERTICES {
            assert_eq!(vertex.position[0].abs(), 1.0);
            assert_eq!(vertex.position[1].abs(), 1.0);
            assert_eq!(vertex.position[2], 0.0);
        }
    }

    #[test]
    fn test_indices_form_two_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
        assert_eq!(&QUAD_INDICES[..3], &[0, 1, 3]);
        assert_eq!(&QUAD_INDICES[3..], &[1, 2, 3]);
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn test_vertex_bytes() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 4 * 12);
        let indices: &[u8] = bytemuck::cast_slice(&QUAD_INDICES);
        assert_eq!(indices.len(), 6 * 4);
    }
}
