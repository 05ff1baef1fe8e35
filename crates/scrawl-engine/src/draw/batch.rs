use core::fmt;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Color, Vec3};

/// Indices a batch can hold per vertex it can hold.
///
/// Line loops cost two indices per vertex and triangle fans approach three, so
/// the index budget runs ahead of the vertex budget.
pub(crate) const INDEX_CAPACITY_FACTOR: usize = 2;

/// One interleaved vertex record: position, then color.
///
/// Field order is load-bearing: it matches shader locations 0 and 1 and gives
/// the record a seven-float wire layout with no padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    /// Scalar components per record: three position floats, four color floats.
    pub const COMPONENTS: usize = 7;

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    #[inline]
    pub fn new(position: Vec3, color: Color) -> Self {
        Self { position: position.to_array(), color: color.to_array() }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: core::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Primitive topology a batch is drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    Triangles,
    Lines,
}

impl Topology {
    pub(crate) fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
            Topology::Lines => wgpu::PrimitiveTopology::LineList,
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Triangles => f.write_str("triangles"),
            Topology::Lines => f.write_str("lines"),
        }
    }
}

/// A push would exceed the batch's fixed capacity. The batch is unchanged.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BatchFull {
    pub max_vertices: usize,
    pub max_indices: usize,
}

impl fmt::Display for BatchFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "geometry batch full (capacity {} vertices / {} indices)",
            self.max_vertices, self.max_indices
        )
    }
}

impl std::error::Error for BatchFull {}

/// Fixed-capacity staging area for one topology's geometry.
///
/// Vertices and indices accumulate over a frame and are handed to the renderer
/// as contiguous slices; only the live prefix of the GPU buffers is ever
/// uploaded. Capacity never grows after construction, so a frame that emits too
/// much geometry fails fast instead of reallocating mid-frame.
#[derive(Debug)]
pub struct GeometryBatch {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    max_vertices: usize,
    max_indices: usize,
    next_index: u32,
}

impl GeometryBatch {
    /// Allocates a batch for `max_vertices` records and twice as many indices.
    pub fn with_capacity(max_vertices: usize) -> Self {
        let max_indices = max_vertices * INDEX_CAPACITY_FACTOR;
        Self {
            vertices: Vec::with_capacity(max_vertices),
            indices: Vec::with_capacity(max_indices),
            max_vertices,
            max_indices,
            next_index: 0,
        }
    }

    /// Appends one vertex record and returns the index that refers to it.
    ///
    /// The returned index counts records, not floats; it is what
    /// [`push_index`](Self::push_index) expects.
    pub fn push_vertex(&mut self, vertex: Vertex) -> Result<u32, BatchFull> {
        if self.vertices.len() >= self.max_vertices {
            return Err(self.full());
        }
        self.vertices.push(vertex);
        let assigned = self.next_index;
        self.next_index += 1;
        Ok(assigned)
    }

    /// Appends one draw index. Indices may repeat or target vertices that are
    /// pushed later in the same frame.
    pub fn push_index(&mut self, index: u32) -> Result<(), BatchFull> {
        if self.indices.len() >= self.max_indices {
            return Err(self.full());
        }
        self.indices.push(index);
        Ok(())
    }

    /// Appends a block of vertices and indices together, all or nothing.
    ///
    /// On overflow nothing is written, so a multi-vertex primitive never lands
    /// half-emitted. Indices are expected to already be based on
    /// [`next_index`](Self::next_index) as it was before the call.
    pub fn append(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<(), BatchFull> {
        if !self.has_room(vertices.len(), indices.len()) {
            return Err(self.full());
        }
        self.vertices.extend_from_slice(vertices);
        self.indices.extend_from_slice(indices);
        self.next_index += vertices.len() as u32;
        Ok(())
    }

    /// Whether `vertices` more records and `indices` more indices would fit.
    /// Comparisons run against the remaining room, so requests far beyond the
    /// whole budget cannot overflow the arithmetic.
    #[inline]
    pub fn has_room(&self, vertices: usize, indices: usize) -> bool {
        vertices <= self.max_vertices - self.vertices.len()
            && indices <= self.max_indices - self.indices.len()
    }

    /// Clears the frame's geometry and rewinds the index counter. Capacity and
    /// backing allocations are kept.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.next_index = 0;
    }

    /// Index the next pushed vertex will receive.
    #[inline]
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    #[inline]
    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    fn full(&self) -> BatchFull {
        BatchFull { max_vertices: self.max_vertices, max_indices: self.max_indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32) -> Vertex {
        Vertex::new(Vec3::new(x, 0.0, 0.0), Color::WHITE)
    }

    // ── record layout ─────────────────────────────────────────────────────

    #[test]
    fn vertex_is_seven_packed_floats() {
        assert_eq!(core::mem::size_of::<Vertex>(), Vertex::COMPONENTS * 4);
        assert_eq!(Vertex::layout().array_stride, 28);
    }

    #[test]
    fn vertex_slice_reinterprets_as_scalars() {
        let verts = [
            Vertex::new(Vec3::new(1.0, 2.0, 3.0), Color::new(0.1, 0.2, 0.3, 0.4)),
            Vertex::new(Vec3::new(5.0, 6.0, 7.0), Color::WHITE),
        ];
        let scalars: &[f32] = bytemuck::cast_slice(&verts);
        assert_eq!(scalars.len(), verts.len() * Vertex::COMPONENTS);
        assert_eq!(&scalars[..7], &[1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.4]);
        assert_eq!(scalars[7], 5.0);
    }

    // ── push / counters ───────────────────────────────────────────────────

    #[test]
    fn push_vertex_assigns_sequential_indices() {
        let mut batch = GeometryBatch::with_capacity(8);
        assert_eq!(batch.push_vertex(v(0.0)), Ok(0));
        assert_eq!(batch.push_vertex(v(1.0)), Ok(1));
        assert_eq!(batch.push_vertex(v(2.0)), Ok(2));
        assert_eq!(batch.vertex_count(), 3);
        assert_eq!(batch.next_index(), 3);
    }

    #[test]
    fn push_index_accepts_repeats_and_forward_references() {
        let mut batch = GeometryBatch::with_capacity(8);
        batch.push_index(5).unwrap();
        batch.push_index(5).unwrap();
        batch.push_index(0).unwrap();
        assert_eq!(batch.indices(), &[5, 5, 0]);
        // Indices alone never advance the vertex counter.
        assert_eq!(batch.next_index(), 0);
    }

    #[test]
    fn append_advances_counter_by_vertex_count() {
        let mut batch = GeometryBatch::with_capacity(8);
        batch.append(&[v(0.0), v(1.0)], &[0, 1]).unwrap();
        assert_eq!(batch.next_index(), 2);
        batch.append(&[v(2.0)], &[2, 2, 2]).unwrap();
        assert_eq!(batch.next_index(), 3);
        assert_eq!(batch.index_count(), 5);
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn vertex_overflow_is_rejected_without_write() {
        let mut batch = GeometryBatch::with_capacity(2);
        batch.push_vertex(v(0.0)).unwrap();
        batch.push_vertex(v(1.0)).unwrap();
        let err = batch.push_vertex(v(2.0)).unwrap_err();
        assert_eq!(err.max_vertices, 2);
        assert_eq!(batch.vertex_count(), 2);
        assert_eq!(batch.next_index(), 2);
    }

    #[test]
    fn index_capacity_is_twice_vertex_capacity() {
        let mut batch = GeometryBatch::with_capacity(2);
        for _ in 0..4 {
            batch.push_index(0).unwrap();
        }
        assert!(batch.push_index(0).is_err());
        assert_eq!(batch.index_count(), 4);
    }

    #[test]
    fn append_is_all_or_nothing() {
        let mut batch = GeometryBatch::with_capacity(3);
        batch.push_vertex(v(0.0)).unwrap();
        // Four more vertices cannot fit; neither slice may land.
        let err = batch.append(&[v(1.0); 4], &[1, 2, 3, 4]);
        assert!(err.is_err());
        assert_eq!(batch.vertex_count(), 1);
        assert_eq!(batch.index_count(), 0);
        assert_eq!(batch.next_index(), 1);
    }

    #[test]
    fn has_room_checks_both_budgets() {
        let batch = GeometryBatch::with_capacity(4);
        assert!(batch.has_room(4, 8));
        assert!(!batch.has_room(5, 0));
        assert!(!batch.has_room(0, 9));
    }

    #[test]
    fn has_room_copes_with_requests_beyond_the_whole_budget() {
        let mut batch = GeometryBatch::with_capacity(4);
        batch.push_vertex(v(1.0)).unwrap();
        assert!(!batch.has_room(usize::MAX, 0));
        assert!(!batch.has_room(0, usize::MAX));
        assert!(batch.has_room(3, 8));
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_rewinds_counters_but_keeps_capacity() {
        let mut batch = GeometryBatch::with_capacity(4);
        batch.append(&[v(0.0), v(1.0), v(2.0)], &[0, 1, 2]).unwrap();
        batch.reset();
        assert!(batch.is_empty());
        assert_eq!(batch.next_index(), 0);
        assert_eq!(batch.max_vertices(), 4);
        assert_eq!(batch.push_vertex(v(9.0)), Ok(0));
    }
}
