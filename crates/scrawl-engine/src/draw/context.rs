use crate::coords::{Color, Mat4, Vec2, Vec3};

use super::batch::{BatchFull, GeometryBatch, Topology, Vertex};

/// Sides used to approximate a circle. Dense enough to read as round at
/// typical sandbox scales without eating the vertex budget.
const CIRCLE_SEGMENTS: usize = 37;

/// Capacity configuration shared by [`Draw2d`] and the GPU renderer.
///
/// Both sides size their buffers from the same value so a frame that fits in
/// the CPU batches always fits in the GPU buffers.
#[derive(Debug, Clone)]
pub struct Draw2dConfig {
    /// Vertex records each per-topology batch holds per frame. The index
    /// budget is twice this.
    pub max_vertices: usize,
}

impl Default for Draw2dConfig {
    fn default() -> Self {
        Self { max_vertices: 2048 }
    }
}

/// Where a [`Draw2d`] flush lands.
///
/// Per flush the context calls [`set_projection`](Self::set_projection) at
/// most once, and only when the projection changed since the last flush, then
/// [`submit`](Self::submit) at most once per non-empty topology, triangles
/// before lines. Submitted slices are borrowed from the context and are only
/// valid for the duration of the call.
pub trait GeometrySink {
    /// Receives the projection that applies to every submit that follows.
    fn set_projection(&mut self, projection: Mat4);

    /// Receives one topology's accumulated geometry.
    fn submit(&mut self, topology: Topology, vertices: &[Vertex], indices: &[u32]);
}

/// Immediate-mode 2D draw context.
///
/// Emission calls transform points by the current model transform, stamp them
/// with the current pen color, and append them to a per-topology
/// [`GeometryBatch`]. Nothing touches the GPU until [`end`](Self::end) hands
/// the whole frame to a [`GeometrySink`]: one flush uploads and draws each
/// topology at most once, however many primitives were emitted.
///
/// Emission is valid only between `begin` and `end`. The pen color, draw mode,
/// and projection persist across frames; the model transform resets to
/// identity on every `begin`.
#[derive(Debug)]
pub struct Draw2d {
    triangles: GeometryBatch,
    lines: GeometryBatch,
    scratch_vertices: Vec<Vertex>,
    scratch_indices: Vec<u32>,
    transform: Mat4,
    projection: Mat4,
    projection_dirty: bool,
    color: Color,
    draw_mode: Topology,
    active: bool,
}

impl Draw2d {
    pub fn new(config: &Draw2dConfig) -> Self {
        Self {
            triangles: GeometryBatch::with_capacity(config.max_vertices),
            lines: GeometryBatch::with_capacity(config.max_vertices),
            scratch_vertices: Vec::new(),
            scratch_indices: Vec::new(),
            transform: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            // Dirty from the start so the first flush always publishes one.
            projection_dirty: true,
            color: Color::BLACK,
            draw_mode: Topology::Triangles,
            active: false,
        }
    }

    /// Opens a frame: resets the model transform to identity and arms the
    /// emission calls.
    pub fn begin(&mut self) {
        debug_assert!(!self.active, "begin() while a frame is already open");
        self.transform = Mat4::IDENTITY;
        self.active = true;
    }

    /// Flushes the frame to `sink`, then rewinds both batches and closes the
    /// frame.
    pub fn end(&mut self, sink: &mut impl GeometrySink) {
        debug_assert!(self.active, "end() without begin()");
        self.flush(sink);
        self.triangles.reset();
        self.lines.reset();
        self.active = false;
    }

    /// Like [`end`](Self::end) but keeps the accumulated geometry, so the next
    /// flush sees it again along with anything emitted after the next
    /// [`begin`](Self::begin).
    pub fn end_no_reset(&mut self, sink: &mut impl GeometrySink) {
        debug_assert!(self.active, "end_no_reset() without begin()");
        self.flush(sink);
        self.active = false;
    }

    /// Appends one vertex at `position` to the current draw mode's batch,
    /// transformed and stamped with the pen color, together with the index
    /// that references it.
    pub fn vertex(&mut self, position: Vec3) {
        debug_assert!(self.active, "vertex() outside begin()/end()");
        let mode = self.draw_mode;
        let record = Vertex::new(self.transform.transform_point(position), self.color);
        let batch = self.mode_batch();
        let base = batch.next_index();
        if let Err(err) = batch.append(&[record], &[base]) {
            log::error!("{mode} vertex dropped: {err}");
        }
    }

    /// Appends one line segment. Segments always land in the line batch, no
    /// matter the current draw mode.
    pub fn line(&mut self, a: Vec3, b: Vec3) {
        debug_assert!(self.active, "line() outside begin()/end()");
        let a = self.transform.transform_point(a);
        let b = self.transform.transform_point(b);
        self.emit_segment(a, b);
    }

    /// 2D overload of [`line`](Self::line): endpoints are lifted onto z = 0
    /// for the transform, and the stored z stays 0 even when the transform
    /// moves points off that plane.
    pub fn line_2d(&mut self, a: Vec2, b: Vec2) {
        debug_assert!(self.active, "line_2d() outside begin()/end()");
        let mut a = self.transform.transform_point(a.extend(0.0));
        let mut b = self.transform.transform_point(b.extend(0.0));
        a.z = 0.0;
        b.z = 0.0;
        self.emit_segment(a, b);
    }

    /// Appends a regular convex polygon of `sides` vertices around `center`.
    ///
    /// In triangle mode the ring becomes a fan anchored at its first vertex;
    /// in line mode it becomes a closed outline. Either way the whole polygon
    /// is one primitive: if it does not fit in the remaining capacity, none of
    /// it is emitted.
    pub fn polygon_convex_regular(&mut self, radius: f32, center: Vec3, sides: usize) {
        debug_assert!(self.active, "polygon_convex_regular() outside begin()/end()");
        debug_assert!(sides >= 3, "a convex polygon needs at least 3 sides, got {sides}");
        if sides < 3 {
            return;
        }

        let mode = self.draw_mode;
        let batch = match mode {
            Topology::Triangles => &mut self.triangles,
            Topology::Lines => &mut self.lines,
        };

        // Capacity gate before a single point is built, so an oversized
        // request is rejected without touching the scratch buffers. Fans take
        // 3(sides - 2) indices, outlines two per edge.
        let indices_needed = match mode {
            Topology::Triangles => (sides - 2).saturating_mul(3),
            Topology::Lines => sides.saturating_mul(2),
        };
        if !batch.has_room(sides, indices_needed) {
            let err =
                BatchFull { max_vertices: batch.max_vertices(), max_indices: batch.max_indices() };
            log::error!("{mode} polygon with {sides} sides dropped: {err}");
            return;
        }

        self.scratch_vertices.clear();
        self.scratch_indices.clear();

        // Ring points starting at +X from center. The angular step stays f64
        // so many-sided rings do not accumulate drift.
        let step = core::f64::consts::TAU / sides as f64;
        for p in 0..sides {
            let angle = p as f64 * step;
            let point = Vec3::new(
                (f64::from(radius) * angle.cos() + f64::from(center.x)) as f32,
                (f64::from(radius) * angle.sin() + f64::from(center.y)) as f32,
                center.z,
            );
            self.scratch_vertices
                .push(Vertex::new(self.transform.transform_point(point), self.color));
        }

        let sides = sides as u32;
        let base = batch.next_index();
        match mode {
            Topology::Triangles => {
                // Fan anchored at the ring's first vertex.
                for p in 0..sides - 2 {
                    self.scratch_indices.extend_from_slice(&[base, base + p + 1, base + p + 2]);
                }
            }
            Topology::Lines => {
                // One segment per edge; the last edge wraps back to close the
                // outline.
                for p in 0..sides {
                    let next = if p + 1 == sides { 0 } else { p + 1 };
                    self.scratch_indices.push(base + p);
                    self.scratch_indices.push(base + next);
                }
            }
        }

        if let Err(err) = batch.append(&self.scratch_vertices, &self.scratch_indices) {
            log::error!("{mode} polygon with {sides} sides dropped: {err}");
        }
    }

    /// Circle approximated by a fixed-density ring; follows the current draw
    /// mode like [`polygon_convex_regular`](Self::polygon_convex_regular).
    pub fn circle(&mut self, radius: f32, center: Vec3) {
        self.polygon_convex_regular(radius, center, CIRCLE_SEGMENTS);
    }

    /// Sets the pen color applied to vertices emitted from here on.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Chooses which batch [`vertex`](Self::vertex) and the polygon helpers
    /// target. Line segments ignore this.
    pub fn set_draw_mode(&mut self, mode: Topology) {
        self.draw_mode = mode;
    }

    pub fn draw_mode(&self) -> Topology {
        self.draw_mode
    }

    /// Sets the model transform applied to every point at emission time.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Sets the projection and marks it for re-publication on the next flush.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.projection_dirty = true;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn triangle_batch(&self) -> &GeometryBatch {
        &self.triangles
    }

    pub fn line_batch(&self) -> &GeometryBatch {
        &self.lines
    }

    fn emit_segment(&mut self, a: Vec3, b: Vec3) {
        let base = self.lines.next_index();
        let segment = [Vertex::new(a, self.color), Vertex::new(b, self.color)];
        if let Err(err) = self.lines.append(&segment, &[base, base + 1]) {
            log::error!("line segment dropped: {err}");
        }
    }

    fn mode_batch(&mut self) -> &mut GeometryBatch {
        match self.draw_mode {
            Topology::Triangles => &mut self.triangles,
            Topology::Lines => &mut self.lines,
        }
    }

    fn flush(&mut self, sink: &mut impl GeometrySink) {
        if self.projection_dirty {
            sink.set_projection(self.projection);
            self.projection_dirty = false;
        }
        if self.triangles.index_count() > 0 {
            sink.submit(Topology::Triangles, self.triangles.vertices(), self.triangles.indices());
        }
        if self.lines.index_count() > 0 {
            sink.submit(Topology::Lines, self.lines.vertices(), self.lines.indices());
        }
    }
}

impl Default for Draw2d {
    fn default() -> Self {
        Self::new(&Draw2dConfig::default())
    }
}
