//! End-to-end checks of the draw flush protocol, observed through a recording
//! sink in place of the GPU renderer.

use scrawl_engine::coords::{Color, Mat4, Vec3, Viewport};
use scrawl_engine::draw::{Draw2d, Draw2dConfig, GeometrySink, Topology, Vertex};

#[derive(Debug)]
enum SinkEvent {
    Projection(Mat4),
    Batch { topology: Topology, vertices: Vec<Vertex>, indices: Vec<u32> },
}

/// Records everything a flush hands over, in order.
#[derive(Debug, Default)]
struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    fn projections(&self) -> Vec<Mat4> {
        self.events
            .iter()
            .filter_map(|ev| match ev {
                SinkEvent::Projection(m) => Some(*m),
                SinkEvent::Batch { .. } => None,
            })
            .collect()
    }

    fn batches(&self) -> Vec<(Topology, &[Vertex], &[u32])> {
        self.events
            .iter()
            .filter_map(|ev| match ev {
                SinkEvent::Batch { topology, vertices, indices } => {
                    Some((*topology, vertices.as_slice(), indices.as_slice()))
                }
                SinkEvent::Projection(_) => None,
            })
            .collect()
    }

    fn batch(&self, topology: Topology) -> Option<(&[Vertex], &[u32])> {
        self.batches().into_iter().find(|(t, _, _)| *t == topology).map(|(_, v, i)| (v, i))
    }
}

impl GeometrySink for RecordingSink {
    fn set_projection(&mut self, projection: Mat4) {
        self.events.push(SinkEvent::Projection(projection));
    }

    fn submit(&mut self, topology: Topology, vertices: &[Vertex], indices: &[u32]) {
        self.events
            .push(SinkEvent::Batch { topology, vertices: vertices.to_vec(), indices: indices.to_vec() });
    }
}

fn draw2d() -> Draw2d {
    Draw2d::new(&Draw2dConfig { max_vertices: 64 })
}

// ── single-primitive frames ───────────────────────────────────────────────

#[test]
fn red_triangle_flushes_as_one_batch() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();

    draw.begin();
    draw.set_color(Color::RED);
    draw.vertex(Vec3::new(0.0, 0.0, 0.0));
    draw.vertex(Vec3::new(100.0, 0.0, 0.0));
    draw.vertex(Vec3::new(50.0, 80.0, 0.0));
    draw.end(&mut sink);

    let (vertices, indices) = sink.batch(Topology::Triangles).expect("triangle batch submitted");
    assert_eq!(vertices.len(), 3);
    assert_eq!(indices, &[0, 1, 2]);
    for v in vertices {
        assert_eq!(v.color, Color::RED.to_array());
    }
    assert_eq!(vertices[2].position, [50.0, 80.0, 0.0]);

    // The flush rewound the context: the next frame starts from nothing.
    assert!(draw.triangle_batch().is_empty());
    assert_eq!(draw.triangle_batch().next_index(), 0);
}

#[test]
fn hexagon_outline_is_a_closed_index_loop() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();

    draw.begin();
    draw.set_draw_mode(Topology::Lines);
    draw.polygon_convex_regular(50.0, Vec3::new(200.0, 200.0, 0.0), 6);
    draw.end(&mut sink);

    let (vertices, indices) = sink.batch(Topology::Lines).expect("line batch submitted");
    assert_eq!(vertices.len(), 6);
    assert_eq!(indices, &[0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 0]);
}

#[test]
fn identity_transform_passes_positions_through_bit_exact() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();

    let original = Vec3::new(123.456, -0.725, 7.25);
    draw.begin();
    draw.vertex(original);
    draw.end(&mut sink);

    let (vertices, _) = sink.batch(Topology::Triangles).expect("triangle batch submitted");
    assert_eq!(vertices[0].position[0].to_bits(), original.x.to_bits());
    assert_eq!(vertices[0].position[1].to_bits(), original.y.to_bits());
    assert_eq!(vertices[0].position[2].to_bits(), original.z.to_bits());
}

#[test]
fn submitted_vertices_reinterpret_as_seven_floats_each() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();

    draw.begin();
    draw.circle(10.0, Vec3::new(30.0, 30.0, 0.0));
    draw.end(&mut sink);

    let (vertices, _) = sink.batch(Topology::Triangles).expect("triangle batch submitted");
    let scalars: &[f32] = bytemuck::cast_slice(vertices);
    assert_eq!(scalars.len(), vertices.len() * Vertex::COMPONENTS);
}

// ── flush shape ───────────────────────────────────────────────────────────

#[test]
fn mixed_frame_submits_triangles_before_lines() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();

    draw.begin();
    draw.line(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
    draw.polygon_convex_regular(5.0, Vec3::ZERO, 4);
    draw.vertex(Vec3::ZERO);
    draw.end(&mut sink);

    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].0, Topology::Triangles);
    assert_eq!(batches[1].0, Topology::Lines);

    // However many primitives went in, each topology is submitted once.
    assert_eq!(batches[0].1.len(), 5);
    assert_eq!(batches[1].1.len(), 2);
}

#[test]
fn empty_frame_submits_nothing() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();

    draw.begin();
    draw.end(&mut sink);

    assert!(sink.batches().is_empty());
    // The initial projection still goes out so the uniform is never stale.
    assert_eq!(sink.projections().len(), 1);
}

#[test]
fn projection_precedes_geometry_in_flush_order() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();

    draw.begin();
    draw.vertex(Vec3::ZERO);
    draw.end(&mut sink);

    assert!(matches!(sink.events[0], SinkEvent::Projection(_)));
    assert!(matches!(sink.events[1], SinkEvent::Batch { .. }));
}

// ── projection dirty tracking ─────────────────────────────────────────────

#[test]
fn projection_is_sent_once_per_change() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();
    let pixel = Viewport::new(800.0, 600.0).pixel_projection();

    // Frame 1: initial projection goes out.
    draw.begin();
    draw.set_projection(pixel);
    draw.vertex(Vec3::ZERO);
    draw.end(&mut sink);
    assert_eq!(sink.projections(), vec![pixel]);

    // Frame 2: unchanged projection is not re-sent.
    draw.begin();
    draw.vertex(Vec3::ZERO);
    draw.end(&mut sink);
    assert_eq!(sink.projections().len(), 1);

    // Frame 3: a new projection goes out exactly once.
    let zoomed = Viewport::new(400.0, 300.0).pixel_projection();
    draw.begin();
    draw.set_projection(zoomed);
    draw.vertex(Vec3::ZERO);
    draw.end(&mut sink);
    assert_eq!(sink.projections(), vec![pixel, zoomed]);
}

// ── end vs end_no_reset ───────────────────────────────────────────────────

#[test]
fn end_no_reset_replays_geometry_on_the_next_flush() {
    let mut draw = draw2d();
    let mut sink = RecordingSink::default();

    draw.begin();
    draw.vertex(Vec3::new(1.0, 0.0, 0.0));
    draw.end_no_reset(&mut sink);

    draw.begin();
    draw.vertex(Vec3::new(2.0, 0.0, 0.0));
    draw.end(&mut sink);

    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    // First flush saw one vertex, second saw the retained one plus the new.
    assert_eq!(batches[0].1.len(), 1);
    assert_eq!(batches[1].1.len(), 2);
    assert_eq!(batches[1].2, &[0, 1]);

    // The plain end cleared everything.
    assert!(draw.triangle_batch().is_empty());
}

#[test]
fn end_and_end_no_reset_flush_identically() {
    let build = |draw: &mut Draw2d, sink: &mut RecordingSink| {
        draw.begin();
        draw.set_color(Color::GREEN);
        draw.polygon_convex_regular(10.0, Vec3::new(50.0, 50.0, 0.0), 5);
        draw.line(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        draw.end_no_reset(sink);
    };

    let mut a = draw2d();
    let mut sink_a = RecordingSink::default();
    build(&mut a, &mut sink_a);

    let mut b = draw2d();
    let mut sink_b = RecordingSink::default();
    b.begin();
    b.set_color(Color::GREEN);
    b.polygon_convex_regular(10.0, Vec3::new(50.0, 50.0, 0.0), 5);
    b.line(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
    b.end(&mut sink_b);

    let batches_a = sink_a.batches();
    let batches_b = sink_b.batches();
    assert_eq!(batches_a.len(), batches_b.len());
    for ((ta, va, ia), (tb, vb, ib)) in batches_a.iter().zip(&batches_b) {
        assert_eq!(ta, tb);
        assert_eq!(va, vb);
        assert_eq!(ia, ib);
    }
}

// ── overflow ──────────────────────────────────────────────────────────────

#[test]
fn overflowing_polygon_is_absent_from_the_flush() {
    let mut draw = Draw2d::new(&Draw2dConfig { max_vertices: 8 });
    let mut sink = RecordingSink::default();

    draw.begin();
    draw.polygon_convex_regular(5.0, Vec3::ZERO, 6);
    // Only 2 vertex slots remain; the whole pentagon must be dropped.
    draw.polygon_convex_regular(5.0, Vec3::ZERO, 5);
    draw.end(&mut sink);

    let (vertices, indices) = sink.batch(Topology::Triangles).expect("triangle batch submitted");
    assert_eq!(vertices.len(), 6);
    assert_eq!(indices.len(), 4 * 3);
}
