use scrawl_engine::coords::{Color, Mat4, Vec2, Vec3, Viewport};
use scrawl_engine::core::{App, AppControl, FrameCtx};
use scrawl_engine::draw::{Draw2d, Draw2dConfig, GeometryRenderer, Topology};
use scrawl_engine::input::{InputFrame, Key};

use crate::config::ConfigWatcher;

const MIN_SIDES: usize = 3;
const MAX_SIDES: usize = 64;
const SPIN_STEP: f32 = 0.25;

/// The interactive scene.
///
/// Every frame draws a grid, a cross-hair through the pointer, a spinning
/// polygon, a circle riding the pointer, and one triangle built from raw
/// vertex calls. Controls: space toggles fill/outline, up/down change the
/// polygon's side count, left/right change its spin, escape quits.
pub struct SandboxApp {
    watcher: ConfigWatcher,
    batch_config: Draw2dConfig,
    draw: Draw2d,
    // Built on the first frame; needs the surface format.
    renderer: Option<GeometryRenderer>,
    last_viewport: Viewport,
    sides: usize,
    spin_speed: f32,
    angle: f32,
}

impl SandboxApp {
    pub fn new(watcher: ConfigWatcher) -> Self {
        let batch_config = Draw2dConfig::default();
        let mut app = Self {
            draw: Draw2d::new(&batch_config),
            renderer: None,
            last_viewport: Viewport::default(),
            sides: 0,
            spin_speed: 0.0,
            angle: 0.0,
            batch_config,
            watcher,
        };
        app.apply_config();
        app
    }

    /// Re-seeds the adjustable scene state from the active config. Runs at
    /// startup and again after every hot reload, so a reload overrides any
    /// keyboard tweaks made since.
    fn apply_config(&mut self) {
        self.sides = self.watcher.config().polygon_sides.clamp(MIN_SIDES, MAX_SIDES);
        self.spin_speed = self.watcher.config().spin_speed;
    }

    fn handle_keys(&mut self, input: &InputFrame) {
        if input.pressed(Key::Space) {
            let mode = match self.draw.draw_mode() {
                Topology::Triangles => Topology::Lines,
                Topology::Lines => Topology::Triangles,
            };
            self.draw.set_draw_mode(mode);
            log::info!("draw mode: {mode}");
        }
        if input.pressed(Key::ArrowUp) && self.sides < MAX_SIDES {
            self.sides += 1;
            log::debug!("polygon sides: {}", self.sides);
        }
        if input.pressed(Key::ArrowDown) && self.sides > MIN_SIDES {
            self.sides -= 1;
            log::debug!("polygon sides: {}", self.sides);
        }
        if input.pressed(Key::ArrowRight) {
            self.spin_speed += SPIN_STEP;
            log::debug!("spin speed: {:.2} rad/s", self.spin_speed);
        }
        if input.pressed(Key::ArrowLeft) {
            self.spin_speed -= SPIN_STEP;
            log::debug!("spin speed: {:.2} rad/s", self.spin_speed);
        }
    }
}

impl App for SandboxApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        if self.watcher.poll() {
            self.apply_config();
        }
        self.handle_keys(ctx.input_frame);

        if self.renderer.is_none() {
            let built = GeometryRenderer::new(
                ctx.gpu.device(),
                ctx.gpu.surface_format(),
                &self.batch_config,
            );
            match built {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(err) => {
                    log::error!("draw renderer setup failed: {err:#}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(renderer) = self.renderer.as_ref() else {
            return AppControl::Exit;
        };

        // Resize (and the very first frame) re-derives the pixel projection.
        let viewport = ctx.window.viewport();
        if viewport != self.last_viewport && viewport.is_valid() {
            self.draw.set_projection(viewport.pixel_projection());
            self.last_viewport = viewport;
        }

        let time = ctx.time;
        self.angle += self.spin_speed * time.dt;

        let config = self.watcher.config();
        let clear = {
            let [r, g, b, a] = config.clear_color;
            Color::new(r, g, b, a)
        };
        let grid_step = config.grid_step.max(8.0);
        let circle_radius = config.circle_radius;

        let (width, height) = ctx.window.logical_size();
        let center = Vec3::new(width * 0.5, height * 0.5, 0.0);
        let pointer = ctx.input.pointer().unwrap_or(Vec2::new(width * 0.5, height * 0.5));
        let poly_radius = width.min(height) * 0.22;

        let phase = time.elapsed;
        let poly_color = Color::new(
            0.5 + 0.5 * phase.sin(),
            0.5 + 0.5 * (phase + 2.1).sin(),
            0.5 + 0.5 * (phase + 4.2).sin(),
            1.0,
        );
        let circle_color = Color::new(
            0.5 + 0.5 * (phase + 3.1).sin(),
            0.5 + 0.5 * (phase + 1.0).sin(),
            0.5 + 0.5 * (phase + 5.3).sin(),
            0.85,
        );

        let draw = &mut self.draw;
        let sides = self.sides;
        let angle = self.angle;

        ctx.render(clear, |rctx, target| {
            let mut pass = renderer.pass(rctx, target);

            draw.begin();

            // Background grid.
            draw.set_color(Color::WHITE.with_alpha(0.06));
            for col in 1..=(width / grid_step) as usize {
                let x = col as f32 * grid_step;
                draw.line_2d(Vec2::new(x, 0.0), Vec2::new(x, height));
            }
            for row in 1..=(height / grid_step) as usize {
                let y = row as f32 * grid_step;
                draw.line_2d(Vec2::new(0.0, y), Vec2::new(width, y));
            }

            // Cross-hair through the pointer.
            draw.set_color(Color::WHITE.with_alpha(0.3));
            draw.line(Vec3::new(0.0, pointer.y, 0.0), Vec3::new(width, pointer.y, 0.0));
            draw.line(Vec3::new(pointer.x, 0.0, 0.0), Vec3::new(pointer.x, height, 0.0));

            // Spinning polygon around the window center.
            draw.set_color(poly_color);
            draw.set_transform(Mat4::from_translation(center) * Mat4::from_rotation_z(angle));
            draw.polygon_convex_regular(poly_radius, Vec3::ZERO, sides);
            draw.set_transform(Mat4::IDENTITY);

            // Circle riding the pointer.
            draw.set_color(circle_color);
            draw.circle(circle_radius, Vec3::new(pointer.x, pointer.y, 0.0));

            // One triangle from raw vertex calls, one color per corner.
            draw.set_color(Color::RED);
            draw.vertex(Vec3::new(width * 0.08, height * 0.92, 0.0));
            draw.set_color(Color::GREEN);
            draw.vertex(Vec3::new(width * 0.24, height * 0.92, 0.0));
            draw.set_color(Color::BLUE);
            draw.vertex(Vec3::new(width * 0.16, height * 0.78, 0.0));

            draw.end(&mut pass);
            pass.finish();
        })
    }
}
