// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

// External crate imports
use bon::Builder;
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, trace, warn};

// Standard library imports
use std::f64::consts::{PI, TAU};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

mod segment;

use segment::Shape;
pub use segment::{Color, Easing, ParseColorError, Segment, SegmentSpec};

/// Fixed angle the first segment starts from. The gauge opens along the
/// horizontal diameter and sweeps clockwise across the top half to `2π`.
pub const BASELINE_ANGLE: f64 = PI;

/// Total sweep shared by all segments: the gauge spans 180°, not 360°.
const HALF_TURN: f64 = PI;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GaugeError {
    #[error("invalid value {value} at index {index}: values must be finite and non-negative")]
    InvalidValue { index: usize, value: f64 },

    #[error("segment index {index} out of range for {len} segments")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error(transparent)]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Surface(#[from] pixels::Error),
}

fn validate_value(index: usize, value: f64) -> Result<(), GaugeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GaugeError::InvalidValue { index, value })
    }
}

// ============================================================================
// PUBLIC API - CONFIGURATION & COMMANDS
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = "".to_string())]
    pub title: String,

    // Segment appearance
    #[builder(default = true)]
    pub segment_show_stroke: bool,
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub segment_stroke_color: Color,
    #[builder(default = 2.0)]
    pub segment_stroke_width: f64,
    /// Percentage of the outer radius cut out of the middle, 0..100.
    #[builder(default = 50.0)]
    pub percentage_inner_cutout: f64,

    // Animation
    #[builder(default = 100)]
    pub animation_steps: u32,
    #[builder(default = Easing::EaseOutBounce)]
    pub animation_easing: Easing,
    /// Animate each segment's angular sweep out from zero width.
    #[builder(default = true)]
    pub animate_rotate: bool,
    /// Animate the radius band outward from the centre.
    #[builder(default = false)]
    pub animate_scale: bool,

    // Window configuration
    #[builder(default = 300)]
    pub window_width: usize,
    #[builder(default = 300)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = Color::new(0x1c, 0x1c, 0x1c))]
    pub background_color: Color,
}

/// Command enum for driving a displayed gauge from another thread.
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    SetData(Vec<SegmentSpec>),
    AddSegment(SegmentSpec),
    AddSegmentAt(SegmentSpec, usize),
    RemoveSegment,
    RemoveSegmentAt(usize),
}

// ============================================================================
// GAUGE - SEGMENT COLLECTION MANAGER
// ============================================================================

/// Semicircular gauge: an ordered run of proportionally-sized arc segments
/// sharing one radius band, animated on data change and hit-testable.
///
/// The segment sequence is owned exclusively by the gauge; mutation goes
/// through [`Gauge::set_data`], [`Gauge::add_segment`] and
/// [`Gauge::remove_segment`], each of which restarts the animation sequence
/// rather than stacking a new one on top of an in-flight pass.
#[derive(Debug)]
pub struct Gauge {
    config: GaugeConfig,
    segments: Vec<Segment>,
    total: f64,
    outer_radius: f64,
    /// Width and height of the drawing surface in pixels.
    surface: (usize, usize),
    /// Animation frame counter; runs 0..=animation_steps, then holds.
    frame: u32,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Self {
        let mut gauge = Self {
            segments: Vec::new(),
            total: 0.0,
            outer_radius: 0.0,
            surface: (config.window_width, config.window_height),
            frame: config.animation_steps,
            config,
        };
        gauge.outer_radius = gauge.surface_outer_radius();
        gauge
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Replaces the whole data set in one atomic batch.
    ///
    /// All entries are validated before any state is touched; on error the
    /// previous segments remain as they were. Entrance-animated fields start
    /// collapsed (see [`GaugeConfig::animate_rotate`] and
    /// [`GaugeConfig::animate_scale`]) so the following animated pass can
    /// interpolate them toward their targets.
    pub fn set_data(&mut self, data: Vec<SegmentSpec>) -> Result<(), GaugeError> {
        for (index, spec) in data.iter().enumerate() {
            validate_value(index, spec.value)?;
        }
        debug!(entries = data.len(), "replacing gauge data");
        self.segments.clear();
        self.total = data.iter().map(|spec| spec.value).sum();
        for spec in data {
            self.insert_segment(spec, self.segments.len());
        }
        self.update();
        Ok(())
    }

    /// Inserts one segment at `at_index` (default: end). Unless `silent`,
    /// radii are re-derived from the current surface and the animation
    /// sequence restarts.
    pub fn add_segment(
        &mut self,
        spec: SegmentSpec,
        at_index: Option<usize>,
        silent: bool,
    ) -> Result<(), GaugeError> {
        let index = at_index.unwrap_or(self.segments.len());
        if index > self.segments.len() {
            return Err(GaugeError::IndexOutOfRange {
                index,
                len: self.segments.len(),
            });
        }
        validate_value(index, spec.value)?;
        debug!(index, value = spec.value, silent, "adding segment");
        self.insert_segment(spec, index);
        if !silent {
            self.reflow();
            self.update();
        }
        Ok(())
    }

    /// Removes the segment at `at_index` (default: last). Removing from an
    /// empty gauge is a silent no-op; an explicit out-of-range index is an
    /// error and leaves the collection untouched.
    pub fn remove_segment(&mut self, at_index: Option<usize>) -> Result<(), GaugeError> {
        if self.segments.is_empty() {
            return Ok(());
        }
        let index = at_index.unwrap_or(self.segments.len() - 1);
        if index >= self.segments.len() {
            return Err(GaugeError::IndexOutOfRange {
                index,
                len: self.segments.len(),
            });
        }
        let removed = self.segments.remove(index);
        debug!(index, label = ?removed.label, "removed segment");
        self.reflow();
        self.update();
        Ok(())
    }

    /// Re-derives the radius band from the current surface size and stroke
    /// width. Called on structural or resize changes, never by pure repaint.
    pub fn reflow(&mut self) {
        self.outer_radius = self.surface_outer_radius();
        let inner_radius = self.inner_radius_target();
        for segment in &mut self.segments {
            segment.set_radii(inner_radius, self.outer_radius);
        }
    }

    /// Recomputes the total, drops any transient hover overrides, snapshots
    /// every segment's shape, and restarts the animation sequence from
    /// frame 0. A call while a sequence is in flight supersedes it.
    pub fn update(&mut self) {
        self.total = self.segments.iter().map(|segment| segment.value).sum();
        for segment in &mut self.segments {
            segment.end_hover();
            segment.save_shape();
        }
        self.frame = 0;
    }

    /// Updates the surface size and reflows the radius band.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.surface = (width, height);
        self.reflow();
    }

    /// Runs one animation frame at linear `progress` in `[0, 1]`:
    /// interpolates every segment toward its target shape through the
    /// configured easing, re-chains the angular spans from the baseline, and
    /// emits one draw command per segment into `scene`.
    pub fn render_frame(&mut self, progress: f64, scene: &mut Scene) {
        let eased = self.config.animation_easing.apply(progress);
        let (cx, cy) = self.center();
        let total = self.total;
        let outer_radius = self.outer_radius;
        let inner_radius = self.inner_radius_target();
        let stroke = self.config.segment_show_stroke.then_some(Stroke {
            color: self.config.segment_stroke_color,
            width: self.config.segment_stroke_width,
        });

        scene.add(DrawCommand::Clear(self.config.background_color));

        let mut cursor = BASELINE_ANGLE;
        for segment in &mut self.segments {
            let target = Shape {
                // Zero total degrades to zero-width segments, never NaN.
                circumference: if total > 0.0 {
                    HALF_TURN * segment.value / total
                } else {
                    0.0
                },
                inner_radius,
                outer_radius,
            };
            segment.transition(target, eased);
            // First segment is pinned to the baseline, each next one chains
            // off the previous end; re-assigned every frame so nothing drifts.
            segment.start_angle = cursor;
            segment.end_angle = segment.start_angle + segment.circumference;
            cursor = segment.end_angle;

            scene.add(DrawCommand::SegmentArc {
                cx,
                cy,
                inner_radius: segment.inner_radius,
                outer_radius: segment.outer_radius,
                start_angle: segment.start_angle,
                end_angle: segment.end_angle,
                fill: segment.fill_color,
                stroke,
            });
        }
    }

    // ------------------------------------------------------------------
    // Interaction resolver
    // ------------------------------------------------------------------

    /// Returns every segment containing the surface point `(x, y)`: its
    /// angle about the gauge centre must fall in the segment's span and its
    /// distance in the segment's radius band. Empty collection, empty result.
    pub fn segments_at(&self, x: f64, y: f64) -> Vec<&Segment> {
        self.hit_indices(x, y)
            .into_iter()
            .map(|index| &self.segments[index])
            .collect()
    }

    /// Applies the hover style: restores every segment's fill, then swaps
    /// the matched segments to their highlight color. Returns the number of
    /// matches so the host can drive its tooltip off the same event.
    pub fn apply_hover(&mut self, x: f64, y: f64) -> usize {
        let hits = self.hit_indices(x, y);
        for segment in &mut self.segments {
            segment.end_hover();
        }
        for &index in &hits {
            self.segments[index].begin_hover();
        }
        trace!(x, y, hits = hits.len(), "hover resolved");
        hits.len()
    }

    /// Restores every segment's fill, ending any hover interaction.
    pub fn clear_hover(&mut self) {
        for segment in &mut self.segments {
            segment.end_hover();
        }
    }

    fn hit_indices(&self, x: f64, y: f64) -> Vec<usize> {
        let (angle, distance) = polar_about(self.center(), (x, y));
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.contains(angle, distance))
            .map(|(index, _)| index)
            .collect()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn insert_segment(&mut self, spec: SegmentSpec, index: usize) {
        let circumference = self.circumference_of(spec.value);
        let inner_radius = self.inner_radius_target();
        let initial = Shape {
            circumference: if self.config.animate_rotate {
                0.0
            } else {
                circumference
            },
            inner_radius: if self.config.animate_scale {
                0.0
            } else {
                inner_radius
            },
            outer_radius: if self.config.animate_scale {
                0.0
            } else {
                self.outer_radius
            },
        };
        self.segments
            .insert(index, Segment::new(spec, initial, BASELINE_ANGLE));
    }

    fn circumference_of(&self, value: f64) -> f64 {
        if self.total > 0.0 {
            HALF_TURN * value / self.total
        } else {
            0.0
        }
    }

    fn surface_outer_radius(&self) -> f64 {
        let (width, height) = self.surface;
        ((width.min(height) as f64) - self.config.segment_stroke_width / 2.0).max(0.0) / 2.0
    }

    fn inner_radius_target(&self) -> f64 {
        self.outer_radius * self.config.percentage_inner_cutout.clamp(0.0, 100.0) / 100.0
    }

    /// Gauge centre: middle of the bottom edge, so the arcs sweep the top
    /// half of the surface.
    fn center(&self) -> (f64, f64) {
        let (width, height) = self.surface;
        (width as f64 / 2.0, height as f64)
    }

    /// Advances the lazy animation counter and returns linear progress for
    /// the frame; holds at 1.0 once the sequence has completed.
    fn next_progress(&mut self) -> f64 {
        let steps = self.config.animation_steps.max(1);
        let progress = f64::from(self.frame.min(steps)) / f64::from(steps);
        if self.frame < steps {
            self.frame += 1;
        }
        progress
    }

    fn apply_command(&mut self, command: GaugeCommand) -> Result<(), GaugeError> {
        match command {
            GaugeCommand::SetData(data) => self.set_data(data),
            GaugeCommand::AddSegment(spec) => self.add_segment(spec, None, false),
            GaugeCommand::AddSegmentAt(spec, index) => self.add_segment(spec, Some(index), false),
            GaugeCommand::RemoveSegment => self.remove_segment(None),
            GaugeCommand::RemoveSegmentAt(index) => self.remove_segment(Some(index)),
        }
    }
}

/// Converts a surface point to gauge-local polar coordinates. Angles are
/// measured like canvas arcs (y down, clockwise from the positive x axis)
/// and wrapped into the gauge's `[π, 3π)` window, so the half-turn span
/// `[π, 2π]` compares without a wraparound seam — including points up and
/// to the left of the centre, where a bare `atan2` lands on the far side of
/// the seam.
fn polar_about(center: (f64, f64), point: (f64, f64)) -> (f64, f64) {
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    let distance = dx.hypot(dy);
    let mut angle = dy.atan2(dx);
    if angle < BASELINE_ANGLE {
        angle += TAU;
    }
    (angle, distance)
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    SegmentArc {
        cx: f64,
        cy: f64,
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        end_angle: f64,
        fill: Color,
        stroke: Option<Stroke>,
    },
}

/// One frame's worth of draw commands, in paint order.
#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub(crate) fn render(&self, canvas: &mut Canvas) {
        for command in &self.commands {
            match *command {
                DrawCommand::Clear(color) => canvas.clear(color),
                DrawCommand::SegmentArc {
                    cx,
                    cy,
                    inner_radius,
                    outer_radius,
                    start_angle,
                    end_angle,
                    fill,
                    stroke,
                } => {
                    canvas.annular_sector(
                        cx,
                        cy,
                        inner_radius,
                        outer_radius,
                        start_angle,
                        end_angle,
                        fill,
                    );
                    if let Some(stroke) = stroke {
                        canvas.stroke_annular_sector(
                            cx,
                            cy,
                            inner_radius,
                            outer_radius,
                            start_angle,
                            end_angle,
                            stroke,
                        );
                    }
                }
            }
        }
    }
}

// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================

pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        self.frame[idx] = blend(color.r, self.frame[idx]);
        self.frame[idx + 1] = blend(color.g, self.frame[idx + 1]);
        self.frame[idx + 2] = blend(color.b, self.frame[idx + 2]);
        self.frame[idx + 3] = 0xff;
    }

    /// Fills the annular sector between radii `r0..r1` and angles `a0..a1`
    /// (gauge angle window, `[π, 3π)`), antialiasing the radial edges.
    fn annular_sector(
        &mut self,
        cx: f64,
        cy: f64,
        r0: f64,
        r1: f64,
        a0: f64,
        a1: f64,
        color: Color,
    ) {
        if r1 <= 0.0 || a1 <= a0 {
            return;
        }
        let r0 = r0.max(0.0);
        let min_x = ((cx - r1 - 1.0).floor() as i32).max(0);
        let max_x = ((cx + r1 + 1.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = ((cy - r1 - 1.0).floor() as i32).max(0);
        let max_y = ((cy + r1 + 1.0).ceil() as i32).min(self.height as i32 - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                let dist = dx.hypot(dy);
                let mut angle = dy.atan2(dx);
                if angle < BASELINE_ANGLE {
                    angle += TAU;
                }
                if angle < a0 || angle > a1 {
                    continue;
                }
                let aa = if dist < r0 {
                    (1.0 - (r0 - dist)).max(0.0)
                } else if dist > r1 {
                    (1.0 - (dist - r1)).max(0.0)
                } else {
                    1.0
                };
                if aa > 0.01 {
                    self.blend_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Outlines an annular sector: rim bands along both radii plus the two
    /// radial edges.
    fn stroke_annular_sector(
        &mut self,
        cx: f64,
        cy: f64,
        r0: f64,
        r1: f64,
        a0: f64,
        a1: f64,
        stroke: Stroke,
    ) {
        if stroke.width <= 0.0 || a1 <= a0 || r1 <= r0 {
            return;
        }
        let band = stroke.width.min(r1 - r0);
        self.annular_sector(cx, cy, r1 - band, r1, a0, a1, stroke.color);
        self.annular_sector(cx, cy, r0, r0 + band, a0, a1, stroke.color);
        for angle in [a0, a1] {
            let (sin, cos) = angle.sin_cos();
            self.line(
                cx + cos * r0,
                cy + sin * r0,
                cx + cos * r1,
                cy + sin * r1,
                stroke.width,
                stroke.color,
            );
        }
    }

    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64, color: Color) {
        let pad = thickness.ceil() + 1.0;
        let min_x = (x0.min(x1) - pad).floor() as i32;
        let max_x = (x0.max(x1) + pad).ceil() as i32;
        let min_y = (y0.min(y1) - pad).floor() as i32;
        let max_y = (y0.max(y1) + pad).ceil() as i32;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = (dx * dx + dy * dy).max(f64::EPSILON);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 - x0;
                let py = y as f64 - y0;
                let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = (lx - x as f64).hypot(ly - y as f64);
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend_pixel(x, y, color, aa as f32);
                }
            }
        }
    }
}

// ============================================================================
// WINDOW LOOP
// ============================================================================

impl Gauge {
    /// Opens a window and renders the gauge until it is closed.
    pub fn show(&mut self) -> Result<(), GaugeError> {
        self.run_window(None)
    }

    /// Like [`Gauge::show`], draining data commands from `receiver` once per
    /// frame. Invalid commands are logged and dropped; they never interrupt
    /// the render loop.
    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<(), GaugeError> {
        self.run_window(Some(receiver))
    }

    fn run_window(&mut self, receiver: Option<Receiver<GaugeCommand>>) -> Result<(), GaugeError> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        // The framebuffer is in physical pixels; keep the geometry in the
        // same space so cursor positions hit-test directly.
        self.resize(fb_width, fb_height);

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                        self.resize(fb_width, fb_height);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        self.apply_hover(position.x, position.y);
                    }
                    WindowEvent::CursorLeft { .. } => {
                        self.clear_hover();
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(receiver) = receiver.as_ref() {
                            while let Ok(command) = receiver.try_recv() {
                                if let Err(err) = self.apply_command(command) {
                                    warn!(%err, "dropping invalid gauge command");
                                }
                            }
                        }
                        let progress = self.next_progress();
                        let mut scene = Scene::new();
                        self.render_frame(progress, &mut scene);
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        scene.render(&mut canvas);
                        let _ = pixels.render();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn config() -> GaugeConfig {
        GaugeConfig::builder().build()
    }

    fn spec(value: f64) -> SegmentSpec {
        SegmentSpec::builder()
            .value(value)
            .color(Color::new(0x10, 0x20, 0x30))
            .build()
    }

    fn render(gauge: &mut Gauge, progress: f64) {
        let mut scene = Scene::new();
        gauge.render_frame(progress, &mut scene);
    }

    /// Gauge with the given values, rendered through to the end of its
    /// animation sequence.
    fn settled(values: &[f64]) -> Gauge {
        let mut gauge = Gauge::new(config());
        gauge
            .set_data(values.iter().map(|&value| spec(value)).collect())
            .unwrap();
        render(&mut gauge, 1.0);
        gauge
    }

    #[test]
    fn circumferences_sum_to_half_turn() {
        let gauge = settled(&[10.0, 20.0, 30.0, 40.0]);
        let sum: f64 = gauge.segments().iter().map(|s| s.circumference).sum();
        assert!((sum - PI).abs() < EPS, "sum was {sum}");
    }

    #[test]
    fn adjacent_segments_chain_exactly() {
        let gauge = settled(&[3.0, 1.0, 4.0, 1.0, 5.0]);
        for pair in gauge.segments().windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn first_segment_pinned_to_baseline_at_any_progress() {
        let mut gauge = settled(&[1.0, 2.0]);
        assert_eq!(gauge.segments()[0].start_angle, BASELINE_ANGLE);
        render(&mut gauge, 0.37);
        assert_eq!(gauge.segments()[0].start_angle, BASELINE_ANGLE);
    }

    #[test]
    fn even_split_spans_the_two_quadrants() {
        let gauge = settled(&[50.0, 50.0]);
        let [first, second] = gauge.segments() else {
            panic!("expected two segments");
        };
        assert!((first.circumference - PI / 2.0).abs() < EPS);
        assert!((second.circumference - PI / 2.0).abs() < EPS);
        assert!((first.start_angle - PI).abs() < EPS);
        assert!((first.end_angle - 1.5 * PI).abs() < EPS);
        assert!((second.end_angle - 2.0 * PI).abs() < EPS);
    }

    #[test]
    fn zero_total_degrades_to_zero_width() {
        let gauge = settled(&[0.0, 0.0]);
        for segment in gauge.segments() {
            assert_eq!(segment.circumference, 0.0);
            assert!(segment.start_angle.is_finite());
            assert_eq!(segment.end_angle, BASELINE_ANGLE);
        }
    }

    #[test]
    fn zero_value_entry_stays_zero_width() {
        let gauge = settled(&[0.0, 10.0]);
        assert_eq!(gauge.segments()[0].circumference, 0.0);
        assert!((gauge.segments()[1].circumference - PI).abs() < EPS);
        assert!((gauge.segments()[1].end_angle - 2.0 * PI).abs() < EPS);
    }

    #[test]
    fn remove_without_index_pops_last_and_rechains() {
        let mut gauge = settled(&[1.0, 2.0, 3.0]);
        gauge.remove_segment(None).unwrap();
        render(&mut gauge, 1.0);

        let values: Vec<f64> = gauge.segments().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);
        assert_eq!(gauge.total(), 3.0);
        assert_eq!(gauge.segments()[0].start_angle, BASELINE_ANGLE);
        assert_eq!(
            gauge.segments()[0].end_angle,
            gauge.segments()[1].start_angle
        );
        let sum: f64 = gauge.segments().iter().map(|s| s.circumference).sum();
        assert!((sum - PI).abs() < EPS);
    }

    #[test]
    fn remove_on_empty_is_a_silent_noop() {
        let mut gauge = Gauge::new(config());
        assert!(gauge.remove_segment(None).is_ok());
        assert!(gauge.remove_segment(Some(3)).is_ok());
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let mut gauge = settled(&[1.0, 2.0]);
        match gauge.remove_segment(Some(5)) {
            Err(GaugeError::IndexOutOfRange { index: 5, len: 2 }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(gauge.segments().len(), 2);
    }

    #[test]
    fn add_segment_at_index_keeps_display_order() {
        let mut gauge = settled(&[10.0, 30.0]);
        gauge.add_segment(spec(20.0), Some(1), false).unwrap();
        render(&mut gauge, 1.0);

        let values: Vec<f64> = gauge.segments().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
        assert!((gauge.segments()[1].circumference - PI * 20.0 / 60.0).abs() < EPS);
    }

    #[test]
    fn add_segment_past_the_end_is_an_error() {
        let mut gauge = settled(&[1.0]);
        assert!(matches!(
            gauge.add_segment(spec(1.0), Some(5), false),
            Err(GaugeError::IndexOutOfRange { index: 5, len: 1 })
        ));
    }

    #[test]
    fn silent_add_defers_total_and_animation() {
        let mut gauge = settled(&[10.0]);
        gauge.add_segment(spec(10.0), None, true).unwrap();
        assert_eq!(gauge.total(), 10.0);
        gauge.update();
        assert_eq!(gauge.total(), 20.0);
    }

    #[test]
    fn ingestion_fails_fast_without_mutating() {
        let mut gauge = settled(&[5.0, 5.0]);
        let result = gauge.set_data(vec![spec(1.0), spec(f64::NAN)]);
        assert!(matches!(
            result,
            Err(GaugeError::InvalidValue { index: 1, .. })
        ));
        assert_eq!(gauge.segments().len(), 2);
        assert_eq!(gauge.total(), 10.0);
    }

    #[test]
    fn negative_values_are_rejected() {
        let mut gauge = Gauge::new(config());
        assert!(gauge.set_data(vec![spec(-1.0)]).is_err());
        assert!(gauge.add_segment(spec(-1.0), None, false).is_err());
    }

    #[test]
    fn rotate_entrance_starts_collapsed() {
        let mut gauge = Gauge::new(config());
        gauge.set_data(vec![spec(10.0)]).unwrap();
        render(&mut gauge, 0.0);
        assert_eq!(gauge.segments()[0].circumference, 0.0);
        render(&mut gauge, 1.0);
        assert!((gauge.segments()[0].circumference - PI).abs() < EPS);
    }

    #[test]
    fn rotate_entrance_midway_with_linear_easing() {
        let mut gauge = Gauge::new(
            GaugeConfig::builder()
                .animation_easing(Easing::Linear)
                .build(),
        );
        gauge.set_data(vec![spec(10.0)]).unwrap();
        render(&mut gauge, 0.5);
        assert!((gauge.segments()[0].circumference - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn scale_entrance_starts_with_collapsed_radii() {
        let mut gauge = Gauge::new(GaugeConfig::builder().animate_scale(true).build());
        gauge.set_data(vec![spec(10.0)]).unwrap();
        assert_eq!(gauge.segments()[0].outer_radius, 0.0);
        assert_eq!(gauge.segments()[0].inner_radius, 0.0);
        render(&mut gauge, 1.0);
        assert!((gauge.segments()[0].outer_radius - gauge.outer_radius()).abs() < EPS);
    }

    #[test]
    fn resize_reflows_the_radius_band() {
        let mut gauge = settled(&[10.0]);
        gauge.resize(400, 400);
        // (min(400, 400) - stroke_width / 2) / 2 with the default 2.0 stroke.
        assert!((gauge.outer_radius() - 199.5).abs() < EPS);
        assert!((gauge.segments()[0].outer_radius - 199.5).abs() < EPS);
        assert!((gauge.segments()[0].inner_radius - 99.75).abs() < EPS);
    }

    #[test]
    fn scene_gets_clear_plus_one_command_per_segment() {
        let mut gauge = Gauge::new(config());
        gauge
            .set_data(vec![spec(1.0), spec(2.0), spec(3.0)])
            .unwrap();
        let mut scene = Scene::new();
        gauge.render_frame(1.0, &mut scene);
        assert_eq!(scene.commands().len(), 4);
        assert!(matches!(scene.commands()[0], DrawCommand::Clear(_)));
    }

    // ------------------------------------------------------------------
    // Hit-testing
    // ------------------------------------------------------------------

    /// Surface point at a segment's mid-angle, mid-radius, for the default
    /// 300x300 surface (centre at (150, 300)).
    fn mid_point(gauge: &Gauge, index: usize) -> (f64, f64) {
        let segment = &gauge.segments()[index];
        let (sin, cos) = segment.mid_angle().sin_cos();
        (
            150.0 + cos * segment.mid_radius(),
            300.0 + sin * segment.mid_radius(),
        )
    }

    #[test]
    fn mid_points_resolve_to_exactly_their_segment() {
        let gauge = settled(&[25.0, 25.0, 25.0, 25.0]);
        for index in 0..4 {
            let (x, y) = mid_point(&gauge, index);
            let hits = gauge.segments_at(x, y);
            assert_eq!(hits.len(), 1, "segment {index} hit {} segments", hits.len());
            assert_eq!(
                hits[0].start_angle,
                gauge.segments()[index].start_angle,
                "wrong segment for index {index}"
            );
        }
    }

    #[test]
    fn upper_left_quadrant_points_resolve_correctly() {
        let gauge = settled(&[50.0, 50.0]);
        let (x, y) = mid_point(&gauge, 0);
        // The first segment's span sits up and to the left of the centre;
        // both deltas from the centre must be negative for this regression.
        assert!(x - 150.0 < 0.0);
        assert!(y - 300.0 < 0.0);
        let hits = gauge.segments_at(x, y);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start_angle, BASELINE_ANGLE);
    }

    #[test]
    fn points_outside_the_radius_band_miss() {
        let gauge = settled(&[50.0, 50.0]);
        // Straight up from the centre, past the outer radius.
        assert!(gauge.segments_at(150.0, 300.0 - 250.0).is_empty());
        // Inside the cutout.
        assert!(gauge.segments_at(150.0, 300.0 - 10.0).is_empty());
    }

    #[test]
    fn points_below_the_diameter_miss() {
        let gauge = settled(&[50.0, 50.0]);
        let mid_radius = gauge.segments()[0].mid_radius();
        assert!(gauge.segments_at(150.0, 300.0 + mid_radius).is_empty());
    }

    #[test]
    fn empty_gauge_resolves_to_nothing() {
        let gauge = Gauge::new(config());
        assert!(gauge.segments_at(150.0, 200.0).is_empty());
    }

    #[test]
    fn hover_swaps_and_restores_fill() {
        let base = Color::new(0x10, 0x20, 0x30);
        let highlight = Color::new(0xff, 0x00, 0x00);
        let mut gauge = Gauge::new(config());
        gauge
            .set_data(vec![SegmentSpec::builder()
                .value(10.0)
                .color(base)
                .highlight(highlight)
                .build()])
            .unwrap();
        render(&mut gauge, 1.0);

        let (x, y) = mid_point(&gauge, 0);
        assert_eq!(gauge.apply_hover(x, y), 1);
        assert_eq!(gauge.segments()[0].fill_color, highlight);

        // Moving off the gauge restores the persisted fill.
        assert_eq!(gauge.apply_hover(0.0, 0.0), 0);
        assert_eq!(gauge.segments()[0].fill_color, base);
    }

    #[test]
    fn update_clears_hover_overrides() {
        let base = Color::new(0x10, 0x20, 0x30);
        let highlight = Color::new(0xff, 0x00, 0x00);
        let mut gauge = Gauge::new(config());
        gauge
            .set_data(vec![SegmentSpec::builder()
                .value(10.0)
                .color(base)
                .highlight(highlight)
                .build()])
            .unwrap();
        render(&mut gauge, 1.0);

        let (x, y) = mid_point(&gauge, 0);
        gauge.apply_hover(x, y);
        gauge.update();
        assert_eq!(gauge.segments()[0].fill_color, base);
    }
}
