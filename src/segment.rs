// ============================================================================
// SEGMENT MODEL: color, easing, and the per-arc record
// ============================================================================

use std::str::FromStr;

use bon::Builder;

/// Color of a gauge element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("invalid color literal {0:?}, expected \"#rgb\" or \"#rrggbb\"")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses `"#rgb"` and `"#rrggbb"` hex literals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        // Indexing below is by byte; reject non-ASCII input up front so a
        // multi-byte character can't land on a char boundary panic.
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let nibble = |i: usize| channel(&hex[i..i + 1]).map(|n| n * 0x11);
                Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(err()),
        }
    }
}

// ============================================================================
// EASING
// ============================================================================

/// Easing function applied to animation progress.
///
/// An explicit enum rather than a by-name lookup; `EaseOutBounce` is the
/// stock gauge default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    #[default]
    EaseOutBounce,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Easing::EaseOutBounce => {
                if t < 1.0 / 2.75 {
                    7.5625 * t * t
                } else if t < 2.0 / 2.75 {
                    let u = t - 1.5 / 2.75;
                    7.5625 * u * u + 0.75
                } else if t < 2.5 / 2.75 {
                    let u = t - 2.25 / 2.75;
                    7.5625 * u * u + 0.9375
                } else {
                    let u = t - 2.625 / 2.75;
                    7.5625 * u * u + 0.984375
                }
            }
        }
    }
}

// ============================================================================
// INPUT DATA CONTRACT
// ============================================================================

/// One entry of the incoming data set; order defines display order.
#[derive(Debug, Clone, Builder)]
pub struct SegmentSpec {
    pub value: f64,
    pub color: Color,
    /// Fill used while the pointer hovers the segment; falls back to `color`.
    pub highlight: Option<Color>,
    pub label: Option<String>,
}

// ============================================================================
// SEGMENT
// ============================================================================

/// Animatable shape of a segment: the three interpolated quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Shape {
    pub circumference: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

/// One arc of the gauge: a single value's proportional share of the
/// half-turn, plus its current angular span, radius band, and fill state.
///
/// `circumference` is an angular width in radians, not a length.
#[derive(Debug, Clone)]
pub struct Segment {
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub circumference: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub fill_color: Color,
    pub highlight_color: Color,
    pub label: Option<String>,
    /// Shape at the start of the current animation sequence; `transition`
    /// interpolates from here toward the frame's target.
    shape_start: Shape,
    /// Fill color held aside while a hover override is active.
    saved_fill: Option<Color>,
}

impl Segment {
    pub(crate) fn new(spec: SegmentSpec, initial: Shape, baseline: f64) -> Self {
        Self {
            value: spec.value,
            start_angle: baseline,
            end_angle: baseline + initial.circumference,
            circumference: initial.circumference,
            inner_radius: initial.inner_radius,
            outer_radius: initial.outer_radius,
            highlight_color: spec.highlight.unwrap_or(spec.color),
            fill_color: spec.color,
            label: spec.label,
            shape_start: initial,
            saved_fill: None,
        }
    }

    /// Snapshots the current shape as the starting point of a new
    /// animation sequence.
    pub(crate) fn save_shape(&mut self) {
        self.shape_start = Shape {
            circumference: self.circumference,
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
        };
    }

    /// Immediately re-bases the radius band, outside of any animation.
    pub(crate) fn set_radii(&mut self, inner_radius: f64, outer_radius: f64) {
        self.inner_radius = inner_radius;
        self.outer_radius = outer_radius;
        self.shape_start.inner_radius = inner_radius;
        self.shape_start.outer_radius = outer_radius;
    }

    /// Moves the shape from its saved snapshot toward `target` at eased
    /// progress `eased` in `[0, 1]`.
    pub(crate) fn transition(&mut self, target: Shape, eased: f64) {
        self.circumference = lerp(self.shape_start.circumference, target.circumference, eased);
        self.inner_radius = lerp(self.shape_start.inner_radius, target.inner_radius, eased);
        self.outer_radius = lerp(self.shape_start.outer_radius, target.outer_radius, eased);
    }

    /// Swaps the fill for the highlight color, keeping the previous fill
    /// aside so `end_hover` can reinstate it. Idempotent while hovered.
    pub(crate) fn begin_hover(&mut self) {
        if self.saved_fill.is_none() {
            self.saved_fill = Some(self.fill_color);
        }
        self.fill_color = self.highlight_color;
    }

    /// Reinstates the fill color saved by `begin_hover`, if any.
    pub(crate) fn end_hover(&mut self) {
        if let Some(fill) = self.saved_fill.take() {
            self.fill_color = fill;
        }
    }

    /// Whether a polar point (angle in the gauge's `[π, 3π)` window,
    /// distance from the gauge center) falls inside this segment.
    pub fn contains(&self, angle: f64, distance: f64) -> bool {
        let between_angles = angle >= self.start_angle && angle <= self.end_angle;
        let within_radius = distance >= self.inner_radius && distance <= self.outer_radius;
        between_angles && within_radius
    }

    /// Angle through the middle of the segment's span.
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Radius through the middle of the segment's band.
    pub fn mid_radius(&self) -> f64 {
        (self.inner_radius + self.outer_radius) / 2.0
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

// ============================================================================
// TESTS
// ============================================================================
