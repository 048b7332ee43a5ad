use crate::error::PaintError;
use crate::geom::Vec2;

use super::gradient::{GradientBuilder, GradientKind};
use super::{Color32, PaintUniform, MAX_STOPS};

/// How a paint is applied to path geometry.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

/// What a paint fills with. Numeric values are the shader-side discriminants.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FillType {
    #[default]
    None = 0,
    Solid = 1,
    Linear = 2,
    Radial = 3,
}

/// Finalized paint contents in structured form; flattened on demand by
/// [`RenderPaint::uniform`].
#[derive(Debug, Clone)]
struct PaintData {
    fill_type: FillType,
    stop_count: u32,
    stops: [f32; MAX_STOPS],
    colors: [f32; MAX_STOPS * 4],
    gradient_limits: [f32; 4],
}

impl Default for PaintData {
    fn default() -> Self {
        Self {
            fill_type: FillType::None,
            stop_count: 0,
            stops: [0.0; MAX_STOPS],
            colors: [0.0; MAX_STOPS * 4],
            gradient_limits: [0.0; 4],
        }
    }
}

/// Retained paint description: style, fill contents, and the gradient builder
/// state machine.
///
/// A paint starts invisible. It becomes drawable via [`color`](Self::color) or
/// a `linear_gradient`/`radial_gradient` … `add_stop`* … `complete_gradient`
/// sequence; until `complete_gradient` runs, the previous contents keep being
/// drawn.
///
/// Stroke parameters (`thickness`, `join`, `cap`, `blend_mode`) are accepted
/// and ignored; the slots are reserved for a later stroke extension.
#[derive(Debug, Clone, Default)]
pub struct RenderPaint {
    style: PaintStyle,
    data: PaintData,
    builder: Option<GradientBuilder>,
    visible: bool,
}

impl RenderPaint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a solid fill. Zero alpha clears visibility.
    pub fn color(&mut self, color: Color32) {
        self.builder = None;
        self.data = PaintData::default();
        self.data.fill_type = FillType::Solid;
        self.data.stop_count = 1;
        self.data.colors[..4].copy_from_slice(&color.to_rgba_f32());
        self.visible = color.alpha() != 0;
    }

    #[inline]
    pub fn set_style(&mut self, style: PaintStyle) {
        self.style = style;
    }

    #[inline]
    pub fn style(&self) -> PaintStyle {
        self.style
    }

    #[inline]
    pub fn fill_type(&self) -> FillType {
        self.data.fill_type
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Begins accumulating a linear gradient from `(sx, sy)` to `(ex, ey)`.
    pub fn linear_gradient(&mut self, sx: f32, sy: f32, ex: f32, ey: f32) {
        self.builder = Some(GradientBuilder::new(
            GradientKind::Linear,
            Vec2::new(sx, sy),
            Vec2::new(ex, ey),
        ));
    }

    /// Begins accumulating a radial gradient centered at `(sx, sy)` with the
    /// radius point `(ex, ey)`.
    pub fn radial_gradient(&mut self, sx: f32, sy: f32, ex: f32, ey: f32) {
        self.builder = Some(GradientBuilder::new(
            GradientKind::Radial,
            Vec2::new(sx, sy),
            Vec2::new(ex, ey),
        ));
    }

    /// Appends a stop to the gradient under construction.
    pub fn add_stop(&mut self, color: Color32, t: f32) -> Result<(), PaintError> {
        match &mut self.builder {
            Some(b) => {
                b.push_stop(color, t);
                Ok(())
            }
            None => Err(PaintError::StopOutsideGradient),
        }
    }

    /// Finalizes the gradient under construction into the drawable contents.
    pub fn complete_gradient(&mut self) -> Result<(), PaintError> {
        let builder = self.builder.take().ok_or(PaintError::NoGradientToComplete)?;

        let mut data = PaintData::default();
        data.fill_type = match builder.kind {
            GradientKind::Linear => FillType::Linear,
            GradientKind::Radial => FillType::Radial,
        };
        data.stop_count = builder.stops.len() as u32;
        for (i, stop) in builder.stops.iter().enumerate() {
            data.stops[i] = stop.t;
            data.colors[i * 4..i * 4 + 4].copy_from_slice(&stop.color.to_rgba_f32());
        }
        data.gradient_limits = [builder.start.x, builder.start.y, builder.end.x, builder.end.y];

        self.data = data;
        self.visible = true;
        Ok(())
    }

    // Reserved stroke knobs; accepted so scenes can set them ahead of time.
    pub fn thickness(&mut self, _value: f32) {}
    pub fn join(&mut self, _value: u32) {}
    pub fn cap(&mut self, _value: u32) {}
    pub fn blend_mode(&mut self, _value: u32) {}

    /// Flattens the paint into the shader-facing record.
    pub fn uniform(&self) -> PaintUniform {
        PaintUniform {
            fill_type: self.data.fill_type as u32 as f32,
            stop_count: self.data.stop_count as f32,
            stops: self.data.stops,
            colors: self.data.colors,
            gradient_limits: self.data.gradient_limits,
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color32 = Color32::from_rgb(255, 0, 0);
    const BLUE: Color32 = Color32::from_rgb(0, 0, 255);

    #[test]
    fn new_paint_is_invisible() {
        let p = RenderPaint::new();
        assert!(!p.is_visible());
        assert_eq!(p.fill_type(), FillType::None);
    }

    #[test]
    fn solid_color_becomes_visible() {
        let mut p = RenderPaint::new();
        p.color(RED);
        assert!(p.is_visible());
        let u = p.uniform();
        assert_eq!(u.fill_type, FillType::Solid as u32 as f32);
        assert_eq!(u.stop_count, 1.0);
        assert_eq!(&u.colors[..4], &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn zero_alpha_clears_visibility() {
        let mut p = RenderPaint::new();
        p.color(Color32::from_rgba(255, 0, 0, 0));
        assert!(!p.is_visible());
    }

    #[test]
    fn stop_outside_gradient_is_rejected() {
        let mut p = RenderPaint::new();
        assert_eq!(p.add_stop(RED, 0.0), Err(PaintError::StopOutsideGradient));
        assert_eq!(p.complete_gradient(), Err(PaintError::NoGradientToComplete));
    }

    #[test]
    fn double_complete_is_rejected() {
        let mut p = RenderPaint::new();
        p.linear_gradient(0.0, 0.0, 100.0, 0.0);
        p.add_stop(RED, 0.0).unwrap();
        p.complete_gradient().unwrap();
        assert_eq!(p.complete_gradient(), Err(PaintError::NoGradientToComplete));
    }

    #[test]
    fn linear_gradient_flattens_into_uniform() {
        let mut p = RenderPaint::new();
        p.linear_gradient(0.0, 0.0, 100.0, 0.0);
        p.add_stop(RED, 0.0).unwrap();
        p.add_stop(BLUE, 1.0).unwrap();
        p.complete_gradient().unwrap();
        assert!(p.is_visible());

        let u = p.uniform();
        assert_eq!(u.fill_type, FillType::Linear as u32 as f32);
        assert_eq!(u.stop_count, 2.0);
        assert_eq!(&u.stops[..2], &[0.0, 1.0]);
        assert_eq!(&u.colors[..8], &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(u.gradient_limits, [0.0, 0.0, 100.0, 0.0]);
    }

    #[test]
    fn incomplete_gradient_keeps_previous_contents() {
        let mut p = RenderPaint::new();
        p.color(RED);
        p.radial_gradient(0.0, 0.0, 10.0, 0.0);
        p.add_stop(BLUE, 0.5).unwrap();
        // Not completed: still drawing the solid red.
        assert_eq!(p.fill_type(), FillType::Solid);
        p.complete_gradient().unwrap();
        assert_eq!(p.fill_type(), FillType::Radial);
    }
}
