use core::ops::Mul;

use super::Vec2;

/// 2D affine transform, column-major:
///
/// ```text
/// | xx  yx  tx |
/// | xy  yy  ty |
/// ```
///
/// `apply` maps `p` to `(xx·x + yx·y + tx, xy·x + yy·y + ty)`. The `Mul` impl
/// composes like function application: `(a * b).apply(p) == a.apply(b.apply(p))`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat2D {
    pub xx: f32,
    pub xy: f32,
    pub yx: f32,
    pub yy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Mat2D {
    pub const IDENTITY: Self = Self {
        xx: 1.0,
        xy: 0.0,
        yx: 0.0,
        yy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    #[inline]
    pub const fn new(xx: f32, xy: f32, yx: f32, yy: f32, tx: f32, ty: f32) -> Self {
        Self { xx, xy, yx, yy, tx, ty }
    }

    #[inline]
    pub const fn from_translation(tx: f32, ty: f32) -> Self {
        Self { xx: 1.0, xy: 0.0, yx: 0.0, yy: 1.0, tx, ty }
    }

    #[inline]
    pub const fn from_scale(sx: f32, sy: f32) -> Self {
        Self { xx: sx, xy: 0.0, yx: 0.0, yy: sy, tx: 0.0, ty: 0.0 }
    }

    #[inline]
    pub fn from_rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self { xx: c, xy: s, yx: -s, yy: c, tx: 0.0, ty: 0.0 }
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.xx * p.x + self.yx * p.y + self.tx,
            self.xy * p.x + self.yy * p.y + self.ty,
        )
    }

    /// Column-major expansion suitable for a 4×4 GPU matrix's rotation/translation slots.
    #[inline]
    pub fn to_array(self) -> [f32; 6] {
        [self.xx, self.xy, self.yx, self.yy, self.tx, self.ty]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

impl Default for Mat2D {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat2D {
    type Output = Mat2D;

    fn mul(self, rhs: Mat2D) -> Mat2D {
        Mat2D {
            xx: self.xx * rhs.xx + self.yx * rhs.xy,
            xy: self.xy * rhs.xx + self.yy * rhs.xy,
            yx: self.xx * rhs.yx + self.yx * rhs.yy,
            yy: self.xy * rhs.yx + self.yy * rhs.yy,
            tx: self.xx * rhs.tx + self.yx * rhs.ty + self.tx,
            ty: self.xy * rhs.tx + self.yy * rhs.ty + self.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn identity_is_noop() {
        let p = Vec2::new(3.0, -7.0);
        assert_eq!(Mat2D::IDENTITY.apply(p), p);
    }

    #[test]
    fn translation_offsets_points() {
        let m = Mat2D::from_translation(10.0, -2.0);
        assert_eq!(m.apply(Vec2::new(1.0, 1.0)), Vec2::new(11.0, -1.0));
    }

    #[test]
    fn multiply_composes_like_application() {
        let a = Mat2D::from_translation(5.0, 0.0);
        let b = Mat2D::from_scale(2.0, 3.0);
        let p = Vec2::new(1.0, 1.0);
        assert_close((a * b).apply(p), a.apply(b.apply(p)));
        // and not the other way around
        assert_close((b * a).apply(p), b.apply(a.apply(p)));
    }

    #[test]
    fn rotation_quarter_turn() {
        let m = Mat2D::from_rotation(std::f32::consts::FRAC_PI_2);
        assert_close(m.apply(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0));
    }
}
