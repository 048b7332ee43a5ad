use bytemuck::{Pod, Zeroable};

use super::MAX_STOPS;

/// Flat paint record consumed by shaders.
///
/// Everything is `f32` so the whole struct uploads as one uniform block with
/// `bytemuck::bytes_of`; `fill_type` and `stop_count` are floats for the same
/// reason. Copied, never aliased, into per-draw uniforms.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct PaintUniform {
    pub fill_type: f32,
    pub stop_count: f32,
    /// Stop positions; entries past `stop_count` are zero.
    pub stops: [f32; MAX_STOPS],
    /// Straight-alpha RGBA floats, four per stop.
    pub colors: [f32; MAX_STOPS * 4],
    /// `[start_x, start_y, end_x, end_y]` in path units.
    pub gradient_limits: [f32; 4],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl Default for PaintUniform {
    #[inline]
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_a_multiple_of_16_bytes() {
        assert_eq!(std::mem::size_of::<PaintUniform>() % 16, 0);
    }

    #[test]
    fn default_is_all_zero() {
        let u = PaintUniform::default();
        assert_eq!(u.fill_type, 0.0);
        assert_eq!(u.stop_count, 0.0);
        assert!(bytemuck::bytes_of(&u).iter().all(|&b| b == 0));
    }
}
