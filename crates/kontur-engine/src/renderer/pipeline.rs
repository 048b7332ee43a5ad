//! Backend-agnostic pipeline descriptions.
//!
//! The engine never talks to a GPU API, but the stencil discipline in the
//! event stream only works if every backend configures the same masks and
//! operations. This module states those configurations as plain data, keyed
//! by the fields already present on each event, so a backend's translation is
//! a lookup instead of a reimplementation.

/// Stencil bit reserved for the clip mask.
pub const CLIP_STENCIL_BIT: u8 = 0x80;
/// Stencil bits carrying the winding counter while a clip is active.
pub const WINDING_MASK: u8 = 0x7F;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CompareFunc {
    Always,
    Equal,
    NotEqual,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrWrap,
    DecrWrap,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FaceWinding {
    Ccw,
    Cw,
}

/// Per-face stencil behavior.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StencilFace {
    pub compare: CompareFunc,
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
}

impl StencilFace {
    const KEEP: Self = Self {
        compare: CompareFunc::Always,
        fail: StencilOp::Keep,
        depth_fail: StencilOp::Keep,
        pass: StencilOp::Keep,
    };
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StencilState {
    pub enabled: bool,
    pub front: StencilFace,
    pub back: StencilFace,
    pub read_mask: u8,
    pub write_mask: u8,
    pub reference: u8,
}

impl StencilState {
    const DISABLED: Self = Self {
        enabled: false,
        front: StencilFace::KEEP,
        back: StencilFace::KEEP,
        read_mask: 0xFF,
        write_mask: 0xFF,
        reference: 0,
    };
}

/// Everything a backend needs to build (or cache) one pipeline variant.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PipelineDesc {
    pub stencil: StencilState,
    pub face_winding: FaceWinding,
    pub color_write: bool,
}

/// Winding (stencil) pass pipeline for a `DrawStencil` event.
///
/// Front faces increment, back faces decrement (wrap mode), so overlap sums
/// by winding number. Even-odd fills flip the face winding on odd sub-path
/// indices. Under an active clip, winding is confined to the low seven bits
/// and only fragments inside the mask (bit 7 set) participate.
pub fn stencil_winding_pipeline(is_even_odd: bool, idx: u32, is_clipping: bool) -> PipelineDesc {
    let face_winding = if is_even_odd && idx % 2 != 0 {
        FaceWinding::Cw
    } else {
        FaceWinding::Ccw
    };

    let (compare, read_mask, write_mask, reference) = if is_clipping {
        (CompareFunc::Equal, CLIP_STENCIL_BIT, WINDING_MASK, CLIP_STENCIL_BIT)
    } else {
        (CompareFunc::Always, 0xFF, 0xFF, 0x00)
    };

    PipelineDesc {
        stencil: StencilState {
            enabled: true,
            front: StencilFace {
                compare,
                fail: StencilOp::Keep,
                depth_fail: StencilOp::Keep,
                pass: StencilOp::IncrWrap,
            },
            back: StencilFace {
                compare,
                fail: StencilOp::Keep,
                depth_fail: StencilOp::Keep,
                pass: StencilOp::DecrWrap,
            },
            read_mask,
            write_mask,
            reference,
        },
        face_winding,
        color_write: false,
    }
}

/// Cover pass pipeline for a `DrawCover` event.
///
/// Draws where the winding count is non-zero and clears those stencil bits on
/// the way through, leaving the buffer ready for the next path. In
/// clip-apply mode (`applying_clip`, i.e. between `ClippingBegin`/`End`) the
/// quad writes the clip indicator instead of color: covered fragments become
/// `0x80`, everything else in the quad is zeroed, which intersects any
/// previous mask.
pub fn cover_pipeline(is_clipping: bool, applying_clip: bool) -> PipelineDesc {
    if applying_clip {
        let face = StencilFace {
            compare: CompareFunc::NotEqual,
            fail: StencilOp::Zero,
            depth_fail: StencilOp::Zero,
            pass: StencilOp::Replace,
        };
        return PipelineDesc {
            stencil: StencilState {
                enabled: true,
                front: face,
                back: face,
                read_mask: WINDING_MASK,
                write_mask: 0xFF,
                reference: CLIP_STENCIL_BIT,
            },
            face_winding: FaceWinding::Ccw,
            color_write: false,
        };
    }

    let face = StencilFace {
        compare: CompareFunc::NotEqual,
        fail: StencilOp::Zero,
        depth_fail: StencilOp::Zero,
        pass: StencilOp::Zero,
    };
    let mask: u8 = if is_clipping { WINDING_MASK } else { 0xFF };
    PipelineDesc {
        stencil: StencilState {
            enabled: true,
            front: face,
            back: face,
            read_mask: mask,
            write_mask: mask,
            reference: 0x00,
        },
        face_winding: FaceWinding::Ccw,
        color_write: true,
    }
}

/// Tessellation-mode pipeline for a `Draw` event, specialized by clip depth.
///
/// With no clips the stencil unit is off. Under clipping the draw requires
/// the stencil to equal the clip depth (each mask layer incremented once), so
/// the reference is the `applied_clip_count` byte off the event.
pub fn tessellation_pipeline(applied_clip_count: u8) -> PipelineDesc {
    if applied_clip_count == 0 {
        return PipelineDesc {
            stencil: StencilState::DISABLED,
            face_winding: FaceWinding::Ccw,
            color_write: true,
        };
    }
    let face = StencilFace {
        compare: CompareFunc::Equal,
        fail: StencilOp::Keep,
        depth_fail: StencilOp::Keep,
        pass: StencilOp::Keep,
    };
    PipelineDesc {
        stencil: StencilState {
            enabled: true,
            front: face,
            back: face,
            read_mask: 0xFF,
            write_mask: 0x00,
            reference: applied_clip_count,
        },
        face_winding: FaceWinding::Ccw,
        color_write: true,
    }
}

/// Tessellation-mode pipeline for mask draws between
/// `ClippingBegin`/`ClippingEnd`: each clip layer increments the counter,
/// no color.
pub fn tessellation_mask_pipeline() -> PipelineDesc {
    let face = StencilFace {
        compare: CompareFunc::Always,
        fail: StencilOp::Keep,
        depth_fail: StencilOp::Keep,
        pass: StencilOp::IncrWrap,
    };
    PipelineDesc {
        stencil: StencilState {
            enabled: true,
            front: face,
            back: face,
            read_mask: 0xFF,
            write_mask: 0xFF,
            reference: 0,
        },
        face_winding: FaceWinding::Ccw,
        color_write: false,
    }
}
