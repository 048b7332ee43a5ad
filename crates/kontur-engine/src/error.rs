use std::fmt;

/// Gradient builder sequencing error.
///
/// These are programming errors in the caller, not runtime conditions: the
/// gradient builder must be opened with `linear_gradient`/`radial_gradient`
/// before stops are added, and completed exactly once.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PaintError {
    /// `add_stop` called with no gradient under construction.
    StopOutsideGradient,
    /// `complete_gradient` called with no gradient under construction
    /// (including a second call after completion).
    NoGradientToComplete,
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintError::StopOutsideGradient => {
                write!(f, "gradient stop added outside linear/radial gradient construction")
            }
            PaintError::NoGradientToComplete => {
                write!(f, "complete_gradient called without an open gradient")
            }
        }
    }
}

impl std::error::Error for PaintError {}

/// Sticky degradation flags for a path.
///
/// The engine never fails a draw call over malformed geometry; it renders what
/// it can and records what went wrong here. Cleared by `RenderPath::reset`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PathStatus {
    /// The contour exceeded the scratch vertex capacity and was cut short.
    pub truncated: bool,
    /// A line/cubic command was walked before any `move_to`; the contour
    /// started from the origin.
    pub missing_move: bool,
}

impl PathStatus {
    #[inline]
    pub fn is_clean(self) -> bool {
        self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_error_messages_name_the_misuse() {
        assert!(PaintError::StopOutsideGradient.to_string().contains("stop"));
        assert!(PaintError::NoGradientToComplete.to_string().contains("complete_gradient"));
    }

    #[test]
    fn default_status_is_clean() {
        assert!(PathStatus::default().is_clean());
        let degraded = PathStatus { truncated: true, ..Default::default() };
        assert!(!degraded.is_clean());
    }
}
