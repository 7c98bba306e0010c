//! Aspect-ratio classification.

use std::fmt;

/// Aspect-ratio bucket for a video. Derived from stream dimensions, used only
/// as a storage-key prefix, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// 16:9
    Widescreen,
    /// 9:16
    Vertical,
    Other,
}

impl AspectRatio {
    /// Classify stream dimensions.
    ///
    /// The tolerance is a fixed absolute difference on the cross products,
    /// not a ratio tolerance: 1366x768 counts as 16:9 (|1366*9 - 768*16| = 6)
    /// while 1360x768 does not.
    pub fn classify(width: f64, height: f64) -> Self {
        if (width * 9.0 - height * 16.0).abs() < 10.0 {
            AspectRatio::Widescreen
        } else if (width * 16.0 - height * 9.0).abs() < 10.0 {
            AspectRatio::Vertical
        } else {
            AspectRatio::Other
        }
    }

    /// Storage-key prefix for this bucket.
    pub fn prefix(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "landscape",
            AspectRatio::Vertical => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatio::Widescreen => write!(f, "16:9"),
            AspectRatio::Vertical => write!(f, "9:16"),
            AspectRatio::Other => write!(f, "other"),
        }
    }
}
