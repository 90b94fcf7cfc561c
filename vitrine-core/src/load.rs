//! Image load bookkeeping

use crate::layout::Size;
use std::fmt;

/// Process-unique identity of one slide's DOM.
///
/// Indices shift when triggers are removed; slide ids never do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlideId(pub u64);

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issued with every image load; the host hands it back with the result.
///
/// A ticket whose slide no longer exists is stale and its result is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub slide: SlideId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoadOutcome {
    Loaded { natural: Size },
    Failed,
}

/// Materialised content of a slide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Content {
    Image { natural: Size },
    Error,
}

impl From<LoadOutcome> for Content {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Loaded { natural } => Content::Image { natural },
            LoadOutcome::Failed => Content::Error,
        }
    }
}
