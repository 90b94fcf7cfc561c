//! Navigation UI state derived from the current index

/// The lightbox's own buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Previous,
    Next,
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn between(from: usize, to: usize) -> Self {
        if to < from {
            Self::Backward
        } else {
            Self::Forward
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub disabled: bool,
    /// Hidden from assistive technology
    pub hidden: bool,
}

impl ButtonState {
    fn enabled() -> Self {
        Self {
            disabled: false,
            hidden: false,
        }
    }

    fn unavailable() -> Self {
        Self {
            disabled: true,
            hidden: true,
        }
    }

    /// Value for the button's `aria-hidden` attribute. The button stays in
    /// the layout; disabled buttons are faded out by the stylesheet.
    pub fn aria_hidden(&self) -> &'static str {
        if self.hidden {
            "true"
        } else {
            "false"
        }
    }
}

/// Previous/next buttons and the `current/total` counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlsState {
    pub previous: ButtonState,
    pub next: ButtonState,
    pub counter: String,
    pub counter_hidden: bool,
}

impl ControlsState {
    pub fn for_position(index: usize, len: usize) -> Self {
        let single = len <= 1;
        let previous = if single || index == 0 {
            ButtonState::unavailable()
        } else {
            ButtonState::enabled()
        };
        let next = if single || index + 1 >= len {
            ButtonState::unavailable()
        } else {
            ButtonState::enabled()
        };
        Self {
            previous,
            next,
            counter: format!("{}/{}", index + 1, len),
            counter_hidden: single,
        }
    }
}

/// Which control should hold focus after the slider moved.
///
/// Keeps focus off buttons that just became disabled.
pub fn focus_after_move(index: usize, len: usize, direction: Option<Direction>) -> Control {
    if len <= 1 {
        Control::Close
    } else if index == 0 {
        Control::Next
    } else if index + 1 >= len {
        Control::Previous
    } else {
        match direction {
            Some(Direction::Backward) => Control::Previous,
            _ => Control::Next,
        }
    }
}

/// The neighbour worth preloading after moving in `direction`.
pub fn preload_target(index: usize, len: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Backward => index.checked_sub(1),
        Direction::Forward => (index + 1 < len).then_some(index + 1),
    }
}
