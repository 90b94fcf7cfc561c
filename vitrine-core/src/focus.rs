//! Focus trap decisions
//!
//! The host lists the focusable descendants of the modal in DOM order; these
//! helpers decide where focus goes so it never leaves the modal while open.

/// Selectors for the elements that can receive focus inside the modal.
pub const FOCUSABLE_SELECTORS: &[&str] = &[
    r#"a:not([inert]):not([tabindex^="-"])"#,
    r#"button:not([inert]):not([tabindex^="-"]):not(:disabled)"#,
    r#"[tabindex]:not([inert]):not([tabindex^="-"])"#,
];

pub fn focusable_selector() -> String {
    FOCUSABLE_SELECTORS.join(", ")
}

/// Element that should receive focus for a Tab press, if the trap must step in.
///
/// Returns `None` when the browser's default tab order already stays inside
/// the modal.
pub fn trap_tab<'a, E: PartialEq>(
    focusables: &'a [E],
    active: Option<&E>,
    shift: bool,
) -> Option<&'a E> {
    let first = focusables.first()?;
    let last = focusables.last()?;
    let position = active.and_then(|active| focusables.iter().position(|el| el == active));

    match (position, shift) {
        (None, false) => Some(first),
        (None, true) => Some(last),
        (Some(0), true) => Some(last),
        (Some(i), false) if i + 1 == focusables.len() => Some(first),
        _ => None,
    }
}
