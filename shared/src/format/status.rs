//! Open/closed status tokens.

/// Text color class for an open or closed state.
#[must_use]
pub fn status_color(is_open: bool) -> &'static str {
    if is_open {
        "text-success"
    } else {
        "text-danger"
    }
}

/// Badge background class for an open or closed state.
#[must_use]
pub fn status_badge(is_open: bool) -> &'static str {
    if is_open {
        "bg-success"
    } else {
        "bg-danger"
    }
}
