//! Wrap-around cursor movement shared by tables and lists.

pub fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) if i + 1 < len => i + 1,
        Some(_) => 0,
        None => 0,
    })
}

pub fn previous_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(0) | None => len - 1,
        Some(i) => (i - 1).min(len - 1),
    })
}

/// Keep a selection inside `len` after rows were removed or filtered.
pub fn clamp_index(current: Option<usize>, len: usize) -> Option<usize> {
    match (current, len) {
        (_, 0) => None,
        (Some(i), len) => Some(i.min(len - 1)),
        (None, _) => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_in_both_directions() {
        assert_eq!(next_index(Some(2), 3), Some(0));
        assert_eq!(next_index(Some(0), 3), Some(1));
        assert_eq!(previous_index(Some(0), 3), Some(2));
        assert_eq!(previous_index(Some(2), 3), Some(1));
        assert_eq!(next_index(None, 0), None);
        assert_eq!(previous_index(None, 4), Some(3));
    }

    #[test]
    fn clamps_after_removal() {
        assert_eq!(clamp_index(Some(5), 3), Some(2));
        assert_eq!(clamp_index(Some(1), 0), None);
        assert_eq!(clamp_index(None, 2), Some(0));
    }
}
