/// URL fragment naming the active habit, e.g. `#3`.
pub fn fragment_for(id: u64) -> String {
    format!("#{id}")
}

pub fn parse_fragment(fragment: &str) -> Option<u64> {
    fragment.strip_prefix('#').unwrap_or(fragment).parse().ok()
}

/// Where the browser lands after a mutation or selection.
pub fn location_for(active: Option<u64>) -> String {
    match active {
        Some(id) => format!("/{}", fragment_for(id)),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_round_trips_ids() {
        assert_eq!(fragment_for(12), "#12");
        assert_eq!(parse_fragment("#12"), Some(12));
        assert_eq!(parse_fragment("12"), Some(12));
    }

    #[test]
    fn junk_fragments_are_ignored() {
        for fragment in ["", "#", "#abc", "#-1", "#1.5"] {
            assert_eq!(parse_fragment(fragment), None, "{fragment}");
        }
    }

    #[test]
    fn location_without_active_habit_is_root() {
        assert_eq!(location_for(Some(4)), "/#4");
        assert_eq!(location_for(None), "/");
    }
}
