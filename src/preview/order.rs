//! Position ordering shared by sections, sub-sections and collections.

/// Position reserved for the featured entry of the top-level screen.
pub const FEATURED_POSITION: i64 = 0;

/// Anything that carries an optional editor-assigned position.
pub trait Positioned {
    fn position(&self) -> Option<i64>;
}

/// Sort key: missing positions are treated as the maximum.
pub fn position_key(position: Option<i64>) -> i64 {
    position.unwrap_or(i64::MAX)
}

/// Stable ascending sort by position, missing positions last.
pub fn sort_by_position<T: Positioned>(nodes: &mut [T]) {
    nodes.sort_by_key(|n| position_key(n.position()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Node(&'static str, Option<i64>);

    impl Positioned for Node {
        fn position(&self) -> Option<i64> {
            self.1
        }
    }

    #[test]
    fn test_missing_position_sorts_last() {
        let mut nodes = vec![
            Node("c", Some(3)),
            Node("a", Some(1)),
            Node("none", None),
            Node("featured", Some(0)),
        ];
        sort_by_position(&mut nodes);
        let positions: Vec<_> = nodes.iter().map(|n| n.1).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(3), None]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut nodes = vec![
            Node("first", None),
            Node("x", Some(2)),
            Node("second", None),
            Node("y", Some(2)),
        ];
        sort_by_position(&mut nodes);
        let names: Vec<_> = nodes.iter().map(|n| n.0).collect();
        assert_eq!(names, vec!["x", "y", "first", "second"]);
    }

    #[test]
    fn test_negative_positions_before_featured() {
        let mut nodes = vec![Node("zero", Some(0)), Node("neg", Some(-1))];
        sort_by_position(&mut nodes);
        assert_eq!(nodes[0].0, "neg");
    }
}
