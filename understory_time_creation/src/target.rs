// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target resolution: which time-grid column, if any, lies under the pointer.

use std::rc::Rc;

use crate::config::ColumnMatcher;
use crate::gesture::ContainerEvents;
use crate::time_core::TimeColumn;

/// Minimal view of a DOM element.
pub trait Element: Clone {
    /// The element's full class string.
    fn class_name(&self) -> &str;

    /// The parent element, if any.
    fn parent(&self) -> Option<Self>;
}

/// The grid view contract: a registry of columns keyed by column id.
pub trait TimeGrid {
    /// Element type delivered by gesture signals over this grid.
    type Element: Element + 'static;
    /// Handle to one column.
    type Column: TimeColumn + Clone + 'static;

    /// Looks up the column registered under `id`.
    fn column(&self, id: &str) -> Option<Self::Column>;

    /// DOM-level events of the grid container, if the grid exposes them.
    fn container_events(&self) -> Option<Rc<ContainerEvents<Self::Element>>> {
        None
    }
}

/// Resolves the column under `target`.
///
/// A hit on the decorative schedule-block wrapper is attributed to its parent, so the
/// chrome of a rendered entry still resolves to the owning column. Returns `None` for
/// anything that is not a registered column.
pub fn resolve_target<G>(
    matcher: &ColumnMatcher,
    grid: &G,
    target: &G::Element,
) -> Option<G::Column>
where
    G: TimeGrid + ?Sized,
{
    let parent;
    let effective = if matcher.is_block_wrap(target.class_name()) {
        parent = target.parent()?;
        &parent
    } else {
        target
    };
    let id = matcher.column_id(effective.class_name())?;
    grid.column(id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use kurbo::Rect;

    use super::*;
    use crate::config::ClassNames;

    #[derive(Clone, Debug)]
    struct Node(Rc<(String, Option<Node>)>);

    impl Node {
        fn new(class: &str, parent: Option<&Self>) -> Self {
            Self(Rc::new((class.to_owned(), parent.cloned())))
        }
    }

    impl Element for Node {
        fn class_name(&self) -> &str {
            &self.0.0
        }
        fn parent(&self) -> Option<Self> {
            self.0.1.clone()
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Col(&'static str);

    impl TimeColumn for Col {
        fn bounds(&self) -> Rect {
            Rect::new(0.0, 0.0, 10.0, 240.0)
        }
        fn date(&self) -> i64 {
            0
        }
    }

    struct Grid(HashMap<&'static str, Col>);

    impl TimeGrid for Grid {
        type Element = Node;
        type Column = Col;

        fn column(&self, id: &str) -> Option<Col> {
            self.0.get(id).cloned()
        }
    }

    fn setup() -> (ColumnMatcher, Grid) {
        let matcher = ClassNames::default().compile().unwrap();
        let grid = Grid(HashMap::from([("3", Col("three")), ("4", Col("four"))]));
        (matcher, grid)
    }

    #[test]
    fn column_container_resolves() {
        let (matcher, grid) = setup();
        let column = Node::new("time-date time-date-3", None);
        assert_eq!(resolve_target(&matcher, &grid, &column), Some(Col("three")));
    }

    #[test]
    fn wrapper_resolves_to_parent_column() {
        let (matcher, grid) = setup();
        let column = Node::new("time-date time-date-4", None);
        let wrap = Node::new("time-date-schedule-block-wrap", Some(&column));
        assert_eq!(
            resolve_target(&matcher, &grid, &wrap),
            resolve_target(&matcher, &grid, &column)
        );
        assert_eq!(resolve_target(&matcher, &grid, &wrap), Some(Col("four")));
    }

    #[test]
    fn orphan_wrapper_is_not_a_target() {
        let (matcher, grid) = setup();
        let wrap = Node::new("time-date-schedule-block-wrap", None);
        assert_eq!(resolve_target(&matcher, &grid, &wrap), None);
    }

    #[test]
    fn only_the_direct_parent_is_substituted() {
        let (matcher, grid) = setup();
        let column = Node::new("time-date time-date-3", None);
        let inner = Node::new("time-schedule", Some(&column));
        let wrap = Node::new("time-date-schedule-block-wrap", Some(&inner));
        assert_eq!(resolve_target(&matcher, &grid, &wrap), None);
    }

    #[test]
    fn unregistered_and_unrelated_elements_are_not_targets() {
        let (matcher, grid) = setup();
        let unknown = Node::new("time-date time-date-9", None);
        let chrome = Node::new("timegrid-gridline", None);
        assert_eq!(resolve_target(&matcher, &grid, &unknown), None);
        assert_eq!(resolve_target(&matcher, &grid, &chrome), None);
    }
}
