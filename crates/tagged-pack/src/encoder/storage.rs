//! Container stack for the encoding engine.

use crate::path::PathSegment;
use crate::value::TaggedValue;

/// Address of a node under construction: a stack slot plus the route from
/// that slot down to a nested container attached inside it.
#[derive(Debug, Clone)]
pub(crate) struct Location {
    depth: usize,
    route: Vec<PathSegment>,
}

impl Location {
    pub(crate) fn top(depth: usize) -> Self {
        Self {
            depth,
            route: Vec::new(),
        }
    }

    pub(crate) fn child(&self, segment: PathSegment) -> Self {
        let mut route = self.route.clone();
        route.push(segment);
        Self {
            depth: self.depth,
            route,
        }
    }
}

/// In-progress values, one per open nesting level.
#[derive(Debug, Default)]
pub(crate) struct ContainerStack {
    containers: Vec<TaggedValue>,
}

impl ContainerStack {
    pub(crate) fn len(&self) -> usize {
        self.containers.len()
    }

    pub(crate) fn last(&self) -> Option<&TaggedValue> {
        self.containers.last()
    }

    /// Pushes `value` and returns the depth it occupies.
    pub(crate) fn push(&mut self, value: TaggedValue) -> usize {
        self.containers.push(value);
        self.containers.len() - 1
    }

    pub(crate) fn pop(&mut self) -> TaggedValue {
        match self.containers.pop() {
            Some(value) => value,
            None => panic!("Empty container stack."),
        }
    }

    pub(crate) fn node_mut(&mut self, location: &Location) -> &mut TaggedValue {
        let Some(mut node) = self.containers.get_mut(location.depth) else {
            panic!(
                "Container at depth {} is no longer on the stack.",
                location.depth
            );
        };
        for segment in &location.route {
            let next = match (node, segment) {
                (TaggedValue::Dictionary(map), PathSegment::Key(key)) => map.get_mut(key.as_str()),
                (TaggedValue::Array(items), PathSegment::Index(index)) => items.get_mut(*index),
                _ => None,
            };
            node = match next {
                Some(next) => next,
                None => panic!("Nested container route no longer resolves."),
            };
        }
        node
    }
}

/// Stores `value` into `slot` of a dictionary or array node. Array slots
/// may be overwritten or appended at exactly the current length.
pub(crate) fn set_slot(node: &mut TaggedValue, slot: PathSegment, value: TaggedValue) {
    match (node, slot) {
        (TaggedValue::Dictionary(map), PathSegment::Key(key)) => {
            map.insert(key, value);
        }
        (TaggedValue::Array(items), PathSegment::Index(index)) => {
            if index < items.len() {
                items[index] = value;
            } else if index == items.len() {
                items.push(value);
            } else {
                panic!("Array slot {index} is past the end ({}).", items.len());
            }
        }
        (node, slot) => panic!("Cannot store {slot:?} into a {} node.", node.tag()),
    }
}
