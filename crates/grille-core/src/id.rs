use std::fmt;

/// Declares a `Copy` element identifier backed by a `u32`.
macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Raw numeric value (creation order within a scene).
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $tag, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $tag, self.0)
            }
        }
    };
}

element_id!(
    /// Identity of a node. Stable for the node's whole lifetime.
    NodeId,
    "node"
);
element_id!(
    /// Identity of a line (structural member).
    LineId,
    "line"
);
element_id!(
    /// Identity of a force annotation.
    ForceId,
    "force"
);

/// Monotonic id source, one counter per element kind.
///
/// Ids are never handed out twice, even when the elements they named are
/// deleted or an undo rolls the scene back past their creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next_node: u32,
    next_line: u32,
    next_force: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn line(&mut self) -> LineId {
        let id = LineId(self.next_line);
        self.next_line += 1;
        id
    }

    pub fn force(&mut self) -> ForceId {
        let id = ForceId(self.next_force);
        self.next_force += 1;
        id
    }

    /// Advance every counter to at least `other`'s position.
    pub fn absorb(&mut self, other: &IdAllocator) {
        self.next_node = self.next_node.max(other.next_node);
        self.next_line = self.next_line.max(other.next_line);
        self.next_force = self.next_force.max(other.next_force);
    }
}
