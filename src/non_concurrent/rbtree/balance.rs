//! Rotations and the recoloring passes that restore the red-black invariants after a node has
//! been linked in or spliced out.

use log::trace;

use super::RbTree;
use super::arena::NodeArena;
use super::node::{Color, NodeId};

impl<K> RbTree<K> {
    /// Points whatever referenced `old` (its parent's child slot, or the root) at `new`.
    ///
    /// `new`'s own parent link is left for the caller.
    pub(super) fn replace_child(&mut self, arena: &mut NodeArena<K>, parent: NodeId, old: NodeId, new: NodeId) {
        if parent.is_sentinel() {
            self.root = new;
        } else if arena.left(parent) == old {
            arena.node_mut(parent).left = new;
        } else {
            arena.node_mut(parent).right = new;
        }
    }

    //     x              y
    //    / \            / \
    //   a   y    =>    x   c
    //      / \        / \
    //     b   c      a   b
    pub(super) fn rotate_left(&mut self, arena: &mut NodeArena<K>, x: NodeId) {
        let y = arena.right(x);
        debug_assert!(!y.is_sentinel(), "left rotation needs a right child");
        trace!("rotate left at {x:?}");

        let b = arena.left(y);
        arena.node_mut(x).right = b;
        arena.set_parent(b, x);

        let parent = arena.parent(x);
        arena.node_mut(y).parent = parent;
        self.replace_child(arena, parent, x, y);

        arena.node_mut(y).left = x;
        arena.node_mut(x).parent = y;
    }

    //       x          y
    //      / \        / \
    //     y   c  =>  a   x
    //    / \            / \
    //   a   b          b   c
    pub(super) fn rotate_right(&mut self, arena: &mut NodeArena<K>, x: NodeId) {
        let y = arena.left(x);
        debug_assert!(!y.is_sentinel(), "right rotation needs a left child");
        trace!("rotate right at {x:?}");

        let b = arena.right(y);
        arena.node_mut(x).left = b;
        arena.set_parent(b, x);

        let parent = arena.parent(x);
        arena.node_mut(y).parent = parent;
        self.replace_child(arena, parent, x, y);

        arena.node_mut(y).right = x;
        arena.node_mut(x).parent = y;
    }

    /// `node` has just been linked in red below a real parent.
    pub(super) fn insert_fixup(&mut self, arena: &mut NodeArena<K>, mut node: NodeId) {
        while node != self.root && arena.is_red(arena.parent(node)) {
            let parent = arena.parent(node);
            // a red node is never the root, so the grandparent is real
            let grandparent = arena.parent(parent);

            if parent == arena.left(grandparent) {
                let uncle = arena.right(grandparent);

                if arena.is_red(uncle) {
                    arena.set_color(parent, Color::Black);
                    arena.set_color(uncle, Color::Black);
                    arena.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == arena.right(parent) {
                        node = parent;
                        self.rotate_left(arena, node);
                    }

                    let parent = arena.parent(node);
                    let grandparent = arena.parent(parent);
                    arena.set_color(parent, Color::Black);
                    arena.set_color(grandparent, Color::Red);
                    self.rotate_right(arena, grandparent);
                }
            } else {
                let uncle = arena.left(grandparent);

                if arena.is_red(uncle) {
                    arena.set_color(parent, Color::Black);
                    arena.set_color(uncle, Color::Black);
                    arena.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == arena.left(parent) {
                        node = parent;
                        self.rotate_right(arena, node);
                    }

                    let parent = arena.parent(node);
                    let grandparent = arena.parent(parent);
                    arena.set_color(parent, Color::Black);
                    arena.set_color(grandparent, Color::Red);
                    self.rotate_left(arena, grandparent);
                }
            }
        }

        let root = self.root;
        arena.set_color(root, Color::Black);
    }

    /// `node` took the place of a removed black node and is one black short.
    ///
    /// `node` may be the sentinel, which is why its parent is passed in rather than read from
    /// it: the sentinel's links are never written.
    pub(super) fn delete_fixup(&mut self, arena: &mut NodeArena<K>, mut node: NodeId, mut parent: NodeId) {
        while node != self.root && arena.is_black(node) {
            // `node` is short a black node, so its sibling subtree has a black height of at
            // least one and the sibling is always real
            if node == arena.left(parent) {
                let mut sibling = arena.right(parent);

                if arena.is_red(sibling) {
                    arena.set_color(sibling, Color::Black);
                    arena.set_color(parent, Color::Red);
                    self.rotate_left(arena, parent);
                    sibling = arena.right(parent);
                }

                if arena.is_black(arena.left(sibling)) && arena.is_black(arena.right(sibling)) {
                    arena.set_color(sibling, Color::Red);
                    node = parent;
                    parent = arena.parent(node);
                } else {
                    if arena.is_black(arena.right(sibling)) {
                        let near = arena.left(sibling);
                        arena.set_color(near, Color::Black);
                        arena.set_color(sibling, Color::Red);
                        self.rotate_right(arena, sibling);
                        sibling = arena.right(parent);
                    }

                    arena.set_color(sibling, arena.color(parent));
                    arena.set_color(parent, Color::Black);
                    let far = arena.right(sibling);
                    arena.set_color(far, Color::Black);
                    self.rotate_left(arena, parent);
                    node = self.root;
                    break
                }
            } else {
                let mut sibling = arena.left(parent);

                if arena.is_red(sibling) {
                    arena.set_color(sibling, Color::Black);
                    arena.set_color(parent, Color::Red);
                    self.rotate_right(arena, parent);
                    sibling = arena.left(parent);
                }

                if arena.is_black(arena.left(sibling)) && arena.is_black(arena.right(sibling)) {
                    arena.set_color(sibling, Color::Red);
                    node = parent;
                    parent = arena.parent(node);
                } else {
                    if arena.is_black(arena.left(sibling)) {
                        let near = arena.right(sibling);
                        arena.set_color(near, Color::Black);
                        arena.set_color(sibling, Color::Red);
                        self.rotate_left(arena, sibling);
                        sibling = arena.left(parent);
                    }

                    arena.set_color(sibling, arena.color(parent));
                    arena.set_color(parent, Color::Black);
                    let far = arena.left(sibling);
                    arena.set_color(far, Color::Black);
                    self.rotate_right(arena, parent);
                    node = self.root;
                    break
                }
            }
        }

        if !node.is_sentinel() {
            arena.set_color(node, Color::Black);
        }
    }
}
