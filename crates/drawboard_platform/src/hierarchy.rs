//! Native visual hierarchy
//!
//! Touch routing needs to know where a view sits on screen. Platforms expose
//! their view tree through [`VisualNode`]; [`ViewNode`] is an in-memory tree
//! used by hosts without a native one (and by tests).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use drawboard_graphics::{Point, Rect, Size};

/// Deepest parent chain walked before giving up
const MAX_DEPTH: usize = 256;

/// A node in the native view tree
pub trait VisualNode {
    /// Parent node, `None` when detached or at the top
    fn parent(&self) -> Option<Rc<dyn VisualNode>>;

    /// Offset of this node's origin inside its parent
    fn offset(&self) -> Point;

    fn size(&self) -> Size;

    /// Whether this node is the root page touch coordinates are reported in
    fn is_root(&self) -> bool;
}

/// Origin of `node` in root-page coordinates
///
/// Returns `None` when no root is reached.
pub fn page_origin(node: &dyn VisualNode) -> Option<Point> {
    if node.is_root() {
        return Some(Point::ZERO);
    }

    let mut origin = node.offset();
    let mut current = node.parent();
    for _ in 0..MAX_DEPTH {
        let parent = current?;
        if parent.is_root() {
            return Some(origin);
        }
        let offset = parent.offset();
        origin = origin.offset(offset.x, offset.y);
        current = parent.parent();
    }

    tracing::warn!("Visual tree deeper than {} levels, treating node as unrooted", MAX_DEPTH);
    None
}

/// On-page rectangle covered by `node`
pub fn page_rect(node: &dyn VisualNode) -> Option<Rect> {
    page_origin(node).map(|origin| Rect::from_origin_size(origin, node.size()))
}

/// In-memory visual node
pub struct ViewNode {
    offset: Cell<Point>,
    size: Cell<Size>,
    parent: RefCell<Option<Rc<dyn VisualNode>>>,
    root: bool,
}

impl ViewNode {
    /// A root page of the given size
    pub fn root(size: Size) -> Rc<Self> {
        Rc::new(Self {
            offset: Cell::new(Point::ZERO),
            size: Cell::new(size),
            parent: RefCell::new(None),
            root: true,
        })
    }

    /// A node placed at `frame` inside `parent`
    pub fn child(parent: Rc<dyn VisualNode>, frame: Rect) -> Rc<Self> {
        Rc::new(Self {
            offset: Cell::new(frame.origin()),
            size: Cell::new(frame.size()),
            parent: RefCell::new(Some(parent)),
            root: false,
        })
    }

    /// A node that has not been inserted into a tree yet
    pub fn detached(size: Size) -> Rc<Self> {
        Rc::new(Self {
            offset: Cell::new(Point::ZERO),
            size: Cell::new(size),
            parent: RefCell::new(None),
            root: false,
        })
    }

    pub fn set_offset(&self, offset: Point) {
        self.offset.set(offset);
    }

    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }

    pub fn set_parent(&self, parent: Option<Rc<dyn VisualNode>>) {
        *self.parent.borrow_mut() = parent;
    }
}

impl VisualNode for ViewNode {
    fn parent(&self) -> Option<Rc<dyn VisualNode>> {
        self.parent.borrow().clone()
    }

    fn offset(&self) -> Point {
        self.offset.get()
    }

    fn size(&self) -> Size {
        self.size.get()
    }

    fn is_root(&self) -> bool {
        self.root
    }
}

impl std::fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewNode")
            .field("offset", &self.offset.get())
            .field("size", &self.size.get())
            .field("has_parent", &self.parent.borrow().is_some())
            .field("root", &self.root)
            .finish()
    }
}
