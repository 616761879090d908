//! Multi-part features and the single/multi sum type.

use num_traits::Float;

use crate::geode::{Geode, PrimType};
use crate::primitives::BoundingBox;

/// An ordered set of independent geodes forming one multi-part feature.
///
/// Members share the collection's multi-part primitive type and carry no
/// topology between each other: each is independently simple.
#[derive(Debug, Clone)]
pub struct GeodeCollection<F: Float> {
    prim_type: PrimType,
    geodes: Vec<Geode<F>>,
}

impl<F: Float> GeodeCollection<F> {
    /// Creates an empty collection of the given multi-part type.
    pub fn new(prim_type: PrimType) -> Self {
        debug_assert!(prim_type.is_multi_polygon());
        Self {
            prim_type,
            geodes: Vec::new(),
        }
    }

    #[inline]
    pub fn prim_type(&self) -> PrimType {
        self.prim_type
    }

    #[inline]
    pub fn num_parts(&self) -> usize {
        self.geodes.len()
    }

    #[inline]
    pub fn geode(&self, part: usize) -> &Geode<F> {
        &self.geodes[part]
    }

    #[inline]
    pub fn geode_mut(&mut self, part: usize) -> &mut Geode<F> {
        &mut self.geodes[part]
    }

    #[inline]
    pub fn geodes(&self) -> &[Geode<F>] {
        &self.geodes
    }

    pub fn add_geode(&mut self, geode: Geode<F>) {
        self.geodes.push(geode);
    }

    pub fn erase_part(&mut self, part: usize) {
        self.geodes.remove(part);
    }

    pub fn is_empty(&self) -> bool {
        self.geodes.iter().all(Geode::is_empty)
    }

    pub fn is_degenerate(&self) -> bool {
        self.geodes.iter().all(Geode::is_degenerate)
    }

    pub fn clear(&mut self) {
        self.geodes.clear();
    }

    pub fn total_vertex_count(&self) -> usize {
        self.geodes.iter().map(Geode::total_vertex_count).sum()
    }

    /// Union of the members' bounding boxes.
    pub fn bounding_box(&self) -> BoundingBox<F> {
        let mut bounds = BoundingBox::empty();
        for geode in &self.geodes {
            bounds.grow_box(&geode.bounding_box());
        }
        bounds
    }
}

/// One feature's geometry: a single geode or a multi-part collection.
///
/// The closed sum the processing stages dispatch on; primitive-type driven
/// behavior is an exhaustive `match`, never downcasting.
#[derive(Debug, Clone)]
pub enum GeodeHandle<F: Float> {
    Single(Geode<F>),
    Multi(GeodeCollection<F>),
}

impl<F: Float> GeodeHandle<F> {
    pub fn prim_type(&self) -> PrimType {
        match self {
            Self::Single(geode) => geode.prim_type(),
            Self::Multi(collection) => collection.prim_type(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(geode) => geode.is_empty(),
            Self::Multi(collection) => collection.is_empty(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Single(geode) => geode.is_degenerate(),
            Self::Multi(collection) => collection.is_degenerate(),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::Single(geode) => geode.clear(),
            Self::Multi(collection) => collection.clear(),
        }
    }

    pub fn total_vertex_count(&self) -> usize {
        match self {
            Self::Single(geode) => geode.total_vertex_count(),
            Self::Multi(collection) => collection.total_vertex_count(),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox<F> {
        match self {
            Self::Single(geode) => geode.bounding_box(),
            Self::Multi(collection) => collection.bounding_box(),
        }
    }

    /// The single geode, if this is one.
    pub fn as_single(&self) -> Option<&Geode<F>> {
        match self {
            Self::Single(geode) => Some(geode),
            Self::Multi(_) => None,
        }
    }

    /// The collection, if this is one.
    pub fn as_multi(&self) -> Option<&GeodeCollection<F>> {
        match self {
            Self::Multi(collection) => Some(collection),
            Self::Single(_) => None,
        }
    }
}

impl<F: Float> From<Geode<F>> for GeodeHandle<F> {
    fn from(geode: Geode<F>) -> Self {
        Self::Single(geode)
    }
}

impl<F: Float> From<GeodeCollection<F>> for GeodeHandle<F> {
    fn from(collection: GeodeCollection<F>) -> Self {
        Self::Multi(collection)
    }
}
