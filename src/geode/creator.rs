//! Packaging of accepted rings into single or multi-part features.

use num_traits::Float;

use crate::geode::{Geode, GeodeCollection, GeodeHandle, PrimType};

/// Accumulates geodes accepted from the cleaner or clipper and packages
/// them into exactly one [`GeodeHandle`], hiding the one-vs-many
/// distinction from callers.
#[derive(Debug)]
pub struct GeodeCreator<F: Float> {
    prim_type: PrimType,
    geodes: Vec<Geode<F>>,
}

impl<F: Float> GeodeCreator<F> {
    pub fn new(prim_type: PrimType) -> Self {
        Self {
            prim_type,
            geodes: Vec::new(),
        }
    }

    #[inline]
    pub fn prim_type(&self) -> PrimType {
        self.prim_type
    }

    pub fn set_prim_type(&mut self, prim_type: PrimType) {
        self.prim_type = prim_type;
    }

    /// Accepts one geode.
    pub fn accept(&mut self, geode: Geode<F>) {
        self.geodes.push(geode);
    }

    /// Packages the accepted geodes and drains the internal list.
    ///
    /// Zero accepted geodes yield `None`. For single-part polygon types one
    /// geode is returned as-is and several become a collection of the
    /// matching multi-part type; a multi-part type always packages as a
    /// collection.
    pub fn report(&mut self) -> Option<GeodeHandle<F>> {
        let prim_type = self.prim_type;
        let geodes = std::mem::take(&mut self.geodes);

        if prim_type.is_multi_polygon() {
            let mut collection = GeodeCollection::new(prim_type);
            for geode in geodes {
                collection.add_geode(geode);
            }
            return Some(collection.into());
        }

        match geodes.len() {
            0 => None,
            1 => Some(geodes.into_iter().next().unwrap().into()),
            _ => {
                let mut collection = GeodeCollection::new(prim_type.multi_variant());
                for geode in geodes {
                    collection.add_geode(geode);
                }
                Some(collection.into())
            }
        }
    }

    /// Discards everything accepted so far.
    pub fn clean(&mut self) {
        self.geodes.clear();
    }
}
