//! Primitive-type and edge-provenance tags.

/// Primitive type of a feature: point/line/polygon, by dimensionality, by
/// single/multi part structure.
///
/// 2.5D variants carry one altitude for the whole feature; 3D polygons have
/// per-vertex altitudes on a common plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimType {
    Point,
    Point25D,
    PolyLine,
    PolyLine25D,
    Polygon,
    Polygon25D,
    Polygon3D,
    MultiPolygon,
    MultiPolygon25D,
    MultiPolygon3D,
}

impl PrimType {
    /// True for single-part polygon types.
    #[inline]
    pub fn is_polygon(self) -> bool {
        matches!(self, Self::Polygon | Self::Polygon25D | Self::Polygon3D)
    }

    /// True for multi-part polygon types.
    #[inline]
    pub fn is_multi_polygon(self) -> bool {
        matches!(
            self,
            Self::MultiPolygon | Self::MultiPolygon25D | Self::MultiPolygon3D
        )
    }

    /// The multi-part variant of a single-part polygon type (identity for
    /// multi types).
    pub fn multi_variant(self) -> Self {
        match self {
            Self::Polygon => Self::MultiPolygon,
            Self::Polygon25D => Self::MultiPolygon25D,
            Self::Polygon3D => Self::MultiPolygon3D,
            other => other,
        }
    }

    /// The single-part variant of a multi-part polygon type (identity for
    /// single types).
    pub fn single_variant(self) -> Self {
        match self {
            Self::MultiPolygon => Self::Polygon,
            Self::MultiPolygon25D => Self::Polygon25D,
            Self::MultiPolygon3D => Self::Polygon3D,
            other => other,
        }
    }
}

/// Provenance tag of one polygon edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeFlag {
    /// Edge present in the source polygon.
    #[default]
    Normal,
    /// Edge introduced by intersecting with a clip rectangle boundary.
    Clip,
    /// Edge introduced to stitch a hole into the outer boundary.
    Cut,
}
