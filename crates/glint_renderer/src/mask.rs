//! Visibility masks for ray categories.

bitflags::bitflags! {
    /// Bitset tag carried by every intersectable and every query.
    ///
    /// An object takes part in a query only when its mask and the query's
    /// mask share at least one bit. Bits outside the named categories are
    /// free for callers (see [`VisibilityMask::custom`]).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VisibilityMask: u32 {
        /// Seen by camera and reflection rays.
        const VISIBLE = 0b01;
        /// Blocks shadow rays.
        const SHADOW = 0b10;
        const DEFAULT = Self::VISIBLE.bits() | Self::SHADOW.bits();
        const ALL = u32::MAX;
    }
}

impl VisibilityMask {
    /// Mask from raw bits, keeping bits that have no name.
    pub const fn custom(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// True if an object with this mask participates in `query`.
    #[inline]
    pub fn accepts(self, query: VisibilityMask) -> bool {
        self.intersects(query)
    }
}

impl Default for VisibilityMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}
