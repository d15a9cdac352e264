//! Tracks which card is "currently visible" as the cards column scrolls.
//!
//! Cards occupy line extents in one scrollable column. A card is visible when
//! its extent intersects the band from 10% to 30% of the viewport height,
//! measured from the top of the viewport.

use std::ops::Range;

/// The visible window of the cards column, in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(offset: usize, height: usize) -> Self {
        Self { offset, height }
    }

    /// Detection band, always at least one line tall.
    pub fn band(&self) -> Range<usize> {
        let start = self.offset + self.height / 10;
        let end = self.offset + (self.height * 3).div_ceil(10);
        start..end.max(start + 1)
    }
}

/// At most one active navigation entry, by card index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollSpy {
    active: Option<usize>,
}

impl ScrollSpy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate against the current layout. The first card in order that
    /// intersects the band wins; with no intersection the previous entry
    /// stays active.
    pub fn observe(&mut self, extents: &[Range<usize>], viewport: Viewport) -> Option<usize> {
        let band = viewport.band();
        if let Some(index) = extents
            .iter()
            .position(|extent| extent.start < band.end && band.start < extent.end)
        {
            self.active = Some(index);
        }
        if self.active.is_some_and(|i| i >= extents.len()) {
            self.active = None;
        }
        self.active
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    /// Mark a card active directly, as when jumping to it from navigation.
    pub fn activate(&mut self, index: usize) {
        self.active = Some(index);
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
