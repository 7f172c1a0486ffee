//! Visual aids layered over the fragment: grid, trail and hover highlight.

pub mod grid;
pub mod paint;
pub mod picker;
pub mod trail;

use crate::render::layout::LayoutBox;

/// Outline drawn around the hovered element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightBox {
    /// Box relative to the element's nearest positioned ancestor
    pub offset: LayoutBox,
    /// Same box placed in the container viewport
    pub viewport: LayoutBox,
}
