//! Lightweight style extraction.
//!
//! Reads inline `style=""` attributes and a small set of utility classes
//! (spacing, sizing, positioning, palette colours) into the box properties the
//! block layout understands. Inline declarations override classes.

use crate::dom::DomNode;

/// CSS `position` values. Everything except `Static` establishes an offset
/// parent; out-of-flow positioning itself is not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

/// Per-side lengths in pixels. `None` means "not specified".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

impl Edges {
    pub fn all(v: f32) -> Self {
        Self {
            top: Some(v),
            right: Some(v),
            bottom: Some(v),
            left: Some(v),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    fn overlay(self, over: Edges) -> Edges {
        Edges {
            top: over.top.or(self.top),
            right: over.right.or(self.right),
            bottom: over.bottom.or(self.bottom),
            left: over.left.or(self.left),
        }
    }
}

/// Extracted visual and box properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleProps {
    pub color: Option<[f32; 4]>,
    pub background_color: Option<[f32; 4]>,
    pub background_opacity: Option<f32>,
    pub font_size: Option<f32>,
    pub border_radius: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub max_width: Option<f32>,
    pub padding: Edges,
    pub margin: Edges,
    /// `margin-left/right: auto`
    pub center_x: bool,
    pub position: Option<Position>,
}

impl StyleProps {
    /// Layer `over` on top of `self`; specified values in `over` win.
    pub fn merged(self, over: StyleProps) -> StyleProps {
        StyleProps {
            color: over.color.or(self.color),
            background_color: over.background_color.or(self.background_color),
            background_opacity: over.background_opacity.or(self.background_opacity),
            font_size: over.font_size.or(self.font_size),
            border_radius: over.border_radius.or(self.border_radius),
            width: over.width.or(self.width),
            height: over.height.or(self.height),
            max_width: over.max_width.or(self.max_width),
            padding: self.padding.overlay(over.padding),
            margin: self.margin.overlay(over.margin),
            center_x: over.center_x || self.center_x,
            position: over.position.or(self.position),
        }
    }

    pub fn is_positioned(&self) -> bool {
        !matches!(self.position, None | Some(Position::Static))
    }

    /// Background colour with any `bg-opacity-*` utility applied.
    pub fn effective_background(&self) -> Option<[f32; 4]> {
        self.background_color.map(|mut c| {
            if let Some(a) = self.background_opacity {
                c[3] *= a;
            }
            c
        })
    }
}

/// Resolve the style of an element: utility classes first, then inline style.
pub fn resolve_style(node: &DomNode) -> StyleProps {
    let from_classes = parse_utility_classes(node.classes());
    match node.attr("style") {
        Some(style) => from_classes.merged(parse_inline_style(style)),
        None => from_classes,
    }
}

/// Parse an inline `style="..."` attribute value.
pub fn parse_inline_style(style: &str) -> StyleProps {
    let mut props = StyleProps::default();
    for decl in style.split(';') {
        let parts: Vec<&str> = decl.splitn(2, ':').collect();
        if parts.len() != 2 {
            continue;
        }
        let prop = parts[0].trim().to_lowercase();
        let val = parts[1].trim();
        match prop.as_str() {
            "color" => props.color = parse_css_color(val),
            "background-color" | "background" => props.background_color = parse_css_color(val),
            "font-size" => props.font_size = parse_css_size(val),
            "border-radius" => props.border_radius = parse_css_size(val),
            "width" => props.width = parse_css_size(val),
            "height" => props.height = parse_css_size(val),
            "max-width" => props.max_width = parse_css_size(val),
            "padding" => {
                if let Some(edges) = parse_box_shorthand(val) {
                    props.padding = edges;
                }
            }
            "padding-top" => props.padding.top = parse_css_size(val),
            "padding-right" => props.padding.right = parse_css_size(val),
            "padding-bottom" => props.padding.bottom = parse_css_size(val),
            "padding-left" => props.padding.left = parse_css_size(val),
            "margin" => {
                let parts: Vec<&str> = val.split_whitespace().collect();
                // `margin: 0 auto` and friends centre horizontally
                if parts.len() >= 2 && parts[1] == "auto" {
                    props.center_x = true;
                }
                if let Some(edges) = parse_box_shorthand(val) {
                    props.margin = edges;
                }
            }
            "margin-top" => props.margin.top = parse_css_size(val),
            "margin-bottom" => props.margin.bottom = parse_css_size(val),
            "margin-left" => props.margin.left = parse_css_size(val),
            "margin-right" => props.margin.right = parse_css_size(val),
            "position" => {
                props.position = match val.to_lowercase().as_str() {
                    "relative" => Some(Position::Relative),
                    "absolute" => Some(Position::Absolute),
                    "fixed" => Some(Position::Fixed),
                    "static" => Some(Position::Static),
                    _ => None,
                }
            }
            _ => {}
        }
    }
    props
}

/// Parse a 1–4 value box shorthand (`padding: 4px 8px`). `auto` entries are
/// left unspecified.
fn parse_box_shorthand(val: &str) -> Option<Edges> {
    let values: Vec<Option<f32>> = val.split_whitespace().map(parse_css_size).collect();
    let (top, right, bottom, left) = match values.as_slice() {
        [a] => (*a, *a, *a, *a),
        [v, h] => (*v, *h, *v, *h),
        [t, h, b] => (*t, *h, *b, *h),
        [t, r, b, l] => (*t, *r, *b, *l),
        _ => return None,
    };
    Some(Edges {
        top,
        right,
        bottom,
        left,
    })
}

/// Spacing scale step of the utility classes, in pixels.
const SPACING_UNIT: f32 = 4.0;

/// Parse the utility classes of an element.
pub fn parse_utility_classes<'a>(classes: impl Iterator<Item = &'a str>) -> StyleProps {
    let mut props = StyleProps::default();
    for class in classes {
        match class {
            "relative" => props.position = Some(Position::Relative),
            "absolute" => props.position = Some(Position::Absolute),
            "fixed" => props.position = Some(Position::Fixed),
            "static" => props.position = Some(Position::Static),
            "mx-auto" => props.center_x = true,
            "rounded" => props.border_radius = Some(4.0),
            _ => apply_utility(&mut props, class),
        }
    }
    props
}

fn apply_utility(props: &mut StyleProps, class: &str) {
    let Some((prefix, value)) = class.split_once('-') else {
        return;
    };
    match prefix {
        "p" | "px" | "py" | "pt" | "pr" | "pb" | "pl" => {
            if let Some(v) = spacing_value(value) {
                apply_sides(&mut props.padding, prefix, v);
            }
        }
        "m" | "mx" | "my" | "mt" | "mr" | "mb" | "ml" => {
            if let Some(v) = spacing_value(value) {
                apply_sides(&mut props.margin, prefix, v);
            }
        }
        "h" => props.height = sizing_value(value).or(props.height),
        "w" => props.width = sizing_value(value).or(props.width),
        "max" => {
            if let Some(size) = value.strip_prefix("w-") {
                props.max_width = max_width_value(size).or(props.max_width);
            }
        }
        "bg" => {
            if let Some(opacity) = value.strip_prefix("opacity-") {
                if let Ok(pct) = opacity.parse::<f32>() {
                    props.background_opacity = Some((pct / 100.0).clamp(0.0, 1.0));
                }
            } else if let Some(c) = palette_color(value) {
                props.background_color = Some(c);
            }
        }
        "text" => {
            if let Some(size) = text_size_value(value) {
                props.font_size = Some(size);
            } else if let Some(c) = palette_color(value) {
                props.color = Some(c);
            }
        }
        "rounded" => props.border_radius = Some(rounded_value(value)),
        _ => {}
    }
}

fn apply_sides(edges: &mut Edges, prefix: &str, v: f32) {
    let side = &prefix[1..];
    match side {
        "" => *edges = Edges::all(v),
        "x" => {
            edges.left = Some(v);
            edges.right = Some(v);
        }
        "y" => {
            edges.top = Some(v);
            edges.bottom = Some(v);
        }
        "t" => edges.top = Some(v),
        "r" => edges.right = Some(v),
        "b" => edges.bottom = Some(v),
        "l" => edges.left = Some(v),
        _ => {}
    }
}

/// `8` → 32px, `[12px]` → 12px
fn spacing_value(value: &str) -> Option<f32> {
    if let Some(px) = arbitrary_px(value) {
        return Some(px);
    }
    value
        .parse::<f32>()
        .ok()
        .map(|n| n * SPACING_UNIT)
        .filter(|n| n.is_finite())
}

fn sizing_value(value: &str) -> Option<f32> {
    spacing_value(value)
}

fn arbitrary_px(value: &str) -> Option<f32> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    parse_css_size(inner)
}

fn max_width_value(size: &str) -> Option<f32> {
    match size {
        "xs" => Some(320.0),
        "sm" => Some(384.0),
        "md" => Some(448.0),
        "lg" => Some(512.0),
        "xl" => Some(576.0),
        "2xl" => Some(672.0),
        "3xl" => Some(768.0),
        "screen-sm" => Some(640.0),
        "screen-md" => Some(768.0),
        "screen-lg" => Some(1024.0),
        "screen-xl" => Some(1280.0),
        "screen-2xl" => Some(1536.0),
        other => arbitrary_px(other),
    }
}

fn text_size_value(size: &str) -> Option<f32> {
    match size {
        "xs" => Some(12.0),
        "sm" => Some(14.0),
        "base" => Some(16.0),
        "lg" => Some(18.0),
        "xl" => Some(20.0),
        "2xl" => Some(24.0),
        "3xl" => Some(30.0),
        "4xl" => Some(36.0),
        "5xl" => Some(48.0),
        _ => None,
    }
}

fn rounded_value(size: &str) -> f32 {
    match size {
        "sm" => 2.0,
        "md" => 6.0,
        "lg" => 8.0,
        "xl" => 12.0,
        "full" => 9999.0,
        _ => 4.0,
    }
}

/// `blue-900`, `white`, ... → RGBA
fn palette_color(name: &str) -> Option<[f32; 4]> {
    let rgb: [u8; 3] = match name {
        "white" => [255, 255, 255],
        "black" => [0, 0, 0],
        "blue-500" => [59, 130, 246],
        "blue-800" => [30, 64, 175],
        "blue-900" => [30, 58, 138],
        "red-500" => [239, 68, 68],
        "red-700" => [185, 28, 28],
        "purple-500" => [168, 85, 247],
        "purple-800" => [107, 33, 168],
        "purple-900" => [88, 28, 135],
        "green-500" => [34, 197, 94],
        "green-700" => [21, 128, 61],
        "gray-100" => [243, 244, 246],
        "gray-500" => [107, 114, 128],
        "gray-900" => [17, 24, 39],
        "transparent" => return Some([0.0, 0.0, 0.0, 0.0]),
        _ => return None,
    };
    Some([
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        1.0,
    ])
}

/// Parse a CSS color value into [r, g, b, a] (0.0–1.0).
pub fn parse_css_color(val: &str) -> Option<[f32; 4]> {
    let v = val.trim().to_lowercase();

    // Named colours (common subset)
    let named = match v.as_str() {
        "black" => Some([0.0, 0.0, 0.0, 1.0]),
        "white" => Some([1.0, 1.0, 1.0, 1.0]),
        "red" => Some([1.0, 0.0, 0.0, 1.0]),
        "green" => Some([0.0, 0.5, 0.0, 1.0]),
        "blue" => Some([0.0, 0.0, 1.0, 1.0]),
        "yellow" => Some([1.0, 1.0, 0.0, 1.0]),
        "orange" => Some([1.0, 0.647, 0.0, 1.0]),
        "purple" => Some([0.5, 0.0, 0.5, 1.0]),
        "gray" | "grey" => Some([0.5, 0.5, 0.5, 1.0]),
        "transparent" => Some([0.0, 0.0, 0.0, 0.0]),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    // Hex: #rgb, #rrggbb, #rrggbbaa
    if let Some(hex) = v.strip_prefix('#') {
        return match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0])
            }
            _ => None,
        };
    }

    // rgb(r, g, b) / rgba(r, g, b, a)
    if v.starts_with("rgb") {
        let inner = v
            .trim_start_matches("rgba(")
            .trim_start_matches("rgb(")
            .trim_end_matches(')');
        let nums: Vec<f32> = inner
            .split(',')
            .filter_map(|s| s.trim().parse::<f32>().ok())
            .collect();
        if nums.len() >= 3 {
            let r = nums[0] / 255.0;
            let g = nums[1] / 255.0;
            let b = nums[2] / 255.0;
            let a = if nums.len() >= 4 { nums[3] } else { 1.0 };
            return Some([r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0), a.clamp(0.0, 1.0)]);
        }
    }

    None
}

/// Parse a CSS size value (px or plain number).
fn parse_css_size(val: &str) -> Option<f32> {
    let v = val.trim().to_lowercase();
    let num_str = v.trim_end_matches("px");
    num_str.parse::<f32>().ok().filter(|n| n.is_finite())
}
