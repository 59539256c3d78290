//! Color normalization
//!
//! Fill colors arrive as whatever the block field holds: `#rgb`, `#rrggbb`,
//! upper- or lowercase, or a CSS basic color name. Everything the board
//! stores goes through [`normalize`] first so the overlay and the exporter
//! agree on a single spelling per color.

/// Default color of an uncolored cell
pub const WHITE: &str = "#ffffff";

/// Ink used when a two-color palette has no explicit non-white color
pub const BLACK: &str = "#000000";

/// Fill color used when a fill block's color field is empty
pub const DEFAULT_FILL: &str = "#ffd54f";

/// CSS basic color keywords
const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("silver", "#c0c0c0"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("white", "#ffffff"),
    ("maroon", "#800000"),
    ("red", "#ff0000"),
    ("purple", "#800080"),
    ("fuchsia", "#ff00ff"),
    ("magenta", "#ff00ff"),
    ("green", "#008000"),
    ("lime", "#00ff00"),
    ("olive", "#808000"),
    ("yellow", "#ffff00"),
    ("navy", "#000080"),
    ("blue", "#0000ff"),
    ("teal", "#008080"),
    ("aqua", "#00ffff"),
    ("cyan", "#00ffff"),
    ("orange", "#ffa500"),
];

/// Normalize a color to lowercase `#rrggbb`.
///
/// Empty input is white. Input that is neither hex nor a known name is only
/// trimmed and lowercased; [`to_rgb`] rejects it later.
pub fn normalize(color: &str) -> String {
    let color = color.trim().to_ascii_lowercase();
    if color.is_empty() {
        return WHITE.to_string();
    }

    if let Some(&(_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == color) {
        return hex.to_string();
    }

    let digits = color.strip_prefix('#').unwrap_or(&color);
    let is_hex = digits.chars().all(|c| c.is_ascii_hexdigit());
    match digits.len() {
        3 if is_hex => {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for c in digits.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            expanded
        }
        6 if is_hex => format!("#{}", digits),
        _ => color,
    }
}

/// Decode a color into its RGB components
pub fn to_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let normalized = normalize(color);
    let digits = normalized.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some((
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ))
}
