//! Named-color table and the auto-assignment palette.
//!
//! Both tables are static data. The name lookup map is built once
//! (see [`preload`]) and only read afterwards.

use std::{collections::HashMap, sync::LazyLock};

use rand::seq::IndexedRandom;

use super::value_object::Color;

/// Colors handed out automatically when a session picks its first nickname.
pub const AUTO_ASSIGN_COLORS: &[&str] = &[
    "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff", "#00ffff", "#ff8000", "#ff0080",
    "#80ff00", "#00ff80", "#8000ff", "#0080ff",
];

/// Names accepted by `;color <name>`.
pub const NAMED_COLORS: &[(&str, &str)] = &[
    ("red", "#ff0000"),
    ("lightred", "#ff6666"),
    ("darkred", "#8b0000"),
    ("blue", "#0000ff"),
    ("lightblue", "#add8e6"),
    ("darkblue", "#00008b"),
    ("green", "#008000"),
    ("lightgreen", "#90ee90"),
    ("darkgreen", "#006400"),
    ("yellow", "#ffff00"),
    ("lightyellow", "#ffffe0"),
    ("darkyellow", "#9b870c"),
    ("purple", "#800080"),
    ("lightpurple", "#dda0dd"),
    ("darkpurple", "#4b0082"),
    ("orange", "#ffa500"),
    ("lightorange", "#ffcc99"),
    ("darkorange", "#ff8c00"),
    ("pink", "#ffc0cb"),
    ("lightpink", "#ffb6c1"),
    ("darkpink", "#c71585"),
    ("cyan", "#00ffff"),
    ("lightcyan", "#e0ffff"),
    ("darkcyan", "#008b8b"),
    ("brown", "#a52a2a"),
    ("lightbrown", "#deb887"),
    ("darkbrown", "#654321"),
    ("black", "#000000"),
    ("lightblack", "#696969"),
    ("darkblack", "#0a0a0a"),
    ("white", "#ffffff"),
    ("lightwhite", "#f5f5f5"),
    ("darkwhite", "#dcdcdc"),
    ("gray", "#808080"),
    ("lightgray", "#d3d3d3"),
    ("darkgray", "#505050"),
    ("gold", "#ffd700"),
    ("lightgold", "#ffec8b"),
    ("darkgold", "#b8860b"),
    ("silver", "#c0c0c0"),
    ("lightsilver", "#e6e6e6"),
    ("darksilver", "#a9a9a9"),
    ("navy", "#000080"),
    ("lightnavy", "#4682b4"),
    ("darknavy", "#00004d"),
    ("lime", "#00ff00"),
    ("lightlime", "#bfff00"),
    ("darklime", "#32cd32"),
    ("magenta", "#ff00ff"),
    ("lightmagenta", "#ff77ff"),
    ("darkmagenta", "#8b008b"),
    ("beige", "#f5f5dc"),
    ("lightbeige", "#faf0e6"),
    ("darkbeige", "#d2b48c"),
    ("olive", "#808000"),
    ("lightolive", "#b5b35c"),
    ("darkolive", "#556b2f"),
    ("maroon", "#800000"),
    ("lightmaroon", "#b03060"),
    ("darkmaroon", "#5c0000"),
    ("violet", "#ee82ee"),
    ("lightviolet", "#f3e5ab"),
    ("darkviolet", "#9400d3"),
    ("indigo", "#4b0082"),
    ("lightindigo", "#7a5c99"),
    ("darkindigo", "#310062"),
    ("turquoise", "#40e0d0"),
    ("lightturquoise", "#afeeee"),
    ("darkturquoise", "#00ced1"),
    ("chocolate", "#d2691e"),
    ("lightchocolate", "#e6b8a2"),
    ("darkchocolate", "#8b4513"),
    ("coral", "#ff7f50"),
    ("lightcoral", "#f08080"),
    ("darkcoral", "#cd5b45"),
    ("salmon", "#fa8072"),
    ("lightsalmon", "#ffa07a"),
    ("darksalmon", "#e9967a"),
    ("khaki", "#f0e68c"),
    ("lightkhaki", "#fffacd"),
    ("darkkhaki", "#bdb76b"),
    ("orchid", "#da70d6"),
    ("lightorchid", "#e6a8d7"),
    ("darkorchid", "#9932cc"),
    ("plum", "#dda0dd"),
    ("lightplum", "#e6b8e6"),
    ("darkplum", "#8e4585"),
    ("tan", "#d2b48c"),
    ("lighttan", "#f5deb3"),
    ("darktan", "#a0522d"),
    ("lavender", "#e6e6fa"),
    ("lightlavender", "#f3e5f5"),
    ("darklavender", "#7c7c99"),
    ("peach", "#ffdab9"),
    ("lightpeach", "#ffefd5"),
    ("darkpeach", "#cd853f"),
    ("mint", "#98ff98"),
    ("lightmint", "#bdfcc9"),
    ("darkmint", "#3cb371"),
    ("aqua", "#00ffff"),
    ("lightaqua", "#e0ffff"),
    ("darkaqua", "#008b8b"),
    ("skyblue", "#87ceeb"),
    ("lightskyblue", "#b0e2ff"),
    ("darkskyblue", "#4682b4"),
    ("crimson", "#dc143c"),
    ("lightcrimson", "#ff6f61"),
    ("darkcrimson", "#8b0000"),
    ("goldenrod", "#daa520"),
    ("lightgoldenrod", "#ffec8b"),
    ("darkgoldenrod", "#b8860b"),
    ("seagreen", "#2e8b57"),
    ("lightseagreen", "#54ff9f"),
    ("darkseagreen", "#8fbc8f"),
    ("slateblue", "#6a5acd"),
    ("lightslateblue", "#8470ff"),
    ("darkslateblue", "#483d8b"),
    ("steelblue", "#4682b4"),
    ("lightsteelblue", "#b0c4de"),
    ("darksteelblue", "#2a4f7c"),
    ("tomato", "#ff6347"),
    ("lighttomato", "#ff7f50"),
    ("darktomato", "#cd5b45"),
    ("wheat", "#f5deb3"),
    ("lightwheat", "#ffe4b5"),
    ("darkwheat", "#d2b48c"),
    ("azure", "#f0ffff"),
    ("lightazure", "#e0ffff"),
    ("darkazure", "#b0e0e6"),
    ("ivory", "#fffff0"),
    ("lightivory", "#f5f5dc"),
    ("darkivory", "#dcdcdc"),
    ("lavenderblush", "#fff0f5"),
    ("lightlavenderblush", "#ffe4e1"),
    ("darklavenderblush", "#d8bfd8"),
    ("mistyrose", "#ffe4e1"),
    ("lightmistyrose", "#ffebcd"),
    ("darkmistyrose", "#cd5b45"),
    ("powderblue", "#b0e0e6"),
    ("lightpowderblue", "#add8e6"),
    ("darkpowderblue", "#4682b4"),
    ("rosybrown", "#bc8f8f"),
    ("lightrosybrown", "#deb887"),
    ("darkrosybrown", "#8b4513"),
    ("sandybrown", "#f4a460"),
    ("lightsandybrown", "#ffcc99"),
    ("darksandybrown", "#cd853f"),
    ("snow", "#fffafa"),
    ("lightsnow", "#f5f5f5"),
    ("darksnow", "#dcdcdc"),
    ("thistle", "#d8bfd8"),
    ("lightthistle", "#e6e6fa"),
    ("darkthistle", "#7c7c99"),
    ("yellowgreen", "#9acd32"),
    ("lightyellowgreen", "#adff2f"),
    ("darkyellowgreen", "#556b2f"),
];

static NAMED_COLOR_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| NAMED_COLORS.iter().copied().collect());

/// Build the lookup table eagerly.
pub fn preload() -> usize {
    NAMED_COLOR_TABLE.len()
}

/// Resolve a color name, ignoring ASCII case.
pub fn lookup_named_color(name: &str) -> Option<&'static str> {
    NAMED_COLOR_TABLE
        .get(name.to_ascii_lowercase().as_str())
        .copied()
}

/// Pick a color for a session that has none yet.
pub fn random_auto_color() -> Color {
    let hex = AUTO_ASSIGN_COLORS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(AUTO_ASSIGN_COLORS[0]);
    Color::new_unchecked(hex)
}
