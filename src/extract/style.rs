//! Font style flag decoding.

/// How one bit of the style mask contributes to the tag.
enum StyleBit {
    /// Label emitted only when the bit is set.
    Flag(&'static str),
    /// Exactly one of (set, clear) is emitted.
    Choice(&'static str, &'static str),
}

/// Style bits in the order their labels appear in the tag.
const STYLE_BITS: [(u32, StyleBit); 5] = [
    (1 << 0, StyleBit::Flag("superscript")),
    (1 << 1, StyleBit::Flag("italic")),
    (1 << 2, StyleBit::Choice("serifed", "sans")),
    (1 << 3, StyleBit::Choice("monospaced", "proportional")),
    (1 << 4, StyleBit::Flag("bold")),
];

/// Turn a span's style bitmask into a readable tag such as
/// `italic_serifed_proportional_bold`.
///
/// The serif and spacing labels are always present; bits above the known
/// ones are ignored.
pub fn style_tag(flags: u32) -> String {
    STYLE_BITS
        .iter()
        .filter_map(|(bit, style)| {
            let set = flags & bit != 0;
            match style {
                StyleBit::Flag(label) => set.then_some(*label),
                StyleBit::Choice(on, off) => Some(if set { *on } else { *off }),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Compose the span font descriptor from the base font name and style bits.
pub fn font_descriptor(font: &str, flags: u32) -> String {
    format!("{}_{}", font, style_tag(flags))
}
