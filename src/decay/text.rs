//! Progressive text corruption
//!
//! Characters are replaced by block/glitch glyphs as progress passes each
//! character's deterministic threshold. Thresholds depend on the character
//! index, the text length, and the section's decay order, so two components
//! decaying the same text always agree.

use crate::seeded_unit;

/// Replacement glyphs that look intentional and artistic, not broken
pub const DECAY_CHARS: [char; 20] = [
    '░', '▒', '▓', '█', '╳', '╱', '╲', '◻', '◼', '▪', '▫', '◇', '◆', '●', '○', '◌', '▢', '⌧', '⍜',
    '⎔',
];

fn decay_char(seed: u64) -> char {
    let idx = (seeded_unit(seed) * DECAY_CHARS.len() as f32) as usize;
    DECAY_CHARS[idx.min(DECAY_CHARS.len() - 1)]
}

/// Progress at which a character at `char_index` starts corrupting.
///
/// decayOrder 1 decays first (threshold from ~0.10), 5 last (from ~0.70),
/// with a per-character spread of up to +0.30, capped at 0.95.
fn char_decay_threshold(char_index: usize, text_length: usize, decay_order: u8) -> f32 {
    let order = decay_order.clamp(1, 5);
    let order_offset = 0.10 + f32::from(order - 1) * 0.15;
    let spread = seeded_unit((char_index * 7 + text_length) as u64) * 0.30;
    (order_offset + spread).min(0.95)
}

/// Apply text decay. Returns a new string with characters progressively
/// replaced by glitch glyphs. Whitespace is always preserved.
///
/// Deterministic: identical (text, progress, decay_order) always yields
/// identical output.
pub fn decay_text(text: &str, progress: f32, decay_order: u8) -> String {
    if progress <= 0.05 {
        return text.to_string();
    }

    if progress >= 0.98 {
        // Nearly fully decayed - sparse fragments
        return text
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                if ch.is_whitespace() {
                    ch
                } else if seeded_unit((i * 13) as u64) > 0.9 {
                    decay_char((i * 31) as u64)
                } else {
                    ' '
                }
            })
            .collect();
    }

    let len = text.chars().count();
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            if ch.is_whitespace() {
                return ch;
            }

            let threshold = char_decay_threshold(i, len, decay_order);
            if progress < threshold {
                return ch;
            }

            // How far past the threshold determines glitch intensity
            let intensity = (progress - threshold) / (1.0 - threshold);

            if intensity < 0.3 {
                // Light corruption: only some characters swap out, and the
                // set changes as progress advances
                let flicker_seed = (i * 17) as u64 + (progress * 100.0) as u64;
                if seeded_unit(flicker_seed) > 0.5 {
                    ch
                } else {
                    decay_char((i * 23) as u64)
                }
            } else {
                // Heavy corruption: full glyph replacement
                decay_char((i * 31) as u64 + (progress * 10.0) as u64)
            }
        })
        .collect()
}
