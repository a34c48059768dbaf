//! Approximate Helvetica glyph metrics for alignment and wrapping.
//!
//! Widths are the standard Adobe font metrics for printable ASCII, in units of
//! 1/1000 em. Anything outside that range is measured as a digit.

/// Points to millimeters.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Width used for characters without a table entry.
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn glyph_width(ch: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match ch {
        ' '..='~' => table[ch as usize - ' ' as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of a string in millimeters at the given point size.
pub fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|ch| glyph_width(ch, bold) as u32).sum();
    units as f32 / 1000.0 * size_pt * PT_TO_MM
}

/// Break text into lines no wider than `max_width_mm`.
///
/// Explicit newlines always break. Words wider than a whole line are split
/// at character boundaries.
pub fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32, bold: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width_mm(&candidate, size_pt, bold) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            // Hard-split words that cannot fit on their own.
            for ch in word.chars() {
                current.push(ch);
                if text_width_mm(&current, size_pt, bold) > max_width_mm && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        // Ten digits at 10pt: 5.56 em = 55.6pt
        let width = text_width_mm("0123456789", 10.0, false);
        assert!((width - 55.6 * PT_TO_MM).abs() < 0.001);

        assert!(text_width_mm("Total", 10.0, true) > text_width_mm("Total", 10.0, false));
        assert_eq!(text_width_mm("", 12.0, false), 0.0);
    }

    #[test]
    fn test_non_ascii_fallback() {
        let plain = text_width_mm("a", 10.0, false);
        let accented = text_width_mm("ã", 10.0, false);
        assert!((plain - accented).abs() < 0.001);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four", 12.0, 10.0, false);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), "one two three four");
        for line in &lines {
            assert!(text_width_mm(line, 10.0, false) <= 12.0);
        }
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        let lines = wrap_text("first line\nsecond line", 190.0, 9.0, false);
        assert_eq!(lines, vec!["first line".to_string(), "second line".to_string()]);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let word = "x".repeat(200);
        let lines = wrap_text(&word, 50.0, 9.0, false);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }
}
