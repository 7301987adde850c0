//! Text measurement and WinAnsi encoding for the standard Helvetica faces.

use unicode_normalization::UnicodeNormalization;

use crate::layout::page::FontWeight;

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, //
    333, 333, 584, 584, 584, 611, 975, //
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, //
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, //
    333, 278, 333, 584, 556, 333, //
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, //
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, //
    389, 280, 389, 584,
];

/// Width used for Latin-1 bytes above ASCII.
const FALLBACK_WIDTH: u16 = 556;

/// Maps text onto WinAnsiEncoding bytes. Characters outside the encoding are
/// decomposed and reduced to their base letter when possible, else `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(byte) = win_ansi_byte(ch) {
            out.push(byte);
            continue;
        }
        let base = ch.to_string().nfkd().find_map(win_ansi_byte);
        out.push(base.unwrap_or(b'?'));
    }
    out
}

fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch {
        ' '..='~' => Some(ch as u8),
        '\u{a0}'..='\u{ff}' => Some(ch as u32 as u8),
        '\t' | '\n' | '\r' => Some(b' '),
        '\u{20ac}' => Some(0x80),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        _ => None,
    }
}

fn byte_width(byte: u8, weight: FontWeight) -> u16 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA_WIDTHS,
        FontWeight::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    match byte {
        32..=126 => table[(byte - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

pub fn text_width(text: &str, size: f32, weight: FontWeight) -> f32 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|byte| byte_width(byte, weight) as u32)
        .sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap. Words longer than a line are hard-broken. Blank lines
/// between paragraphs are kept as one empty line.
pub fn wrap_text(text: &str, size: f32, weight: FontWeight, max_width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            if lines.last().is_some_and(|last| !last.is_empty()) {
                lines.push(String::new());
            }
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, size, weight) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut rest = word.to_string();
            while text_width(&rest, size, weight) > max_width {
                let split = fitting_prefix(&rest, size, weight, max_width).max(1);
                let tail = rest.split_off(char_boundary(&rest, split));
                lines.push(rest);
                rest = tail;
            }
            current = rest;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines
}

/// Cuts `text` to `max_width`, ending with "..." when anything was dropped.
pub fn truncate_to_width(text: &str, size: f32, weight: FontWeight, max_width: f32) -> String {
    if text_width(text, size, weight) <= max_width {
        return text.to_string();
    }
    let ellipsis = "...";
    let budget = (max_width - text_width(ellipsis, size, weight)).max(0.0);
    let keep = fitting_prefix(text, size, weight, budget);
    let mut cut: String = text.chars().take(keep).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str(ellipsis);
    cut
}

/// Number of leading chars that fit into `max_width`.
fn fitting_prefix(text: &str, size: f32, weight: FontWeight, max_width: f32) -> usize {
    let mut width = 0.0;
    let mut count = 0;
    for ch in text.chars() {
        let mut buf = [0u8; 4];
        width += text_width(ch.encode_utf8(&mut buf), size, weight);
        if width > max_width {
            break;
        }
        count += 1;
    }
    count
}

fn char_boundary(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
