//! Paragraph-boundary text chunker.
//!
//! Splits document text into passages that respect a maximum character
//! count. Splitting happens on paragraph boundaries (`\n\n`) so each
//! passage stays coherent; a single oversized paragraph is hard-split at
//! the nearest space.

/// Split `text` into passages of at most `max_chars` characters.
///
/// Whitespace-only input produces no passages.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for para in text.split("\n\n") {
        let trimmed = para.trim();
        if trimmed.is_empty() {
            continue;
        }

        let would_be = if current.is_empty() {
            trimmed.len()
        } else {
            current.len() + 2 + trimmed.len()
        };

        if would_be > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if trimmed.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            hard_split(trimmed, max_chars, &mut chunks);
            continue;
        }

        if current.is_empty() {
            current.push_str(trimmed);
        } else {
            current.push_str("\n\n");
            current.push_str(trimmed);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split an oversized paragraph at space boundaries where possible.
fn hard_split(paragraph: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let mut remaining = paragraph;
    while !remaining.is_empty() {
        if remaining.len() <= max_chars {
            chunks.push(remaining.to_string());
            break;
        }
        let window = floor_char_boundary(remaining, max_chars);
        let split_at = remaining[..window]
            .rfind(' ')
            .map(|pos| pos + 1)
            .unwrap_or(window)
            .max(1);
        chunks.push(remaining[..split_at].trim_end().to_string());
        remaining = remaining[split_at..].trim_start();
    }
}

/// Largest byte index `<= at` that lies on a char boundary.
fn floor_char_boundary(s: &str, at: usize) -> usize {
    let mut idx = at.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
