use std::collections::VecDeque;

use crate::application::ports::RecursiveTextSplitter;

/// Recursive character splitter. Tries coarse separators first, falls back to
/// finer ones for oversized pieces, then merges pieces into windows of at most
/// `chunk_size` characters that repeat up to `chunk_overlap` characters of the
/// previous window.
#[derive(Debug, Clone)]
pub struct RTSplitter {
    separators: Vec<&'static str>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RTSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl RTSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            separators: vec![
                "\n\n", // Double newline (paragraphs)
                "\n",   // Single newline
                " ",    // Space
                "",     // Character level
            ],
            chunk_size,
            chunk_overlap,
        }
    }

    fn recursive_split(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        let mut separator = separators.last().copied().unwrap_or("");
        let mut finer: &[&'static str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut good_splits = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if finer.is_empty() {
                final_chunks.push(piece);
            } else {
                final_chunks.extend(self.recursive_split(&piece, finer));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    fn merge_splits(&self, splits: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for split in splits {
            let len = char_len(split);

            if total + len > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_window(&window) {
                    chunks.push(chunk);
                }

                // Drop from the front until only the overlap remains and the
                // next piece fits.
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }

            window.push_back(split);
            total += len;
        }

        if let Some(chunk) = join_window(&window) {
            chunks.push(chunk);
        }

        chunks
    }
}

impl RecursiveTextSplitter for RTSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.recursive_split(text, &self.separators)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits on `separator`, keeping it at the start of every piece but the first.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces = Vec::new();
    if let Some(first) = parts.next() {
        pieces.push(first.to_string());
    }
    pieces.extend(parts.map(|part| format!("{}{}", separator, part)));

    pieces.into_iter().filter(|p| !p.is_empty()).collect()
}

fn join_window(window: &VecDeque<&str>) -> Option<String> {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
