// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paragraph- and sentence-aware content chunking.
//!
//! Splits learned content into chunks of at most `max_size` characters,
//! preferring paragraph boundaries, then sentence boundaries. A single
//! sentence longer than `max_size` is emitted whole rather than cut
//! mid-word, so the size bound is best-effort for that one case.

/// Split `content` into chunks of at most `max_size` characters.
///
/// Whole paragraphs are packed greedily, joined by blank lines. A
/// paragraph that alone exceeds `max_size` is broken at sentence
/// boundaries instead. Empty paragraphs are dropped; no chunk is empty
/// or loses non-whitespace content.
pub fn chunk_content(content: &str, max_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in content.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if paragraph.len() > max_size {
            // Oversized paragraph: flush the buffer and fall back to
            // sentence packing.
            flush(&mut chunks, &mut current);
            chunk_sentences(paragraph, max_size, &mut chunks);
            continue;
        }

        // +2 for the "\n\n" joiner.
        if current.is_empty() {
            current.push_str(paragraph);
        } else if current.len() + 2 + paragraph.len() <= max_size {
            current.push_str("\n\n");
            current.push_str(paragraph);
        } else {
            flush(&mut chunks, &mut current);
            current.push_str(paragraph);
        }
    }

    flush(&mut chunks, &mut current);
    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
}

/// Pack the sentences of one oversized paragraph into chunks.
fn chunk_sentences(paragraph: &str, max_size: usize, chunks: &mut Vec<String>) {
    let sentences = split_sentences(paragraph);
    let mut current = String::new();

    for sentence in sentences {
        if sentence.len() > max_size {
            // A sentence we cannot split further; emit it whole.
            flush(chunks, &mut current);
            chunks.push(sentence);
            continue;
        }

        if current.is_empty() {
            current = sentence;
        } else if current.len() + 1 + sentence.len() <= max_size {
            current.push(' ');
            current.push_str(&sentence);
        } else {
            flush(chunks, &mut current);
            current = sentence;
        }
    }

    flush(chunks, &mut current);
}

/// Split a paragraph on ". " boundaries, restoring the period removed
/// from every sentence except the last.
fn split_sentences(paragraph: &str) -> Vec<String> {
    let parts: Vec<&str> = paragraph.split(". ").collect();
    let last = parts.len() - 1;
    parts
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let part = part.trim();
            if i < last {
                format!("{part}.")
            } else {
                part.to_string()
            }
        })
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_content_is_one_chunk() {
        let chunks = chunk_content("hello world", 100);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn empty_content_yields_no_chunks() {
        assert!(chunk_content("", 100).is_empty());
        assert!(chunk_content("\n\n\n\n  \n\n", 100).is_empty());
    }

    #[test]
    fn paragraphs_pack_greedily() {
        let content = "aaaa\n\nbbbb\n\ncccc";
        // "aaaa\n\nbbbb" is 10 chars, adding "\n\ncccc" would be 16 > 12.
        let chunks = chunk_content(content, 12);
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "cccc"]);
    }

    #[test]
    fn oversized_paragraph_splits_at_sentences() {
        let content = "First sentence here. Second sentence here. Third one";
        let chunks = chunk_content(content, 25);
        assert_eq!(
            chunks,
            vec!["First sentence here.", "Second sentence here.", "Third one"]
        );
    }

    #[test]
    fn sentences_pack_greedily_within_limit() {
        let content = "One two. Three four. Five six seven eight nine ten eleven twelve";
        let chunks = chunk_content(content, 20);
        assert_eq!(chunks[0], "One two. Three four.");
        // Final sentence exceeds 20 chars and is emitted whole.
        assert_eq!(chunks[1], "Five six seven eight nine ten eleven twelve");
    }

    #[test]
    fn oversized_sentence_emitted_whole() {
        let long = "a".repeat(50);
        let chunks = chunk_content(&long, 20);
        assert_eq!(chunks, vec![long]);
    }

    #[test]
    fn buffer_flushes_before_oversized_paragraph() {
        let content = format!("short one\n\n{}", "x".repeat(40));
        let chunks = chunk_content(&content, 20);
        assert_eq!(chunks[0], "short one");
        assert_eq!(chunks[1], "x".repeat(40));
    }

    #[test]
    fn mixed_document_respects_bound() {
        let content = "Variables are declared with let. \
                       They are immutable by default.\n\n\
                       Functions use the fn keyword. \
                       The main function is the entry point.\n\n\
                       Tiny para";
        let chunks = chunk_content(content, 80);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 80, "chunk too long: {chunk:?}");
            assert!(!chunk.trim().is_empty());
        }
    }

    // Chunking may drop or move whitespace around sentence boundaries,
    // never visible characters.
    fn normalize(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    proptest! {
        #[test]
        fn no_content_is_lost(
            content in "[a-z ]{0,40}(\\. [a-z ]{1,40}){0,5}(\n\n[a-z .]{0,60}){0,4}",
            max_size in 10usize..200,
        ) {
            let chunks = chunk_content(&content, max_size);
            let rejoined = normalize(&chunks.join(" "));
            prop_assert_eq!(rejoined, normalize(&content));
        }

        #[test]
        fn chunks_are_nonempty_and_trimmed(
            content in "[a-z .\n]{0,300}",
            max_size in 5usize..100,
        ) {
            for chunk in chunk_content(&content, max_size) {
                prop_assert!(!chunk.trim().is_empty());
                prop_assert_eq!(chunk.trim().len(), chunk.len());
            }
        }

        #[test]
        fn bound_holds_unless_single_long_sentence(
            content in "[a-z ]{0,200}",
            max_size in 20usize..100,
        ) {
            // Content with no sentence or paragraph breaks either fits
            // in one chunk or is emitted whole as one oversized chunk.
            let chunks = chunk_content(&content, max_size);
            prop_assert!(chunks.len() <= 1);
        }
    }
}
