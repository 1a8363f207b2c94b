use greds_core::config::ChunkingConfig;

/// One window of a work's text, before embedding and persistence.
#[derive(Debug, Clone)]
pub struct ChunkDraft {
    /// Zero-based position of this window within the work.
    pub ordinal: u32,
    /// The window's text, sliced straight out of the source.
    pub text: String,
    /// Whitespace-token count of `text`.
    pub token_count: u32,
}

/// Cuts work text into fixed-size token windows with fractional overlap.
///
/// Tokens are whitespace-delimited. A chunk's text is the span of the
/// original from its first token to its last, so interior whitespace and
/// line breaks survive intact. A final window that would add fewer than
/// an eighth of a step's worth of new tokens is folded into the window
/// before it instead of being emitted on its own.
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Tokens each window advances past the previous one.
    fn step(&self) -> usize {
        let size = self.config.chunk_size_tokens.max(1);
        let step = (size as f64 * (1.0 - self.config.overlap_fraction)) as usize;
        step.clamp(1, size)
    }

    /// Split `text` into overlapping windows. Blank text yields no drafts.
    pub fn chunk(&self, text: &str) -> Vec<ChunkDraft> {
        let spans = token_spans(text);
        if spans.is_empty() {
            return Vec::new();
        }

        let size = self.config.chunk_size_tokens.max(1);
        let step = self.step();

        // Token-index ranges, half-open.
        let mut windows: Vec<(usize, usize)> = Vec::new();
        let mut start = 0usize;
        loop {
            let end = (start + size).min(spans.len());
            windows.push((start, end));
            if end == spans.len() {
                break;
            }
            start += step;
        }

        // Fold a near-empty tail into the window before it.
        if windows.len() > 1 {
            let tail_new = windows[windows.len() - 1].1 - windows[windows.len() - 2].1;
            if tail_new < step / 8 {
                windows.pop();
                if let Some(last) = windows.last_mut() {
                    last.1 = spans.len();
                }
            }
        }

        windows
            .iter()
            .enumerate()
            .map(|(ordinal, &(from, to))| {
                let byte_start = spans[from].0;
                let byte_end = spans[to - 1].1;
                ChunkDraft {
                    ordinal: ordinal as u32,
                    text: text[byte_start..byte_end].to_string(),
                    token_count: (to - from) as u32,
                }
            })
            .collect()
    }
}

/// Byte ranges of the whitespace-delimited tokens in `text`.
///
/// `split_whitespace` yields subslices of `text`, so pointer arithmetic
/// recovers each token's offset without rescanning.
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    text.split_whitespace()
        .map(|token| {
            let start = token.as_ptr() as usize - text.as_ptr() as usize;
            (start, start + token.len())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: f64) -> TextChunker {
        TextChunker::new(ChunkingConfig {
            chunk_size_tokens: size,
            overlap_fraction: overlap,
        })
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn short_text_is_one_chunk() {
        let drafts = chunker(10, 0.2).chunk("just a few words here");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].ordinal, 0);
        assert_eq!(drafts[0].token_count, 5);
        assert_eq!(drafts[0].text, "just a few words here");
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(chunker(10, 0.2).chunk("").is_empty());
        assert!(chunker(10, 0.2).chunk("   \n\t  ").is_empty());
    }

    #[test]
    fn windows_overlap_by_the_configured_fraction() {
        // size 10, overlap 0.2 → step 8.
        let text = words(26);
        let drafts = chunker(10, 0.2).chunk(&text);
        assert_eq!(drafts.len(), 3, "windows at 0, 8, 16");
        assert_eq!(drafts[0].token_count, 10);
        assert_eq!(drafts[1].token_count, 10);
        assert_eq!(drafts[2].token_count, 10, "last window runs 16..26");
        assert!(drafts[0].text.starts_with("w0"));
        assert!(drafts[1].text.starts_with("w8"), "second window starts one step in");
        assert!(drafts[1].text.ends_with("w17"));
        assert!(drafts[2].text.ends_with("w25"));
    }

    #[test]
    fn ordinals_are_sequential() {
        let text = words(40);
        let drafts = chunker(10, 0.2).chunk(&text);
        let ordinals: Vec<u32> = drafts.iter().map(|d| d.ordinal).collect();
        assert_eq!(ordinals, (0..drafts.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn near_empty_tail_folds_into_previous_window() {
        // size 100, overlap 0.2 → step 80, fold when a tail adds < 10 tokens
        // past the previous window's end at 180.
        // 195 tokens: the tail at 160..195 adds 15 and stays.
        let kept = chunker(100, 0.2).chunk(&words(195));
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[2].token_count, 35);

        // 185 tokens: a tail at 160..185 would add only 5, so the second
        // window stretches to the end instead.
        let folded = chunker(100, 0.2).chunk(&words(185));
        assert_eq!(folded.len(), 2);
        assert_eq!(folded[1].token_count, 105);
        assert!(folded[1].text.ends_with("w184"));
    }

    #[test]
    fn interior_whitespace_survives() {
        let text = "alpha  beta\n\ngamma\tdelta";
        let drafts = chunker(10, 0.0).chunk(text);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].text, text);
        assert_eq!(drafts[0].token_count, 4);
    }

    #[test]
    fn zero_overlap_windows_do_not_share_tokens() {
        let text = words(20);
        let drafts = chunker(10, 0.0).chunk(&text);
        assert_eq!(drafts.len(), 2);
        assert!(drafts[0].text.ends_with("w9"));
        assert!(drafts[1].text.starts_with("w10"));
    }

    #[test]
    fn degenerate_overlap_still_advances() {
        // overlap 1.0 would stall; the step clamps to one token.
        let drafts = chunker(3, 1.0).chunk(&words(5));
        assert!(drafts.len() >= 2);
        let last = drafts.last().unwrap();
        assert!(last.text.ends_with("w4"), "every token is covered");
    }
}
