//! Greedy word-to-cue segmentation.
//!
//! The segmenter packs consecutive words into subtitle cues no wider than a
//! configured character budget, without ever splitting a word. Cue timing
//! comes straight from the first/last word in the cue, so gaps (silence)
//! between cues are preserved exactly as recognized — DaVinci Resolve's
//! silence-removal workflow relies on that.

use crate::words::Word;

/// A single timed subtitle entry.
///
/// `text` holds the joined word text without the leading space the SRT
/// encoder adds at render time; the character budget applies to this
/// unprefixed text, counted in Unicode code points.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// 1-based position within the cue sequence.
    pub index: u32,
    pub start_seconds: f32,
    pub end_seconds: f32,
    pub text: String,
}

/// Pack an ordered word timeline into cues of at most `max_chars` characters.
///
/// Words are joined with single spaces. When appending the next word would
/// push the cue past `max_chars` code points, the cue is closed and the word
/// starts a new one. A word is never split: a single word longer than
/// `max_chars` still forms its own (over-long) cue.
///
/// An empty timeline yields an empty cue vector. Zero-duration words are kept
/// as-is; no deduplication happens here.
pub fn segment_words(words: &[Word], max_chars: usize) -> Vec<Cue> {
    let mut cues: Vec<Cue> = Vec::new();
    let mut current: Option<PendingCue> = None;

    for word in words {
        if let Some(pending) = current.as_mut() {
            if pending.fits(&word.text, max_chars) {
                pending.push(word);
                continue;
            }
        }

        if let Some(pending) = current.take() {
            cues.push(pending.close(cues.len() as u32 + 1));
        }
        current = Some(PendingCue::start(word));
    }

    if let Some(pending) = current.take() {
        cues.push(pending.close(cues.len() as u32 + 1));
    }

    cues
}

/// Accumulator for the cue currently being filled.
struct PendingCue {
    start_seconds: f32,
    end_seconds: f32,
    text: String,
    // Code-point count of `text`, tracked to avoid re-counting per word.
    chars: usize,
}

impl PendingCue {
    fn start(word: &Word) -> Self {
        Self {
            start_seconds: word.start_seconds,
            end_seconds: word.end_seconds,
            text: word.text.clone(),
            chars: word.text.chars().count(),
        }
    }

    /// Whether appending `next` (with a joining space) stays within budget.
    fn fits(&self, next: &str, max_chars: usize) -> bool {
        self.chars + 1 + next.chars().count() <= max_chars
    }

    fn push(&mut self, word: &Word) {
        self.text.push(' ');
        self.text.push_str(&word.text);
        self.chars += 1 + word.text.chars().count();
        self.end_seconds = word.end_seconds;
    }

    fn close(self, index: u32) -> Cue {
        Cue {
            index,
            start_seconds: self.start_seconds,
            end_seconds: self.end_seconds,
            text: self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Word;

    fn words(entries: &[(&str, f32, f32)]) -> Vec<Word> {
        entries
            .iter()
            .map(|(t, s, e)| Word::new(*t, *s, *e))
            .collect()
    }

    #[test]
    fn empty_timeline_yields_no_cues() {
        assert!(segment_words(&[], 10).is_empty());
    }

    #[test]
    fn single_word_forms_single_cue() {
        let cues = segment_words(&words(&[("hello", 0.5, 1.0)]), 10);
        assert_eq!(
            cues,
            vec![Cue {
                index: 1,
                start_seconds: 0.5,
                end_seconds: 1.0,
                text: "hello".to_string(),
            }]
        );
    }

    #[test]
    fn words_are_packed_until_budget_is_hit() {
        // "one two" is 7 chars; adding " three" would make 13 > 12.
        let cues = segment_words(
            &words(&[("one", 0.0, 0.3), ("two", 0.3, 0.6), ("three", 0.6, 1.0)]),
            12,
        );
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "one two");
        assert_eq!(cues[0].start_seconds, 0.0);
        assert_eq!(cues[0].end_seconds, 0.6);
        assert_eq!(cues[1].text, "three");
        assert_eq!(cues[1].start_seconds, 0.6);
        assert_eq!(cues[1].end_seconds, 1.0);
    }

    #[test]
    fn exact_fit_is_kept_in_one_cue() {
        // "ab cd" is exactly 5 chars.
        let cues = segment_words(&words(&[("ab", 0.0, 0.2), ("cd", 0.2, 0.4)]), 5);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "ab cd");
    }

    #[test]
    fn overlong_word_is_never_split() {
        let cues = segment_words(
            &words(&[("a", 0.0, 0.1), ("extraordinarily", 0.1, 1.2), ("b", 1.2, 1.4)]),
            6,
        );
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[1].text, "extraordinarily");
        assert_eq!(cues[1].start_seconds, 0.1);
        assert_eq!(cues[1].end_seconds, 1.2);
    }

    #[test]
    fn cyrillic_is_counted_in_code_points_not_bytes() {
        // "Привет" is 6 code points (12 UTF-8 bytes); joined with "мир!"
        // it would be 11 code points, over a 10 budget, so two cues.
        let cues = segment_words(&words(&[("Привет", 0.0, 0.8), ("мир!", 0.8, 1.5)]), 10);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "Привет");
        assert_eq!(cues[0].start_seconds, 0.0);
        assert_eq!(cues[0].end_seconds, 0.8);
        assert_eq!(cues[1].text, "мир!");
        assert_eq!(cues[1].start_seconds, 0.8);
        assert_eq!(cues[1].end_seconds, 1.5);
    }

    #[test]
    fn zero_duration_words_are_kept() {
        let cues = segment_words(
            &words(&[("tick", 1.0, 1.0), ("tick", 1.0, 1.0)]),
            4,
        );
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].start_seconds, 1.0);
        assert_eq!(cues[0].end_seconds, 1.0);
    }

    #[test]
    fn indices_are_one_based_and_sequential() {
        let cues = segment_words(
            &words(&[("a", 0.0, 0.1), ("b", 0.1, 0.2), ("c", 0.2, 0.3)]),
            1,
        );
        let indices: Vec<u32> = cues.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn joining_cue_texts_reproduces_the_word_sequence() {
        let input = words(&[
            ("the", 0.0, 0.2),
            ("quick", 0.2, 0.5),
            ("brown", 0.5, 0.8),
            ("fox", 0.8, 1.0),
            ("jumps", 1.0, 1.4),
        ]);
        for max_chars in 1..=32 {
            let cues = segment_words(&input, max_chars);
            let joined = cues
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            assert_eq!(joined, "the quick brown fox jumps", "max_chars={max_chars}");
        }
    }

    #[test]
    fn budget_holds_except_for_single_overlong_words() {
        let input = words(&[
            ("short", 0.0, 0.2),
            ("words", 0.2, 0.5),
            ("unsplittable", 0.5, 1.1),
            ("go", 1.1, 1.2),
        ]);
        let max_chars = 8;
        for cue in segment_words(&input, max_chars) {
            let len = cue.text.chars().count();
            if len > max_chars {
                // Only a lone over-budget word may exceed the limit.
                assert!(!cue.text.contains(' '), "multi-word cue over budget: {:?}", cue.text);
            }
        }
    }

    #[test]
    fn cue_timestamps_are_non_decreasing() {
        let input = words(&[
            ("one", 0.0, 0.4),
            ("two", 0.9, 1.3),
            ("three", 2.0, 2.2),
            ("four", 2.2, 2.9),
        ]);
        let cues = segment_words(&input, 9);
        let mut last_end = 0.0f32;
        for cue in &cues {
            assert!(cue.end_seconds >= cue.start_seconds);
            assert!(cue.start_seconds >= last_end);
            last_end = cue.end_seconds;
        }
    }

    #[test]
    fn silence_gaps_between_cues_are_preserved() {
        // 3.1s of silence between the words must survive as a gap between cues.
        let cues = segment_words(&words(&[("before", 0.0, 0.5), ("after", 3.6, 4.0)]), 6);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].end_seconds, 0.5);
        assert_eq!(cues[1].start_seconds, 3.6);
    }
}
