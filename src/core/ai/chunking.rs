//! Splitting long replies into pieces Discord will accept.
//!
//! Text is cut only at line boundaries. Each segment is a slice of the
//! original text, so concatenating the segments gives back the input exactly.

/// Maximum characters Discord allows in a single message.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Lazily splits `text` into segments of at most `max_len` characters.
///
/// A line counts together with its trailing `\n`. A single line longer than
/// `max_len` is kept whole and comes out as its own oversized segment.
pub fn split_message(text: &str, max_len: usize) -> Chunks<'_> {
    Chunks {
        rest: text,
        max_len,
    }
}

/// Iterator returned by [`split_message`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    max_len: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let mut end = 0;
        let mut len = 0;
        for line in self.rest.split_inclusive('\n') {
            let line_len = line.chars().count();
            if end > 0 && len + line_len > self.max_len {
                break;
            }
            end += line.len();
            len += line_len;
        }

        let (segment, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, max_len: usize) -> Vec<&str> {
        split_message(text, max_len).collect()
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(collect("", 2000).is_empty());
    }

    #[test]
    fn test_short_text_is_one_segment() {
        assert_eq!(collect("hola\nmundo", 2000), vec!["hola\nmundo"]);
    }

    #[test]
    fn test_splits_on_line_boundaries() {
        let text = "aaaa\nbbbb\ncccc\n";
        // each line is 5 chars with its break
        assert_eq!(collect(text, 10), vec!["aaaa\nbbbb\n", "cccc\n"]);
        assert_eq!(collect(text, 9), vec!["aaaa\n", "bbbb\n", "cccc\n"]);
    }

    #[test]
    fn test_oversized_line_is_not_cut() {
        let long = "x".repeat(30);
        let text = format!("short\n{}\nend", long);
        let segments = collect(&text, 10);

        assert_eq!(segments, vec!["short\n", &format!("{}\n", long)[..], "end"]);
        assert!(segments.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_oversized_first_line_has_no_empty_segment_before_it() {
        let text = format!("{}\nok", "y".repeat(15));
        let segments = collect(&text, 10);
        assert_eq!(segments.len(), 2);
        assert!(!segments[0].is_empty());
    }

    #[test]
    fn test_round_trip_reproduces_input() {
        let samples = [
            "",
            "\n",
            "\n\n\n",
            "una línea",
            "fin con salto\n",
            "a\nbb\nccc\ndddd\neeeee\n\n\nffffff",
        ];
        for text in samples {
            for max_len in [1, 3, 5, 8, 2000] {
                let joined: String = split_message(text, max_len).collect();
                assert_eq!(joined, text, "max_len={}", max_len);
            }
        }
    }

    #[test]
    fn test_segments_respect_limit_when_lines_fit() {
        let text: String = (0..500)
            .map(|i| format!("line number {} with some padding\n", i))
            .collect();
        for segment in split_message(&text, DISCORD_MESSAGE_LIMIT) {
            assert!(segment.chars().count() <= DISCORD_MESSAGE_LIMIT);
        }
        assert!(split_message(&text, DISCORD_MESSAGE_LIMIT).count() > 1);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        // 6 chars per line with the break, but 10 bytes
        let text = "ñññ ñ\nñññ ñ\n";
        assert_eq!(collect(text, 12), vec![text]);
    }
}
