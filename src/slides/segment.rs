use crate::error::{Error, Result};

/// Split lyrics into slide contents.
///
/// A blank line ends the current slide. A run of two or more blank lines also
/// produces exactly one empty slide (a pause). Non-blank lines fill the current
/// slide until it holds `lines_per_slide` lines; the next line starts a new slide.
/// `None` means slides are only broken at blank lines.
///
/// Each line is trimmed. Leading and trailing blank lines never produce slides,
/// and whitespace-only input produces no slides at all.
pub fn segment(lyrics: &str, lines_per_slide: Option<usize>) -> Result<Vec<String>> {
    if lines_per_slide == Some(0) {
        return Err(Error::InvalidLinesPerSlide);
    }

    let lyrics = lyrics.trim();
    if lyrics.is_empty() {
        return Ok(Vec::new());
    }

    let mut slides = vec![String::new()];
    let mut line_count = 0;

    for line in lyrics.split('\n') {
        let line = line.trim();

        if line.is_empty() {
            // The current slide is still empty here only after an earlier blank line;
            // keep it as a pause slide unless the one before it already is one.
            let previous_is_blank = slides.len() >= 2 && slides[slides.len() - 2].is_empty();
            if line_count != 0 || !previous_is_blank {
                slides.push(String::new());
                line_count = 0;
            }
        } else if lines_per_slide.map_or(true, |max| line_count < max) {
            if let Some(current) = slides.last_mut() {
                if line_count != 0 {
                    current.push('\n');
                }
                current.push_str(line);
            }
            line_count += 1;
        } else {
            // Current slide is full
            slides.push(line.to_string());
            line_count = 1;
        }
    }

    Ok(slides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(lyrics: &str, lines_per_slide: usize) -> Vec<String> {
        segment(lyrics, Some(lines_per_slide)).unwrap()
    }

    #[test]
    fn test_segment_basic() {
        assert_eq!(
            seg("A\nB\nC\nD\nE\nF\n\nG\nH", 4),
            vec!["A\nB\nC\nD", "E\nF", "G\nH"]
        );
    }

    #[test]
    fn test_segment_3_lines_per_slide() {
        assert_eq!(
            seg("A\nB\nC\nD\nE\nF\n\nG\nH", 3),
            vec!["A\nB\nC", "D\nE\nF", "G\nH"]
        );
    }

    #[test]
    fn test_segment_empty_string() {
        assert!(seg("", 4).is_empty());
        assert!(seg(" \n\n\t\n", 4).is_empty());
        assert!(segment("", None).unwrap().is_empty());
    }

    #[test]
    fn test_segment_one_line() {
        assert_eq!(seg("A", 4), vec!["A"]);
    }

    #[test]
    fn test_segment_exactly_full_slide() {
        assert_eq!(seg("A\nB\nC\nD", 4), vec!["A\nB\nC\nD"]);
    }

    #[test]
    fn test_segment_triple_newlines() {
        assert_eq!(seg("A\nB\n\n\nC\nD", 4), vec!["A\nB", "", "C\nD"]);
    }

    #[test]
    fn test_segment_many_blank_lines_give_one_pause() {
        assert_eq!(seg("A\n\n\n\n\n\nB", 4), vec!["A", "", "B"]);
    }

    #[test]
    fn test_segment_extra_whitespace() {
        assert_eq!(seg(" A\n B \nC D\nE ", 4), vec!["A\nB\nC D\nE"]);
    }

    #[test]
    fn test_segment_extra_newlines() {
        assert_eq!(seg("\n\n\nA\n\n\n\n\nB\n\n\n", 4), vec!["A", "", "B"]);
    }

    #[test]
    fn test_segment_blank_after_full_slide() {
        // A blank line right after a full slide is just the boundary
        assert_eq!(seg("A\nB\n\nC", 2), vec!["A\nB", "C"]);
    }

    #[test]
    fn test_segment_whitespace_only_lines_are_blank() {
        assert_eq!(seg("A\n   \n\t\nB", 4), vec!["A", "", "B"]);
    }

    #[test]
    fn test_segment_crlf() {
        assert_eq!(seg("A\r\nB\r\n\r\nC", 4), vec!["A\nB", "C"]);
    }

    #[test]
    fn test_segment_unbounded() {
        let lyrics = "A\nB\nC\nD\nE\nF\n\nG\nH";
        assert_eq!(
            segment(lyrics, None).unwrap(),
            vec!["A\nB\nC\nD\nE\nF", "G\nH"]
        );
    }

    #[test]
    fn test_segment_rejects_zero_lines_per_slide() {
        assert_eq!(segment("A\nB", Some(0)), Err(Error::InvalidLinesPerSlide));
        assert_eq!(segment("", Some(0)), Err(Error::InvalidLinesPerSlide));
    }

    #[test]
    fn test_segment_never_exceeds_limit() {
        let lyrics = "a\nb\nc\n\nd\ne\nf\ng\nh\ni\nj\n\n\nk\nl\nm\nn\no";
        for max in 1..=6 {
            let slides = seg(lyrics, max);
            for slide in &slides {
                assert!(slide.lines().count() <= max, "{:?} over {}", slide, max);
            }
            assert!(!slides.first().unwrap().is_empty());
            assert!(!slides.last().unwrap().is_empty());
            for pair in slides.windows(2) {
                assert!(!(pair[0].is_empty() && pair[1].is_empty()));
            }
        }
    }

    #[test]
    fn test_segment_unbounded_keeps_every_line_in_order() {
        let lyrics = "  one\ntwo\n\n\n three \n\nfour\nfive  ";
        let rejoined: Vec<String> = segment(lyrics, None)
            .unwrap()
            .iter()
            .filter(|slide| !slide.is_empty())
            .flat_map(|slide| slide.lines().map(str::to_string).collect::<Vec<_>>())
            .collect();
        let expected: Vec<String> = lyrics
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        assert_eq!(rejoined, expected);
    }

    #[test]
    fn test_segment_review_text_round_trip() {
        // Slides joined by blank lines segment back to the same slides
        let slides = seg("A\nB\nC\n\n\nD\nE", 2);
        assert_eq!(slides, vec!["A\nB", "C", "", "D\nE"]);
        let joined = slides.join("\n\n");
        assert_eq!(segment(&joined, None).unwrap(), slides);
    }
}
