/// Join slides with one blank line between them.
///
/// Segmenting the result with no line limit gives the same slides back, pause
/// slides included, which is what makes this the format for hand editing.
pub fn render(slides: &[String]) -> String {
    slides.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::segment;

    #[test]
    fn test_render_text() {
        let slides = vec!["A\nB".to_string(), "C".to_string()];
        assert_eq!(render(&slides), "A\nB\n\nC");
    }

    #[test]
    fn test_pause_slides_survive_editing_round_trip() {
        let slides = vec![
            "A\nB".to_string(),
            String::new(),
            "C".to_string(),
        ];
        let text = render(&slides);
        assert_eq!(text, "A\nB\n\n\n\nC");
        assert_eq!(segment(&text, None).unwrap(), slides);
    }
}
