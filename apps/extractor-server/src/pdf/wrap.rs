//! Greedy word wrap for report lines.
//!
//! Widths are counted in `char`s. A line already within the width is kept
//! verbatim (including its inner spacing). A longer line is re-flowed word by
//! word, and a word is added to the current line only while the result stays
//! strictly shorter than the width. Words longer than the width are emitted
//! on their own line, unsplit.

/// Default characters per report line
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// Wrap every `\n`-separated line of `text`
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

/// Wrap a single line
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();
        let candidate_len = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if candidate_len < width || current.is_empty() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = candidate_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_passes_through() {
        assert_eq!(wrap_line("GPA:  3.8", 80), vec!["GPA:  3.8"]);
        assert_eq!(wrap_line("", 80), vec![""]);
    }

    #[test]
    fn test_line_exactly_width_is_not_wrapped() {
        let line = "a".repeat(10);
        assert_eq!(wrap_line(&line, 10), vec![line.clone()]);
    }

    #[test]
    fn test_greedy_wrap_is_strictly_shorter_than_width() {
        // "aaa bbb" is 7 chars; with width 8 it fits, adding " ccc" would be 11
        let lines = wrap_line("aaa bbb ccc ddd", 8);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);

        // Candidate of exactly the width is pushed to the next line
        let lines = wrap_line("aaa bbb ccc", 7);
        assert_eq!(lines, vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn test_long_word_passes_unsplit() {
        let long = "x".repeat(30);
        let line = format!("short {} tail", long);
        let lines = wrap_line(&line, 10);
        assert_eq!(lines, vec!["short".to_string(), long, "tail".to_string()]);
    }

    #[test]
    fn test_wrap_text_keeps_blank_lines() {
        let lines = wrap_text("Name: Ada\n\nMajor: Physics", 80);
        assert_eq!(lines, vec!["Name: Ada", "", "Major: Physics"]);
    }

    #[test]
    fn test_width_bound_and_determinism() {
        let text = "The applicant reports a cumulative GPA of 3.87 on a 4.0 scale, intends to major \
                    in mechanical engineering with a minor in applied mathematics, and lists an SAT \
                    score of 1520 alongside two AP exams with scores of 5.\nSecond paragraph here.";
        let first = wrap_text(text, 40);
        let second = wrap_text(text, 40);
        assert_eq!(first, second);

        for line in &first {
            let single_word = !line.contains(' ');
            assert!(line.chars().count() <= 40 || single_word, "line too long: {line:?}");
        }

        // No words lost or reordered
        let rejoined: Vec<&str> = first.iter().flat_map(|l| l.split_whitespace()).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // 9 chars, 18 bytes
        let line = "éééé éééé";
        assert_eq!(wrap_line(line, 9), vec![line]);
    }
}
