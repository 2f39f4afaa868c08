//! Punctuation preserve/restore around an external phonemizer.
//!
//! External engines tend to drop or mangle punctuation. [`Punctuation::preserve`]
//! cuts each line at punctuation runs and records where each run sat;
//! after the chunks are phonemized, [`Punctuation::restore`] replays the
//! records to put the marks back.

use std::collections::VecDeque;

use lazy_static::lazy_static;
use regex::Regex;

/// Marks preserved by default.
pub const DEFAULT_MARKS: &str = ";:,.!?¡¿—…\"«»“”(){}[]";

lazy_static! {
    static ref DEFAULT_MARKS_RE: Regex = marks_regex(DEFAULT_MARKS).unwrap();
}

fn marks_regex(marks: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(\s*[{}]+\s*)+", regex::escape(marks)))
}

/// Where a punctuation run sat in its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPosition {
    Begin,
    End,
    Interior,
    /// The line is made only of punctuation
    Alone,
}

/// One preserved punctuation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkIndex {
    /// Line number in the input
    pub index: usize,
    /// The run itself, surrounding whitespace included
    pub mark: String,
    pub position: MarkPosition,
}

#[derive(Debug, Clone)]
pub struct Punctuation {
    marks: String,
    marks_re: Regex,
}

impl Default for Punctuation {
    fn default() -> Self {
        Self {
            marks: DEFAULT_MARKS.to_string(),
            marks_re: DEFAULT_MARKS_RE.clone(),
        }
    }
}

impl Punctuation {
    /// Custom mark set. Fails only for an empty set.
    pub fn new(marks: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            marks: marks.to_string(),
            marks_re: marks_regex(marks)?,
        })
    }

    pub fn marks(&self) -> &str {
        &self.marks
    }

    /// Replace every punctuation run with a single space, trimming the ends.
    pub fn remove(&self, text: &str) -> String {
        self.marks_re.replace_all(text, " ").trim().to_string()
    }

    /// Split lines at punctuation runs. Empty chunks are dropped.
    pub fn preserve(&self, lines: &[&str]) -> (Vec<String>, Vec<MarkIndex>) {
        let mut chunks = Vec::new();
        let mut marks = Vec::new();
        for (num, line) in lines.iter().enumerate() {
            let (line_chunks, line_marks) = self.preserve_line(line, num);
            chunks.extend(line_chunks);
            marks.extend(line_marks);
        }
        chunks.retain(|c: &String| !c.is_empty());
        (chunks, marks)
    }

    fn preserve_line(&self, line: &str, num: usize) -> (Vec<String>, Vec<MarkIndex>) {
        let found: Vec<&str> = self.marks_re.find_iter(line).map(|m| m.as_str()).collect();
        if found.is_empty() {
            return (vec![line.to_string()], Vec::new());
        }
        if found.len() == 1 && found[0] == line {
            let alone = MarkIndex {
                index: num,
                mark: line.to_string(),
                position: MarkPosition::Alone,
            };
            return (Vec::new(), vec![alone]);
        }

        let last = found.len() - 1;
        let marks: Vec<MarkIndex> = found
            .iter()
            .enumerate()
            .map(|(i, &mark)| {
                let position = if i == 0 && line.starts_with(mark) {
                    MarkPosition::Begin
                } else if i == last && line.ends_with(mark) {
                    MarkPosition::End
                } else {
                    MarkPosition::Interior
                };
                MarkIndex {
                    index: num,
                    mark: mark.to_string(),
                    position,
                }
            })
            .collect();

        let mut chunks = Vec::with_capacity(marks.len() + 1);
        let mut rest = line;
        for mark in &marks {
            match rest.split_once(mark.mark.as_str()) {
                Some((prefix, suffix)) => {
                    chunks.push(prefix.to_string());
                    rest = suffix;
                }
                None => {
                    chunks.push(rest.to_string());
                    rest = "";
                }
            }
        }
        chunks.push(rest.to_string());
        (chunks, marks)
    }

    /// Reinsert preserved marks into transformed chunks.
    ///
    /// Spaces inside marks are replaced by `separator`; an empty separator
    /// keeps them as they were. With `strip` false,
    /// a trailing separator is kept after each restored line.
    pub fn restore(
        chunks: Vec<String>,
        marks: Vec<MarkIndex>,
        separator: &str,
        strip: bool,
    ) -> Vec<String> {
        let mut text: VecDeque<String> = chunks.into();
        let mut marks: VecDeque<MarkIndex> = marks.into();
        let mut out = Vec::new();
        let trailing = if strip { "" } else { separator };
        let mut pos = 0;

        while !text.is_empty() || !marks.is_empty() {
            let Some(current) = marks.front() else {
                for mut line in text.drain(..) {
                    if !strip && !separator.is_empty() && !line.ends_with(separator) {
                        line.push_str(separator);
                    }
                    out.push(line);
                }
                break;
            };
            if text.is_empty() {
                out.push(collapse_spaces(&current.mark, separator));
                marks.pop_front();
                continue;
            }
            if current.index != pos {
                if let Some(line) = text.pop_front() {
                    out.push(line);
                }
                pos += 1;
                continue;
            }

            let Some(current) = marks.pop_front() else {
                break;
            };
            let mark = if separator.is_empty() {
                current.mark.clone()
            } else {
                current.mark.replace(' ', separator)
            };
            if let Some(first) = text.front_mut() {
                if !separator.is_empty() && first.ends_with(separator) {
                    first.truncate(first.len() - separator.len());
                }
            }
            match current.position {
                MarkPosition::Begin => {
                    if let Some(first) = text.front_mut() {
                        first.insert_str(0, &mark);
                    }
                }
                MarkPosition::End => {
                    if let Some(first) = text.pop_front() {
                        out.push(format!("{}{}{}", first, mark, trailing));
                    }
                    pos += 1;
                }
                MarkPosition::Alone => {
                    out.push(format!("{}{}", mark, trailing));
                    pos += 1;
                }
                MarkPosition::Interior => {
                    if text.len() == 1 {
                        if let Some(first) = text.front_mut() {
                            first.push_str(&mark);
                        }
                    } else if let Some(first) = text.pop_front() {
                        if let Some(next) = text.front_mut() {
                            next.insert_str(0, &format!("{}{}", first, mark));
                        }
                    }
                }
            }
        }
        out
    }
}

fn collapse_spaces(mark: &str, separator: &str) -> String {
    if separator.is_empty() {
        return mark.to_string();
    }
    let mut out = String::with_capacity(mark.len());
    let mut in_space = false;
    for c in mark.chars() {
        if c == ' ' {
            if !in_space {
                out.push_str(separator);
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(line: &str) -> String {
        let punct = Punctuation::default();
        let (chunks, marks) = punct.preserve(&[line]);
        Punctuation::restore(chunks, marks, "", true).concat()
    }

    #[test]
    fn test_custom_marks() {
        let punct = Punctuation::new("*").unwrap();
        assert_eq!(punct.marks(), "*");
        assert_eq!(punct.remove("a*b, c"), "a b, c");
        assert!(Punctuation::new("").is_err());
    }

    #[test]
    fn test_remove() {
        let punct = Punctuation::default();
        assert_eq!(punct.remove("hello, world!"), "hello world");
        assert_eq!(punct.remove("(hi)"), "hi");
    }

    #[test]
    fn test_preserve_positions() {
        let punct = Punctuation::default();
        let (chunks, marks) = punct.preserve(&["(hello, world!"]);
        assert_eq!(chunks, vec!["hello", "world"]);
        let positions: Vec<MarkPosition> = marks.iter().map(|m| m.position).collect();
        assert_eq!(
            positions,
            vec![MarkPosition::Begin, MarkPosition::Interior, MarkPosition::End]
        );
        assert_eq!(marks[1].mark, ", ");
    }

    #[test]
    fn test_preserve_alone() {
        let punct = Punctuation::default();
        let (chunks, marks) = punct.preserve(&["..."]);
        assert!(chunks.is_empty());
        assert_eq!(marks[0].position, MarkPosition::Alone);
    }

    #[test]
    fn test_round_trip_identity() {
        for line in ["hello, world!", "(hi)", "...", "no marks here", "a; b: c.", "«quoted» text"] {
            assert_eq!(round_trip(line), line);
        }
    }

    #[test]
    fn test_restore_after_transform() {
        let punct = Punctuation::default();
        let (chunks, marks) = punct.preserve(&["hello, world!"]);
        let upper: Vec<String> = chunks.iter().map(|c| c.to_uppercase()).collect();
        let restored = Punctuation::restore(upper, marks, "", true);
        assert_eq!(restored, vec!["HELLO, WORLD!"]);
    }

    #[test]
    fn test_restore_with_separator() {
        let punct = Punctuation::default();
        let (chunks, marks) = punct.preserve(&["hi, you"]);
        let restored = Punctuation::restore(chunks, marks, "_", true);
        assert_eq!(restored, vec!["hi,_you"]);
    }

    #[test]
    fn test_empty_separator_keeps_mark_spaces() {
        let punct = Punctuation::default();
        let (chunks, marks) = punct.preserve(&["wait ... what", " ; "]);
        assert_eq!(marks[0].mark, " ... ");
        let restored = Punctuation::restore(chunks, marks, "", true);
        assert_eq!(restored, vec!["wait ... what", " ; "]);
    }

    #[test]
    fn test_multiple_lines() {
        let punct = Punctuation::default();
        let (chunks, marks) = punct.preserve(&["one.", "two"]);
        let restored = Punctuation::restore(chunks, marks, "", true);
        assert_eq!(restored, vec!["one.", "two"]);
    }
}
