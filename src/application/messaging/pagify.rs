//! Splitting oversized text into transport-sized pages

use thiserror::Error;

/// Hard per-message cap, a little under the transport limit
pub const MESSAGE_LIMIT: usize = 1992;

/// Delimiters tried in order when a page is still too long
const DELIMITERS: [&str; 4] = ["\n", ",", "-", " "];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PagifyError {
    #[error("unable to pagify text: {0} characters without a delimiter")]
    Unsplittable(usize),
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Greedily pack `text`'s `delimiter`-separated parts into pages of at most
/// [`MESSAGE_LIMIT`] characters. A part that is longer than the limit on its
/// own becomes a page of its own, still oversized.
pub fn pagify(text: &str, delimiter: &str) -> Vec<String> {
    let delimiter_len = char_len(delimiter);
    let mut pages = Vec::new();
    let mut current: Option<(String, usize)> = None;

    for part in text.split(delimiter) {
        let part_len = char_len(part);
        current = match current.take() {
            Some((mut page, len)) if len + delimiter_len + part_len <= MESSAGE_LIMIT => {
                page.push_str(delimiter);
                page.push_str(part);
                Some((page, len + delimiter_len + part_len))
            }
            Some((page, _)) => {
                pages.push(page);
                Some((part.to_string(), part_len))
            }
            None => Some((part.to_string(), part_len)),
        };
    }

    if let Some((page, _)) = current {
        pages.push(page);
    }
    pages
}

/// Split on newlines, then re-split oversized pages on commas, hyphens and
/// finally spaces. Empty pages are dropped.
pub fn auto_pagify(text: &str) -> Result<Vec<String>, PagifyError> {
    let mut pages = Vec::new();
    split_into(text, &DELIMITERS, &mut pages)?;
    pages.retain(|page| !page.is_empty());
    Ok(pages)
}

fn split_into(text: &str, delimiters: &[&str], out: &mut Vec<String>) -> Result<(), PagifyError> {
    let Some((delimiter, rest)) = delimiters.split_first() else {
        return Err(PagifyError::Unsplittable(char_len(text)));
    };

    for page in pagify(text, delimiter) {
        if char_len(&page) <= MESSAGE_LIMIT {
            out.push(page);
        } else {
            split_into(&page, rest, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_page() {
        assert_eq!(auto_pagify("hello\nworld").unwrap(), vec!["hello\nworld"]);
    }

    #[test]
    fn test_empty_text_has_no_pages() {
        assert!(auto_pagify("").unwrap().is_empty());
    }

    #[test]
    fn test_newline_pages_rejoin_exactly() {
        let line = "x".repeat(700);
        let text = vec![line.as_str(); 7].join("\n");

        let pages = pagify(&text, "\n");
        assert_eq!(pages.len(), 4);
        assert!(pages.iter().all(|p| p.chars().count() <= MESSAGE_LIMIT));
        assert_eq!(pages.join("\n"), text);
        assert_eq!(auto_pagify(&text).unwrap(), pages);
    }

    #[test]
    fn test_exact_limit_is_not_split() {
        let text = "a".repeat(MESSAGE_LIMIT);
        assert_eq!(auto_pagify(&text).unwrap(), vec![text.clone()]);
    }

    #[test]
    fn test_one_over_limit_without_delimiter_fails() {
        let text = "a".repeat(MESSAGE_LIMIT + 1);
        assert_eq!(auto_pagify(&text), Err(PagifyError::Unsplittable(MESSAGE_LIMIT + 1)));
    }

    #[test]
    fn test_long_line_falls_back_to_commas_then_spaces() {
        let with_commas = vec!["y".repeat(1000); 3].join(",");
        let pages = auto_pagify(&with_commas).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p == &"y".repeat(1000)));

        let with_spaces = vec!["z".repeat(1500); 2].join(" ");
        let pages = auto_pagify(&with_spaces).unwrap();
        assert_eq!(pages, vec!["z".repeat(1500), "z".repeat(1500)]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(MESSAGE_LIMIT);
        assert_eq!(auto_pagify(&text).unwrap().len(), 1);
    }
}
