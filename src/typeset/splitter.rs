//! Delimiter scanning: splits decoded text into literal and math segments.

use nom::bytes::complete::tag;
use nom::error::{Error, ErrorKind};
use nom::{IResult, Parser};

/// One piece of a scanned text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathSegment<'a> {
    /// Literal text, to be re-emitted as-is (re-escaped by the caller).
    Text(&'a str),
    /// A delimited math expression with its delimiters stripped.
    Math { latex: &'a str, display: bool },
}

#[derive(Debug, Clone, Copy)]
struct DelimiterPair {
    left: &'static str,
    right: &'static str,
    display: bool,
}

/// Recognized delimiter pairs. The listed order breaks ties between openers
/// at the same offset, so `$$` is never read as two inline `$` openers.
const DELIMITERS: [DelimiterPair; 4] = [
    DelimiterPair { left: "$$", right: "$$", display: true },
    DelimiterPair { left: "$", right: "$", display: false },
    DelimiterPair { left: "\\(", right: "\\)", display: false },
    DelimiterPair { left: "\\[", right: "\\]", display: true },
];

/// Split `text` into literal and math segments.
///
/// A single left-to-right scan: at each step the earliest opener of any
/// pair claims the next region and `find_end_of_math` runs for that pair
/// alone, so a region may span another pair's delimiters. An opener with
/// no matching closer leaves the remainder of the text literal.
pub fn split_math_segments(text: &str) -> Vec<MathSegment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some((start, pair)) = find_next_opener(rest) {
        if start > 0 {
            segments.push(MathSegment::Text(&rest[..start]));
            rest = &rest[start..];
        }

        match math_expression(rest, pair) {
            Ok((remaining, latex)) => {
                segments.push(MathSegment::Math { latex, display: pair.display });
                rest = remaining;
            }
            // Unmatched opener: the rest of the text stays literal.
            Err(_) => break,
        }
    }

    if !rest.is_empty() {
        segments.push(MathSegment::Text(rest));
    }

    segments
}

/// Earliest opener in `text`, with same-offset ties going to the pair
/// listed first in [`DELIMITERS`].
fn find_next_opener(text: &str) -> Option<(usize, DelimiterPair)> {
    DELIMITERS
        .iter()
        .filter_map(|pair| text.find(pair.left).map(|at| (at, *pair)))
        .min_by_key(|&(at, _)| at)
}

/// Parse one delimited expression from the head of `input`.
fn math_expression<'a>(input: &'a str, pair: DelimiterPair) -> IResult<&'a str, &'a str> {
    let (body, _) = tag(pair.left).parse(input)?;

    let end = find_end_of_math(body, pair.right)
        .ok_or_else(|| nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))?;

    let latex = &body[..end];
    let remaining = &body[end + pair.right.len()..];
    Ok((remaining, latex))
}

/// Find the byte offset of `delimiter` in `text`, honoring `\x` escapes and
/// requiring the match to sit at brace depth zero.
fn find_end_of_math(text: &str, delimiter: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let delim = delimiter.as_bytes();
    let mut index = 0;
    let mut brace_level: i32 = 0;

    while index < bytes.len() {
        if brace_level <= 0 && bytes[index..].starts_with(delim) {
            return Some(index);
        }
        match bytes[index] {
            b'\\' => index += 1,
            b'{' => brace_level += 1,
            b'}' => brace_level -= 1,
            _ => {}
        }
        index += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_segment() {
        assert_eq!(
            split_math_segments("no math here"),
            vec![MathSegment::Text("no math here")]
        );
    }

    #[test]
    fn test_inline_dollar() {
        assert_eq!(
            split_math_segments("before $x^2$ after"),
            vec![
                MathSegment::Text("before "),
                MathSegment::Math { latex: "x^2", display: false },
                MathSegment::Text(" after"),
            ]
        );
    }

    #[test]
    fn test_display_double_dollar() {
        assert_eq!(
            split_math_segments("$$\\int_0^1 x\\,dx$$"),
            vec![MathSegment::Math { latex: "\\int_0^1 x\\,dx", display: true }]
        );
    }

    #[test]
    fn test_paren_and_bracket_delimiters() {
        assert_eq!(
            split_math_segments("\\(a\\) and \\[b\\]"),
            vec![
                MathSegment::Math { latex: "a", display: false },
                MathSegment::Text(" and "),
                MathSegment::Math { latex: "b", display: true },
            ]
        );
    }

    #[test]
    fn test_unmatched_opener_stays_literal() {
        assert_eq!(
            split_math_segments("price is $5 today"),
            vec![MathSegment::Text("price is "), MathSegment::Text("$5 today")]
        );
    }

    #[test]
    fn test_unbalanced_tail() {
        // The opener at offset zero claims `1+`, which strands the last `$`
        // without a closer. Nothing panics and the tail stays literal.
        assert_eq!(
            split_math_segments("$1+$$"),
            vec![
                MathSegment::Math { latex: "1+", display: false },
                MathSegment::Text("$"),
            ]
        );
    }

    #[test]
    fn test_adjacent_inline_regions() {
        // The `$` closer scan reads the middle `$$` as a closer then an opener.
        assert_eq!(
            split_math_segments("$a$$b$"),
            vec![
                MathSegment::Math { latex: "a", display: false },
                MathSegment::Math { latex: "b", display: false },
            ]
        );
    }

    #[test]
    fn test_dollars_inside_paren_wrapper_stay_content() {
        // `\(` opens first, so the `$` pair inside is region content.
        assert_eq!(
            split_math_segments("\\(a $b$ c\\)"),
            vec![MathSegment::Math { latex: "a $b$ c", display: false }]
        );
    }

    #[test]
    fn test_braces_protect_inner_delimiter() {
        assert_eq!(
            split_math_segments("$a_{1$2}$"),
            vec![MathSegment::Math { latex: "a_{1$2}", display: false }]
        );
    }

    #[test]
    fn test_backslash_escape_inside_math() {
        assert_eq!(
            split_math_segments("$a\\$b$"),
            vec![MathSegment::Math { latex: "a\\$b", display: false }]
        );
    }

    #[test]
    fn test_multiple_regions() {
        assert_eq!(
            split_math_segments("$a$ mid $$b$$ end"),
            vec![
                MathSegment::Math { latex: "a", display: false },
                MathSegment::Text(" mid "),
                MathSegment::Math { latex: "b", display: true },
                MathSegment::Text(" end"),
            ]
        );
    }

    #[test]
    fn test_display_has_priority_over_inline() {
        assert_eq!(
            split_math_segments("$$x$$"),
            vec![MathSegment::Math { latex: "x", display: true }]
        );
    }
}
