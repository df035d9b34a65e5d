//! Exact string matching: naive sliding window and Knuth-Morris-Pratt
//!
//! Positions in highlights are character offsets into the text.

use crate::recorder::errors::{check_len, InputError};
use crate::snapshot::{Payload, Recorder, Role, Snapshot, Status, StepBudgetExceeded};

pub const MAX_TEXT_LEN: usize = 200;

pub const NAIVE_CODE: &[&str] = &[
    "for s in 0..=n-m:",
    "  j = 0",
    "  while j < m and text[s+j] == pattern[j]: j += 1",
    "  if j == m: report match at s",
    "  else: mismatch, shift the window by one",
    "done",
];

pub const KMP_CODE: &[&str] = &[
    "lps = failure table of pattern",
    "  lps[i] = longest proper prefix of pattern[..=i] that is also a suffix",
    "j = 0",
    "for i in 0..n:",
    "  while j > 0 and text[i] != pattern[j]: j = lps[j-1]",
    "  if text[i] == pattern[j]: j += 1",
    "  if j == m: report match at i-m+1; j = lps[j-1]",
    "done",
];

pub fn validate(text: &str, pattern: &str) -> Result<(), InputError> {
    let (n, m) = (text.chars().count(), pattern.chars().count());
    check_len("text", n, MAX_TEXT_LEN)?;
    if m == 0 {
        return Err(InputError::Empty { what: "pattern" });
    }
    if m > n {
        return Err(InputError::PatternLongerThanText { pattern: m, text: n });
    }
    Ok(())
}

/// Working state shared by both matchers
struct Matcher {
    text: Vec<char>,
    pattern: Vec<char>,
    matches: Vec<usize>,
}

impl Matcher {
    fn new(text: &str, pattern: &str) -> Self {
        Matcher {
            text: text.chars().collect(),
            pattern: pattern.chars().collect(),
            matches: Vec::new(),
        }
    }

    fn frame(&self, offset: usize, narration: String) -> Snapshot {
        let m = self.pattern.len();
        Snapshot::new(
            Payload::Text {
                text: self.text.iter().collect(),
                pattern: self.pattern.iter().collect(),
                offset,
                matches: self.matches.clone(),
            },
            narration,
        )
        .highlight(Role::Found, self.matches.iter().flat_map(|&s| s..s + m))
        .var("offset", offset)
    }

    fn listing(&self) -> String {
        self.matches
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn conclude(&self, line: usize) -> Snapshot {
        let (narration, status) = if self.matches.is_empty() {
            ("Pattern does not occur in the text".to_string(), Status::NotFound)
        } else {
            (
                format!("Pattern occurs {} time(s), at [{}]", self.matches.len(), self.listing()),
                Status::Found,
            )
        };
        let offset = self.text.len() - self.pattern.len();
        self.frame(offset, narration)
            .var("matches", self.listing())
            .line(line)
            .status(status)
    }
}

pub fn naive_search(
    text: &str,
    pattern: &str,
    rec: &mut Recorder,
) -> Result<(), StepBudgetExceeded> {
    let mut mt = Matcher::new(text, pattern);
    let (n, m) = (mt.text.len(), mt.pattern.len());
    rec.push(
        mt.frame(0, format!("Slide a window of {} over {} characters", m, n))
            .line(0)
            .var("n", n)
            .var("m", m),
    )?;

    for s in 0..=n - m {
        let mut j = 0;
        loop {
            rec.push(
                mt.frame(
                    s,
                    format!(
                        "Compare text[{}] = '{}' with pattern[{}] = '{}'",
                        s + j, mt.text[s + j], j, mt.pattern[j]
                    ),
                )
                .highlight(Role::Match, s..s + j)
                .highlight(Role::Comparing, [s + j])
                .line(2)
                .var("s", s)
                .var("j", j),
            )?;
            if mt.text[s + j] != mt.pattern[j] {
                rec.push(
                    mt.frame(
                        s,
                        format!("Mismatch at text[{}], shift the window to {}", s + j, s + 1),
                    )
                    .highlight(Role::Match, s..s + j)
                    .highlight(Role::Mismatch, [s + j])
                    .line(4)
                    .var("s", s)
                    .var("j", j),
                )?;
                break;
            }
            j += 1;
            if j == m {
                mt.matches.push(s);
                rec.push(
                    mt.frame(s, format!("Match at index {}", s))
                        .line(3)
                        .var("s", s)
                        .var("j", j)
                        .var("matches", mt.listing()),
                )?;
                break;
            }
        }
    }

    rec.push(mt.conclude(5))
}

pub fn kmp_search(text: &str, pattern: &str, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut mt = Matcher::new(text, pattern);
    let (n, m) = (mt.text.len(), mt.pattern.len());
    let mut lps = vec![0usize; m];
    rec.push(
        mt.frame(0, "Build the failure table for the pattern".to_string())
            .line(0)
            .var("lps", format!("{:?}", lps)),
    )?;
    let mut len = 0;
    let mut i = 1;
    while i < m {
        if mt.pattern[i] == mt.pattern[len] {
            len += 1;
            lps[i] = len;
            i += 1;
            rec.push(
                mt.frame(
                    0,
                    format!("pattern[{}] extends a border: lps[{}] = {}", i - 1, i - 1, len),
                )
                .line(1)
                .var("lps", format!("{:?}", lps)),
            )?;
        } else if len > 0 {
            len = lps[len - 1];
            rec.push(
                mt.frame(0, format!("pattern[{}] breaks the border, fall back to {}", i, len))
                    .line(1)
                    .var("lps", format!("{:?}", lps)),
            )?;
        } else {
            lps[i] = 0;
            i += 1;
            rec.push(
                mt.frame(0, format!("No border ends at pattern[{}]: lps[{}] = 0", i - 1, i - 1))
                    .line(1)
                    .var("lps", format!("{:?}", lps)),
            )?;
        }
    }

    let lps_shown = format!("{:?}", lps);
    let mut j = 0;
    for i in 0..n {
        while j > 0 && mt.text[i] != mt.pattern[j] {
            let fallback = lps[j - 1];
            rec.push(
                mt.frame(
                    i - j,
                    format!(
                        "text[{}] = '{}' != pattern[{}] = '{}', fall back to j = {}",
                        i, mt.text[i], j, mt.pattern[j], fallback
                    ),
                )
                .highlight(Role::Match, i - j..i)
                .highlight(Role::Mismatch, [i])
                .line(4)
                .var("i", i)
                .var("j", j)
                .var("lps", lps_shown.clone()),
            )?;
            j = fallback;
        }
        rec.push(
            mt.frame(
                i - j,
                format!(
                    "Compare text[{}] = '{}' with pattern[{}] = '{}'",
                    i, mt.text[i], j, mt.pattern[j]
                ),
            )
            .highlight(Role::Match, i - j..i)
            .highlight(Role::Comparing, [i])
            .line(5)
            .var("i", i)
            .var("j", j)
            .var("lps", lps_shown.clone()),
        )?;
        if mt.text[i] == mt.pattern[j] {
            j += 1;
        }
        if j == m {
            let start = i + 1 - m;
            mt.matches.push(start);
            rec.push(
                mt.frame(start, format!("Match at index {}", start))
                    .line(6)
                    .var("i", i)
                    .var("j", j)
                    .var("matches", mt.listing()),
            )?;
            j = lps[j - 1];
        }
    }

    rec.push(mt.conclude(7))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kmp_finds_overlapping_matches() {
        let mut rec = Recorder::new(10_000);
        kmp_search("AAAA", "AA", &mut rec).unwrap();
        match &rec.last().unwrap().payload {
            Payload::Text { matches, .. } => assert_eq!(matches, &vec![0, 1, 2]),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn pattern_longer_than_text_is_rejected() {
        assert_eq!(
            validate("AB", "ABC"),
            Err(InputError::PatternLongerThanText { pattern: 3, text: 2 })
        );
    }
}
