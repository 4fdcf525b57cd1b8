use super::types::{WordToken, WordTokenType};

#[derive(Clone, Copy, PartialEq)]
enum CharClass {
    Space,
    Word,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if c.is_ascii_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Other
    }
}

/// Split a line into whitespace runs, word runs and single punctuation characters.
/// Concatenating the tokens gives back the line.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0usize;
    let mut current: Option<CharClass> = None;

    for (pos, c) in line.char_indices() {
        let class = classify(c);
        match current {
            Some(prev) if prev == class && class != CharClass::Other => {}
            Some(_) => {
                tokens.push(&line[start..pos]);
                start = pos;
            }
            None => {}
        }
        current = Some(class);
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }

    tokens
}

/// Longest-common-subsequence diff over two token sequences.
///
/// `dp[i][j]` is the LCS length of `a[i..]` and `b[j..]`. On a mismatch the
/// walk drops from the left when that keeps at least as much LCS, so deletions
/// come before insertions.
pub fn lcs_diff(a: &[&str], b: &[&str]) -> Vec<WordToken> {
    let n = a.len();
    let m = b.len();
    let mut dp = vec![vec![0usize; m + 1]; n + 1];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if a[i] == b[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let token = |token_type, value: &str| WordToken {
        token_type,
        value: value.to_string(),
    };

    let mut out = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0usize, 0usize);
    while i < n && j < m {
        if a[i] == b[j] {
            out.push(token(WordTokenType::Same, a[i]));
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            out.push(token(WordTokenType::Del, a[i]));
            i += 1;
        } else {
            out.push(token(WordTokenType::Add, b[j]));
            j += 1;
        }
    }
    out.extend(a[i..].iter().map(|t| token(WordTokenType::Del, *t)));
    out.extend(b[j..].iter().map(|t| token(WordTokenType::Add, *t)));

    out
}

/// Word-level diff of two raw lines
pub fn diff_words(left: &str, right: &str) -> Vec<WordToken> {
    lcs_diff(&tokenize(left), &tokenize(right))
}

/// Rebuild one side of a word diff: the left keeps `del`, the right keeps `add`
pub fn reconstruct(tokens: &[WordToken], left: bool) -> String {
    let skip = if left {
        WordTokenType::Add
    } else {
        WordTokenType::Del
    };
    tokens
        .iter()
        .filter(|t| t.token_type != skip)
        .map(|t| t.value.as_str())
        .collect()
}
