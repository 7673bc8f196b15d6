//! Character-level string similarity between normalized names.

/// Longest block `a[i..i+k] == b[j..j+k]` inside the given ranges.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    let width = bhi - blo + 1;
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[col - 1] + 1;
                cur[col] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            } else {
                cur[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}

/// Total size of the recursively found matching blocks.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k > 0 {
            total += k;
            queue.push((alo, i, blo, j));
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// Length in characters of the longest common substring.
pub fn longest_common_substring(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    longest_match(&a, &b, 0, a.len(), 0, b.len()).2
}

/// Ratcliff/Obershelp ratio `2·M / (|a| + |b|)`.
///
/// Order-sensitive on ties between equally long blocks; use [`similarity`]
/// where symmetry matters.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Symmetric similarity in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a <= b {
        ratio(a, b)
    } else {
        ratio(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcs_basic() {
        assert_eq!(longest_common_substring("foradori", "foradory"), 7);
        assert_eq!(longest_common_substring("montelena", "chateau montelena"), 9);
        assert_eq!(longest_common_substring("abc", "xyz"), 0);
        assert_eq!(longest_common_substring("", "abc"), 0);
    }

    #[test]
    fn lcs_counts_chars_not_bytes() {
        assert_eq!(longest_common_substring("søren", "søren"), 5);
    }

    #[test]
    fn ratio_known_values() {
        assert_eq!(ratio("abcd", "bcde"), 0.75);
        assert_eq!(ratio("foradori", "foradory"), 0.875);
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn ratio_recurses_into_both_sides() {
        // blocks "ab" and "de" around a mismatching middle
        assert_eq!(ratio("abcde", "abxde"), 0.8);
    }

    #[test]
    fn ratio_empty() {
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("", "abc"), 0.0);
    }

    #[test]
    fn similarity_identity_and_symmetry() {
        assert_eq!(similarity("montelena", "montelena"), 1.0);
        assert_eq!(similarity("tommasi", "tomasi"), similarity("tomasi", "tommasi"));
        assert_eq!(similarity("abcd", "dcba"), similarity("dcba", "abcd"));
    }
}
