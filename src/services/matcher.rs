//! 编辑距离匹配
//!
//! 页面抓取的文本和答案文本之间常有空白、大小写或少量字符的差异，
//! 这里用 Levenshtein 距离做近似相等判断。

/// 距离小于该值即视为匹配
///
/// 阈值是绝对值，不随字符串长度变化：两个三字符选项相差两个字符也会被判为匹配。
pub const MATCH_THRESHOLD: usize = 3;

/// 经典 Levenshtein 距离（按 Unicode 字符计算）
///
/// 大小写归一化由调用方负责。
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// 近似相等：去掉首尾空白并转小写后，距离小于 [`MATCH_THRESHOLD`]
pub fn is_match(a: &str, b: &str) -> bool {
    distance(&fold(a), &fold(b)) < MATCH_THRESHOLD
}

/// 在候选中找到与 `needle` 最接近且近似相等的项
pub fn find_match<'a, S: AsRef<str>>(needle: &str, candidates: &'a [S]) -> Option<&'a S> {
    best_match_index(needle, candidates).map(|index| &candidates[index])
}

/// 距离最小且小于 [`MATCH_THRESHOLD`] 的候选下标，距离相同时取靠前的
pub fn best_match_index<S: AsRef<str>>(needle: &str, candidates: &[S]) -> Option<usize> {
    let needle = fold(needle);
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| (index, distance(&needle, &fold(candidate.as_ref()))))
        .filter(|&(_, d)| d < MATCH_THRESHOLD)
        .min_by_key(|&(index, d)| (d, index))
        .map(|(index, _)| index)
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_basics() {
        assert_eq!(distance("kitten", "sitting"), 3);
        assert_eq!(distance("", "abc"), 3);
        assert_eq!(distance("abc", ""), 3);
        assert_eq!(distance("flaw", "lawn"), 2);
    }

    #[test]
    fn test_distance_identity() {
        for s in ["", "a", "Paris", "héllo wörld", "Symbolic - C"] {
            assert_eq!(distance(s, s), 0);
        }
    }

    #[test]
    fn test_distance_symmetry() {
        let pairs = [
            ("Paris", "London"),
            ("abc", "acb"),
            ("", "xyz"),
            ("über", "uber"),
            ("Application", "Apple"),
        ];
        for (a, b) in pairs {
            assert_eq!(distance(a, b), distance(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn test_distance_counts_chars_not_bytes() {
        assert_eq!(distance("é", "e"), 1);
        assert_eq!(distance("北京", "南京"), 1);
    }

    #[test]
    fn test_is_match_tolerates_case_and_noise() {
        assert!(is_match("Paris", "paris"));
        assert!(is_match("  Paris ", "Paris."));
        assert!(!is_match("Paris", "Berlin"));
        assert!(!is_match("Paris", "London"));
    }

    #[test]
    fn test_is_match_short_strings_collide() {
        // 阈值是绝对值：短字符串相差两个字符仍然算匹配
        assert!(is_match("cat", "cog"));
    }

    #[test]
    fn test_find_match_returns_candidate() {
        let candidates = vec!["London".to_string(), "Paris".to_string()];
        assert_eq!(find_match("paris", &candidates).map(String::as_str), Some("Paris"));
        assert_eq!(find_match("Tokyo", &candidates), None);
    }

    #[test]
    fn test_find_match_prefers_closest_candidate() {
        let years = ["1990", "1991"];
        assert_eq!(find_match("1991", &years), Some(&"1991"));

        let steps = ["Step 1", "Step 2", "Step 3"];
        assert_eq!(best_match_index("step 3", &steps), Some(2));
        assert_eq!(best_match_index("Step 4", &steps), Some(0));
    }
}
