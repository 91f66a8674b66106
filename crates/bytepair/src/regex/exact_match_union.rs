//! Exact Match Union Patterns

use crate::regex::regex_wrapper::RegexPattern;

/// Create a union pattern of exact (escaped) matches.
///
/// Alternatives are ordered longest-first, so that overlapping literals
/// resolve to the longest match under the engines' leftmost-first
/// alternation semantics.
///
/// This will always be a [`RegexPattern::Basic`] variant.
///
/// ## Arguments
/// * `alts` - A slice of string-like alternatives to union.
///
/// ## Returns
/// A new `RegexPattern::Basic` containing the union pattern.
pub fn exact_match_union_pattern<S: AsRef<str>>(alts: &[S]) -> RegexPattern {
    let mut parts = alts
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>();
    parts.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let parts = parts
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>();
    RegexPattern::Basic(format!("({})", parts.join("|")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::RegexWrapper;

    #[test]
    fn test_fixed_alternative_list() {
        let alternatives = ["apple", "[x]", "boat"];

        let pattern = exact_match_union_pattern(&alternatives);
        assert_eq!(pattern.as_str(), r"(apple|boat|\[x\])");

        let re: RegexWrapper = pattern.compile().unwrap();

        let text = "apple 123 [x] xyz boat";
        assert_eq!(
            re.find_ranges(text).collect::<Vec<_>>(),
            vec![0..5, 10..13, 18..22]
        );
    }

    #[test]
    fn test_longest_literal_wins() {
        let alternatives = ["<END>", "<END>X"];

        let re = exact_match_union_pattern(&alternatives).compile().unwrap();
        assert_eq!(re.find_ranges("a<END>Xb").collect::<Vec<_>>(), vec![1..7]);
    }
}
