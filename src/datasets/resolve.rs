use regex::RegexBuilder;

/// One strategy for locating a semantic column in a header row.
///
/// Each semantic field is described by an ordered rule list; resolution is
/// strategy-major, so an exact name anywhere in the file beats a pattern
/// match on an earlier header. Within one rule the first matching header in
/// file order wins, which keeps resolution deterministic across calls.
#[derive(Debug, Clone, Copy)]
pub enum ColumnRule {
    /// Case-sensitive exact header name.
    Exact(&'static str),
    /// Case-insensitive regex tested against each header.
    Pattern(&'static str),
    /// Case-insensitive regex, vetoed when the second regex also matches.
    /// Needed for families like `yhat` / `yhat_lower` / `yhat_upper`.
    PatternExcluding(&'static str, &'static str),
}

/// Find the index of the first header matching the rule list, or `None`.
/// Never errors; an absent column means the dataset is unavailable and the
/// caller decides what that implies.
pub fn resolve_column(headers: &[String], rules: &[ColumnRule]) -> Option<usize> {
    for rule in rules {
        let found = match rule {
            ColumnRule::Exact(name) => headers.iter().position(|h| h == name),
            ColumnRule::Pattern(pattern) => {
                let re = match ci_regex(pattern) {
                    Some(re) => re,
                    None => continue,
                };
                headers.iter().position(|h| re.is_match(h))
            }
            ColumnRule::PatternExcluding(pattern, veto) => {
                let (re, veto_re) = match (ci_regex(pattern), ci_regex(veto)) {
                    (Some(re), Some(veto_re)) => (re, veto_re),
                    _ => continue,
                };
                headers
                    .iter()
                    .position(|h| re.is_match(h) && !veto_re.is_match(h))
            }
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn ci_regex(pattern: &str) -> Option<regex::Regex> {
    RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_match_in_file_order() {
        let h = headers(&["Datetime", "date", "ds"]);
        let rules = [ColumnRule::Pattern("date|datetime|ds")];
        assert_eq!(resolve_column(&h, &rules), Some(0));
        // Stable across repeated calls.
        assert_eq!(resolve_column(&h, &rules), Some(0));
    }

    #[test]
    fn test_exact_beats_earlier_pattern_match() {
        // Strategy-major: the exact rule is exhausted over all headers
        // before any pattern is tried.
        let h = headers(&["yearly_trend", "trend"]);
        let rules = [ColumnRule::Exact("trend"), ColumnRule::Pattern("trend")];
        assert_eq!(resolve_column(&h, &rules), Some(1));
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let h = headers(&["Trend"]);
        assert_eq!(resolve_column(&h, &[ColumnRule::Exact("trend")]), None);
        assert_eq!(
            resolve_column(&h, &[ColumnRule::Pattern("trend")]),
            Some(0)
        );
    }

    #[test]
    fn test_pattern_excluding() {
        let h = headers(&["ds", "yhat_lower", "yhat_upper", "yhat"]);
        let rules = [ColumnRule::PatternExcluding("yhat", "lower|upper")];
        assert_eq!(resolve_column(&h, &rules), Some(3));
    }

    #[test]
    fn test_no_match_is_none() {
        let h = headers(&["a", "b"]);
        assert_eq!(resolve_column(&h, &[ColumnRule::Pattern("power")]), None);
        assert_eq!(resolve_column(&h, &[]), None);
    }
}
