//! Command-line parameter encoding
//!
//! Shards are handed to a build tool as command-line tokens. These helpers
//! quote tokens so that `split_parameters(join_params(p)) == p`, including
//! for parameters holding spaces, quotes, or nothing at all.
//!
//! Quoting rules for the splitter:
//!
//! | Context | Behaviour |
//! |---------|-----------|
//! | Unquoted whitespace | Ends the current parameter |
//! | `"..."` | Literal text; `\"` and `\\` are escapes |
//! | `'...'` | Literal text, no escapes |
//! | Unquoted `\` | Literal backslash |
//!
//! Adjacent quoted and unquoted fragments join into one parameter.

/// Encode one parameter for a command line
///
/// Returns the parameter unchanged unless it is empty or contains whitespace
/// or a quote, in which case it is wrapped in double quotes. A single quote
/// always forces quoting so a single-quote-aware splitter reads it back intact.
pub fn encode_param(param: &str) -> String {
    if !needs_quoting(param) {
        return param.to_string();
    }

    let mut encoded = String::with_capacity(param.len() + 2);
    encoded.push('"');
    for c in param.chars() {
        if c == '"' || c == '\\' {
            encoded.push('\\');
        }
        encoded.push(c);
    }
    encoded.push('"');
    encoded
}

fn needs_quoting(param: &str) -> bool {
    param.is_empty()
        || param
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'')
}

/// Encode and join parameters with single spaces
pub fn join_params<I, S>(params: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    params
        .into_iter()
        .map(|p| encode_param(p.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a command line into parameters
///
/// `None` yields no parameters. An unterminated quote runs to the end of the
/// input rather than failing.
pub fn split_parameters(params: Option<&str>) -> Vec<String> {
    let Some(params) = params else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let mut current = String::new();
    // A quoted empty string still produces a parameter
    let mut started = false;
    let mut quote: Option<char> = None;
    let mut chars = params.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some('"') => match c {
                '"' => quote = None,
                '\\' if matches!(chars.peek(), Some('"') | Some('\\')) => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                _ => current.push(c),
            },
            Some(_) => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    started = true;
                }
                c if c.is_whitespace() => {
                    if started {
                        result.push(std::mem::take(&mut current));
                        started = false;
                    }
                }
                _ => {
                    current.push(c);
                    started = true;
                }
            },
        }
    }

    if started {
        result.push(current);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_param_unchanged() {
        assert_eq!(encode_param("//java/com/google:one"), "//java/com/google:one");
        assert_eq!(encode_param("-//foo/..."), "-//foo/...");
        assert_eq!(encode_param(r"a\b"), r"a\b");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(encode_param(""), "\"\"");
        assert_eq!(encode_param("a b"), "\"a b\"");
        assert_eq!(encode_param("it's"), "\"it's\"");
        assert_eq!(encode_param(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(encode_param(r"c:\x y"), r#""c:\\x y""#);
    }

    #[test]
    fn test_split_none_and_blank() {
        assert!(split_parameters(None).is_empty());
        assert!(split_parameters(Some("")).is_empty());
        assert!(split_parameters(Some("   \t ")).is_empty());
    }

    #[test]
    fn test_split_quotes() {
        assert_eq!(
            split_parameters(Some(r#"build "a b" 'c "d"' e\f"#)),
            vec!["build", "a b", r#"c "d""#, r"e\f"]
        );
        assert_eq!(split_parameters(Some(r#"x"y z"w"#)), vec!["xy zw"]);
        assert_eq!(split_parameters(Some(r#""" ''"#)), vec!["", ""]);
    }

    #[test]
    fn test_split_unterminated_quote() {
        assert_eq!(split_parameters(Some(r#"a "b c"#)), vec!["a", "b c"]);
    }

    #[test]
    fn test_join_split_round_trip() {
        let params = vec![
            "//java/com/google:one".to_string(),
            "-//java/com/google/...".to_string(),
            String::new(),
            "with space".to_string(),
            "it's".to_string(),
            r#"q"uo\te"#.to_string(),
            r"back\slash".to_string(),
        ];
        let joined = join_params(&params);
        assert_eq!(split_parameters(Some(&joined)), params);
    }
}
