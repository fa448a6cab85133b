//! Tiny fixed-pattern highlighter applied to fully typed code.
//!
//! One pass, left to right. A `#` starts a comment that runs to the end of the
//! line; a quote starts a string when the same quote closes it on that line;
//! identifiers are classified against the keyword and function lists. Every
//! other character is copied through escaped.

/// Word lists used to classify identifiers.
#[derive(Clone, Copy, Debug)]
pub struct HighlightRules {
    pub keywords: &'static [&'static str],
    pub functions: &'static [&'static str],
}

pub const KEYWORD_CLASS: &str = "code-keyword";
pub const COMMENT_CLASS: &str = "code-comment";
pub const STRING_CLASS: &str = "code-string";
pub const FUNCTION_CLASS: &str = "code-function";

pub fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_span(out: &mut String, class: &str, chars: &[char]) {
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\">");
    for &c in chars {
        push_escaped(out, c);
    }
    out.push_str("</span>");
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Render `code` as markup with token spans.
pub fn highlight(code: &str, rules: &HighlightRules) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '#' {
            let end = chars[i..]
                .iter()
                .position(|&ch| ch == '\n')
                .map_or(chars.len(), |p| i + p);
            push_span(&mut out, COMMENT_CLASS, &chars[i..end]);
            i = end;
        } else if c == '"' || c == '\'' {
            let close = chars[i + 1..]
                .iter()
                .take_while(|&&ch| ch != '\n')
                .position(|&ch| ch == c);
            match close {
                Some(p) => {
                    let end = i + 1 + p + 1;
                    push_span(&mut out, STRING_CLASS, &chars[i..end]);
                    i = end;
                }
                None => {
                    push_escaped(&mut out, c);
                    i += 1;
                }
            }
        } else if is_ident_start(c) {
            let len = chars[i..]
                .iter()
                .position(|&ch| !is_ident_continue(ch))
                .unwrap_or(chars.len() - i);
            let word: String = chars[i..i + len].iter().collect();
            if rules.keywords.contains(&word.as_str()) {
                push_span(&mut out, KEYWORD_CLASS, &chars[i..i + len]);
            } else if rules.functions.contains(&word.as_str()) {
                push_span(&mut out, FUNCTION_CLASS, &chars[i..i + len]);
            } else {
                out.push_str(&escape_html(&word));
            }
            i += len;
        } else {
            push_escaped(&mut out, c);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: HighlightRules = HighlightRules {
        keywords: &["def", "return", "float", "print"],
        functions: &["calculate_birthday_joy", "result"],
    };

    #[test]
    fn keywords_and_functions() {
        let html = highlight("def calculate_birthday_joy():", &RULES);
        assert_eq!(
            html,
            "<span class=\"code-keyword\">def</span> \
             <span class=\"code-function\">calculate_birthday_joy</span>():"
        );
    }

    #[test]
    fn comment_runs_to_end_of_line_and_wins_over_strings() {
        let html = highlight("# say \"hi\"\nx", &RULES);
        assert_eq!(html, "<span class=\"code-comment\"># say &quot;hi&quot;</span>\nx");
    }

    #[test]
    fn strings_are_not_reclassified() {
        let html = highlight("print(\"def result\")", &RULES);
        assert_eq!(
            html,
            "<span class=\"code-keyword\">print</span>(\
             <span class=\"code-string\">&quot;def result&quot;</span>)"
        );
    }

    #[test]
    fn unterminated_quote_is_plain() {
        assert_eq!(highlight("it's\n", &RULES), "it&#39;s\n");
    }

    #[test]
    fn identifiers_match_whole_words_only() {
        assert_eq!(highlight("results printer", &RULES), "results printer");
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(highlight("a < b && c", &RULES), "a &lt; b &amp;&amp; c");
    }
}
