//! Parameter-list scanning.
//!
//! A tiny bracket-aware scanner: it tracks nesting of `()`, `[]`, `{}` and
//! generic `<>` and skips over string literals and comments, which is enough
//! to find the end of a parameter list and split it on top-level commas.

use crate::model::Param;

/// Scanner state over a byte slice.
struct Depth {
    round: usize,
    square: usize,
    curly: usize,
    angle: usize,
}

impl Depth {
    fn new() -> Self {
        Self {
            round: 0,
            square: 0,
            curly: 0,
            angle: 0,
        }
    }

    fn top_level(&self) -> bool {
        self.round == 0 && self.square == 0 && self.curly == 0 && self.angle == 0
    }
}

/// Returns the index of the `)` matching the `(` at `open`.
///
/// `None` if `open` is not a `(` or the list never closes.
pub(crate) fn find_closing_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if let Some(end) = skip_comment(bytes, i) {
            i = end + 1;
            continue;
        }
        match bytes[i] {
            b'\'' | b'"' | b'`' => i = skip_string(bytes, i)?,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the closing quote for the literal opened at `start`.
fn skip_string(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            c if c == quote => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the last byte of a `//` or `/* */` comment starting at `start`.
///
/// `None` if no comment starts there. An unterminated comment runs to the end.
fn skip_comment(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'/') {
        return None;
    }
    let body = start + 2;
    match bytes.get(start + 1) {
        Some(b'/') => Some(
            bytes[body.min(bytes.len())..]
                .iter()
                .position(|&c| c == b'\n')
                .map_or(bytes.len() - 1, |n| body + n - 1),
        ),
        Some(b'*') => Some(
            bytes[body.min(bytes.len())..]
                .windows(2)
                .position(|w| w == b"*/")
                .map_or(bytes.len() - 1, |n| body + n + 1),
        ),
        _ => None,
    }
}

/// `text` with every comment replaced by a single space.
fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(end) = skip_comment(bytes, i) {
            out.push_str(&text[copied..i]);
            out.push(' ');
            i = end + 1;
            copied = i;
            continue;
        }
        if matches!(bytes[i], b'\'' | b'"' | b'`') {
            i = skip_string(bytes, i).unwrap_or(bytes.len() - 1);
        }
        i += 1;
    }
    out.push_str(&text[copied.min(text.len())..]);
    out
}

/// Splits `list` on commas that are not nested inside brackets or strings.
pub(crate) fn split_top_level(list: &str) -> Vec<&str> {
    let bytes = list.as_bytes();
    let mut depth = Depth::new();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(end) = skip_comment(bytes, i) {
            i = end + 1;
            continue;
        }
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                i = skip_string(bytes, i).unwrap_or(bytes.len() - 1);
            }
            b'(' => depth.round += 1,
            b')' => depth.round = depth.round.saturating_sub(1),
            b'[' => depth.square += 1,
            b']' => depth.square = depth.square.saturating_sub(1),
            b'{' => depth.curly += 1,
            b'}' => depth.curly = depth.curly.saturating_sub(1),
            b'<' => depth.angle += 1,
            // `=>` inside a default value is not a closing generic.
            b'>' if i > 0 && bytes[i - 1] != b'=' => {
                depth.angle = depth.angle.saturating_sub(1);
            }
            b',' if depth.top_level() => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&list[start..]);
    parts
}

/// Position of the first top-level occurrence of any byte in `needles`.
fn find_top_level(text: &str, needles: &[u8]) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = Depth::new();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(end) = skip_comment(bytes, i) {
            i = end + 1;
            continue;
        }
        let c = bytes[i];
        if depth.top_level() && needles.contains(&c) {
            // `=>` in a type such as `(x: number) => void` is not a default.
            if !(c == b'=' && bytes.get(i + 1) == Some(&b'>')) {
                return Some(i);
            }
        }
        match c {
            b'\'' | b'"' | b'`' => i = skip_string(bytes, i).unwrap_or(bytes.len() - 1),
            b'(' => depth.round += 1,
            b')' => depth.round = depth.round.saturating_sub(1),
            b'[' => depth.square += 1,
            b']' => depth.square = depth.square.saturating_sub(1),
            b'{' => depth.curly += 1,
            b'}' => depth.curly = depth.curly.saturating_sub(1),
            b'<' => depth.angle += 1,
            b'>' if i > 0 && bytes[i - 1] != b'=' => {
                depth.angle = depth.angle.saturating_sub(1);
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Parses the text between a declaration's parentheses.
///
/// Each parameter's name is whatever precedes its first top-level `:` or `=`,
/// with rest (`...`) and optional (`?`) markers removed. Destructured
/// parameters have no single name and are bound positionally as `argN`.
/// Comments are ignored.
pub(crate) fn parse_params(list: &str) -> Vec<Param> {
    let list = strip_comments(list);
    if list.trim().is_empty() {
        return Vec::new();
    }

    let mut params = Vec::new();
    for raw in split_top_level(&list) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let name_end = find_top_level(raw, b":=").unwrap_or(raw.len());
        let name = raw[..name_end]
            .trim()
            .trim_start_matches("...")
            .trim_end_matches('?')
            .trim();

        let hint = if raw.as_bytes().get(name_end) == Some(&b':') {
            let rest = &raw[name_end + 1..];
            let hint_end = find_top_level(rest, b"=").unwrap_or(rest.len());
            Some(rest[..hint_end].trim().to_string()).filter(|h| !h.is_empty())
        } else {
            None
        };

        let name = if is_identifier(name) {
            name.to_string()
        } else {
            format!("arg{}", params.len() + 1)
        };
        params.push(Param { name, hint });
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_paren_respects_nesting_and_strings() {
        let text = "f(a = g(1), b = ')') {";
        assert_eq!(find_closing_paren(text, 1), Some(19));
    }

    #[test]
    fn unbalanced_list_has_no_close() {
        assert_eq!(find_closing_paren("f(a, b", 1), None);
        assert_eq!(find_closing_paren("f a", 1), None);
    }

    #[test]
    fn splits_only_top_level_commas() {
        let parts = split_top_level("a: Map<string, number>, b: [x, y], c = { k: 1, j: 2 }");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].trim(), "a: Map<string, number>");
        assert_eq!(parts[2].trim(), "c = { k: 1, j: 2 }");
    }

    #[test]
    fn arrow_in_default_value_does_not_close_generic() {
        let parts = split_top_level("cb = () => 1, n: number");
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn names_and_hints() {
        let params = parse_params("a: number, b?: string, c = 3, ...rest: unknown[]");
        assert_eq!(
            params,
            vec![
                Param::hinted("a", "number"),
                Param::hinted("b", "string"),
                Param::named("c"),
                Param::hinted("rest", "unknown[]"),
            ]
        );
    }

    #[test]
    fn hint_stops_at_default_value() {
        let params = parse_params("flag: boolean = false");
        assert_eq!(params, vec![Param::hinted("flag", "boolean")]);
    }

    #[test]
    fn function_typed_hint_keeps_arrow() {
        let params = parse_params("cb: (x: number) => void");
        assert_eq!(params, vec![Param::hinted("cb", "(x: number) => void")]);
    }

    #[test]
    fn destructured_params_bind_positionally() {
        let params = parse_params("{ a, b }: Props, c: string");
        assert_eq!(params[0].name, "arg1");
        assert_eq!(params[0].hint.as_deref(), Some("Props"));
        assert_eq!(params[1].name, "c");
    }

    #[test]
    fn quotes_and_parens_in_comments_are_ignored() {
        let text = "f(\n  times: number, // don't go negative\n  delay: number,\n) {}";
        assert_eq!(find_closing_paren(text, 1), Some(text.len() - 4));

        let text = "f(ms: number /* wait (ms */) => ms";
        assert_eq!(find_closing_paren(text, 1), Some(27));
    }

    #[test]
    fn commented_params_keep_their_names() {
        let params = parse_params("\n  times: number, // don't go negative\n  delay: number,\n");
        let expected = vec![Param::hinted("times", "number"), Param::hinted("delay", "number")];
        assert_eq!(params, expected);

        let params = parse_params("/* first */ a: string, b /* no hint */");
        assert_eq!(params, vec![Param::hinted("a", "string"), Param::named("b")]);
    }

    #[test]
    fn comment_markers_inside_strings_stay() {
        let params = parse_params("url = 'http://x', n: number");
        assert_eq!(params, vec![Param::named("url"), Param::hinted("n", "number")]);
    }

    #[test]
    fn unterminated_comment_runs_to_end() {
        assert_eq!(find_closing_paren("f(a /* )", 1), None);
        assert_eq!(strip_comments("a // tail"), "a  ");
    }

    #[test]
    fn empty_list() {
        assert!(parse_params("   ").is_empty());
        assert!(parse_params("a,").len() == 1);
    }
}
