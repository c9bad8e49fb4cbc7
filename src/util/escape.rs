/// Decodes `\n`, `\t` and `\\` in script text. Other backslashes are kept.
pub fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            _ => {
                result.push('\\');
                continue;
            }
        }
        chars.next();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_escapes() {
        assert_eq!(unescape(r"a\nb\tc\\d"), "a\nb\tc\\d");
    }

    #[test]
    fn keeps_unknown_and_trailing_backslashes() {
        assert_eq!(unescape(r"\q"), r"\q");
        assert_eq!(unescape("end\\"), "end\\");
        assert_eq!(unescape(r"\\n"), r"\n");
    }
}
