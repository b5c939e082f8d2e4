//! Message rendering for the formatted logging methods

use std::fmt::{self, Write as _};

/// Render `template` with `args`.
///
/// - no args: the template verbatim, placeholders included;
/// - empty template: the args' `Display` forms concatenated;
/// - otherwise each `{}` takes the next arg. `{{` and `}}` are literal
///   braces. A `{}` with no arg left stays as is, and leftover args are
///   appended, each preceded by a space.
pub fn render_message(template: &str, args: &[&dyn fmt::Display]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len() + args.len() * 8);
    if template.is_empty() {
        for arg in args {
            let _ = write!(out, "{}", arg);
        }
        return out;
    }

    let mut pending = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        match (c, next) {
            ('{', Some('{')) => {
                chars.next();
                out.push('{');
            }
            ('}', Some('}')) => {
                chars.next();
                out.push('}');
            }
            ('{', Some('}')) => {
                chars.next();
                match pending.next() {
                    Some(arg) => {
                        let _ = write!(out, "{}", arg);
                    }
                    None => out.push_str("{}"),
                }
            }
            (other, _) => out.push(other),
        }
    }

    for arg in pending {
        let _ = write!(out, " {}", arg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_is_verbatim() {
        assert_eq!(render_message("disk {} full", &[]), "disk {} full");
    }

    #[test]
    fn test_empty_template_concatenates() {
        assert_eq!(render_message("", &[&"a", &1, &'b']), "a1b");
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(
            render_message("user {} bought {} items", &[&"ann", &3]),
            "user ann bought 3 items"
        );
    }

    #[test]
    fn test_escapes_and_missing_args() {
        assert_eq!(render_message("{{{}}} and {}", &[&7]), "{7} and {}");
    }

    #[test]
    fn test_surplus_args_are_appended() {
        assert_eq!(render_message("got {}", &[&1, &2, &"three"]), "got 1 2 three");
    }
}
