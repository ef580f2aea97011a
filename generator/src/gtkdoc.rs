//! Transcodes gtk-doc markup into text suitable for Swift doc comments.
//!
//! This is a self-contained line/word state machine; every emitter consumes
//! it through [`transcode`].

/// Converts one gtk-doc text block. Code fences (`|[` … `]|`) become Swift
/// fenced code blocks; inside them, markup is left untouched.
pub fn transcode(native: &str) -> String {
    let mut out = String::with_capacity(native.len());
    let mut in_code = false;

    for (index, line) in native.lines().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let trimmed = line.trim_start();
        if trimmed.starts_with("|[") {
            in_code = true;
            out.push_str("```");
            continue;
        }
        if trimmed.starts_with("]|") {
            in_code = false;
            out.push_str("```");
            continue;
        }
        if in_code {
            out.push_str(line);
        } else {
            out.push_str(&transcode_line(line));
        }
    }
    out
}

fn transcode_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut word = String::new();
    for c in line.chars() {
        if c.is_whitespace() {
            push_word(&mut out, &word);
            word.clear();
            out.push(c);
        } else {
            word.push(c);
        }
    }
    push_word(&mut out, &word);
    out
}

fn push_word(out: &mut String, word: &str) {
    if word.is_empty() {
        return;
    }
    // Trailing punctuation stays outside the markup span.
    let trailing: String = word
        .chars()
        .rev()
        .take_while(|c| matches!(c, '.' | ',' | ';' | ':' | ')' | '?' | '!'))
        .collect();
    let core = &word[..word.len() - trailing.len()];
    let trailing: String = trailing.chars().rev().collect();

    match core.chars().next() {
        Some('%') => match &core[1..] {
            "TRUE" => out.push_str("`true`"),
            "FALSE" => out.push_str("`false`"),
            "NULL" => out.push_str("`nil`"),
            rest => {
                out.push('`');
                out.push_str(rest);
                out.push('`');
            }
        },
        Some('#') | Some('@') if core.len() > 1 => {
            out.push('`');
            out.push_str(&core[1..]);
            out.push('`');
        }
        _ if core.ends_with("()") && core.len() > 2 => {
            out.push('`');
            out.push_str(core);
            out.push('`');
        }
        _ => out.push_str(core),
    }
    out.push_str(&trailing);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_become_code_spans() {
        assert_eq!(transcode("Returns %TRUE on success."), "Returns `true` on success.");
        assert_eq!(transcode("May be %NULL."), "May be `nil`.");
    }

    #[test]
    fn type_and_parameter_markers_are_stripped() {
        assert_eq!(
            transcode("A #GtkWindow owned by @widget."),
            "A `GtkWindow` owned by `widget`."
        );
    }

    #[test]
    fn function_references_keep_their_parentheses() {
        assert_eq!(
            transcode("Call gtk_init() first."),
            "Call `gtk_init()` first."
        );
    }

    #[test]
    fn code_blocks_pass_through_untouched() {
        let native = "Before\n|[<!-- language=\"C\" -->\ngtk_init (%NULL);\n]|\nAfter";
        let expected = "Before\n```\ngtk_init (%NULL);\n```\nAfter";
        assert_eq!(transcode(native), expected);
    }
}
