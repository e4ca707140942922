//! @ai:module:intent Prompt catalog and the single template render routine
//! @ai:module:layer domain
//! @ai:module:public_api PromptVersion, PromptMetadata, PromptFields, render
//! @ai:module:stateless true

mod catalog;

pub use catalog::{PromptMetadata, PromptVersion};

use crate::error::PromptError;

/// Test case fields a template may reference.
#[derive(Debug, Clone, Copy)]
pub struct PromptFields<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub diff_excerpt: &'a str,
}

/// @ai:intent Substitute {title}, {body}, {diff_excerpt} and {max_diff_length} into a template
/// @ai:pre `{{` and `}}` are literal braces
/// @ai:post Err on any other placeholder or on an unbalanced brace
/// @ai:effects pure
pub fn render(
    template: &str,
    fields: &PromptFields<'_>,
    max_diff_length: usize,
) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len() + fields.diff_excerpt.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(idx) = rest.find(['{', '}']) {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        let position = offset + idx;

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
            offset = position + 2;
            continue;
        }
        if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
            offset = position + 2;
            continue;
        }
        if tail.starts_with('}') {
            return Err(PromptError::MalformedTemplate {
                position,
                message: "single '}' encountered".to_string(),
            });
        }

        let close = tail.find('}').ok_or_else(|| PromptError::MalformedTemplate {
            position,
            message: "unclosed '{'".to_string(),
        })?;
        let name = &tail[1..close];
        match name {
            "title" => out.push_str(fields.title),
            "body" => out.push_str(fields.body),
            "diff_excerpt" => out.push_str(fields.diff_excerpt),
            "max_diff_length" => out.push_str(&max_diff_length.to_string()),
            other => return Err(PromptError::UnknownPlaceholder(other.to_string())),
        }
        rest = &tail[close + 1..];
        offset = position + close + 1;
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields() -> PromptFields<'static> {
        PromptFields {
            title: "Add dark mode toggle",
            body: "Implements a dark mode switch in settings",
            diff_excerpt: "+++ b/theme.css",
        }
    }

    #[test]
    fn test_every_template_renders() {
        for version in PromptVersion::ALL {
            let rendered = render(version.template(), &fields(), 8000)
                .unwrap_or_else(|e| panic!("{version} failed: {e}"));

            assert!(rendered.contains("Add dark mode toggle"), "{version}");
            assert!(rendered.contains("+++ b/theme.css"), "{version}");
            assert!(rendered.contains(r#"{"technical": "#), "{version}");
            assert!(!rendered.contains("{title}"), "{version}");
        }
    }

    #[test]
    fn test_default_template_includes_max_diff_length() {
        let rendered = render(PromptVersion::Default.template(), &fields(), 1234).unwrap();
        assert!(rendered.contains("Diff (first 1234 chars): +++ b/theme.css"));
    }

    #[test]
    fn test_render_escapes_and_substitutes() {
        let rendered = render("{{\"t\": \"{title}\"}} {body}", &fields(), 10).unwrap();
        assert_eq!(
            rendered,
            "{\"t\": \"Add dark mode toggle\"} Implements a dark mode switch in settings"
        );
    }

    #[test]
    fn test_substituted_values_are_not_reinterpreted() {
        let f = PromptFields {
            title: "{body}",
            body: "b",
            diff_excerpt: "}",
        };
        assert_eq!(render("{title}|{diff_excerpt}", &f, 1).unwrap(), "{body}|}");
    }

    #[test]
    fn test_unknown_placeholder_fails_loudly() {
        let err = render("Hello {author}", &fields(), 10).unwrap_err();
        assert_eq!(err, PromptError::UnknownPlaceholder("author".to_string()));
    }

    #[test]
    fn test_unbalanced_braces_fail() {
        assert!(matches!(
            render("oops {title", &fields(), 10),
            Err(PromptError::MalformedTemplate { position: 5, .. })
        ));
        assert!(matches!(
            render("oops }", &fields(), 10),
            Err(PromptError::MalformedTemplate { position: 5, .. })
        ));
    }
}
