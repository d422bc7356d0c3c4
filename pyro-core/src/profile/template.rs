//! Text templates with `{name}` placeholders
//!
//! A [`Template`] keeps the text it was built from and the text it last
//! rendered side by side, so every render starts from the original.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// A template string and its most recent rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    rendered: String,
}

impl Template {
    /// Create a template; until first rendered, the text is the template itself
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            rendered: source.clone(),
            source,
        }
    }

    /// The original template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The most recently rendered text
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Render the template with `vars` and keep the result
    pub fn render<K, V>(&mut self, vars: &HashMap<K, V>) -> &str
    where
        K: Borrow<str> + Hash + Eq,
        V: Display,
    {
        self.rendered = render(&self.source, |name| vars.get(name).map(ToString::to_string));
        &self.rendered
    }

    /// Replace the rendered text without touching the template
    pub fn set_rendered(&mut self, text: impl Into<String>) {
        self.rendered = text.into();
    }

    /// Placeholder names in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for segment in parse(&self.source) {
            if let Segment::Placeholder(name) = segment {
                names.push(name);
            }
        }
        names
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal runs and placeholders.
///
/// `{{` and `}}` are escapes for literal braces. An unterminated `{` is
/// kept as literal text.
fn parse(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while !rest.is_empty() {
        let Some(pos) = rest.find(['{', '}']) else {
            segments.push(Segment::Literal(rest));
            break;
        };
        if pos > 0 {
            segments.push(Segment::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            segments.push(Segment::Literal("{"));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            segments.push(Segment::Literal("}"));
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            segments.push(Segment::Literal("}"));
            rest = &tail[1..];
        } else {
            match tail[1..].find(['{', '}']) {
                Some(end) if tail.as_bytes()[end + 1] == b'}' => {
                    segments.push(Segment::Placeholder(&tail[1..end + 1]));
                    rest = &tail[end + 2..];
                }
                _ => {
                    segments.push(Segment::Literal("{"));
                    rest = &tail[1..];
                }
            }
        }
    }

    segments
}

/// Render `template`, substituting each placeholder with `lookup(name)`.
///
/// Placeholders without a value are left as written.
pub fn render(template: &str, mut lookup: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    for segment in parse(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => match lookup(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let mut template = Template::new("cpu={cpu}% ram={ram}%");
        let text = template.render(&vars(&[("cpu", "12"), ("ram", "40")]));
        assert_eq!(text, "cpu=12% ram=40%");
    }

    #[test]
    fn test_render_always_starts_from_source() {
        let mut template = Template::new("cpu={cpu}%");

        template.render(&vars(&[("cpu", "10")]));
        assert_eq!(template.rendered(), "cpu=10%");

        template.render(&vars(&[("cpu", "55")]));
        assert_eq!(template.rendered(), "cpu=55%");
        assert_eq!(template.source(), "cpu={cpu}%");
    }

    #[test]
    fn test_unknown_placeholders_kept() {
        let mut template = Template::new("{known} and {unknown}");
        template.render(&vars(&[("known", "yes")]));
        assert_eq!(template.rendered(), "yes and {unknown}");
    }

    #[test]
    fn test_brace_escapes() {
        let mut template = Template::new("{{literal}} {x}}}");
        template.render(&vars(&[("x", "1")]));
        assert_eq!(template.rendered(), "{literal} 1}");
    }

    #[test]
    fn test_unterminated_brace_is_literal() {
        assert_eq!(render("50% {cpu", |_| Some("x".into())), "50% {cpu");
        assert_eq!(render("a { b {c}", |_| Some("x".into())), "a { b x");
        assert_eq!(render("lonely }", |_| None), "lonely }");
    }

    #[test]
    fn test_numeric_values() {
        let mut template = Template::new("{cpu}");
        let values: HashMap<String, f64> = [("cpu".to_string(), 12.5)].into_iter().collect();
        assert_eq!(template.render(&values), "12.5");
    }

    #[test]
    fn test_new_template_renders_as_itself() {
        let template = Template::new("cpu={cpu}%");
        assert_eq!(template.rendered(), template.source());
    }

    #[test]
    fn test_placeholders_listed_in_order() {
        let template = Template::new("{a} {{b}} {c}");
        assert_eq!(template.placeholders(), vec!["a", "c"]);
    }

    #[test]
    fn test_set_rendered_keeps_source() {
        let mut template = Template::new("{x}");
        template.set_rendered("manual");
        assert_eq!(template.rendered(), "manual");
        assert_eq!(template.source(), "{x}");
    }
}
