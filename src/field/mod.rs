//! Placeholder substitution.
//!
//! A [`Field`] renders one attribute of a template (its content, its
//! subject, or a synthetic field such as `((phone number))`) against a
//! [`Personalisation`]:
//!
//! - `((name))` is replaced by the value for `name`
//! - `((name??text))` shows `text` when `name` is `true` and nothing otherwise
//! - a placeholder with no value is highlighted, or omitted when redacting
//!
//! # Example
//!
//! ```ignore
//! let values = Personalisation::new().with("name", "Jo");
//! let rendered = Field::new("Hello ((name))", &values)
//!     .html(HtmlMode::Passthrough)
//!     .render();
//! assert_eq!(rendered, "Hello Jo");
//! ```

mod placeholder;

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use crate::formatters::{escape_html, strip_html};
use crate::template::Personalisation;

pub use placeholder::{segments, Placeholder, Segment};

/// How literal content and values are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlMode {
    /// Entity-encode `&`, `<` and `>`
    #[default]
    Escape,
    /// Remove tags, then escape
    Strip,
    /// Leave text as written, for plain-text output
    Passthrough,
}

/// How a placeholder without a value is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `<span class='placeholder'>((name))</span>`
    #[default]
    Highlighted,
    /// `<span class='placeholder-no-brackets'>name</span>`
    NoBrackets,
    /// `((name))`
    Plain,
}

/// One template attribute with its personalisation
#[derive(Debug, Clone)]
pub struct Field<'a> {
    content: &'a str,
    values: &'a Personalisation,
    html: HtmlMode,
    style: PlaceholderStyle,
    markdown_lists: bool,
    redact_missing: bool,
}

impl<'a> Field<'a> {
    pub fn new(content: &'a str, values: &'a Personalisation) -> Self {
        Self {
            content,
            values,
            html: HtmlMode::default(),
            style: PlaceholderStyle::default(),
            markdown_lists: false,
            redact_missing: false,
        }
    }

    pub fn html(mut self, html: HtmlMode) -> Self {
        self.html = html;
        self
    }

    pub fn style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    /// Render list values as markdown bullets rather than prose
    pub fn markdown_lists(mut self, markdown_lists: bool) -> Self {
        self.markdown_lists = markdown_lists;
        self
    }

    pub fn redact_missing(mut self, redact_missing: bool) -> Self {
        self.redact_missing = redact_missing;
        self
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<String> {
        placeholders(self.content)
    }

    /// Occurrences of non-conditional placeholders that have no value,
    /// including those inside conditional text that is shown.
    ///
    /// Always zero when missing personalisation is redacted.
    pub fn unresolved_count(&self) -> usize {
        if self.redact_missing {
            return 0;
        }
        segments(self.content)
            .iter()
            .map(|segment| match segment {
                Segment::Text(_) => 0,
                Segment::Placeholder(placeholder) => self.unresolved_in(placeholder),
            })
            .sum()
    }

    fn unresolved_in(&self, placeholder: &Placeholder<'a>) -> usize {
        let value = self.values.get(placeholder.name());
        match placeholder.conditional_text() {
            Some(text) if value.is_some_and(|value| value.shows_conditional()) => {
                self.nested(text).unresolved_count()
            }
            Some(_) => 0,
            None => usize::from(value.map_or(true, |value| {
                value.as_text().is_none() && value.list_items().is_none()
            })),
        }
    }

    /// Substitute every placeholder.
    ///
    /// Names are looked up as written; only the literal text between
    /// placeholders and the substituted values are sanitised.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.content.len());
        for segment in segments(self.content) {
            match segment {
                Segment::Text(text) => out.push_str(&self.sanitise(text)),
                Segment::Placeholder(placeholder) => {
                    out.push_str(&self.replacement(&placeholder))
                }
            }
        }
        out
    }

    /// Same settings over another piece of text
    fn nested(&self, content: &'a str) -> Field<'a> {
        Field {
            content,
            ..self.clone()
        }
    }

    fn sanitise<'v>(&self, value: &'v str) -> Cow<'v, str> {
        match self.html {
            HtmlMode::Escape => Cow::Owned(escape_html(value)),
            HtmlMode::Strip => Cow::Owned(strip_html(value)),
            HtmlMode::Passthrough => Cow::Borrowed(value),
        }
    }

    fn replacement(&self, placeholder: &Placeholder<'a>) -> String {
        let Some(value) = self.values.get(placeholder.name()) else {
            return self.missing(placeholder);
        };

        if let Some(text) = placeholder.conditional_text() {
            return if value.shows_conditional() {
                self.nested(text).render()
            } else {
                String::new()
            };
        }

        if let Some(items) = value.list_items() {
            return self.sanitise(&self.format_list(&items)).into_owned();
        }

        match value.as_text() {
            Some(text) => self.sanitise(&text).into_owned(),
            None => self.missing(placeholder),
        }
    }

    fn missing(&self, placeholder: &Placeholder) -> String {
        if self.redact_missing || placeholder.is_conditional() {
            return String::new();
        }
        let name = self.sanitise(placeholder.name());
        match self.style {
            PlaceholderStyle::Highlighted => {
                format!("<span class='placeholder'>(({}))</span>", name)
            }
            PlaceholderStyle::NoBrackets => {
                format!("<span class='placeholder-no-brackets'>{}</span>", name)
            }
            PlaceholderStyle::Plain => format!("(({}))", name),
        }
    }

    fn format_list(&self, items: &[String]) -> String {
        if items.is_empty() {
            return String::new();
        }
        if self.markdown_lists {
            let bullets: Vec<String> = items.iter().map(|item| format!("* {}", item)).collect();
            return format!("\n\n{}\n\n", bullets.join("\n"));
        }
        match items {
            [only] => only.clone(),
            [init @ .., last] => format!("{} and {}", init.join(", "), last),
            [] => String::new(),
        }
    }
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Placeholder names in `content`, in order of first appearance, without
/// duplicates. Names inside conditional text follow the condition's name.
pub fn placeholders(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    collect_placeholders(content, &mut seen, &mut names);
    names
}

fn collect_placeholders<'a>(
    content: &'a str,
    seen: &mut HashSet<&'a str>,
    names: &mut Vec<String>,
) {
    for segment in segments(content) {
        let Segment::Placeholder(placeholder) = segment else {
            continue;
        };
        if seen.insert(placeholder.name()) {
            names.push(placeholder.name().to_string());
        }
        if let Some(text) = placeholder.conditional_text() {
            collect_placeholders(text, seen, names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Personalisation {
        Personalisation::new()
    }

    #[test]
    fn test_placeholders_ordered_and_unique() {
        assert_eq!(placeholders("((a)) text ((b)) ((a))"), vec!["a", "b"]);
        assert_eq!(placeholders("((x??shown)) ((x))"), vec!["x"]);
        assert!(placeholders("no placeholders (here)").is_empty());
    }

    #[test]
    fn test_placeholders_include_nested_names() {
        assert_eq!(
            placeholders("((greeting)) ((show?? Dear ((name)) of ((town)).)) ((name))"),
            vec!["greeting", "show", "name", "town"]
        );
    }

    #[test]
    fn test_simple_substitution() {
        let values = Personalisation::new().with("name", "Jo");
        let field = Field::new("Hello ((name))", &values).html(HtmlMode::Passthrough);
        assert_eq!(field.render(), "Hello Jo");
    }

    #[test]
    fn test_missing_placeholder_highlighted() {
        let values = empty();
        let field = Field::new("Hello ((name))", &values);
        assert_eq!(
            field.render(),
            "Hello <span class='placeholder'>((name))</span>"
        );
    }

    #[test]
    fn test_missing_placeholder_redacted() {
        let values = empty();
        let field = Field::new("Hello ((name))", &values).redact_missing(true);
        assert_eq!(field.render(), "Hello ");
    }

    #[test]
    fn test_missing_placeholder_styles() {
        let values = empty();
        let field = Field::new("((phone number))", &values).style(PlaceholderStyle::NoBrackets);
        assert_eq!(
            field.render(),
            "<span class='placeholder-no-brackets'>phone number</span>"
        );
        let field = Field::new("((name))", &values).style(PlaceholderStyle::Plain);
        assert_eq!(field.render(), "((name))");
    }

    #[test]
    fn test_unresolved_count() {
        let values = Personalisation::new().with("known", "x").with("flag", false);
        let field = Field::new("((known)) ((a)) ((a)) ((flag??y)) ((b??z))", &values);
        assert_eq!(field.unresolved_count(), 2);
        assert_eq!(field.redact_missing(true).unresolved_count(), 0);
    }

    #[test]
    fn test_conditional_placeholder() {
        let content = "Hi.((car?? Park on site.))";
        let shown = Personalisation::new().with("car", true);
        let hidden = Personalisation::new().with("car", false);
        let not_bool = Personalisation::new().with("car", "yes");
        let missing = empty();

        assert_eq!(Field::new(content, &shown).render(), "Hi. Park on site.");
        assert_eq!(Field::new(content, &hidden).render(), "Hi.");
        assert_eq!(Field::new(content, &not_bool).render(), "Hi.");
        assert_eq!(Field::new(content, &missing).render(), "Hi.");
    }

    #[test]
    fn test_conditional_text_resolves_nested_placeholders() {
        let content = "Hi.((show?? Dear ((name)).))";
        let shown = Personalisation::new().with("show", true).with("name", "Jo");
        let hidden = Personalisation::new().with("show", false).with("name", "Jo");
        let no_name = Personalisation::new().with("show", true);

        assert_eq!(
            Field::new(content, &shown).html(HtmlMode::Passthrough).render(),
            "Hi. Dear Jo."
        );
        assert_eq!(Field::new(content, &hidden).render(), "Hi.");
        assert_eq!(Field::new(content, &empty()).render(), "Hi.");
        assert_eq!(
            Field::new(content, &no_name).render(),
            "Hi. Dear <span class='placeholder'>((name))</span>."
        );
    }

    #[test]
    fn test_conditional_text_is_sanitised() {
        let values = Personalisation::new().with("show", true).with("name", "<b>Jo</b>");
        let field = Field::new("((show??<i>((name))</i>))", &values);
        assert_eq!(field.render(), "&lt;i&gt;&lt;b&gt;Jo&lt;/b&gt;&lt;/i&gt;");
    }

    #[test]
    fn test_unresolved_count_follows_shown_conditionals() {
        let content = "((show?? ((a)) ((b))))";
        let shown = Personalisation::new().with("show", true).with("a", "x");
        let hidden = Personalisation::new().with("show", false);
        assert_eq!(Field::new(content, &shown).unresolved_count(), 1);
        assert_eq!(Field::new(content, &hidden).unresolved_count(), 0);
    }

    #[test]
    fn test_names_looked_up_as_written_in_every_mode() {
        let values = Personalisation::new().with("a&b", "X");
        for html in [HtmlMode::Escape, HtmlMode::Strip, HtmlMode::Passthrough] {
            assert_eq!(Field::new("((a&b))", &values).html(html).render(), "X", "{:?}", html);
        }
        assert_eq!(
            Field::new("((a&b))", &empty()).render(),
            "<span class='placeholder'>((a&amp;b))</span>"
        );
    }

    #[test]
    fn test_escape_mode_escapes_content_and_values() {
        let values = Personalisation::new().with("name", "<b>Jo</b>");
        let field = Field::new("<i>((name))</i> & co", &values);
        assert_eq!(field.render(), "&lt;i&gt;&lt;b&gt;Jo&lt;/b&gt;&lt;/i&gt; &amp; co");
    }

    #[test]
    fn test_strip_mode() {
        let values = Personalisation::new().with("name", "<b>Jo</b>");
        let field = Field::new("<i>((name))</i>", &values).html(HtmlMode::Strip);
        assert_eq!(field.render(), "Jo");
    }

    #[test]
    fn test_passthrough_keeps_markup() {
        let values = Personalisation::new().with("name", "<b>Jo</b>");
        let field = Field::new("((name)) & co", &values).html(HtmlMode::Passthrough);
        assert_eq!(field.render(), "<b>Jo</b> & co");
    }

    #[test]
    fn test_list_values() {
        let values = Personalisation::new().with("items", vec!["eggs", "", "ham", "jam"]);
        let prose = Field::new("((items))", &values).html(HtmlMode::Passthrough);
        assert_eq!(prose.render(), "eggs, ham and jam");

        let bullets = Field::new("((items))", &values)
            .html(HtmlMode::Passthrough)
            .markdown_lists(true);
        assert_eq!(bullets.render(), "\n\n* eggs\n* ham\n* jam\n\n");

        let empty_list = Personalisation::new().with("items", Vec::<String>::new());
        assert_eq!(Field::new("((items))", &empty_list).render(), "");
    }

    #[test]
    fn test_number_and_bool_values() {
        let values = Personalisation::new().with("count", 3i64).with("flag", true);
        let field = Field::new("((count)) ((flag))", &values).html(HtmlMode::Passthrough);
        assert_eq!(field.render(), "3 true");
    }

    #[test]
    fn test_parentheses_in_placeholder_not_matched() {
        let values = empty();
        let field = Field::new("(((name)))", &values).style(PlaceholderStyle::Plain);
        assert_eq!(field.render(), "(((name)))");
    }
}
