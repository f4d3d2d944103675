//! Notify-flavoured markdown for email bodies.
//!
//! Supports the small block grammar email templates use:
//!
//! | Syntax | Block |
//! |--------|-------|
//! | `# Title` | heading |
//! | `* item`, `- item`, `• item` | bullet list |
//! | `1. item` | numbered list |
//! | `^ text` | inset text |
//! | `---`, `***` | horizontal rule |
//! | anything else | paragraph, single newlines kept as line breaks |
//!
//! Input is expected to be normalised already (see
//! [`crate::formatters::normalise_lines`]) and, for HTML output, escaped.

const PARAGRAPH_STYLE: &str = "Margin: 0 0 20px 0; font-size: 19px; line-height: 25px; color: #0B0C0C;";
const HEADING_STYLE: &str = "Margin: 0 0 20px 0; padding: 0; font-size: 27px; line-height: 35px; font-weight: bold; color: #0B0C0C;";
const LIST_ITEM_STYLE: &str = "Margin: 5px 0 5px; padding: 0 0 0 5px; font-size: 19px; line-height: 25px; color: #0B0C0C;";
const INSET_STYLE: &str = "Margin: 0 0 20px 0; border-left: 10px solid #B1B4B6; padding: 15px 0 0.1px 15px; font-size: 19px; line-height: 25px;";
const RULE_STYLE: &str = "border: 0; height: 1px; background: #B1B4B6; Margin: 30px 0 30px 0;";

const PLAIN_TEXT_RULE_WIDTH: usize = 65;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Heading(String),
    Paragraph(Vec<String>),
    List { ordered: bool, items: Vec<String> },
    Inset(Vec<String>),
    Rule,
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3
        && (line.chars().all(|c| c == '-')
            || line.chars().all(|c| c == '*')
            || line.chars().all(|c| c == '_'))
}

fn bullet_item(line: &str) -> Option<&str> {
    ["* ", "- ", "• "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
}

fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ").map(str::trim)
}

fn heading(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    line[hashes..].strip_prefix(' ').map(str::trim)
}

fn parse(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            blocks.extend(current.take());
            continue;
        }

        if is_rule(line) {
            blocks.extend(current.take());
            blocks.push(Block::Rule);
            continue;
        }

        if let Some(title) = heading(line) {
            blocks.extend(current.take());
            blocks.push(Block::Heading(title.to_string()));
            continue;
        }

        let list_item = bullet_item(line)
            .map(|item| (false, item))
            .or_else(|| numbered_item(line).map(|item| (true, item)));
        if let Some((ordered, item)) = list_item {
            match current.as_mut() {
                Some(Block::List {
                    ordered: same,
                    items,
                }) if *same == ordered => items.push(item.to_string()),
                _ => {
                    blocks.extend(current.take());
                    current = Some(Block::List {
                        ordered,
                        items: vec![item.to_string()],
                    });
                }
            }
            continue;
        }

        if let Some(inset) = line.strip_prefix('^') {
            blocks.extend(current.take());
            current = Some(Block::Inset(vec![inset.trim().to_string()]));
            continue;
        }

        match current.as_mut() {
            Some(Block::Paragraph(lines)) | Some(Block::Inset(lines)) => {
                lines.push(line.to_string())
            }
            Some(Block::List { items, .. }) => {
                if let Some(last) = items.last_mut() {
                    last.push(' ');
                    last.push_str(line);
                }
            }
            _ => {
                blocks.extend(current.take());
                current = Some(Block::Paragraph(vec![line.to_string()]));
            }
        }
    }

    blocks.extend(current);
    blocks
}

fn paragraph_html(lines: &[String]) -> String {
    format!(
        "<p style=\"{}\">{}</p>",
        PARAGRAPH_STYLE,
        lines.join("<br />")
    )
}

/// Render email markdown to inline-styled HTML
pub fn email_html(text: &str) -> String {
    parse(text)
        .iter()
        .map(|block| match block {
            Block::Heading(title) => format!("<h2 style=\"{}\">{}</h2>", HEADING_STYLE, title),
            Block::Paragraph(lines) => paragraph_html(lines),
            Block::List { ordered, items } => {
                let (tag, list_style) = if *ordered {
                    ("ol", "decimal")
                } else {
                    ("ul", "disc")
                };
                let items: String = items
                    .iter()
                    .map(|item| format!("<li style=\"{}\">{}</li>", LIST_ITEM_STYLE, item))
                    .collect();
                format!(
                    "<table role=\"presentation\" style=\"padding: 0 0 20px 0;\"><tr><td style=\"font-family: Helvetica, Arial, sans-serif;\"><{tag} style=\"Margin: 0 0 0 20px; padding: 0; list-style-type: {list_style};\">{items}</{tag}></td></tr></table>"
                )
            }
            Block::Inset(lines) => format!(
                "<blockquote style=\"{}\">{}</blockquote>",
                INSET_STYLE,
                paragraph_html(lines)
            ),
            Block::Rule => format!("<hr style=\"{}\">", RULE_STYLE),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render email markdown to plain text
pub fn email_plain_text(text: &str) -> String {
    parse(text)
        .iter()
        .map(|block| match block {
            Block::Heading(title) => format!("{}\n{}", title, "-".repeat(PLAIN_TEXT_RULE_WIDTH)),
            Block::Paragraph(lines) | Block::Inset(lines) => lines.join("\n"),
            Block::List { ordered, items } => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    if *ordered {
                        format!("{}. {}", index + 1, item)
                    } else {
                        format!("• {}", item)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Rule => "=".repeat(PLAIN_TEXT_RULE_WIDTH),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
