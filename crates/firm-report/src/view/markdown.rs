//! Markdown to terminal text
//!
//! Covers what the narrative fields use: paragraphs, headings, lists,
//! emphasis, inline code, code blocks and rules. Links render as their text.

use super::format::Palette;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Render markdown as styled terminal text
pub fn render_markdown(source: &str, palette: Palette) -> String {
    let mut writer = Writer::new(palette);
    for event in Parser::new(source) {
        writer.event(event);
    }
    writer.finish()
}

/// Render markdown and indent every line by `indent` spaces
pub fn render_markdown_indented(source: &str, palette: Palette, indent: usize) -> String {
    let pad = " ".repeat(indent);
    render_markdown(source, palette)
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

struct Writer {
    palette: Palette,
    // Innermost styled span last; index 0 is the document
    buffers: Vec<String>,
    // One entry per open list; `Some(n)` is the next ordered number
    lists: Vec<Option<u64>>,
    in_code_block: bool,
}

impl Writer {
    fn new(palette: Palette) -> Self {
        Self {
            palette,
            buffers: vec![String::new()],
            lists: Vec::new(),
            in_code_block: false,
        }
    }

    fn top(&mut self) -> &mut String {
        if self.buffers.is_empty() {
            self.buffers.push(String::new());
        }
        let last = self.buffers.len() - 1;
        &mut self.buffers[last]
    }

    fn push(&mut self, text: &str) {
        self.top().push_str(text);
    }

    fn open_span(&mut self) {
        self.buffers.push(String::new());
    }

    fn close_span(&mut self) -> String {
        if self.buffers.len() > 1 {
            self.buffers.pop().unwrap_or_default()
        } else {
            String::new()
        }
    }

    fn line_start(&mut self) {
        let buf = self.top();
        if !buf.is_empty() && !buf.ends_with('\n') {
            buf.push('\n');
        }
    }

    fn block_break(&mut self) {
        let buf = self.top();
        if buf.is_empty() {
            return;
        }
        if !buf.ends_with('\n') {
            buf.push('\n');
        }
        if !buf.ends_with("\n\n") {
            buf.push('\n');
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    let styled: Vec<String> = text
                        .lines()
                        .map(|line| format!("    {}", self.palette.code(line)))
                        .collect();
                    self.push(&styled.join("\n"));
                    self.push("\n");
                } else {
                    self.push(&text);
                }
            }
            Event::Code(code) => {
                let styled = self.palette.code(&code);
                self.push(&styled);
            }
            Event::SoftBreak => self.push(" "),
            Event::HardBreak => self.push("\n"),
            Event::Rule => {
                self.block_break();
                self.push("────────────────────\n");
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.block_break();
                }
            }
            Tag::Heading { .. } => {
                self.block_break();
                self.open_span();
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.block_break();
                } else {
                    self.line_start();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.line_start();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.push(&format!("{}{marker}", "  ".repeat(depth)));
            }
            Tag::Strong | Tag::Emphasis => self.open_span(),
            Tag::CodeBlock(_) => {
                self.block_break();
                self.in_code_block = true;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.line_start();
                }
            }
            TagEnd::Heading(_) => {
                let text = self.close_span();
                let styled = self.palette.heading(&text);
                self.push(&styled);
                self.push("\n");
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::Item => self.line_start(),
            TagEnd::Strong => {
                let text = self.close_span();
                let styled = self.palette.heading(&text);
                self.push(&styled);
            }
            TagEnd::Emphasis => {
                let text = self.close_span();
                let styled = self.palette.emphasis(&text);
                self.push(&styled);
            }
            TagEnd::CodeBlock => self.in_code_block = false,
            _ => {}
        }
    }

    fn finish(mut self) -> String {
        while self.buffers.len() > 1 {
            let text = self.close_span();
            self.push(&text);
        }
        self.top().trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(source: &str) -> String {
        render_markdown(source, Palette::plain())
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let text = plain("## Overview\nApple remains *highly* profitable.\n\nSecond paragraph.");
        assert_eq!(
            text,
            "Overview\n\nApple remains highly profitable.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_lists() {
        let text = plain("- a\n- **b**\n\n1. one\n2. two");
        assert_eq!(text, "• a\n• b\n\n1. one\n2. two");
    }

    #[test]
    fn test_nested_list() {
        let text = plain("- a\n  - b");
        assert_eq!(text, "• a\n  • b");
    }

    #[test]
    fn test_inline_code_and_breaks() {
        let text = plain("Margin `40%`\nstill flat");
        assert_eq!(text, "Margin 40% still flat");
    }

    #[test]
    fn test_strong_is_styled_with_color() {
        let text = render_markdown("**Revenue**", Palette::new(true));
        assert!(text.contains("Revenue"));
        assert!(text.contains("\u{1b}["));
    }

    #[test]
    fn test_indented() {
        let text = render_markdown_indented("one\n\ntwo", Palette::plain(), 2);
        assert_eq!(text, "  one\n\n  two");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(plain(""), "");
    }
}
