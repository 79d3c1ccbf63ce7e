use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Plain-text rendering of an answer fragment for terminal display.
///
/// Block elements start new lines, list items get a `- ` bullet and runs of
/// whitespace collapse to one space.
pub fn fragment_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut ctx = TextContext::default();
    for child in fragment.root_element().children() {
        visit_node(child, &mut ctx);
    }
    ctx.builder.trim().to_string()
}

fn visit_node(node: NodeRef<'_, Node>, ctx: &mut TextContext) {
    match node.value() {
        Node::Text(text) => ctx.append_text(text),
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                visit_element(element, ctx);
            }
        }
        _ => {
            for child in node.children() {
                visit_node(child, ctx);
            }
        }
    }
}

fn visit_element(element: ElementRef<'_>, ctx: &mut TextContext) {
    match element.value().name() {
        "br" => ctx.ensure_newline(),
        "li" => {
            ctx.ensure_newline();
            ctx.append_text("- ");
            visit_children(element, ctx);
            ctx.ensure_newline();
        }
        "p" | "div" | "section" | "article" | "header" | "footer" | "ul" | "ol" | "table"
        | "tr" | "blockquote" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "pre" => {
            ctx.ensure_newline();
            visit_children(element, ctx);
            ctx.ensure_newline();
        }
        "script" | "style" | "template" => {}
        _ => visit_children(element, ctx),
    }
}

fn visit_children(element: ElementRef<'_>, ctx: &mut TextContext) {
    for child in element.children() {
        visit_node(child, ctx);
    }
}

#[derive(Default)]
struct TextContext {
    builder: String,
    last_char: Option<char>,
}

impl TextContext {
    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if matches!(self.last_char, None | Some(' ') | Some('\n')) {
                    continue;
                }
                self.push_char(' ');
            } else {
                self.push_char(ch);
            }
        }
    }

    fn ensure_newline(&mut self) {
        if self.builder.is_empty() || self.last_char == Some('\n') {
            return;
        }
        if self.last_char == Some(' ') {
            self.builder.pop();
        }
        self.push_char('\n');
    }

    fn push_char(&mut self, ch: char) {
        self.builder.push(ch);
        self.last_char = Some(ch);
    }
}
