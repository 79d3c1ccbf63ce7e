use ego_tree::NodeId;
use html5ever::{ns, LocalName, QualName};
use scraper::node::{Attributes, Node};
use scraper::{Html, Selector, StrTendril};

/// Class added to every anchor of a finalized answer.
pub const RESULT_LINK_CLASS: &str = "result_link";

const LINK_TARGET: &str = "_blank";
const LINK_REL: &str = "noopener noreferrer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLink {
    pub href: String,
    pub text: Option<String>,
}

/// Rewrites every `<a>` of an answer fragment so it opens in a new tab
/// without handing the opener to the target page.
///
/// Existing classes are kept and `result_link` is appended; any previous
/// `target` and `rel` are replaced. The fragment is written back through the
/// html5ever serializer.
pub fn harden_result_links(html: &str) -> String {
    let mut fragment = Html::parse_fragment(html);
    let anchors: Vec<NodeId> = fragment
        .tree
        .nodes()
        .filter(|node| node.value().as_element().is_some_and(|element| element.name() == "a"))
        .map(|node| node.id())
        .collect();
    for id in anchors {
        if let Some(mut node) = fragment.tree.get_mut(id) {
            if let Node::Element(element) = node.value() {
                harden_anchor(&mut element.attrs);
            }
        }
    }
    fragment.root_element().inner_html()
}

/// Lists the anchors of an answer fragment in document order.
pub fn collect_result_links(html: &str) -> Vec<ResultLink> {
    let fragment = Html::parse_fragment(html);
    let Some(selector) = Selector::parse("a[href]").ok() else {
        return Vec::new();
    };
    fragment
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            let text = anchor.text().collect::<String>();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            Some(ResultLink {
                href: href.to_string(),
                text: (!text.is_empty()).then_some(text),
            })
        })
        .collect()
}

fn harden_anchor(attrs: &mut Attributes) {
    let mut classes: Vec<String> = Vec::new();
    attrs.retain(|(name, value)| {
        if name.ns != ns!() {
            return true;
        }
        match &*name.local {
            "class" => {
                classes.extend(value.split_whitespace().map(str::to_string));
                false
            }
            "target" | "rel" => false,
            _ => true,
        }
    });
    if !classes.iter().any(|class| class == RESULT_LINK_CLASS) {
        classes.push(RESULT_LINK_CLASS.to_string());
    }
    attrs.push((plain_attribute("class"), StrTendril::from_slice(&classes.join(" "))));
    attrs.push((plain_attribute("target"), StrTendril::from_slice(LINK_TARGET)));
    attrs.push((plain_attribute("rel"), StrTendril::from_slice(LINK_REL)));
}

fn plain_attribute(name: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(name))
}
