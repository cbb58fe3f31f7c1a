use std::collections::{HashMap, HashSet};

use course_core::model::{Topic, TopicBody};

/// Rendered topic body, ready for the content pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicBodyVm {
    /// Sanitized HTML produced from markdown notes.
    Html(String),
    /// Theory text shown as-is.
    Plain(String),
    Empty,
}

#[must_use]
pub fn topic_body(topic: &Topic) -> TopicBodyVm {
    match topic.body() {
        TopicBody::Notes(markdown) => TopicBodyVm::Html(markdown_to_html(markdown)),
        TopicBody::Theory(text) => TopicBodyVm::Plain(text.trim().to_owned()),
        TopicBody::Empty => TopicBodyVm::Empty,
    }
}

#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);
    options.insert(pulldown_cmark::Options::ENABLE_TASKLISTS);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "hr", "em", "strong", "b", "i", "del", "code", "pre",
        "blockquote", "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "h5", "h6", "table",
        "thead", "tbody", "tr", "th", "td", "input",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href", "title"].into_iter().collect());
    attributes.insert("code", ["class"].into_iter().collect());
    attributes.insert("input", ["type", "checked", "disabled"].into_iter().collect());
    attributes.insert("th", ["style"].into_iter().collect());
    attributes.insert("td", ["style"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}
