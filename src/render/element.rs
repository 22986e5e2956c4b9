use crate::utils::escape_html;

const VOID_TAGS: &[&str] = &["input", "br", "meta", "link"];

/// A minimal HTML element tree: enough for tables, captions and inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
    /// Rendered as `style="display: none"`.
    pub hidden: bool,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        if !id.is_empty() {
            self.id = Some(id.to_string());
        }
        self
    }

    pub fn add_class(&mut self, class: &str) {
        let class = class.trim();
        if class.is_empty() || self.has_class(class) {
            return;
        }
        self.classes.push(class.to_string());
    }

    /// Adds every class of a space-separated class attribute value.
    pub fn add_classes(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if let Some(id) = self.id.as_deref() {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        for (k, v) in &self.attrs {
            push_attr(out, k, v);
        }
        if self.hidden {
            push_attr(out, "style", "display: none");
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        if let Some(text) = self.text.as_deref() {
            out.push_str(&escape_html(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html(value));
    out.push('"');
}
