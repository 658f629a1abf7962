use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element whose attributes and children serialize exactly in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<name>text</name>`
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut el = Self::new(name);
        el.children.push(XmlNode::Text(text.into()));
        el
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: XmlElement) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Appends a text node; empty text is dropped so the element can self-close.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(text));
        }
    }

    pub fn push_opt(&mut self, child: Option<XmlElement>) {
        if let Some(child) = child {
            self.push(child);
        }
    }

    pub fn extend(&mut self, children: impl IntoIterator<Item = XmlElement>) {
        self.children
            .extend(children.into_iter().map(XmlNode::Element));
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            let _ = write!(out, " {k}=\"");
            escape_xml_into(out, v);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for c in &self.children {
            match c {
                XmlNode::Element(el) => el.write_into(out),
                XmlNode::Text(t) => escape_xml_into(out, t),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }
}

/// Escapes markup characters and writes anything outside ASCII as a numeric character
/// reference, so the output is valid under the declared ISO-8859-1 encoding.
pub fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        let esc = match ch {
            '&' => Some("&amp;"),
            '<' => Some("&lt;"),
            '>' => Some("&gt;"),
            '"' => Some("&quot;"),
            '\'' => Some("&apos;"),
            _ => None,
        };
        if esc.is_none() && ch.is_ascii() {
            continue;
        }
        if start < i {
            out.push_str(&text[start..i]);
        }
        match esc {
            Some(esc) => out.push_str(esc),
            None => {
                let _ = write!(out, "&#{};", u32::from(ch));
            }
        }
        start = i + ch.len_utf8();
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_elements_self_close() {
        let el = XmlElement::new("PointSymbolizer");
        assert_eq!(el.to_xml_string(), "<PointSymbolizer/>");
    }

    #[test]
    fn attributes_and_children_keep_insertion_order() {
        let el = XmlElement::new("CssParameter")
            .attr("name", "stroke")
            .attr("b", "2");
        let mut root = XmlElement::new("Stroke");
        root.push(el);
        root.push(XmlElement::with_text("x", "1"));
        assert_eq!(
            root.to_xml_string(),
            r#"<Stroke><CssParameter name="stroke" b="2"/><x>1</x></Stroke>"#
        );
    }

    #[test]
    fn escapes_markup_and_non_ascii() {
        let el = XmlElement::with_text("Title", "Roads & <Rails> é").attr("name", "\"q\"");
        assert_eq!(
            el.to_xml_string(),
            r#"<Title name="&quot;q&quot;">Roads &amp; &lt;Rails&gt; &#233;</Title>"#
        );
    }
}
