//! Minimal XML plumbing: an ordered element builder for output and namespace-tolerant child
//! lookup over `roxmltree` for input.

mod reader;
mod writer;

pub use reader::{child, child_text, children, element_children, function_child, text_of};
pub use writer::{XmlElement, escape_xml_into};

pub const SLD_NS: &str = "http://www.opengis.net/sld";
pub const OGC_NS: &str = "http://www.opengis.net/ogc";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const GML_NS: &str = "http://www.opengis.net/gml";

pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="ISO-8859-1" standalone="no"?>"#;
