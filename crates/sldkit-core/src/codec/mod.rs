//! Element-level codecs between the style model and SLD XML.

pub mod filter;
pub mod scale;
pub mod symbolizer;
pub mod transform;
pub mod value;

pub use filter::{decode_filter, encode_filter};
pub use scale::ScaleTable;
pub use symbolizer::{decode_symbolizer, encode_symbolizer};
pub use transform::{decode_transformation, encode_transformation};
pub use value::{decode_value, encode_dimension, encode_value};
