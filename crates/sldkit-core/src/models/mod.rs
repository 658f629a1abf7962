//! The flat, editor-facing style model and its JSON shape.

mod filter;
mod style;
mod symbolizer;
mod value;

pub use filter::{Comparator, FilterGroup, FilterInput, FilterNode, LogicalOperator};
pub use style::{
    Entity, FeatureTypeStyleOptions, FeatureTypeStyleTag, GeneralField, Group, Rule, RuleData,
    ScaleRange,
};
pub use symbolizer::{Symbolizer, SymbolizerKind};
pub use value::{
    Dimension, ParamValue, StyleValue, TransformItem, TransformKind, Transformation, Unit,
};
