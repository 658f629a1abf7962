//! The closed vocabulary of symbolizer parameters.
//!
//! Keys are hyphenated CSS-like names (`stroke-width`). Graphic parameters may carry a
//! [`GraphicPrefix`]: `mark-` for markers drawn along strokes (`Stroke/GraphicStroke`) and
//! `pattern-` for fill patterns (`Fill/GraphicFill`).
//!
//! Besides parsing and printing keys, this module carries the editor metadata for each key
//! (input format, numeric range, unit options) and the activation predicates that decide which
//! fields an editor shows for a given parameter map.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::ParamValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    WellKnownName,
    Size,
    Rotation,
    Fill,
    FillOpacity,
    Stroke,
    StrokeWidth,
    StrokeOpacity,
    StrokeLinejoin,
    StrokeLinecap,
    StrokeDasharray,
    StrokeDashoffset,
    PerpendicularOffset,
    Label,
    FontFamily,
    FontStyle,
    FontWeight,
    FontSize,
}

impl Param {
    pub const ALL: [Param; 18] = [
        Param::WellKnownName,
        Param::Size,
        Param::Rotation,
        Param::Fill,
        Param::FillOpacity,
        Param::Stroke,
        Param::StrokeWidth,
        Param::StrokeOpacity,
        Param::StrokeLinejoin,
        Param::StrokeLinecap,
        Param::StrokeDasharray,
        Param::StrokeDashoffset,
        Param::PerpendicularOffset,
        Param::Label,
        Param::FontFamily,
        Param::FontStyle,
        Param::FontWeight,
        Param::FontSize,
    ];

    /// `CssParameter` children of `Fill`, in wire order.
    pub const FILL: [Param; 2] = [Param::Fill, Param::FillOpacity];

    /// `CssParameter` children of `Stroke`, in wire order.
    pub const STROKE: [Param; 7] = [
        Param::Stroke,
        Param::StrokeWidth,
        Param::StrokeOpacity,
        Param::StrokeLinejoin,
        Param::StrokeLinecap,
        Param::StrokeDasharray,
        Param::StrokeDashoffset,
    ];

    /// `CssParameter` children of `Font`, in wire order.
    pub const FONT: [Param; 4] = [
        Param::FontFamily,
        Param::FontStyle,
        Param::FontWeight,
        Param::FontSize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::WellKnownName => "wellknownname",
            Param::Size => "size",
            Param::Rotation => "rotation",
            Param::Fill => "fill",
            Param::FillOpacity => "fill-opacity",
            Param::Stroke => "stroke",
            Param::StrokeWidth => "stroke-width",
            Param::StrokeOpacity => "stroke-opacity",
            Param::StrokeLinejoin => "stroke-linejoin",
            Param::StrokeLinecap => "stroke-linecap",
            Param::StrokeDasharray => "stroke-dasharray",
            Param::StrokeDashoffset => "stroke-dashoffset",
            Param::PerpendicularOffset => "perpendicular-offset",
            Param::Label => "label",
            Param::FontFamily => "font-family",
            Param::FontStyle => "font-style",
            Param::FontWeight => "font-weight",
            Param::FontSize => "font-size",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Parameters that can describe a `Graphic/Mark` and may therefore be prefixed.
    pub fn is_graphic(self) -> bool {
        matches!(
            self,
            Param::WellKnownName
                | Param::Size
                | Param::Rotation
                | Param::Fill
                | Param::FillOpacity
                | Param::Stroke
                | Param::StrokeWidth
                | Param::StrokeOpacity
                | Param::StrokeLinejoin
                | Param::StrokeLinecap
                | Param::StrokeDasharray
                | Param::StrokeDashoffset
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum GraphicPrefix {
    #[default]
    None,
    /// Markers repeated along a stroke (`Stroke/GraphicStroke`).
    Mark,
    /// Tiled fill patterns (`Fill/GraphicFill`).
    Pattern,
}

impl GraphicPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            GraphicPrefix::None => "",
            GraphicPrefix::Mark => "mark-",
            GraphicPrefix::Pattern => "pattern-",
        }
    }
}

/// A symbolizer parameter key such as `fill`, `mark-size` or `pattern-stroke-width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamKey {
    pub prefix: GraphicPrefix,
    pub param: Param,
}

impl ParamKey {
    pub const fn plain(param: Param) -> Self {
        Self {
            prefix: GraphicPrefix::None,
            param,
        }
    }

    /// Prefixed key; `None` when the parameter cannot live inside a graphic.
    pub fn prefixed(prefix: GraphicPrefix, param: Param) -> Option<Self> {
        (prefix == GraphicPrefix::None || param.is_graphic()).then_some(Self { prefix, param })
    }

    pub fn parse(name: &str) -> Option<Self> {
        for prefix in [GraphicPrefix::Mark, GraphicPrefix::Pattern] {
            if let Some(rest) = name.strip_prefix(prefix.as_str()) {
                return Self::prefixed(prefix, Param::from_name(rest)?);
            }
        }
        Param::from_name(name).map(Self::plain)
    }

    pub fn spec(self) -> ParamSpec {
        param_spec(self)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix.as_str())?;
        f.write_str(self.param.name())
    }
}

/// Editor input widget for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamFormat {
    Text,
    Color,
    Number,
    Select,
    /// A well-known mark name (`circle`, `square`, `shape://vertline`, ...).
    Mark,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub format: ParamFormat,
    pub range: Option<(f64, f64)>,
    pub options: &'static [&'static str],
    pub base: Option<&'static str>,
    /// Whether the value may be a categorize/interpolate/recode function.
    pub transformation: bool,
}

const UNITS: &[&str] = &["px", "m", "ft"];
const LINEJOINS: &[&str] = &["mitre", "round", "bevel"];
const LINECAPS: &[&str] = &["butt", "round", "square"];

impl ParamSpec {
    const fn of(format: ParamFormat) -> Self {
        Self {
            format,
            range: None,
            options: &[],
            base: None,
            transformation: false,
        }
    }

    const fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    const fn options(mut self, options: &'static [&'static str], base: &'static str) -> Self {
        self.options = options;
        self.base = Some(base);
        self
    }

    const fn transformable(mut self) -> Self {
        self.transformation = true;
        self
    }
}

fn param_spec(key: ParamKey) -> ParamSpec {
    use ParamFormat::*;

    let plain = key.prefix == GraphicPrefix::None;
    match key.param {
        Param::WellKnownName => ParamSpec::of(Mark),
        Param::Size | Param::FontSize => ParamSpec::of(Number).range(0.0, 50.0),
        Param::Rotation => ParamSpec::of(Number).range(-360.0, 360.0),
        Param::Fill | Param::Stroke if plain => ParamSpec::of(Color).transformable(),
        Param::Fill | Param::Stroke => ParamSpec::of(Color),
        Param::FillOpacity | Param::StrokeOpacity if plain => {
            ParamSpec::of(Number).range(0.0, 1.0).transformable()
        }
        Param::FillOpacity | Param::StrokeOpacity => ParamSpec::of(Number).range(0.0, 1.0),
        Param::StrokeWidth if plain => ParamSpec::of(Number)
            .range(0.0, 20.0)
            .options(UNITS, "px")
            .transformable(),
        Param::StrokeWidth => ParamSpec::of(Number).range(0.0, 50.0),
        Param::StrokeLinejoin => ParamSpec::of(Select).options(LINEJOINS, "mitre"),
        Param::StrokeLinecap => ParamSpec::of(Select).options(LINECAPS, "butt"),
        Param::StrokeDasharray if plain => ParamSpec::of(Text).transformable(),
        Param::StrokeDasharray | Param::StrokeDashoffset => ParamSpec::of(Text),
        Param::PerpendicularOffset => ParamSpec::of(Number).range(-100.0, 100.0),
        Param::Label | Param::FontFamily => ParamSpec::of(Text),
        Param::FontStyle => ParamSpec::of(Select).options(&["normal", "italic"], "normal"),
        Param::FontWeight => ParamSpec::of(Select).options(&["normal", "bold"], "normal"),
    }
}

/// Metadata for the symbolizer `z-index` field, which is not a `CssParameter`. Values above
/// `modulus - 1` are clamped when assembling.
pub fn z_index_spec(modulus: u32) -> ParamSpec {
    ParamSpec::of(ParamFormat::Number).range(0.0, f64::from(modulus.saturating_sub(1)))
}

/// Whether an editor should offer `key` given the other parameters already set.
///
/// Plain strokes and `mark-` graphics exclude each other, as do plain fills and `pattern-`
/// graphics; graphic details only apply once a well-known name is chosen.
pub fn is_active(key: ParamKey, params: &BTreeMap<ParamKey, ParamValue>) -> bool {
    let has = |prefix: GraphicPrefix, param: Param| {
        ParamKey::prefixed(prefix, param).is_some_and(|k| params.contains_key(&k))
    };

    match (key.prefix, key.param) {
        (GraphicPrefix::None, Param::Fill | Param::FillOpacity) => {
            !has(GraphicPrefix::Pattern, Param::WellKnownName)
        }
        (GraphicPrefix::None, Param::StrokeDashoffset) => {
            !has(GraphicPrefix::Mark, Param::WellKnownName)
                && has(GraphicPrefix::None, Param::StrokeDasharray)
        }
        (
            GraphicPrefix::None,
            Param::Stroke
            | Param::StrokeWidth
            | Param::StrokeOpacity
            | Param::StrokeLinejoin
            | Param::StrokeLinecap
            | Param::StrokeDasharray
            | Param::PerpendicularOffset,
        ) => !has(GraphicPrefix::Mark, Param::WellKnownName),
        (GraphicPrefix::Mark, Param::WellKnownName) => !has(GraphicPrefix::None, Param::Stroke),
        (GraphicPrefix::Pattern, Param::WellKnownName) => !has(GraphicPrefix::None, Param::Fill),
        (prefix @ (GraphicPrefix::Mark | GraphicPrefix::Pattern), _) => {
            has(prefix, Param::WellKnownName)
        }
        (GraphicPrefix::None, _) => true,
    }
}
