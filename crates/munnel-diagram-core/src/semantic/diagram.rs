//! Core diagram structure types.
//!
//! - [`Diagram`] - The root diagram type with title, scope, and layout options
//! - [`Scope`] - Ordered container for diagram elements
//! - [`Direction`] - Rank direction handed to the layout engine
//! - [`CurveStyle`] - How edges are routed

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{color::Color, semantic::element::Element};

/// An ordered sequence of diagram elements.
///
/// The top level of a diagram and the inside of every cluster are scopes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    elements: Vec<Element>,
}

impl Scope {
    /// Create a new Scope from a list of elements.
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Borrow the elements contained in this scope.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// Rank direction of the laid out graph.
///
/// The names match Graphviz `rankdir` values and external configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    /// Left to right (default)
    #[default]
    LR,
    /// Right to left
    RL,
    /// Top to bottom
    TB,
    /// Bottom to top
    BT,
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LR" => Ok(Self::LR),
            "RL" => Ok(Self::RL),
            "TB" => Ok(Self::TB),
            "BT" => Ok(Self::BT),
            _ => Err("Unsupported direction"),
        }
    }
}

impl From<Direction> for &'static str {
    fn from(val: Direction) -> Self {
        match val {
            Direction::LR => "LR",
            Direction::RL => "RL",
            Direction::TB => "TB",
            Direction::BT => "BT",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Edge routing style, mapped onto the Graphviz `splines` attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveStyle {
    /// Axis-aligned segments (default)
    #[default]
    Ortho,
    /// Curved edges
    Curved,
    /// Straight polyline segments
    Polyline,
    /// Smooth splines routed around nodes
    Spline,
}

impl FromStr for CurveStyle {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ortho" => Ok(Self::Ortho),
            "curved" => Ok(Self::Curved),
            "polyline" => Ok(Self::Polyline),
            "spline" => Ok(Self::Spline),
            _ => Err("Unsupported curve style"),
        }
    }
}

impl From<CurveStyle> for &'static str {
    fn from(val: CurveStyle) -> Self {
        match val {
            CurveStyle::Ortho => "ortho",
            CurveStyle::Curved => "curved",
            CurveStyle::Polyline => "polyline",
            CurveStyle::Spline => "spline",
        }
    }
}

impl Display for CurveStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A complete diagram: title, content, and layout options.
///
/// This is the root of the semantic model. A `Diagram` is immutable once
/// built; the structure and export stages only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    title: String,
    scope: Scope,
    direction: Direction,
    curve_style: CurveStyle,
    background_color: Option<Color>,
}

impl Diagram {
    /// Create a new Diagram.
    pub fn new(
        title: impl Into<String>,
        scope: Scope,
        direction: Direction,
        curve_style: CurveStyle,
        background_color: Option<Color>,
    ) -> Self {
        Self {
            title: title.into(),
            scope,
            direction,
            curve_style,
            background_color,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Borrow the diagram's top-level scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn curve_style(&self) -> CurveStyle {
        self.curve_style
    }

    /// Get the diagram's background color if specified.
    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    /// Returns the base file name derived from the title.
    ///
    /// Whitespace-separated words are joined with `_` and lowercased, so
    /// `"Munnel Connectivity"` becomes `munnel_connectivity`.
    ///
    /// # Examples
    ///
    /// ```
    /// use munnel_diagram_core::semantic::{CurveStyle, Diagram, Direction, Scope};
    ///
    /// let diagram = Diagram::new(
    ///     "Munnel  Connectivity",
    ///     Scope::default(),
    ///     Direction::LR,
    ///     CurveStyle::Ortho,
    ///     None,
    /// );
    /// assert_eq!(diagram.file_stem(), "munnel_connectivity");
    /// ```
    pub fn file_stem(&self) -> String {
        self.title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }
}
