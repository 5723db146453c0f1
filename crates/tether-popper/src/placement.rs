#![forbid(unsafe_code)]

//! Placement of a popper relative to its reference: a cardinal side plus an
//! optional alignment along that side.

use std::fmt;
use std::str::FromStr;

use tether_core::geometry::{Axis, Rect};

use crate::error::PopperError;

/// The side of the reference the popper sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

impl Side {
    /// All sides in clockwise order from the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The mirrored side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The axis the popper is offset along (the primary axis).
    #[must_use]
    pub const fn main_axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// The axis alignment variants slide along.
    #[must_use]
    pub const fn cross_axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Horizontal,
            Self::Left | Self::Right => Axis::Vertical,
        }
    }

    /// Whether this side is the trailing end of its axis (`right`/`bottom`).
    #[must_use]
    pub const fn is_trailing(self) -> bool {
        matches!(self, Self::Right | Self::Bottom)
    }

    /// The matching edge coordinate of `rect`.
    #[must_use]
    pub fn edge_of(self, rect: &Rect) -> f64 {
        match self {
            Self::Top => rect.top,
            Self::Right => rect.right(),
            Self::Bottom => rect.bottom(),
            Self::Left => rect.left,
        }
    }

    /// CSS keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = PopperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            other => Err(PopperError::InvalidPlacement(other.to_owned())),
        }
    }
}

/// Alignment of the popper along the reference's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    /// Leading edges line up.
    Start,
    /// Trailing edges line up.
    End,
}

impl Alignment {
    /// Suffix keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// A side plus optional alignment, written `top`, `top-start`, `left-end`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub side: Side,
    pub alignment: Option<Alignment>,
}

impl Placement {
    pub const TOP: Self = Self::new(Side::Top, None);
    pub const RIGHT: Self = Self::new(Side::Right, None);
    pub const BOTTOM: Self = Self::new(Side::Bottom, None);
    pub const LEFT: Self = Self::new(Side::Left, None);

    /// Create a placement.
    #[must_use]
    pub const fn new(side: Side, alignment: Option<Alignment>) -> Self {
        Self { side, alignment }
    }

    /// Centered on `side`.
    #[must_use]
    pub const fn centered(side: Side) -> Self {
        Self::new(side, None)
    }

    /// Start-aligned on `side`.
    #[must_use]
    pub const fn start(side: Side) -> Self {
        Self::new(side, Some(Alignment::Start))
    }

    /// End-aligned on `side`.
    #[must_use]
    pub const fn end(side: Side) -> Self {
        Self::new(side, Some(Alignment::End))
    }

    /// Same alignment on a different side.
    #[must_use]
    pub const fn with_side(self, side: Side) -> Self {
        Self::new(side, self.alignment)
    }

    /// Parse, falling back to the default (`bottom`) on unknown input.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|err| {
            tracing::debug!(%err, "falling back to default placement");
            Self::default()
        })
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alignment {
            Some(alignment) => write!(f, "{}-{}", self.side, alignment.as_str()),
            None => write!(f, "{}", self.side),
        }
    }
}

impl FromStr for Placement {
    type Err = PopperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PopperError::InvalidPlacement(s.to_owned());
        let (side, alignment) = match s.split_once('-') {
            Some((side, "start")) => (side, Some(Alignment::Start)),
            Some((side, "end")) => (side, Some(Alignment::End)),
            Some(_) => return Err(invalid()),
            None => (s, None),
        };
        let side = side.parse::<Side>().map_err(|_| invalid())?;
        Ok(Self::new(side, alignment))
    }
}

impl From<Side> for Placement {
    fn from(side: Side) -> Self {
        Self::centered(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_forms() {
        for side in Side::ALL {
            let plain: Placement = side.as_str().parse().unwrap();
            assert_eq!(plain, Placement::centered(side));
            let start: Placement = format!("{side}-start").parse().unwrap();
            assert_eq!(start, Placement::start(side));
            let end: Placement = format!("{side}-end").parse().unwrap();
            assert_eq!(end, Placement::end(side));
        }
    }

    #[test]
    fn display_matches_parse() {
        assert_eq!(Placement::end(Side::Left).to_string(), "left-end");
        assert_eq!(Placement::TOP.to_string(), "top");
    }

    #[test]
    fn invalid_placements_are_rejected() {
        assert!("middle".parse::<Placement>().is_err());
        assert!("top-center".parse::<Placement>().is_err());
        assert!("".parse::<Placement>().is_err());
    }

    #[test]
    fn lenient_parse_falls_back_to_bottom() {
        assert_eq!(Placement::parse_lenient("sideways"), Placement::BOTTOM);
        assert_eq!(Placement::parse_lenient("right-start"), Placement::start(Side::Right));
    }

    #[test]
    fn opposite_sides() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().main_axis(), side.main_axis());
        }
    }

    #[test]
    fn edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(Side::Top.edge_of(&r), 20.0);
        assert_eq!(Side::Right.edge_of(&r), 40.0);
        assert_eq!(Side::Bottom.edge_of(&r), 60.0);
        assert_eq!(Side::Left.edge_of(&r), 10.0);
    }
}
