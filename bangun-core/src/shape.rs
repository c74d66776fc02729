//! Shape identifiers and the menu tag grammar.
//!
//! Tags are the strings the menus emit: `kubus`, `balok`, `tabung`,
//! `kerucut`, or `prisma-<variant>` / `limas-<variant>` where the variant is
//! one of `segitiga`, `segiempat`, `segilima`, `segienam`.
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{all_consuming, map, value},
    sequence::separated_pair,
    IResult,
};

use crate::constants::{MAX_SIDES, MIN_SIDES};
use crate::error::{Result, ShapeError};

/// Number of polygon sides for prisms and pyramids, always within 3..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SideCount(u32);

impl SideCount {
    pub const TRIANGLE: SideCount = SideCount(3);
    pub const SQUARE: SideCount = SideCount(4);
    pub const PENTAGON: SideCount = SideCount(5);
    pub const HEXAGON: SideCount = SideCount(6);

    pub fn new(sides: u32) -> Result<Self> {
        if (MIN_SIDES..=MAX_SIDES).contains(&sides) {
            Ok(Self(sides))
        } else {
            Err(ShapeError::UnsupportedSideCount(sides))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SideCount {
    type Error = ShapeError;

    fn try_from(sides: u32) -> Result<Self> {
        Self::new(sides)
    }
}

/// The polygon variants offered in the secondary menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Segitiga,
    Segiempat,
    Segilima,
    Segienam,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Segitiga,
        Variant::Segiempat,
        Variant::Segilima,
        Variant::Segienam,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Variant::Segitiga => "segitiga",
            Variant::Segiempat => "segiempat",
            Variant::Segilima => "segilima",
            Variant::Segienam => "segienam",
        }
    }

    pub fn side_count(self) -> SideCount {
        match self {
            Variant::Segitiga => SideCount::TRIANGLE,
            Variant::Segiempat => SideCount::SQUARE,
            Variant::Segilima => SideCount::PENTAGON,
            Variant::Segienam => SideCount::HEXAGON,
        }
    }

    pub fn from_side_count(sides: SideCount) -> Self {
        match sides.get() {
            3 => Variant::Segitiga,
            4 => Variant::Segiempat,
            5 => Variant::Segilima,
            _ => Variant::Segienam,
        }
    }
}

/// Solids that come in several side counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    Prism,
    Pyramid,
}

impl CompositeKind {
    pub fn label(self) -> &'static str {
        match self {
            CompositeKind::Prism => "prisma",
            CompositeKind::Pyramid => "limas",
        }
    }

    pub fn with_sides(self, sides: SideCount) -> ShapeId {
        match self {
            CompositeKind::Prism => ShapeId::Prism(sides),
            CompositeKind::Pyramid => ShapeId::Pyramid(sides),
        }
    }
}

/// Identifies one concrete solid the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeId {
    Cube,
    Cuboid,
    Cylinder,
    Cone,
    Prism(SideCount),
    Pyramid(SideCount),
}

impl ShapeId {
    /// Every concrete shape, in menu order.
    pub const ALL: [ShapeId; 12] = [
        ShapeId::Cube,
        ShapeId::Cuboid,
        ShapeId::Cylinder,
        ShapeId::Cone,
        ShapeId::Prism(SideCount::TRIANGLE),
        ShapeId::Prism(SideCount::SQUARE),
        ShapeId::Prism(SideCount::PENTAGON),
        ShapeId::Prism(SideCount::HEXAGON),
        ShapeId::Pyramid(SideCount::TRIANGLE),
        ShapeId::Pyramid(SideCount::SQUARE),
        ShapeId::Pyramid(SideCount::PENTAGON),
        ShapeId::Pyramid(SideCount::HEXAGON),
    ];

    /// Only the cube is assembled from separately placed faces.
    pub fn supports_net(self) -> bool {
        matches!(self, ShapeId::Cube)
    }

    pub fn composite(self) -> Option<(CompositeKind, SideCount)> {
        match self {
            ShapeId::Prism(sides) => Some((CompositeKind::Prism, sides)),
            ShapeId::Pyramid(sides) => Some((CompositeKind::Pyramid, sides)),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeId::Cube => f.write_str("kubus"),
            ShapeId::Cuboid => f.write_str("balok"),
            ShapeId::Cylinder => f.write_str("tabung"),
            ShapeId::Cone => f.write_str("kerucut"),
            ShapeId::Prism(sides) => write!(f, "prisma-{}", Variant::from_side_count(*sides).label()),
            ShapeId::Pyramid(sides) => write!(f, "limas-{}", Variant::from_side_count(*sides).label()),
        }
    }
}

impl FromStr for ShapeId {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_tag(s)
    }
}

/// Parse a full shape tag such as `kubus` or `limas-segilima`.
pub fn parse_tag(input: &str) -> Result<ShapeId> {
    let input = input.trim();
    all_consuming(shape_tag)(input)
        .map(|(_, id)| id)
        .map_err(|_| ShapeError::UnknownShape(input.to_string()))
}

fn shape_tag(input: &str) -> IResult<&str, ShapeId> {
    alt((composite, primitive))(input)
}

fn primitive(input: &str) -> IResult<&str, ShapeId> {
    alt((
        value(ShapeId::Cube, tag("kubus")),
        value(ShapeId::Cuboid, tag("balok")),
        value(ShapeId::Cylinder, tag("tabung")),
        value(ShapeId::Cone, tag("kerucut")),
    ))(input)
}

fn composite(input: &str) -> IResult<&str, ShapeId> {
    map(
        separated_pair(composite_kind, char('-'), variant),
        |(kind, variant)| kind.with_sides(variant.side_count()),
    )(input)
}

pub(crate) fn composite_kind(input: &str) -> IResult<&str, CompositeKind> {
    alt((
        value(CompositeKind::Prism, tag("prisma")),
        value(CompositeKind::Pyramid, tag("limas")),
    ))(input)
}

fn variant(input: &str) -> IResult<&str, Variant> {
    alt((
        value(Variant::Segitiga, tag("segitiga")),
        value(Variant::Segiempat, tag("segiempat")),
        value(Variant::Segilima, tag("segilima")),
        value(Variant::Segienam, tag("segienam")),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_tag_round_trips() {
        for id in ShapeId::ALL {
            assert_eq!(parse_tag(&id.to_string()).unwrap(), id);
        }
    }

    #[test]
    fn test_composite_tags() {
        assert_eq!(
            parse_tag("limas-segilima").unwrap(),
            ShapeId::Pyramid(SideCount::PENTAGON)
        );
        assert_eq!(
            " prisma-segitiga\n".parse::<ShapeId>().unwrap(),
            ShapeId::Prism(SideCount::TRIANGLE)
        );
    }

    #[test]
    fn test_unknown_tags_are_rejected() {
        for tag in ["", "bola", "prisma", "prisma-", "limas-segidelapan", "kubuss", "KUBUS"] {
            match parse_tag(tag) {
                Err(ShapeError::UnknownShape(name)) => assert_eq!(name, tag.trim()),
                other => panic!("expected UnknownShape for {tag:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_side_count_bounds() {
        for sides in 3..=6 {
            assert_eq!(SideCount::new(sides).unwrap().get(), sides);
        }
        assert!(matches!(
            SideCount::new(2),
            Err(ShapeError::UnsupportedSideCount(2))
        ));
        assert!(SideCount::try_from(7).is_err());
    }

    #[test]
    fn test_variant_side_counts() {
        let sides: Vec<u32> = Variant::ALL.iter().map(|v| v.side_count().get()).collect();
        assert_eq!(sides, vec![3, 4, 5, 6]);
        for variant in Variant::ALL {
            assert_eq!(Variant::from_side_count(variant.side_count()), variant);
        }
    }

    #[test]
    fn test_only_cube_supports_net() {
        let with_net: Vec<_> = ShapeId::ALL.into_iter().filter(|id| id.supports_net()).collect();
        assert_eq!(with_net, vec![ShapeId::Cube]);
    }
}
