//! Two-level shape menu.
//!
//! The primary menu lists the six categories. Prisms and pyramids open a
//! secondary menu with one entry per side count; everything else loads
//! straight away.
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{all_consuming, value},
    IResult,
};

use crate::error::{Result, ShapeError};
use crate::scene::SceneController;
use crate::shape::{parse_tag, CompositeKind, ShapeId, SideCount, Variant};

/// Entries of the primary menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Kubus,
    Balok,
    Tabung,
    Kerucut,
    Prisma,
    Limas,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Kubus,
        Category::Balok,
        Category::Tabung,
        Category::Kerucut,
        Category::Prisma,
        Category::Limas,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Kubus => "kubus",
            Category::Balok => "balok",
            Category::Tabung => "tabung",
            Category::Kerucut => "kerucut",
            Category::Prisma => "prisma",
            Category::Limas => "limas",
        }
    }

    pub fn target(self) -> CategoryTarget {
        match self {
            Category::Kubus => CategoryTarget::Shape(ShapeId::Cube),
            Category::Balok => CategoryTarget::Shape(ShapeId::Cuboid),
            Category::Tabung => CategoryTarget::Shape(ShapeId::Cylinder),
            Category::Kerucut => CategoryTarget::Shape(ShapeId::Cone),
            Category::Prisma => CategoryTarget::Variants(CompositeKind::Prism),
            Category::Limas => CategoryTarget::Variants(CompositeKind::Pyramid),
        }
    }

    /// The menu entry a concrete shape is reached from.
    pub fn of(id: ShapeId) -> Self {
        match id {
            ShapeId::Cube => Category::Kubus,
            ShapeId::Cuboid => Category::Balok,
            ShapeId::Cylinder => Category::Tabung,
            ShapeId::Cone => Category::Kerucut,
            ShapeId::Prism(_) => Category::Prisma,
            ShapeId::Pyramid(_) => Category::Limas,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        all_consuming(category)(input)
            .map(|(_, category)| category)
            .map_err(|_| ShapeError::UnknownShape(input.to_string()))
    }
}

/// What selecting a category leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryTarget {
    /// Loads this shape immediately.
    Shape(ShapeId),
    /// Opens the side-count menu for this kind.
    Variants(CompositeKind),
}

fn category(input: &str) -> IResult<&str, Category> {
    alt((
        value(Category::Kubus, tag("kubus")),
        value(Category::Balok, tag("balok")),
        value(Category::Tabung, tag("tabung")),
        value(Category::Kerucut, tag("kerucut")),
        value(Category::Prisma, tag("prisma")),
        value(Category::Limas, tag("limas")),
    ))(input)
}

/// One button of the secondary menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmenuEntry {
    /// Button caption, e.g. `prisma segitiga`.
    pub label: String,
    /// Tag passed back to [`MenuController::select_variant`].
    pub tag: String,
    pub shape: ShapeId,
}

/// The secondary menu opened for a composite category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub kind: CompositeKind,
    pub entries: Vec<SubmenuEntry>,
}

impl Submenu {
    pub fn for_kind(kind: CompositeKind) -> Self {
        let entries = Variant::ALL
            .iter()
            .map(|variant| {
                let shape = kind.with_sides(variant.side_count());
                SubmenuEntry {
                    label: format!("{} {}", kind.label(), variant.label()),
                    tag: shape.to_string(),
                    shape,
                }
            })
            .collect();
        Self { kind, entries }
    }

    pub fn title(&self) -> String {
        format!("Pilih {}:", self.kind.label())
    }
}

/// What a primary menu selection did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Loaded(ShapeId),
    ShowVariants(CompositeKind),
}

/// UI state behind the menus: the open submenu and whether the shape
/// controls (net toggle) are shown.
#[derive(Debug, Default)]
pub struct MenuController {
    submenu: Option<Submenu>,
    controls_visible: bool,
}

impl MenuController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on a primary menu entry.
    ///
    /// Any previous shape and submenu are cleared first. Unknown names are
    /// rejected before anything changes.
    pub fn select_shape(&mut self, name: &str, scene: &mut SceneController) -> Result<MenuOutcome> {
        let category = Category::parse(name).map_err(|err| {
            tracing::warn!(%err, "menu selection rejected");
            err
        })?;

        scene.clear();
        self.submenu = None;
        self.controls_visible = true;

        match category.target() {
            CategoryTarget::Shape(id) => {
                scene.select(id);
                Ok(MenuOutcome::Loaded(id))
            }
            CategoryTarget::Variants(kind) => {
                tracing::debug!(category = category.label(), "variant menu opened");
                self.submenu = Some(Submenu::for_kind(kind));
                Ok(MenuOutcome::ShowVariants(kind))
            }
        }
    }

    /// Handle a click on a secondary menu entry (`prisma-segilima`, ...).
    pub fn select_variant(&mut self, tag: &str, scene: &mut SceneController) -> Result<ShapeId> {
        let id = parse_tag(tag).map_err(|err| {
            tracing::warn!(%err, "variant selection rejected");
            err
        })?;
        scene.select(id);
        Ok(id)
    }

    /// Pick a side count from the open submenu.
    ///
    /// Returns `Ok(None)` when no submenu is open.
    pub fn select_side_count(&mut self, sides: u32, scene: &mut SceneController) -> Result<Option<ShapeId>> {
        let Some(kind) = self.submenu.as_ref().map(|s| s.kind) else {
            return Ok(None);
        };
        let id = kind.with_sides(SideCount::new(sides)?);
        scene.select(id);
        Ok(Some(id))
    }

    pub fn submenu(&self) -> Option<&Submenu> {
        self.submenu.as_ref()
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }
}
