//! Closed/open face layout for solids that unfold into a net.
use nalgebra::Vector3;

/// Whether unfoldable faces sit in their assembled or unfolded position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetLayout {
    #[default]
    Closed,
    Open,
}

impl NetLayout {
    pub fn toggled(self) -> Self {
        match self {
            NetLayout::Closed => NetLayout::Open,
            NetLayout::Open => NetLayout::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == NetLayout::Open
    }
}

/// Where one face sits in each layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePlacement {
    pub closed: Vector3<f32>,
    pub open: Vector3<f32>,
}

impl FacePlacement {
    /// A face that rests at the origin and moves to `open` when unfolded.
    pub fn from_origin(open: Vector3<f32>) -> Self {
        Self {
            closed: Vector3::zeros(),
            open,
        }
    }

    pub fn position(&self, layout: NetLayout) -> Vector3<f32> {
        match layout {
            NetLayout::Closed => self.closed,
            NetLayout::Open => self.open,
        }
    }
}
