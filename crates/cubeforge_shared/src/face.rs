use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-direction normal tag carried in the vertex layout.
    ///
    /// The shader uses the set bit to pick a lighting term; it is not a
    /// geometric vector and exactly one bit is set for any emitted vertex.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NormalFlags: u8 {
        const LEFT = 1;
        const RIGHT = 2;
        const TOP = 4;
        const BOTTOM = 8;
        const BACK = 16;
        const FRONT = 32;
    }
}

/// Axis-aligned cube face. Discriminants index the face and atlas tables.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    /// -Z
    Back = 0,
    /// +Z
    Front = 1,
    /// +X
    Right = 2,
    /// -X
    Left = 3,
    /// -Y
    Bottom = 4,
    /// +Y
    Top = 5,
}

impl Face {
    pub const COUNT: usize = 6;

    /// All faces in table order.
    pub const ALL: [Face; Face::COUNT] = [
        Face::Back,
        Face::Front,
        Face::Right,
        Face::Left,
        Face::Bottom,
        Face::Top,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Face> {
        Self::ALL.get(index).copied()
    }

    /// Unit step toward the neighbouring voxel on this side.
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Face::Back => [0, 0, -1],
            Face::Front => [0, 0, 1],
            Face::Right => [1, 0, 0],
            Face::Left => [-1, 0, 0],
            Face::Bottom => [0, -1, 0],
            Face::Top => [0, 1, 0],
        }
    }

    pub const fn opposite(self) -> Face {
        match self {
            Face::Back => Face::Front,
            Face::Front => Face::Back,
            Face::Right => Face::Left,
            Face::Left => Face::Right,
            Face::Bottom => Face::Top,
            Face::Top => Face::Bottom,
        }
    }

    pub const fn normal_flag(self) -> NormalFlags {
        match self {
            Face::Back => NormalFlags::BACK,
            Face::Front => NormalFlags::FRONT,
            Face::Right => NormalFlags::RIGHT,
            Face::Left => NormalFlags::LEFT,
            Face::Bottom => NormalFlags::BOTTOM,
            Face::Top => NormalFlags::TOP,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::Back => "back",
            Face::Front => "front",
            Face::Right => "right",
            Face::Left => "left",
            Face::Bottom => "bottom",
            Face::Top => "top",
        }
    }
}
