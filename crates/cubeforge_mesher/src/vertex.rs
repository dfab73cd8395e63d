use bytemuck::{Pod, Zeroable};
use cubeforge_shared::coords::LocalPos;
use cubeforge_shared::face::NormalFlags;

/// Scale of one 16-bit UV fraction.
const UV_SCALE: f32 = 65535.0;

/// GPU vertex: doubled-cube position, normal tag, packed UV.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct PackedVertex {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub normal: u8,
    pub uv: u32,
}
const _: [(); 8] = [(); std::mem::size_of::<PackedVertex>()];

impl PackedVertex {
    pub const fn new(position: [u8; 3], normal: NormalFlags, uv: u32) -> Self {
        Self {
            x: position[0],
            y: position[1],
            z: position[2],
            normal: normal.bits(),
            uv,
        }
    }

    pub fn position(&self) -> [u8; 3] {
        [self.x, self.y, self.z]
    }

    pub fn normal_flags(&self) -> NormalFlags {
        NormalFlags::from_bits_truncate(self.normal)
    }

    pub fn uv(&self) -> [f32; 2] {
        unpack_uv(self.uv)
    }

    /// Moves a unit-cube template vertex onto the voxel at `pos`.
    ///
    /// Templates use 0/2 corners, so the voxel coordinate is doubled.
    pub fn translated(mut self, pos: LocalPos) -> Self {
        self.x += pos.x * 2;
        self.y += pos.y * 2;
        self.z += pos.z * 2;
        self
    }
}

/// Packs two `[0, 1)` fractions into one word, `u` in the high half.
///
/// Each component is scaled by 65535 and truncated, matching what the shader's
/// `unpack_uv` expects.
pub fn pack_uv(u: f32, v: f32) -> u32 {
    (((u * UV_SCALE) as u32) << 16) | (((v * UV_SCALE) as u32) & 0xFFFF)
}

pub fn unpack_uv(packed: u32) -> [f32; 2] {
    [
        (packed >> 16) as f32 / UV_SCALE,
        (packed & 0xFFFF) as f32 / UV_SCALE,
    ]
}
