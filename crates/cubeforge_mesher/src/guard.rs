use crate::error::{BufferKind, IntegrityFault};

pub const START_SENTINEL: u32 = 0xDEAD_BEEF;
pub const MID_SENTINEL: u32 = 0xFEED_BEAD;
pub const END_SENTINEL: u32 = 0xCAFE_BABE;

/// Bookkeeping for one buffer: the count asked for and the capacity the
/// allocator actually handed back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Reservation {
    reserved: usize,
    capacity: usize,
}

impl Reservation {
    fn check<T>(&self, buffer: BufferKind, data: &Vec<T>) -> Result<(), IntegrityFault> {
        if data.len() > self.reserved {
            return Err(IntegrityFault::Overrun {
                buffer,
                used: data.len(),
                reserved: self.reserved,
            });
        }
        if data.capacity() != self.capacity {
            return Err(IntegrityFault::Reallocated {
                buffer,
                reserved: self.reserved,
                capacity: data.capacity(),
            });
        }
        Ok(())
    }
}

/// Canary-framed record of the reservations made for one mesh build.
///
/// Armed right after both buffers are reserved and checked once generation
/// finishes.
#[derive(Debug)]
#[repr(C)]
pub struct BufferGuard {
    start: u32,
    vertices: Reservation,
    mid: u32,
    indices: Reservation,
    end: u32,
}

impl BufferGuard {
    pub fn arm<V, I>(
        vertex_reserved: usize,
        vertices: &Vec<V>,
        index_reserved: usize,
        indices: &Vec<I>,
    ) -> Self {
        Self {
            start: START_SENTINEL,
            vertices: Reservation {
                reserved: vertex_reserved,
                capacity: vertices.capacity(),
            },
            mid: MID_SENTINEL,
            indices: Reservation {
                reserved: index_reserved,
                capacity: indices.capacity(),
            },
            end: END_SENTINEL,
        }
    }

    pub fn check<V, I>(&self, vertices: &Vec<V>, indices: &Vec<I>) -> Result<(), IntegrityFault> {
        for (name, expected, found) in [
            ("start", START_SENTINEL, self.start),
            ("mid", MID_SENTINEL, self.mid),
            ("end", END_SENTINEL, self.end),
        ] {
            if found != expected {
                return Err(IntegrityFault::SentinelCorrupted {
                    name,
                    expected,
                    found,
                });
            }
        }

        self.vertices.check(BufferKind::Vertex, vertices)?;
        self.indices.check(BufferKind::Index, indices)
    }
}
