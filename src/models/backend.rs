use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the per-pixel quantization work is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// wgpu compute shader on the first high-performance adapter
    #[default]
    Gpu,
    /// rayon thread pool over image rows
    Cpu,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Gpu => write!(f, "gpu"),
            BackendKind::Cpu => write!(f, "cpu"),
        }
    }
}

/// 2-D compute workgroup dimensions for the GPU kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workgroup {
    pub x: u32,
    pub y: u32,
}

impl Workgroup {
    /// Upper bound on `x * y` accepted by every wgpu backend.
    pub const MAX_INVOCATIONS: u32 = 256;

    pub fn total(&self) -> u32 {
        self.x * self.y
    }

    /// Workgroup counts needed to cover a `width` x `height` grid.
    pub fn dispatch_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width.div_ceil(self.x), height.div_ceil(self.y))
    }

    pub fn is_valid(&self) -> bool {
        (1..=Self::MAX_INVOCATIONS).contains(&self.x)
            && (1..=Self::MAX_INVOCATIONS).contains(&self.y)
            && self.x * self.y <= Self::MAX_INVOCATIONS
    }
}

impl Default for Workgroup {
    /// 16x8 = 128 invocations: four 32-wide warps or two 64-wide wavefronts.
    fn default() -> Self {
        Self { x: 16, y: 8 }
    }
}

impl fmt::Display for Workgroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ({} invocations)", self.x, self.y, self.total())
    }
}
