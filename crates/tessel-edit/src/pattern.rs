use fastnoise_lite::{FastNoiseLite, NoiseType};
use tessel_blocks::{AIR, BlockId};
use tessel_world::BlockPosition;

/// Chooses a block id for a world position.
pub trait FillPattern {
    fn block_at(&self, position: BlockPosition) -> BlockId;
}

impl<F> FillPattern for F
where
    F: Fn(BlockPosition) -> BlockId,
{
    #[inline]
    fn block_at(&self, position: BlockPosition) -> BlockId {
        self(position)
    }
}

/// Same id everywhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FloodFill(pub BlockId);

impl FillPattern for FloodFill {
    #[inline]
    fn block_at(&self, _position: BlockPosition) -> BlockId {
        self.0
    }
}

/// 3D OpenSimplex noise thresholded into a solid id and an empty id.
pub struct NoiseFill {
    noise: FastNoiseLite,
    threshold: f32,
    solid: BlockId,
    empty: BlockId,
}

impl NoiseFill {
    pub fn new(seed: i32, solid: BlockId) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(0.05));
        Self {
            noise,
            threshold: 0.0,
            solid,
            empty: AIR,
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.noise.set_frequency(Some(frequency));
        self
    }

    /// Samples strictly above `threshold` (noise range is roughly `[-1, 1]`) become solid.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_empty(mut self, empty: BlockId) -> Self {
        self.empty = empty;
        self
    }
}

impl FillPattern for NoiseFill {
    fn block_at(&self, p: BlockPosition) -> BlockId {
        let n = self.noise.get_noise_3d(p.x as f32, p.y as f32, p.z as f32);
        if n > self.threshold { self.solid } else { self.empty }
    }
}
