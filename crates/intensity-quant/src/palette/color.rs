//! Three-channel 8-bit color sample.

/// A pixel or palette color made of three 8-bit channel samples.
///
/// The channel order is fixed for a given image but immaterial to
/// quantization: intensity is the unweighted mean of all three samples,
/// and palette entries are written back channel-for-channel. The harness
/// stores channels as B, G, R.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    channels: [u8; 3],
}

impl Color {
    /// Black, the first entry of every palette.
    pub const BLACK: Color = Color::new(0, 0, 0);

    /// Create a color from its three channel samples, in storage order.
    #[inline]
    pub const fn new(c0: u8, c1: u8, c2: u8) -> Self {
        Self {
            channels: [c0, c1, c2],
        }
    }

    /// Create a color from a channel array in storage order.
    #[inline]
    pub const fn from_bytes(channels: [u8; 3]) -> Self {
        Self { channels }
    }

    /// The channel samples in storage order.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        self.channels
    }

    /// Unweighted average of the three channels, truncated toward zero.
    ///
    /// # Example
    /// ```
    /// use intensity_quant::Color;
    /// assert_eq!(Color::new(255, 255, 255).intensity(), 255);
    /// assert_eq!(Color::new(127, 0, 0).intensity(), 42);
    /// ```
    #[inline]
    pub const fn intensity(self) -> u8 {
        let [c0, c1, c2] = self.channels;
        ((c0 as u32 + c1 as u32 + c2 as u32) / 3) as u8
    }

    /// The same samples with the first and last channel swapped
    /// (B,G,R <-> R,G,B).
    #[inline]
    pub const fn reversed(self) -> Self {
        let [c0, c1, c2] = self.channels;
        Self::new(c2, c1, c0)
    }
}

impl From<[u8; 3]> for Color {
    fn from(channels: [u8; 3]) -> Self {
        Self::from_bytes(channels)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        color.to_bytes()
    }
}
