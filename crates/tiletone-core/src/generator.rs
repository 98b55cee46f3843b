//! Pull-based audio generators.

/// Anything that can fill a block of stereo audio.
///
/// Both buffers always have the same length. Implementations overwrite them.
pub trait AudioGenerator {
    fn render(&mut self, left: &mut [f32], right: &mut [f32]);
}

impl<G: AudioGenerator + ?Sized> AudioGenerator for Box<G> {
    #[inline]
    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        (**self).render(left, right);
    }
}

/// Generator that only ever outputs silence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl AudioGenerator for Silence {
    #[inline]
    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        left.fill(0.0);
        right.fill(0.0);
    }
}
