use crate::Desc;

/// Components of a unit descriptor are capped at this value before it is
/// normalized a second time.
pub const COMPONENT_CAP: f32 = 0.2;

/// Provides norm and normalization methods for descriptors.
pub trait DescNorm {
    /// Euclidean norm.
    fn l2(&self) -> f32;
    /// Contrast and exposure invariant version of the descriptor.
    fn corrected(&self) -> Self;
}

impl DescNorm for Desc {
    fn l2(&self) -> f32 {
        self.iter().fold(0., |a, b| a + b * b).sqrt()
    }

    fn corrected(&self) -> Self {
        correct_descriptor(self)
    }
}

/// Transform a descriptor so it is invariant to changes of contrast and exposure.
///
/// The descriptor is scaled to unit norm (global contrast), then every
/// component above [`COMPONENT_CAP`] is clipped to it and the result is
/// scaled to unit norm again, which damps a single dominant gradient
/// direction (local exposure).
///
/// An all-zero descriptor has no direction: the result is all NaN.
pub fn correct_descriptor(desc: &Desc) -> Desc {
    let mut out = *desc;
    scale(&mut out, 1. / desc.l2());
    for c in out.iter_mut() {
        if *c > COMPONENT_CAP {
            *c = COMPONENT_CAP;
        }
    }
    let inv_norm = 1. / out.l2();
    scale(&mut out, inv_norm);
    out
}

#[inline]
fn scale(desc: &mut Desc, k: f32) {
    for c in desc.iter_mut() {
        *c *= k;
    }
}
