use std::collections::HashSet;
use std::fmt;

use crate::*;

#[derive(Clone, Default, PartialEq, Eq)]
/// Feature vocabulary accumulated from normalized image keypoint descriptors.
///
/// Descriptors are deduplicated by exact value: two descriptors are the same
/// word only if every component has the same bit pattern. The vocabulary only
/// ever grows.
pub struct Vocabulary {
    words: HashSet<Word>,
}

/// Vocabulary API
impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct descriptors.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Insert a descriptor as is. Returns false if it was already present.
    pub fn insert(&mut self, desc: &Desc) -> bool {
        self.words.insert(Word::from(desc))
    }

    pub fn contains(&self, desc: &Desc) -> bool {
        self.words.contains(&Word::from(desc))
    }

    /// Normalize raw descriptors with [`correct_descriptor`] and insert them.
    /// Returns the number of descriptors that were new.
    pub fn extend_corrected<'a, I>(&mut self, descriptors: I) -> usize
    where
        I: IntoIterator<Item = &'a Desc>,
    {
        descriptors
            .into_iter()
            .filter(|d| self.insert(&correct_descriptor(d)))
            .count()
    }

    /// Iterate over the stored descriptors, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Desc> + '_ {
        self.words.iter().map(Word::to_desc)
    }
}

/// Use opencv to extract SIFT descriptors from an image, normalize them and add
/// them to the vocabulary.
///
/// The caller keeps ownership of `vocab`; this only appends to it.
#[cfg(feature = "opencv")]
pub fn add_descriptors_to_vocab<P: AsRef<std::path::Path>>(
    image_path: P,
    vocab: &mut Vocabulary,
) -> VocResult<()> {
    let descriptors = get_descriptors(&image_path)?;
    let added = vocab.extend_corrected(&descriptors);
    log::debug!(
        "{:?}: {} descriptors, {} new words, vocabulary size {}",
        image_path.as_ref(),
        descriptors.len(),
        added,
        vocab.len()
    );
    Ok(())
}

/////////////////////                Helpers                 ////////////////////////
/////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, PartialEq, Eq, Hash)]
/// Hashable form of a descriptor: the bit patterns of its components.
struct Word([u32; DESC_LEN]);

impl From<&Desc> for Word {
    fn from(desc: &Desc) -> Self {
        let mut bits = [0; DESC_LEN];
        for (b, c) in bits.iter_mut().zip(desc) {
            *b = c.to_bits();
        }
        Word(bits)
    }
}

impl Word {
    fn to_desc(&self) -> Desc {
        let mut desc = [0.; DESC_LEN];
        for (c, b) in desc.iter_mut().zip(&self.0) {
            *c = f32::from_bits(*b);
        }
        desc
    }
}

impl fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vocabulary")
            .field("Words", &self.words.len())
            .field("Descriptor Length", &DESC_LEN)
            .finish()
    }
}
