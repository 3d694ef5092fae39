//! Slot distribution: which source image fills which tile.
//!
//! Slots are shared as evenly as possible. When the split is uneven the
//! lower-indexed images get the extra slot, and each image's slots are
//! contiguous in the sequence.
//!
//! ```
//! use photosheet::SlotAssignment;
//!
//! let a = SlotAssignment::plan(3, 10).unwrap();
//! assert_eq!(a.counts(), &[4, 3, 3]);
//! assert_eq!(a.as_slice(), &[0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
//! ```

use alloc::vec::Vec;

use crate::error::SheetError;

/// Per-image slot counts for `image_count` images over `total_slots` slots.
///
/// Image `i` receives `total_slots / image_count` slots, plus one if
/// `i < total_slots % image_count`.
pub fn distribution(image_count: usize, total_slots: usize) -> Result<Vec<usize>, SheetError> {
    if image_count == 0 {
        return Err(SheetError::InvalidInput("distribution needs at least one image"));
    }
    if image_count > total_slots {
        return Err(SheetError::TooManyImagesForSlots {
            images: image_count,
            slots: total_slots,
        });
    }
    let base = total_slots / image_count;
    let extra = total_slots % image_count;
    Ok((0..image_count)
        .map(|i| base + usize::from(i < extra))
        .collect())
}

/// Ordered image index for every slot of a sheet.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlotAssignment {
    slots: Vec<usize>,
    counts: Vec<usize>,
}

impl SlotAssignment {
    /// Plan the assignment of `total_slots` slots to `image_count` images.
    pub fn plan(image_count: usize, total_slots: usize) -> Result<Self, SheetError> {
        let counts = distribution(image_count, total_slots)?;
        let mut slots = Vec::with_capacity(total_slots);
        for (index, &count) in counts.iter().enumerate() {
            slots.extend(core::iter::repeat_n(index, count));
        }
        debug_assert_eq!(slots.len(), total_slots);
        Ok(Self { slots, counts })
    }

    /// Image index per slot, in slot order.
    pub fn as_slice(&self) -> &[usize] {
        &self.slots
    }

    /// Number of slots given to each image.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of distinct source images.
    pub fn image_count(&self) -> usize {
        self.counts.len()
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate image indices in slot order.
    pub fn iter(&self) -> core::iter::Copied<core::slice::Iter<'_, usize>> {
        self.slots.iter().copied()
    }

    /// Consume into the raw index sequence.
    pub fn into_vec(self) -> Vec<usize> {
        self.slots
    }
}

impl<'a> IntoIterator for &'a SlotAssignment {
    type Item = usize;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
