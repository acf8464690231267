//! The in-memory CIF store: a color index over pixel ids.
//!
//! A [`Cif`] owns the mapping from color to the pixel ids holding that
//! color, plus the image dimensions and the compression flag of the
//! persisted form. Two invariants hold for every constructed `Cif`:
//!
//! - **single owner**: each pixel id lives in at most one bucket
//! - **bounds**: every id is `< checksum` (`width * height`)
//!
//! Both are enforced mechanically through an id -> color owner index
//! rather than assumed, which also makes owner lookup O(1) instead of a
//! linear scan over all buckets.
//!
//! Recoloring a bucket's last id leaves an empty ghost bucket in the
//! mapping; nothing prunes it. Enumeration must tolerate this, and
//! color counts should use [`Cif::color_count`], which skips empty
//! buckets, rather than counting buckets raw.

use std::collections::HashMap;

use cif_core::color::Color;
use cif_core::coord;
use cif_core::PixelBuffer;
use tracing::warn;

/// One color bucket: the ids currently holding `color`.
#[derive(Debug, Clone)]
struct Bucket {
    color: Color,
    ids: Vec<u32>,
}

/// The CIF color index for one image.
#[derive(Debug, Clone)]
pub struct Cif {
    width: u32,
    height: u32,
    compressed: bool,
    number_of_colors: u32,
    checksum: u32,
    /// Buckets in insertion order.
    buckets: Vec<Bucket>,
    /// Color -> position in `buckets`.
    by_color: HashMap<Color, usize>,
    /// Owner index: pixel id -> the color whose bucket holds it.
    owner: HashMap<u32, Color>,
}

impl Cif {
    /// Build a `Cif` from a sequence of `(color, ids)` pairs.
    ///
    /// Pairs repeating a color are merged by appending their ids to the
    /// existing bucket. Ids at or beyond the checksum, and ids already
    /// owned by another bucket, are dropped with a warning so both
    /// store invariants hold by construction.
    ///
    /// `number_of_colors` is snapshotted from the bucket count at this
    /// point and not updated by later mutations.
    pub fn from_image(
        width: u32,
        height: u32,
        compressed: bool,
        image: impl IntoIterator<Item = (Color, Vec<u32>)>,
    ) -> Self {
        let checksum = coord::checksum(width, height);
        let mut cif = Self {
            width,
            height,
            compressed,
            number_of_colors: 0,
            checksum,
            buckets: Vec::new(),
            by_color: HashMap::new(),
            owner: HashMap::new(),
        };
        for (color, ids) in image {
            let slot = cif.bucket_index_or_insert(color);
            for id in ids {
                if id >= checksum {
                    warn!(id, checksum, "dropping out-of-bounds pixel id");
                    continue;
                }
                if cif.owner.contains_key(&id) {
                    warn!(id, "dropping pixel id already owned by another color");
                    continue;
                }
                cif.owner.insert(id, color);
                cif.buckets[slot].ids.push(id);
            }
        }
        cif.number_of_colors = cif.buckets.len() as u32;
        cif
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the persisted form uses range-compressed rows. Purely a
    /// wire-layout flag; the in-memory mapping is identical either way.
    pub fn compressed(&self) -> bool {
        self.compressed
    }

    /// Exclusive upper bound for valid pixel ids (`width * height`).
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Bucket count snapshotted at construction time. Later recolor
    /// calls do not update it; see [`Cif::color_count`] for a live
    /// count.
    pub fn number_of_colors(&self) -> u32 {
        self.number_of_colors
    }

    /// Number of non-empty buckets right now. Ghost buckets emptied by
    /// recoloring are excluded.
    pub fn color_count(&self) -> usize {
        self.buckets.iter().filter(|b| !b.ids.is_empty()).count()
    }

    /// Total number of pixel ids across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.ids.len()).sum()
    }

    /// Whether no bucket holds any id.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.ids.is_empty())
    }

    /// Iterate buckets in insertion order as `(color, ids)`. Includes
    /// ghost buckets, which surface as empty id slices.
    pub fn buckets(&self) -> impl Iterator<Item = (Color, &[u32])> {
        self.buckets.iter().map(|b| (b.color, b.ids.as_slice()))
    }

    /// The ids currently holding `color`, if that bucket exists.
    pub fn ids_of(&self, color: Color) -> Option<&[u32]> {
        self.by_color.get(&color).map(|&i| self.buckets[i].ids.as_slice())
    }

    /// The color currently owning pixel id `id`, if any.
    pub fn owner_of(&self, id: u32) -> Option<Color> {
        self.owner.get(&id).copied()
    }

    /// Recolor the single pixel at `(x, y)` to `new_color`.
    ///
    /// Returns `false` without mutating when the position is out of
    /// bounds, when no bucket owns the pixel, or when the pixel already
    /// has `new_color` (a no-op is reported as "nothing to change", not
    /// success). Otherwise the id moves from its old bucket to the
    /// bucket for `new_color`, creating that bucket if absent. An old
    /// bucket emptied by the move is left in place.
    pub fn recolor_pixel(&mut self, x: u32, y: u32, new_color: Color) -> bool {
        // Both axes are checked up front: an x or y past its edge would
        // otherwise alias (or overflow) into some other in-bounds id.
        if x >= self.width || y >= self.height {
            return false;
        }
        let id = coord::to_id(x, y, self.width);
        if id >= self.checksum {
            return false;
        }
        let Some(old_color) = self.owner_of(id) else {
            return false;
        };
        if old_color == new_color {
            return false;
        }

        let old_slot = self.by_color[&old_color];
        let ids = &mut self.buckets[old_slot].ids;
        if let Some(pos) = ids.iter().position(|&v| v == id) {
            ids.remove(pos);
        }

        let new_slot = self.bucket_index_or_insert(new_color);
        self.buckets[new_slot].ids.push(id);
        self.owner.insert(id, new_color);
        true
    }

    /// Move every id of `old_color`'s bucket onto `new_color`.
    ///
    /// Returns `false` when `old_color` has no bucket, or when the two
    /// colors are equal (nothing to change). Otherwise the `old_color`
    /// entry is removed from the mapping and its ids are appended to
    /// `new_color`'s bucket, which is created at the end if absent.
    pub fn recolor_bucket(&mut self, old_color: Color, new_color: Color) -> bool {
        if old_color == new_color {
            return false;
        }
        let Some(old_slot) = self.by_color.remove(&old_color) else {
            return false;
        };
        let Bucket { ids, .. } = self.buckets.remove(old_slot);
        for slot in self.by_color.values_mut() {
            if *slot > old_slot {
                *slot -= 1;
            }
        }

        let new_slot = self.bucket_index_or_insert(new_color);
        for &id in &ids {
            self.owner.insert(id, new_color);
        }
        self.buckets[new_slot].ids.extend(ids);
        true
    }

    /// Render the color index onto a fresh pixel buffer.
    ///
    /// Never fails: pixels no bucket claims keep the buffer's
    /// transparent background, so an incomplete mapping produces a
    /// partially-filled image.
    pub fn render(&self) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(self.width, self.height);
        for bucket in &self.buckets {
            for &id in &bucket.ids {
                let (x, y) = coord::to_xy(id, self.width);
                // In bounds by the store's checksum invariant.
                let _ = buffer.set(x, y, bucket.color);
            }
        }
        buffer
    }

    fn bucket_index_or_insert(&mut self, color: Color) -> usize {
        if let Some(&slot) = self.by_color.get(&color) {
            return slot;
        }
        self.buckets.push(Bucket {
            color,
            ids: Vec::new(),
        });
        let slot = self.buckets.len() - 1;
        self.by_color.insert(color, slot);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 image: (0,0),(1,0),(0,1) black, (1,1) white.
    fn two_by_two() -> Cif {
        Cif::from_image(
            2,
            2,
            false,
            vec![
                (Color::BLACK, vec![0, 1, 2]),
                (Color::WHITE, vec![3]),
            ],
        )
    }

    #[test]
    fn test_from_image_basic() {
        let cif = two_by_two();
        assert_eq!(cif.checksum(), 4);
        assert_eq!(cif.number_of_colors(), 2);
        assert_eq!(cif.len(), 4);
        assert_eq!(cif.ids_of(Color::BLACK).unwrap(), &[0, 1, 2]);
        assert_eq!(cif.ids_of(Color::WHITE).unwrap(), &[3]);
        assert_eq!(cif.owner_of(3), Some(Color::WHITE));
    }

    #[test]
    fn test_from_image_merges_duplicate_colors() {
        let cif = Cif::from_image(
            2,
            2,
            false,
            vec![(Color::BLACK, vec![0]), (Color::BLACK, vec![2, 3])],
        );
        assert_eq!(cif.ids_of(Color::BLACK).unwrap(), &[0, 2, 3]);
        assert_eq!(cif.number_of_colors(), 1);
    }

    #[test]
    fn test_from_image_drops_out_of_bounds() {
        let cif = Cif::from_image(2, 2, false, vec![(Color::BLACK, vec![0, 4, 99])]);
        assert_eq!(cif.ids_of(Color::BLACK).unwrap(), &[0]);
    }

    #[test]
    fn test_from_image_enforces_single_owner() {
        let cif = Cif::from_image(
            2,
            2,
            false,
            vec![(Color::BLACK, vec![0, 1]), (Color::WHITE, vec![1, 2])],
        );
        assert_eq!(cif.owner_of(1), Some(Color::BLACK));
        assert_eq!(cif.ids_of(Color::WHITE).unwrap(), &[2]);
    }

    #[test]
    fn test_recolor_pixel_scenario() {
        // Recoloring (1,1) moves id 3 from white's bucket to black's
        let mut cif = two_by_two();
        assert!(cif.recolor_pixel(1, 1, Color::BLACK));
        assert_eq!(cif.ids_of(Color::BLACK).unwrap(), &[0, 1, 2, 3]);
        assert_eq!(cif.ids_of(Color::WHITE).unwrap(), &[] as &[u32]);
        assert_eq!(cif.owner_of(3), Some(Color::BLACK));
    }

    #[test]
    fn test_recolor_pixel_same_color_is_noop_failure() {
        let mut cif = two_by_two();
        assert!(!cif.recolor_pixel(0, 0, Color::BLACK));
        assert_eq!(cif.len(), 4);
    }

    #[test]
    fn test_recolor_pixel_out_of_bounds() {
        let mut cif = two_by_two();
        assert!(!cif.recolor_pixel(0, 2, Color::RED));
        assert!(!cif.recolor_pixel(2, 0, Color::RED));
        assert_eq!(cif.len(), 4);
        assert_eq!(cif.ids_of(Color::RED), None);
    }

    #[test]
    fn test_recolor_pixel_huge_coordinates() {
        // A y large enough that y * width wraps u32 must fail cleanly,
        // not panic or alias onto an in-bounds pixel
        let mut cif = two_by_two();
        assert!(!cif.recolor_pixel(0, 1 << 31, Color::RED));
        assert!(!cif.recolor_pixel(1 << 31, 0, Color::RED));
        assert!(!cif.recolor_pixel(u32::MAX, u32::MAX, Color::RED));
        assert_eq!(cif.len(), 4);
        assert_eq!(cif.ids_of(Color::RED), None);
        assert_eq!(cif.owner_of(0), Some(Color::BLACK));
    }

    #[test]
    fn test_recolor_pixel_unowned() {
        let mut cif = Cif::from_image(2, 2, false, vec![(Color::BLACK, vec![0])]);
        assert!(!cif.recolor_pixel(1, 1, Color::RED));
    }

    #[test]
    fn test_recolor_pixel_creates_bucket() {
        let mut cif = two_by_two();
        assert!(cif.recolor_pixel(0, 0, Color::RED));
        assert_eq!(cif.ids_of(Color::RED).unwrap(), &[0]);
        assert_eq!(cif.ids_of(Color::BLACK).unwrap(), &[1, 2]);
        // Snapshot is unchanged, live count now sees three colors
        assert_eq!(cif.number_of_colors(), 2);
        assert_eq!(cif.color_count(), 3);
    }

    #[test]
    fn test_ghost_bucket_left_behind() {
        let mut cif = two_by_two();
        assert!(cif.recolor_pixel(1, 1, Color::BLACK));
        // White's bucket is still enumerated, just empty
        let buckets: Vec<_> = cif.buckets().collect();
        assert_eq!(buckets.len(), 2);
        assert_eq!(cif.color_count(), 1);
    }

    #[test]
    fn test_recolor_bucket_scenario() {
        let mut cif = Cif::from_image(
            2,
            2,
            false,
            vec![(Color::BLACK, vec![0]), (Color::WHITE, vec![1, 2])],
        );
        assert!(cif.recolor_bucket(Color::WHITE, Color::BLACK));
        assert_eq!(cif.ids_of(Color::BLACK).unwrap(), &[0, 1, 2]);
        // The white entry is removed outright, not left as a ghost
        assert_eq!(cif.ids_of(Color::WHITE), None);
        assert_eq!(cif.owner_of(1), Some(Color::BLACK));
    }

    #[test]
    fn test_recolor_bucket_into_fresh_color() {
        let mut cif = two_by_two();
        assert!(cif.recolor_bucket(Color::WHITE, Color::RED));
        assert_eq!(cif.ids_of(Color::RED).unwrap(), &[3]);
        assert_eq!(cif.ids_of(Color::WHITE), None);
    }

    #[test]
    fn test_recolor_bucket_missing_or_same() {
        let mut cif = two_by_two();
        assert!(!cif.recolor_bucket(Color::RED, Color::BLACK));
        assert!(!cif.recolor_bucket(Color::BLACK, Color::BLACK));
        assert_eq!(cif.len(), 4);
    }

    #[test]
    fn test_recolor_bucket_keeps_index_consistent() {
        // Removing a middle bucket shifts later slots; lookups must survive
        let mut cif = Cif::from_image(
            3,
            1,
            false,
            vec![
                (Color::RED, vec![0]),
                (Color::GREEN, vec![1]),
                (Color::BLUE, vec![2]),
            ],
        );
        assert!(cif.recolor_bucket(Color::RED, Color::GREEN));
        assert_eq!(cif.ids_of(Color::GREEN).unwrap(), &[1, 0]);
        assert_eq!(cif.ids_of(Color::BLUE).unwrap(), &[2]);
        assert!(cif.recolor_pixel(2, 0, Color::GREEN));
        assert_eq!(cif.ids_of(Color::GREEN).unwrap(), &[1, 0, 2]);
    }

    #[test]
    fn test_conservation_and_disjointness() {
        let mut cif = two_by_two();
        cif.recolor_pixel(0, 0, Color::RED);
        cif.recolor_bucket(Color::WHITE, Color::RED);
        cif.recolor_pixel(1, 0, Color::WHITE);
        assert_eq!(cif.len(), 4);

        let mut seen = std::collections::HashSet::new();
        for (_, ids) in cif.buckets() {
            for &id in ids {
                assert!(seen.insert(id), "id {id} owned twice");
                assert!(id < cif.checksum());
            }
        }
    }

    #[test]
    fn test_render() {
        let cif = two_by_two();
        let buffer = cif.render();
        assert_eq!(buffer.get(0, 0).unwrap(), Color::BLACK);
        assert_eq!(buffer.get(1, 0).unwrap(), Color::BLACK);
        assert_eq!(buffer.get(0, 1).unwrap(), Color::BLACK);
        assert_eq!(buffer.get(1, 1).unwrap(), Color::WHITE);
    }

    #[test]
    fn test_render_partial_keeps_background() {
        let cif = Cif::from_image(2, 2, false, vec![(Color::RED, vec![1])]);
        let buffer = cif.render();
        assert_eq!(buffer.get(1, 0).unwrap(), Color::RED);
        assert_eq!(buffer.get(0, 0).unwrap(), Color::TRANSPARENT);
        assert_eq!(buffer.get(1, 1).unwrap(), Color::TRANSPARENT);
    }
}
