//! Helpers over a set of photos from the same dataset.

use crate::photo_metadata::model::types::CameraMetadata;

fn area(photo: &CameraMetadata) -> u64 {
    photo.width() as u64 * photo.height() as u64
}

/// `(width, height)` of the photo with the most pixels. The first photo wins
/// ties.
pub fn largest_dimensions(photos: &[CameraMetadata]) -> Option<(u32, u32)> {
    largest_photo(photos).map(|photo| (photo.width(), photo.height()))
}

/// Longest side across all photos, 0 for an empty set.
pub fn largest_dimension(photos: &[CameraMetadata]) -> u32 {
    photos
        .iter()
        .map(|photo| photo.width().max(photo.height()))
        .max()
        .unwrap_or(0)
}

pub fn largest_photo(photos: &[CameraMetadata]) -> Option<&CameraMetadata> {
    photos.iter().fold(None, |largest, photo| match largest {
        Some(current) if area(current) >= area(photo) => Some(current),
        _ => Some(photo),
    })
}
