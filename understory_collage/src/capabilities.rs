// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces to collaborators outside the editing core: the photo picker and
//! purchase entitlements.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// An image returned by the photo picker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickedImage {
    /// Opaque reference to the image.
    pub uri: String,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// File size in bytes, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// MIME type, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl PickedImage {
    /// An image with only the required fields.
    #[must_use]
    pub fn new(uri: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            uri: uri.into(),
            width,
            height,
            file_size: None,
            mime_type: None,
        }
    }
}

/// What to ask the picker for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickOptions {
    /// Allow selecting more than one image.
    pub multiple: bool,
    /// Upper bound on the selection when `multiple` is set.
    pub max_photos: usize,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            multiple: false,
            max_photos: 30,
        }
    }
}

impl PickOptions {
    /// Selecting up to `max_photos` images.
    #[must_use]
    pub fn multiple(max_photos: usize) -> Self {
        Self {
            multiple: true,
            max_photos,
        }
    }

    /// Number of images the picker may return.
    #[must_use]
    pub fn selection_limit(&self) -> usize {
        if self.multiple { self.max_photos } else { 1 }
    }
}

/// The platform photo picker.
///
/// A dismissed picker returns an empty list rather than an error.
pub trait PhotoPicker {
    /// Lets the user choose images.
    fn pick(&mut self, options: PickOptions) -> Vec<PickedImage>;
}

/// A picker that hands out a fixed list, for tests and scripted imports.
#[derive(Clone, Debug, Default)]
pub struct StaticPicker {
    images: Vec<PickedImage>,
}

impl StaticPicker {
    /// A picker that will return `images` (truncated to each request's limit).
    #[must_use]
    pub fn new(images: Vec<PickedImage>) -> Self {
        Self { images }
    }
}

impl PhotoPicker for StaticPicker {
    fn pick(&mut self, options: PickOptions) -> Vec<PickedImage> {
        let count = options.selection_limit().min(self.images.len());
        self.images.drain(..count).collect()
    }
}

/// Features sold through in-app purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Entitlement {
    /// Premium template layouts.
    PremiumTemplates,
    /// Premium filters.
    PremiumFilters,
    /// Automatic arrangement.
    AiArrange,
    /// PDF export.
    PdfExport,
    /// Removing the export watermark.
    WatermarkToggle,
    /// Cloud backup of projects.
    CloudBackup,
}

impl Entitlement {
    /// Every entitlement.
    pub const ALL: [Self; 6] = [
        Self::PremiumTemplates,
        Self::PremiumFilters,
        Self::AiArrange,
        Self::PdfExport,
        Self::WatermarkToggle,
        Self::CloudBackup,
    ];
}

/// Answers whether a purchased feature is available.
pub trait Entitlements {
    /// Returns `true` if `entitlement` is unlocked.
    fn is_unlocked(&self, entitlement: Entitlement) -> bool;
}

/// A fixed entitlement set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticEntitlements {
    unlocked: HashSet<Entitlement>,
}

impl StaticEntitlements {
    /// Nothing unlocked.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Everything unlocked.
    #[must_use]
    pub fn all() -> Self {
        Self::from_iter(Entitlement::ALL)
    }

    /// Unlocks or relocks one entitlement.
    pub fn set(&mut self, entitlement: Entitlement, unlocked: bool) {
        if unlocked {
            self.unlocked.insert(entitlement);
        } else {
            self.unlocked.remove(&entitlement);
        }
    }
}

impl FromIterator<Entitlement> for StaticEntitlements {
    fn from_iter<I: IntoIterator<Item = Entitlement>>(iter: I) -> Self {
        Self {
            unlocked: iter.into_iter().collect(),
        }
    }
}

impl Entitlements for StaticEntitlements {
    fn is_unlocked(&self, entitlement: Entitlement) -> bool {
        self.unlocked.contains(&entitlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_picker_respects_selection_limit() {
        let mut picker = StaticPicker::new(vec![
            PickedImage::new("a", 10, 10),
            PickedImage::new("b", 10, 10),
            PickedImage::new("c", 10, 10),
        ]);
        assert_eq!(picker.pick(PickOptions::default()).len(), 1);
        assert_eq!(picker.pick(PickOptions::multiple(5)).len(), 2);
        assert!(picker.pick(PickOptions::multiple(5)).is_empty());
    }

    #[test]
    fn entitlements_toggle() {
        let mut entitlements = StaticEntitlements::none();
        assert!(!entitlements.is_unlocked(Entitlement::PremiumTemplates));
        entitlements.set(Entitlement::PremiumTemplates, true);
        assert!(entitlements.is_unlocked(Entitlement::PremiumTemplates));
        assert!(StaticEntitlements::all().is_unlocked(Entitlement::CloudBackup));
    }

    #[test]
    fn entitlement_names_are_camel_case() {
        let json = serde_json::to_string(&Entitlement::WatermarkToggle).unwrap();
        assert_eq!(json, "\"watermarkToggle\"");
    }
}
