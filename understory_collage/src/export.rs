// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Export settings.
//!
//! Encoding is done elsewhere; the store only records the options of the last
//! export on the project.

use serde::{Deserialize, Serialize};

use crate::capabilities::{Entitlement, Entitlements};

/// Output resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    /// Reduced size for sharing.
    Low,
    /// High resolution.
    High,
    /// Full canvas resolution.
    Original,
}

/// Output container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// JPEG.
    Jpg,
    /// PNG.
    Png,
    /// PDF.
    Pdf,
}

/// How a project is exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Output resolution.
    pub quality: ExportQuality,
    /// Output container.
    pub format: ExportFormat,
    /// Stamp the watermark on the output.
    pub include_watermark: bool,
}

impl ExportOptions {
    /// Small watermarked JPEG.
    pub const QUICK_SHARE: Self = Self {
        quality: ExportQuality::Low,
        format: ExportFormat::Jpg,
        include_watermark: true,
    };

    /// High resolution watermarked PNG.
    pub const HIGH_RESOLUTION: Self = Self {
        quality: ExportQuality::High,
        format: ExportFormat::Png,
        include_watermark: true,
    };

    /// Full resolution PDF without watermark.
    pub const PRINT_READY: Self = Self {
        quality: ExportQuality::Original,
        format: ExportFormat::Pdf,
        include_watermark: false,
    };

    /// Downgrades options the user has not paid for.
    ///
    /// PDF falls back to PNG without [`Entitlement::PdfExport`], and the
    /// watermark is forced on without [`Entitlement::WatermarkToggle`].
    #[must_use]
    pub fn gated(self, entitlements: &dyn Entitlements) -> Self {
        let mut options = self;
        if options.format == ExportFormat::Pdf
            && !entitlements.is_unlocked(Entitlement::PdfExport)
        {
            options.format = ExportFormat::Png;
        }
        if !options.include_watermark && !entitlements.is_unlocked(Entitlement::WatermarkToggle) {
            options.include_watermark = true;
        }
        options
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::HIGH_RESOLUTION
    }
}
