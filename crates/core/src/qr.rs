//! QR issuance for batches.
//!
//! A batch of `N` plants gets `N + 1` codes: one batch-level code followed by
//! one code per plant in ascending index order. Labels are printed in that
//! order, so it must never change. Each code links to the public plant page
//! and is delivered as a PNG data URL that can be dropped into an `<img>`.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Minimum rendered width/height of a code, in pixels.
pub const QR_MIN_DIMENSION: u32 = 200;

/// Prefix of every rendered code.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("QR encoding failed for '{target}': {message}")]
    Encode { target: String, message: String },

    #[error("PNG rendering failed: {0}")]
    Png(#[from] image::ImageError),
}

impl From<QrError> for CoreError {
    fn from(err: QrError) -> Self {
        CoreError::Internal(err.to_string())
    }
}

/// What a code identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QrKind {
    /// The lot as a whole.
    Batch,
    /// One physical plant in the lot.
    Individual,
}

/// One issued code. Never persisted; regenerate with [`issue_codes`].
#[derive(Debug, Clone, Serialize)]
pub struct IssuedQrCode {
    #[serde(rename = "type")]
    pub kind: QrKind,
    /// 1-based plant index, absent on the batch code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant: Option<i32>,
    /// The public page URL encoded in the code.
    pub target: String,
    /// The rendered image as a `data:image/png;base64,` URL.
    pub url: String,
}

/// Build the public plant page URL a code points to.
pub fn plant_page_url(
    base_url: &str,
    plant_type_id: DbId,
    batch_id: DbId,
    plant: Option<i32>,
) -> String {
    let base = base_url.trim_end_matches('/');
    match plant {
        Some(index) => format!("{base}/plant/{plant_type_id}?batch={batch_id}&plant={index}"),
        None => format!("{base}/plant/{plant_type_id}?batch={batch_id}"),
    }
}

/// Encode `target` as a QR code and return it as a PNG data URL.
pub fn render_png_data_url(target: &str) -> Result<String, QrError> {
    let code = QrCode::new(target.as_bytes()).map_err(|e| QrError::Encode {
        target: target.to_string(),
        message: e.to_string(),
    })?;

    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .build();

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(&png)))
}

/// Issue all codes for a batch: the batch code first, then one per plant.
///
/// Any single failure aborts the whole run; there are no partial results.
pub fn issue_codes(
    base_url: &str,
    plant_type_id: DbId,
    batch_id: DbId,
    initial_quantity: i32,
) -> Result<Vec<IssuedQrCode>, QrError> {
    let plants = initial_quantity.max(0);
    let mut codes = Vec::with_capacity(plants as usize + 1);

    let target = plant_page_url(base_url, plant_type_id, batch_id, None);
    codes.push(IssuedQrCode {
        kind: QrKind::Batch,
        plant: None,
        url: render_png_data_url(&target)?,
        target,
    });

    for index in 1..=plants {
        let target = plant_page_url(base_url, plant_type_id, batch_id, Some(index));
        codes.push(IssuedQrCode {
            kind: QrKind::Individual,
            plant: Some(index),
            url: render_png_data_url(&target)?,
            target,
        });
    }

    Ok(codes)
}
