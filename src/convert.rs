use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use image::{ImageReader, RgbImage};
use log::{debug, info};

use crate::header::HeaderDocument;
use crate::rgb565::rgb888_to_rgb565;
use crate::scale::{fit_within, ScaleLimits};

#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub var_name: String,
    pub limits: ScaleLimits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionReport {
    pub original: (u32, u32),
    pub width: u32,
    pub height: u32,
}

impl ConversionReport {
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn byte_size(&self) -> u64 {
        self.pixel_count() * 2
    }

    pub fn was_resized(&self) -> bool {
        self.original != (self.width, self.height)
    }
}

/// 解码 -> 缩放 -> RGB565 -> 写入头文件
pub fn convert(req: &ConversionRequest) -> Result<ConversionReport> {
    let img = load_rgb(&req.input)?;
    let original = img.dimensions();
    debug!("decoded {} ({}x{})", req.input.display(), original.0, original.1);

    let img = if req.limits.is_unbounded() {
        img
    } else {
        fit_within(img, &req.limits)?
    };
    let (width, height) = img.dimensions();
    let report = ConversionReport { original, width, height };
    if report.was_resized() {
        info!("Resized from {}x{} to {}x{}", original.0, original.1, width, height);
    }

    let pixels = rgb888_to_rgb565(img.as_raw());
    let source_name = req
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    HeaderDocument::new(&source_name, &req.var_name, width, height, &pixels)
        .write_to(&req.output)?;

    Ok(report)
}

/// 读取图片并转为RGB888(丢弃alpha通道)
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let reader = match ImageReader::open(path) {
        Ok(r) => r,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(anyhow!("File '{}' not found", path.display()));
        }
        Err(e) => return Err(e).with_context(|| format!("failed to open {}", path.display())),
    };
    let img = reader
        .with_guessed_format()
        .with_context(|| format!("failed to read {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(img.to_rgb8())
}
