use anyhow::{anyhow, Result};
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use log::debug;

/// 最大尺寸限制, 0 等同于不限制
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaleLimits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl ScaleLimits {
    pub fn new(max_width: Option<u32>, max_height: Option<u32>) -> Self {
        Self {
            max_width: max_width.filter(|w| *w > 0),
            max_height: max_height.filter(|h| *h > 0),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_width.is_none() && self.max_height.is_none()
    }
}

/// 先检查宽度再检查高度, 两步各自按比例缩放
fn width_stage(width: u32, height: u32, limits: &ScaleLimits) -> Option<(u32, u32)> {
    match limits.max_width {
        Some(max_width) if width > max_width => {
            let ratio = max_width as f64 / width as f64;
            Some((max_width, ((height as f64 * ratio) as u32).max(1)))
        }
        _ => None,
    }
}

fn height_stage(width: u32, height: u32, limits: &ScaleLimits) -> Option<(u32, u32)> {
    match limits.max_height {
        Some(max_height) if height > max_height => {
            let ratio = max_height as f64 / height as f64;
            Some((((width as f64 * ratio) as u32).max(1), max_height))
        }
        _ => None,
    }
}

/// 缩放步骤: 宽度超限和高度超限各算一步, 每一步都单独重采样
pub fn scale_steps(width: u32, height: u32, limits: &ScaleLimits) -> Vec<(u32, u32)> {
    let mut steps = Vec::with_capacity(2);
    let (mut w, mut h) = (width, height);
    if let Some(size) = width_stage(w, h, limits) {
        steps.push(size);
        (w, h) = size;
    }
    if let Some(size) = height_stage(w, h, limits) {
        steps.push(size);
    }
    steps
}

/// 把图像缩放到限制范围内, 已经满足限制时原样返回
pub fn fit_within(mut img: RgbImage, limits: &ScaleLimits) -> Result<RgbImage> {
    for (w, h) in scale_steps(img.width(), img.height(), limits) {
        img = resample(&mut img, w, h)?;
    }
    Ok(img)
}

/// Lanczos3 重采样
pub fn resample(src: &mut RgbImage, dst_width: u32, dst_height: u32) -> Result<RgbImage> {
    debug!("resample {}x{} -> {}x{}", src.width(), src.height(), dst_width, dst_height);
    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x3);
    let src_view = Image::from_slice_u8(src.width(), src.height(), src.as_mut(), PixelType::U8x3)?;
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();
    resizer.resize(&src_view, &mut dst_image, &options)?;
    RgbImage::from_raw(dst_width, dst_height, dst_image.buffer().to_vec())
        .ok_or_else(|| anyhow!("resampled buffer does not match {dst_width}x{dst_height}"))
}
