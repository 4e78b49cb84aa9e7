//! 图像预处理模块
//!
//! 低光/低对比场景下检测器漏检明显,送检前做一次增强:
//! 对比度增益 + 亮度偏移 (饱和运算) → 可选高斯模糊 → 缩放到检测输入尺寸

use image::{imageops, DynamicImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;

use crate::config::VisionConfig;

/// 对比度增益 + 亮度偏移, 逐像素 clamp(p * contrast + brightness)
pub fn adjust_contrast_brightness(img: &RgbImage, contrast: f32, brightness: i32) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for c in pixel.0.iter_mut() {
            let v = (*c as f32 * contrast + brightness as f32).round();
            *c = v.clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// 完整增强流程, 返回检测器输入尺寸的图像
pub fn enhance(img: &DynamicImage, config: &VisionConfig) -> DynamicImage {
    let rgb = img.to_rgb8();

    // 1. 对比度/亮度
    let adjusted = adjust_contrast_brightness(&rgb, config.contrast, config.brightness);

    // 2. 高斯模糊 (抑制传感器噪声, sigma=0时跳过)
    let blurred = if config.blur_sigma > 0.0 {
        gaussian_blur_f32(&adjusted, config.blur_sigma)
    } else {
        adjusted
    };

    // 3. 缩放到检测输入尺寸
    let resized = imageops::resize(
        &blurred,
        config.detect_size,
        config.detect_size,
        imageops::FilterType::Triangle,
    );

    DynamicImage::ImageRgb8(resized)
}
