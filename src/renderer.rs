//! 标注渲染模块
//!
//! 在彩色帧上绘制检测框与说明文字:
//! `标签 置信度 距离m (X,Y,Z)`
//!
//! 点云等3D可视化属于外部协作方,这里只做2D帧标注

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::detection::{class_color, LocatedObject};

/// 框线宽度 (像素)
const BOX_THICKNESS: i32 = 2;

/// 说明文字字号
const CAPTION_SCALE: f32 = 14.0;

/// 说明文字: `标签 置信度 距离m (X,Y,Z)`
pub fn caption(obj: &LocatedObject) -> String {
    format!(
        "{} {:.2} {:.2}m ({:.2},{:.2},{:.2})",
        obj.label, obj.confidence, obj.distance, obj.position.x, obj.position.y, obj.position.z
    )
}

/// 加载标注字体
pub fn load_font(path: &Path) -> Result<FontVec> {
    let data =
        std::fs::read(path).with_context(|| format!("读取字体文件失败: {}", path.display()))?;
    let font = FontVec::try_from_vec(data)
        .map_err(|_| anyhow::anyhow!("字体文件格式无效: {}", path.display()))?;
    Ok(font)
}

/// 在帧上绘制全部定位结果
///
/// 字体缺失时只画框不写字
pub fn annotate(frame: &mut RgbImage, objects: &[LocatedObject], font: Option<&FontVec>) {
    for obj in objects {
        let (r, g, b) = class_color(&obj.label);
        let color = Rgb([r, g, b]);

        draw_bbox(frame, obj, color);

        if let Some(font) = font {
            // 文字放在框上方,顶边越界时收进帧内
            let x = obj.bbox.x1.max(0.0) as i32;
            let y = (obj.bbox.y1 as i32 - CAPTION_SCALE as i32 - 2).max(0);
            draw_text_mut(
                frame,
                color,
                x,
                y,
                PxScale::from(CAPTION_SCALE),
                font,
                &caption(obj),
            );
        }
    }
}

/// 绘制单个检测框 (向内收缩叠画,实现线宽)
fn draw_bbox(frame: &mut RgbImage, obj: &LocatedObject, color: Rgb<u8>) {
    let (fw, fh) = (frame.width() as f32, frame.height() as f32);
    let x1 = obj.bbox.x1.clamp(0.0, fw - 1.0);
    let y1 = obj.bbox.y1.clamp(0.0, fh - 1.0);
    let x2 = obj.bbox.x2.clamp(0.0, fw - 1.0);
    let y2 = obj.bbox.y2.clamp(0.0, fh - 1.0);

    for i in 0..BOX_THICKNESS {
        let w = (x2 - x1) as i32 - 2 * i;
        let h = (y2 - y1) as i32 - 2 * i;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(x1 as i32 + i, y1 as i32 + i).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(frame, rect, color);
    }
}
