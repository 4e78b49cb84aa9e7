/// 帧处理流水线 (Frame Processing Pipeline)
///
/// 单线程顺序处理,每帧依次:
/// 检测结果 → 框中心深度采样 → 反投影 → 逐标签坐标平滑 → 定位结果
///
/// - FrameBundle:    一帧完整输入的离线装载 (彩色帧 + 深度图 + 录制检测)
/// - SpatialLocator: 定位会话,持有平滑状态
pub mod locator;

pub use locator::SpatialLocator;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;

use crate::depth::DepthGrid;
use crate::detection::Detection;

/// 一帧完整输入 (彩色帧 + 深度图 + 录制的检测结果)
pub struct FrameBundle {
    pub color: DynamicImage,
    pub depth: DepthGrid,
    pub detections: Vec<Detection>,
}

impl FrameBundle {
    fn color_path(dir: &Path, index: usize) -> PathBuf {
        dir.join(format!("frame_{:04}.png", index))
    }

    fn depth_path(dir: &Path, index: usize) -> PathBuf {
        dir.join(format!("depth_{:04}.png", index))
    }

    fn detections_path(dir: &Path, index: usize) -> PathBuf {
        dir.join(format!("detections_{:04}.json", index))
    }

    /// 目录中是否存在第index帧
    pub fn exists(dir: &Path, index: usize) -> bool {
        Self::color_path(dir, index).is_file()
    }

    /// 装载第index帧
    ///
    /// 深度图为16位灰度PNG (z16原始值),检测结果为JSON数组
    pub fn load(dir: &Path, index: usize, depth_scale: f32) -> Result<Self> {
        let color_path = Self::color_path(dir, index);
        let color = image::open(&color_path)
            .with_context(|| format!("读取彩色帧失败: {}", color_path.display()))?;

        let depth_path = Self::depth_path(dir, index);
        let depth_img = image::open(&depth_path)
            .with_context(|| format!("读取深度图失败: {}", depth_path.display()))?
            .into_luma16();
        let (w, h) = (depth_img.width(), depth_img.height());
        let depth = DepthGrid::from_raw(w, h, depth_img.into_raw(), depth_scale)?;

        let det_path = Self::detections_path(dir, index);
        let json = std::fs::read_to_string(&det_path)
            .with_context(|| format!("读取检测文件失败: {}", det_path.display()))?;
        let detections: Vec<Detection> = serde_json::from_str(&json)
            .with_context(|| format!("解析检测文件失败: {}", det_path.display()))?;

        Ok(Self {
            color,
            depth,
            detections,
        })
    }
}
