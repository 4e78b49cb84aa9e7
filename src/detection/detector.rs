//! 检测器统一接口
//!
//! 推理本身是外部协作方 (图片 → 检测列表的黑盒函数),
//! 本crate只定义接口与离线回放实现,不包含模型加载和前向传播

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;

use super::types::Detection;

/// 目标检测器 Trait
///
/// 所有检测来源 (在线推理、离线回放、测试桩) 都应实现此接口
pub trait Detector {
    /// 对一帧彩色图像执行检测
    ///
    /// # 返回
    /// 当前帧的全部检测结果 (未做置信度过滤,由定位会话统一过滤)
    fn detect(&mut self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

/// 离线回放检测器
///
/// 按帧序播放预先录制的检测结果 (JSON),序列耗尽后返回空列表。
/// 用于无推理引擎环境下驱动完整定位流水线,也是测试桩
pub struct ReplayDetector {
    frames: Vec<Vec<Detection>>,
    cursor: usize,
}

impl ReplayDetector {
    /// 从逐帧检测序列创建
    pub fn new(frames: Vec<Vec<Detection>>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// 从单帧JSON文件加载 (录制格式: Detection数组)
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("读取检测文件失败: {}", path.display()))?;
        let detections: Vec<Detection> = serde_json::from_str(&json)
            .with_context(|| format!("解析检测文件失败: {}", path.display()))?;
        Ok(Self::new(vec![detections]))
    }

    /// 剩余未播放的帧数
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }
}

impl Detector for ReplayDetector {
    fn detect(&mut self, _image: &DynamicImage) -> Result<Vec<Detection>> {
        let detections = self.frames.get(self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::types::BBox;

    fn det(label: &str) -> Detection {
        Detection::new(
            label,
            BBox {
                x1: 0.0,
                y1: 0.0,
                x2: 10.0,
                y2: 10.0,
                confidence: 0.9,
                class_id: 0,
            },
        )
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("fruitvision_detector_test.json");
        let json = r#"[{"label":"orange","x1":5.0,"y1":5.0,"x2":20.0,"y2":20.0,"confidence":0.7,"class_id":2}]"#;
        fs::write(&path, json).unwrap();

        let mut replay = ReplayDetector::from_file(&path).unwrap();
        let img = DynamicImage::new_rgb8(4, 4);
        let dets = replay.detect(&img).unwrap();
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].label, "orange");
        assert_eq!(dets[0].bbox.class_id, 2);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_replay_in_order() {
        let mut replay = ReplayDetector::new(vec![vec![det("apple")], vec![det("banana")]]);
        let img = DynamicImage::new_rgb8(4, 4);

        let f0 = replay.detect(&img).unwrap();
        assert_eq!(f0[0].label, "apple");
        let f1 = replay.detect(&img).unwrap();
        assert_eq!(f1[0].label, "banana");
        // 序列耗尽后为空帧
        assert!(replay.detect(&img).unwrap().is_empty());
        assert_eq!(replay.remaining(), 0);
    }
}
