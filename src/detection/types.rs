//! 检测系统数据结构定义
//! Data structures for the detection system

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::smoothing::Point3;

// ========== 公共常量 ==========

/// 检测器推理输入尺寸
pub const INF_SIZE: u32 = 640;

/// 类别词表外的标签使用的默认框色 (绿色)
pub const DEFAULT_COLOR: (u8, u8, u8) = (0, 255, 0);

/// 固定水果类别词表 → 显示颜色
///
/// 词表由训练数据集外部定义,这里只负责显示映射
pub static CLASS_COLORS: phf::Map<&'static str, (u8, u8, u8)> = phf_map! {
    "apple" => (220, 40, 40),
    "banana" => (240, 200, 30),
    "orange" => (250, 140, 20),
    "mango" => (250, 180, 60),
    "grape" => (130, 60, 170),
    "pear" => (170, 210, 60),
    "peach" => (250, 160, 130),
    "strawberry" => (230, 60, 90),
    "pineapple" => (210, 190, 60),
    "watermelon" => (60, 170, 80),
};

/// 标签对应的显示颜色,词表外回退为绿色
pub fn class_color(label: &str) -> (u8, u8, u8) {
    CLASS_COLORS.get(label).copied().unwrap_or(DEFAULT_COLOR)
}

// ========== 数据结构 ==========

/// 检测框 (Detection bounding box)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
    pub class_id: u32,
}

impl BBox {
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// 中心点 (深度采样与反投影的参考像素)
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// 交并比 (Intersection over Union)
    pub fn iou(&self, other: &BBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = (x2 - x1) * (y2 - y1);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

/// 单个检测结果 (检测器 → 定位会话)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// 类别标签 (来自固定词表)
    pub label: String,

    #[serde(flatten)]
    pub bbox: BBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, bbox: BBox) -> Self {
        Self {
            label: label.into(),
            bbox,
        }
    }
}

/// 空间定位结果 (定位会话 → 渲染/导出)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocatedObject {
    pub label: String,
    pub bbox: BBox,
    pub confidence: f32,

    /// 框中心窗口平均距离 (米); 0.0 表示本帧无有效深度
    pub distance: f32,

    /// 平滑后的相机坐标系3D位置 (米)
    pub position: Point3,
}

impl LocatedObject {
    /// 本帧是否取到有效深度
    pub fn has_depth(&self) -> bool {
        self.distance > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: f32, y1: f32, x2: f32, y2: f32) -> BBox {
        BBox {
            x1,
            y1,
            x2,
            y2,
            confidence: 0.9,
            class_id: 0,
        }
    }

    #[test]
    fn test_center() {
        let b = bbox(10.0, 20.0, 30.0, 60.0);
        assert_eq!(b.center(), (20.0, 40.0));
    }

    #[test]
    fn test_iou_disjoint() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_identical() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_class_color_fallback() {
        assert_eq!(class_color("apple"), (220, 40, 40));
        assert_eq!(class_color("durian"), DEFAULT_COLOR);
    }

    #[test]
    fn test_detection_json_roundtrip() {
        // 录制格式: bbox字段平铺在标签旁
        let json = r#"{"label":"apple","x1":1.0,"y1":2.0,"x2":3.0,"y2":4.0,"confidence":0.8,"class_id":0}"#;
        let det: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(det.label, "apple");
        assert_eq!(det.bbox.x2, 3.0);
        let back = serde_json::to_string(&det).unwrap();
        let det2: Detection = serde_json::from_str(&back).unwrap();
        assert_eq!(det, det2);
    }
}
