//! 相机内参与反投影 (针孔模型)

use serde::{Deserialize, Serialize};

use crate::smoothing::Point3;

/// 深度流内参
///
/// 焦距与主点均以像素计,对应传感器出厂标定值
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    pub width: u32,
    pub height: u32,
    /// 焦距X (像素)
    pub fx: f32,
    /// 焦距Y (像素)
    pub fy: f32,
    /// 主点X (像素)
    pub ppx: f32,
    /// 主点Y (像素)
    pub ppy: f32,
}

impl Intrinsics {
    /// 像素 + 距离 → 相机坐标系3D点
    ///
    /// X = (px - ppx) / fx * depth
    /// Y = (py - ppy) / fy * depth
    /// Z = depth
    ///
    /// depth为0时退化为原点,调用方应先过滤无效深度
    pub fn deproject(&self, px: f32, py: f32, depth: f32) -> Point3 {
        Point3::new(
            (px - self.ppx) / self.fx * depth,
            (py - self.ppy) / self.fy * depth,
            depth,
        )
    }
}

impl Default for Intrinsics {
    /// D435 深度流 640x480 的近似标定值
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fx: 617.0,
            fy: 617.0,
            ppx: 320.0,
            ppy: 240.0,
        }
    }
}
