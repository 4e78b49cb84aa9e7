//! 深度感知模块 (Depth Sensing)
//!
//! 深度传感器采集是外部协作方,这里只处理拿到手的深度图:
//! - DepthGrid:   z16原始深度图 + 量化系数 → 米制距离查询
//! - 窗口平均采样: 框中心单点深度噪声大,取周边窗口的有效均值
//! - Intrinsics:  针孔模型反投影 (像素 + 深度 → 相机坐标系3D点)

pub mod intrinsics;

pub use intrinsics::Intrinsics;

use anyhow::{bail, Result};
use ndarray::Array2;

/// RealSense z16 深度流的默认量化系数 (米/单位)
pub const DEFAULT_DEPTH_SCALE: f32 = 0.001;

/// 深度图 (行主序u16原始值)
///
/// 原始值0表示无效测量 (遮挡、超量程、红外失配),
/// 距离查询一律以米为单位返回,无效处返回0.0
#[derive(Clone, Debug)]
pub struct DepthGrid {
    data: Array2<u16>,
    depth_scale: f32,
}

impl DepthGrid {
    pub fn new(data: Array2<u16>, depth_scale: f32) -> Self {
        Self { data, depth_scale }
    }

    /// 从行主序原始采样构建,长度必须等于 width * height
    pub fn from_raw(width: u32, height: u32, samples: Vec<u16>, depth_scale: f32) -> Result<Self> {
        if samples.len() != (width as usize) * (height as usize) {
            bail!(
                "深度图尺寸不匹配: {}x{} 需要 {} 个采样, 实际 {}",
                width,
                height,
                (width as usize) * (height as usize),
                samples.len()
            );
        }
        let data = Array2::from_shape_vec((height as usize, width as usize), samples)?;
        Ok(Self::new(data, depth_scale))
    }

    pub fn width(&self) -> u32 {
        self.data.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.data.nrows() as u32
    }

    pub fn depth_scale(&self) -> f32 {
        self.depth_scale
    }

    /// 单像素距离 (米)
    ///
    /// 越界或无效测量返回0.0
    pub fn distance(&self, x: u32, y: u32) -> f32 {
        match self.data.get((y as usize, x as usize)) {
            Some(&raw) => raw as f32 * self.depth_scale,
            None => 0.0,
        }
    }

    /// 以 (cx, cy) 为中心、边长window的窗口内有效距离均值 (米)
    ///
    /// 窗口在帧边界处收缩,原始值为0的采样跳过;
    /// 窗口内无任何有效采样时返回0.0
    pub fn average_distance(&self, cx: i32, cy: i32, window: u32) -> f32 {
        let half = (window / 2) as i32;
        let x_min = (cx - half).max(0);
        let x_max = (cx + half).min(self.width() as i32 - 1);
        let y_min = (cy - half).max(0);
        let y_max = (cy + half).min(self.height() as i32 - 1);

        if x_min > x_max || y_min > y_max {
            return 0.0;
        }

        let mut sum = 0.0f64;
        let mut count = 0u32;
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let d = self.distance(x as u32, y as u32);
                if d > 0.0 {
                    sum += d as f64;
                    count += 1;
                }
            }
        }

        if count == 0 {
            return 0.0;
        }
        (sum / count as f64) as f32
    }
}
