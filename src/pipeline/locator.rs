//! 空间定位会话 (Spatial Locator)
//!
//! 把2D检测结果提升为相机坐标系下的3D定位:
//! 框中心 → 窗口平均深度 → 针孔反投影 → 逐标签EMA平滑
//!
//! 平滑状态由会话持有,多个会话互相独立,便于并行测试与多路输入

use anyhow::Result;
use log::debug;

use crate::config::VisionConfig;
use crate::depth::{DepthGrid, Intrinsics};
use crate::detection::{Detection, LocatedObject};
use crate::smoothing::{Point3, PositionSmoother};

/// 定位会话
pub struct SpatialLocator {
    config: VisionConfig,
    smoother: PositionSmoother,
}

impl SpatialLocator {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            config,
            smoother: PositionSmoother::new(),
        }
    }

    /// 处理一帧检测结果
    ///
    /// 每个过阈值的检测:
    /// 1. 取框中心像素
    /// 2. 窗口平均深度 (无效采样跳过)
    /// 3. 深度无效时跳过平滑,距离记0,不触碰平滑状态
    /// 4. 反投影 + 逐标签平滑
    pub fn locate(
        &mut self,
        detections: &[Detection],
        depth: &DepthGrid,
        intrinsics: &Intrinsics,
    ) -> Result<Vec<LocatedObject>> {
        let mut located = Vec::with_capacity(detections.len());

        for det in detections {
            if det.bbox.confidence < self.config.conf_threshold {
                continue;
            }

            let (cx, cy) = det.bbox.center();
            let distance =
                depth.average_distance(cx.round() as i32, cy.round() as i32, self.config.depth_window);

            if distance <= 0.0 {
                // 无有效深度: 本帧不参与平滑
                debug!("📏 {} 无有效深度, 跳过平滑", det.label);
                located.push(LocatedObject {
                    label: det.label.clone(),
                    bbox: det.bbox,
                    confidence: det.bbox.confidence,
                    distance: 0.0,
                    position: Point3::default(),
                });
                continue;
            }

            let raw = intrinsics.deproject(cx, cy, distance);
            let position = self
                .smoother
                .smooth(&det.label, raw, self.config.smooth_alpha)?;

            located.push(LocatedObject {
                label: det.label.clone(),
                bbox: det.bbox,
                confidence: det.bbox.confidence,
                distance,
                position,
            });
        }

        Ok(located)
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    pub fn smoother(&self) -> &PositionSmoother {
        &self.smoother
    }

    /// 清空平滑状态 (如切换输入源后)
    pub fn reset(&mut self) {
        self.smoother.reset();
    }
}
