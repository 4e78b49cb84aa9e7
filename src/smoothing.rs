//! 3D坐标平滑模块 (Position Smoother)
//!
//! 深度采样逐帧抖动会让目标的3D坐标跳变,这里对每个类别标签
//! 维护一条指数移动平均 (EMA) 轨迹:
//!
//! ```text
//! smoothed = alpha * raw + (1 - alpha) * prev
//! ```
//!
//! - alpha ∈ (0, 1]: 新样本权重,越小越平滑 (默认 0.5)
//! - 首次出现的标签: 直接存储原始坐标 (冷启动,不平滑)

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 默认平滑系数 (新样本权重)
pub const DEFAULT_ALPHA: f32 = 0.5;

/// 相机坐标系下的3D点 (单位: 米)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 三个分量均为有限值 (非 NaN / ±inf)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2},{:.2},{:.2})", self.x, self.y, self.z)
    }
}

/// 输入校验错误
///
/// 非法输入在边界处拒绝,不做静默修正
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothError {
    /// 坐标分量含 NaN 或 ±inf
    NonFinitePosition(Point3),
    /// alpha 超出 (0, 1] 区间
    InvalidAlpha(f32),
}

impl fmt::Display for SmoothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmoothError::NonFinitePosition(p) => {
                write!(f, "坐标分量非有限值: ({},{},{})", p.x, p.y, p.z)
            }
            SmoothError::InvalidAlpha(a) => {
                write!(f, "alpha必须在(0,1]区间内, 实际为 {}", a)
            }
        }
    }
}

impl std::error::Error for SmoothError {}

/// 坐标平滑器
///
/// 状态为 标签 → 最近一次平滑坐标 的映射,由调用方 (定位会话) 持有,
/// 多个会话互相独立。条目只增不删,数量受固定类别词表约束。
///
/// 注意: 以类别标签为键,同类的两个目标会互相覆盖同一条轨迹,
/// 需要逐实例跟踪时应改用跟踪器输出的track id作键
#[derive(Debug, Clone, Default)]
pub struct PositionSmoother {
    prev_coords: HashMap<String, Point3>,
}

impl PositionSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// 融合一次新的坐标观测
    ///
    /// - 标签首次出现: 原样存储并返回 (冷启动)
    /// - 其后每次: `alpha * raw + (1 - alpha) * prev`,逐分量计算
    ///
    /// 对每个标签每次调用恰好一读一写,输出不做归一化或限幅。
    /// 无效深度 (距离为0) 产生的坐标应由调用方先行过滤。
    pub fn smooth(&mut self, label: &str, raw: Point3, alpha: f32) -> Result<Point3, SmoothError> {
        // alpha为NaN时比较为false,一并拒绝
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(SmoothError::InvalidAlpha(alpha));
        }
        if !raw.is_finite() {
            return Err(SmoothError::NonFinitePosition(raw));
        }

        let smoothed = match self.prev_coords.get(label) {
            Some(prev) => Point3::new(
                alpha * raw.x + (1.0 - alpha) * prev.x,
                alpha * raw.y + (1.0 - alpha) * prev.y,
                alpha * raw.z + (1.0 - alpha) * prev.z,
            ),
            None => raw,
        };
        self.prev_coords.insert(label.to_string(), smoothed);
        Ok(smoothed)
    }

    /// 查询某标签最近的平滑坐标
    pub fn last(&self, label: &str) -> Option<Point3> {
        self.prev_coords.get(label).copied()
    }

    /// 当前已跟踪的标签数量
    pub fn len(&self) -> usize {
        self.prev_coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prev_coords.is_empty()
    }

    /// 清空全部平滑状态 (如切换场景后)
    pub fn reset(&mut self) {
        self.prev_coords.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point3, b: Point3) {
        assert!((a.x - b.x).abs() < 1e-5, "x: {} vs {}", a.x, b.x);
        assert!((a.y - b.y).abs() < 1e-5, "y: {} vs {}", a.y, b.y);
        assert!((a.z - b.z).abs() < 1e-5, "z: {} vs {}", a.z, b.z);
    }

    #[test]
    fn test_cold_start_identity() {
        let mut smoother = PositionSmoother::new();
        let v = Point3::new(0.12, -0.34, 1.56);
        let out = smoother.smooth("apple", v, 0.3).unwrap();
        assert_close(out, v);
        assert_close(smoother.last("apple").unwrap(), v);
    }

    #[test]
    fn test_ema_recurrence() {
        // 任意alpha下: smooth(L, V) == alpha*V + (1-alpha)*S,逐分量
        for &alpha in &[0.1f32, 0.25, 0.5, 0.75, 1.0] {
            let mut smoother = PositionSmoother::new();
            let s = Point3::new(1.0, 2.0, 3.0);
            let v = Point3::new(-2.0, 0.5, 4.0);
            smoother.smooth("pear", s, alpha).unwrap();
            let out = smoother.smooth("pear", v, alpha).unwrap();
            let expected = Point3::new(
                alpha * v.x + (1.0 - alpha) * s.x,
                alpha * v.y + (1.0 - alpha) * s.y,
                alpha * v.z + (1.0 - alpha) * s.z,
            );
            assert_close(out, expected);
            assert_close(smoother.last("pear").unwrap(), expected);
        }
    }

    #[test]
    fn test_alpha_one_is_memoryless() {
        // alpha=1: 每次原样返回新值
        let mut smoother = PositionSmoother::new();
        smoother.smooth("banana", Point3::new(1.0, 1.0, 1.0), 1.0).unwrap();
        let out = smoother.smooth("banana", Point3::new(9.0, -9.0, 0.5), 1.0).unwrap();
        assert_close(out, Point3::new(9.0, -9.0, 0.5));
    }

    #[test]
    fn test_small_alpha_keeps_first_value() {
        // alpha→0: 输出长期停留在首个观测值附近
        let mut smoother = PositionSmoother::new();
        let first = Point3::new(1.0, 2.0, 3.0);
        smoother.smooth("mango", first, 0.001).unwrap();
        let far = Point3::new(100.0, 100.0, 100.0);
        let mut out = first;
        for _ in 0..50 {
            out = smoother.smooth("mango", far, 0.001).unwrap();
        }
        // 50帧后仍明显偏向首值而非新值
        assert!((out.x - first.x).abs() < 10.0);
        assert!((out.x - far.x).abs() > 80.0);
    }

    #[test]
    fn test_apple_sequence() {
        // 具体场景: [1,2,3] → [3,2,3] → [2,2,1], alpha=0.5
        let mut smoother = PositionSmoother::new();
        let s1 = smoother.smooth("apple", Point3::new(1.0, 2.0, 3.0), 0.5).unwrap();
        assert_close(s1, Point3::new(1.0, 2.0, 3.0));
        let s2 = smoother.smooth("apple", Point3::new(3.0, 2.0, 3.0), 0.5).unwrap();
        assert_close(s2, Point3::new(2.0, 2.0, 3.0));
        let s3 = smoother.smooth("apple", Point3::new(2.0, 2.0, 1.0), 0.5).unwrap();
        assert_close(s3, Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_labels_are_independent() {
        let mut smoother = PositionSmoother::new();
        let apple = Point3::new(1.0, 0.0, 2.0);
        let banana = Point3::new(-1.0, 0.5, 0.8);
        smoother.smooth("apple", apple, 0.5).unwrap();
        smoother.smooth("banana", banana, 0.5).unwrap();
        // 更新apple不影响banana的存量
        smoother.smooth("apple", Point3::new(5.0, 5.0, 5.0), 0.5).unwrap();
        assert_close(smoother.last("banana").unwrap(), banana);
        assert_eq!(smoother.len(), 2);
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut smoother = PositionSmoother::new();
        let bad = Point3::new(f32::NAN, 1.0, 1.0);
        assert!(matches!(
            smoother.smooth("apple", bad, 0.5),
            Err(SmoothError::NonFinitePosition(_))
        ));
        let bad = Point3::new(1.0, f32::INFINITY, 1.0);
        assert!(matches!(
            smoother.smooth("apple", bad, 0.5),
            Err(SmoothError::NonFinitePosition(_))
        ));
        // 被拒绝的输入不得污染状态
        assert!(smoother.is_empty());
    }

    #[test]
    fn test_rejects_invalid_alpha() {
        let mut smoother = PositionSmoother::new();
        let v = Point3::new(1.0, 2.0, 3.0);
        for &alpha in &[0.0f32, -0.5, 1.5, f32::NAN] {
            assert!(matches!(
                smoother.smooth("apple", v, alpha),
                Err(SmoothError::InvalidAlpha(_))
            ));
        }
        assert!(smoother.last("apple").is_none());
    }

    #[test]
    fn test_reset() {
        let mut smoother = PositionSmoother::new();
        smoother.smooth("apple", Point3::new(1.0, 2.0, 3.0), 0.5).unwrap();
        smoother.reset();
        assert!(smoother.is_empty());
        // 重置后再次观测按冷启动处理
        let out = smoother.smooth("apple", Point3::new(7.0, 7.0, 7.0), 0.5).unwrap();
        assert_close(out, Point3::new(7.0, 7.0, 7.0));
    }
}
