/// 检测系统 (Detection System)
///
/// - types:    检测框、检测结果、定位结果与类别词表
/// - detector: 检测器接口与离线回放实现 (推理是外部黑盒)
pub mod detector;
pub mod types;

pub use detector::{Detector, ReplayDetector};
pub use types::{class_color, BBox, Detection, LocatedObject, CLASS_COLORS, INF_SIZE};
