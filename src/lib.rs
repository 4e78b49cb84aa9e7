pub mod config; // 运行参数与配置文件
pub mod depth; // 深度采样与反投影
pub mod detection; // 检测数据结构与检测器接口
pub mod pipeline; // 帧处理流水线
pub mod preprocess; // 送检前图像增强
pub mod renderer; // 标注渲染
pub mod smoothing; // 3D坐标平滑 (逐标签EMA)

pub use crate::config::{Args, VisionConfig};
pub use crate::depth::{DepthGrid, Intrinsics, DEFAULT_DEPTH_SCALE};
pub use crate::detection::{
    class_color, BBox, Detection, Detector, LocatedObject, ReplayDetector,
};
pub use crate::pipeline::{FrameBundle, SpatialLocator};
pub use crate::smoothing::{Point3, PositionSmoother, SmoothError, DEFAULT_ALPHA};

/// 生成时间字符串 (用于输出文件命名)
pub fn gen_time_string(delimiter: &str) -> String {
    let offset = chrono::FixedOffset::east_opt(8 * 60 * 60).unwrap(); // Beijing
    let t_now = chrono::Utc::now().with_timezone(&offset);
    let fmt = format!(
        "%Y{}%m{}%d{}%H{}%M{}%S{}%f",
        delimiter, delimiter, delimiter, delimiter, delimiter, delimiter
    );
    t_now.format(&fmt).to_string()
}
