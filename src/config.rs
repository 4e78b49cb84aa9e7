//! 运行参数与配置 - 命令行参数 + JSON配置文件

use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::depth::{Intrinsics, DEFAULT_DEPTH_SCALE};
use crate::detection::INF_SIZE;
use crate::smoothing::DEFAULT_ALPHA;

/// FruitVision 命令行参数
#[derive(Parser, Debug)]
#[command(author, version, about = "FruitVision - 水果检测3D定位系统", long_about = None)]
pub struct Args {
    /// 运行模式: image(单帧标注) 或 replay(序列回放)
    #[arg(short, long, default_value = "image")]
    pub mode: String,

    /// 输入目录 (帧束: frame_NNNN.png / depth_NNNN.png / detections_NNNN.json)
    #[arg(short, long, default_value = "data")]
    pub input: String,

    /// 输出目录
    #[arg(short, long, default_value = "runs")]
    pub output: String,

    /// 配置文件路径
    #[arg(short, long, default_value = "fruitvision.json")]
    pub config: String,

    /// 标注字体文件 (缺失时只画框不写字)
    #[arg(long, default_value = "assets/font/msyh.ttc")]
    pub font: String,
}

/// 检测定位参数配置
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisionConfig {
    // === 检测参数 ===
    pub conf_threshold: f32, // 置信度过滤阈值

    // === 深度采样 ===
    pub depth_window: u32, // 采样窗口边长(像素)
    pub depth_scale: f32,  // z16量化系数(米/单位)

    // === 坐标平滑 ===
    pub smooth_alpha: f32, // EMA新样本权重, (0,1]

    // === 图像预处理 ===
    pub preprocess: bool, // 是否在送检前增强图像
    pub contrast: f32,    // 对比度增益
    pub brightness: i32,  // 亮度偏移
    pub blur_sigma: f32,  // 高斯模糊强度, 0为关闭
    pub detect_size: u32, // 检测器输入边长

    // === 相机内参 ===
    pub intrinsics: Intrinsics,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            // 检测
            conf_threshold: 0.4,

            // 深度
            depth_window: 7,
            depth_scale: DEFAULT_DEPTH_SCALE,

            // 平滑
            smooth_alpha: DEFAULT_ALPHA,

            // 预处理
            preprocess: false,
            contrast: 1.5,
            brightness: 50,
            blur_sigma: 1.0,
            detect_size: INF_SIZE,

            intrinsics: Intrinsics::default(),
        }
    }
}

impl VisionConfig {
    /// 从JSON文件加载配置
    ///
    /// 文件不存在时写出默认配置,解析失败时回退默认值
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    info!("✅ 配置已从 {} 加载", path);
                    config
                }
                Err(e) => {
                    warn!("⚠️  配置文件解析失败: {}, 使用默认值", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                config.save(path);
                config
            }
        }
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: &str) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("❌ 保存配置失败: {}", e);
                } else {
                    info!("💾 配置已保存到 {}", path);
                }
            }
            Err(e) => warn!("❌ 序列化配置失败: {}", e),
        }
    }

    /// 打印当前配置摘要
    pub fn print_summary(&self) {
        info!("🎛️  当前配置:");
        info!("  置信度阈值: {:.2}", self.conf_threshold);
        info!("  深度采样窗口: {}px", self.depth_window);
        info!("  平滑系数alpha: {:.2}", self.smooth_alpha);
        info!(
            "  预处理: {}",
            if self.preprocess { "开启" } else { "关闭" }
        );
    }
}
