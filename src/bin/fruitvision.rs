/// FruitVision 离线检测定位工具
///
/// 处理流程:
/// 1. 装载帧束: 彩色帧 + 深度图 + 录制的检测结果
/// 2. 框中心深度采样 → 针孔反投影 → 逐标签EMA坐标平滑
/// 3. 渲染标注帧,回放模式同时导出平滑轨迹CSV
///
/// 模型推理与传感器采集为外部环节,输入一律来自录制数据
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use serde::Serialize;

use fruitvision::detection::{Detector, ReplayDetector};
use fruitvision::{
    gen_time_string, preprocess, renderer, Args, FrameBundle, LocatedObject, SpatialLocator,
    VisionConfig,
};

/// 轨迹CSV行
#[derive(Serialize)]
struct TrackRow<'a> {
    frame: usize,
    label: &'a str,
    confidence: f32,
    distance: f32,
    x: f32,
    y: f32,
    z: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("🍎 FruitVision 启动, 模式: {}", args.mode);

    let config = VisionConfig::load(&args.config);
    config.print_summary();

    fs::create_dir_all(&args.output)
        .with_context(|| format!("创建输出目录失败: {}", args.output))?;

    // 字体缺失不致命,标注退化为只画框
    let font = match renderer::load_font(Path::new(&args.font)) {
        Ok(f) => Some(f),
        Err(e) => {
            warn!("⚠️  字体加载失败, 标注只画框: {}", e);
            None
        }
    };

    match args.mode.as_str() {
        "image" => run_image(&args, &config, font.as_ref()),
        "replay" => run_replay(&args, &config, font.as_ref()),
        other => bail!("未知模式: {} (可用: image / replay)", other),
    }
}

/// 单帧模式: 处理第0帧,输出一张标注图
fn run_image(args: &Args, config: &VisionConfig, font: Option<&FontVec>) -> Result<()> {
    let input = Path::new(&args.input);
    let bundle = FrameBundle::load(input, 0, config.depth_scale)?;

    // 检测来自录制数据,经统一的检测器接口播放
    let mut detector = ReplayDetector::new(vec![bundle.detections.clone()]);
    let detect_input = if config.preprocess {
        preprocess::enhance(&bundle.color, config)
    } else {
        bundle.color.clone()
    };
    let detections = detector.detect(&detect_input)?;

    let mut locator = SpatialLocator::new(config.clone());
    let located = locator.locate(&detections, &bundle.depth, &config.intrinsics)?;
    report(0, &located);

    let mut frame = bundle.color.to_rgb8();
    renderer::annotate(&mut frame, &located, font);

    let out_path = PathBuf::from(&args.output).join(format!(
        "annotated_{}.png",
        gen_time_string("-")
    ));
    frame
        .save(&out_path)
        .with_context(|| format!("保存标注帧失败: {}", out_path.display()))?;
    info!("🖼️  标注帧已保存: {}", out_path.display());

    Ok(())
}

/// 回放模式: 顺序处理整段序列,输出逐帧标注图 + 轨迹CSV
fn run_replay(args: &Args, config: &VisionConfig, font: Option<&FontVec>) -> Result<()> {
    let input = Path::new(&args.input);

    // 预扫描整段序列
    let mut bundles = Vec::new();
    let mut index = 0;
    while FrameBundle::exists(input, index) {
        bundles.push(FrameBundle::load(input, index, config.depth_scale)?);
        index += 1;
    }
    if bundles.is_empty() {
        bail!("输入目录中没有帧束: {}", args.input);
    }
    info!("🎞️  序列共 {} 帧", bundles.len());

    let mut detector =
        ReplayDetector::new(bundles.iter().map(|b| b.detections.clone()).collect());
    let mut locator = SpatialLocator::new(config.clone());

    let csv_path = PathBuf::from(&args.output).join(format!(
        "trajectory_{}.csv",
        gen_time_string("-")
    ));
    let mut csv_writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("创建轨迹文件失败: {}", csv_path.display()))?;

    for (frame_index, bundle) in bundles.iter().enumerate() {
        let detect_input = if config.preprocess {
            preprocess::enhance(&bundle.color, config)
        } else {
            bundle.color.clone()
        };
        let detections = detector.detect(&detect_input)?;
        let located = locator.locate(&detections, &bundle.depth, &config.intrinsics)?;
        report(frame_index, &located);

        for obj in &located {
            csv_writer.serialize(TrackRow {
                frame: frame_index,
                label: &obj.label,
                confidence: obj.confidence,
                distance: obj.distance,
                x: obj.position.x,
                y: obj.position.y,
                z: obj.position.z,
            })?;
        }

        let mut frame = bundle.color.to_rgb8();
        renderer::annotate(&mut frame, &located, font);
        let out_path =
            PathBuf::from(&args.output).join(format!("annotated_{:04}.png", frame_index));
        frame
            .save(&out_path)
            .with_context(|| format!("保存标注帧失败: {}", out_path.display()))?;
    }

    csv_writer.flush()?;
    info!("📈 平滑轨迹已导出: {}", csv_path.display());
    info!(
        "✅ 回放完成, 共 {} 帧, 跟踪 {} 个类别",
        bundles.len(),
        locator.smoother().len()
    );

    Ok(())
}

/// 打印单帧定位结果
fn report(frame_index: usize, located: &[LocatedObject]) {
    for obj in located {
        if obj.has_depth() {
            info!("📍 帧{} {}", frame_index, renderer::caption(obj));
        } else {
            info!("📍 帧{} {} {:.2} 无深度", frame_index, obj.label, obj.confidence);
        }
    }
}
