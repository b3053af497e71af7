//! # 壁纸编辑工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与一次合成的派发。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use wallpaper_editor::compositor::{ComposeRequest, CompositorService};
use wallpaper_editor::settings::{self, AppSettings};
use wallpaper_editor::storage;

fn print_usage() {
    eprintln!("用法: wallpaper-editor <源图片路径> [不透明度 0.0~1.0] [目标高度]");
    eprintln!("示例: wallpaper-editor photo.jpg 0.35 1920");
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(source) = args.first() else {
        print_usage();
        return ExitCode::from(2);
    };

    // 未给出的参数沿用上次保存的设置
    let mut saved = match settings::load_app_settings() {
        Ok(saved) => saved.unwrap_or_default(),
        Err(err) => {
            log::warn!("设置读取失败，使用默认值: {err}");
            AppSettings::default()
        }
    };

    let opacity = match args.get(1) {
        Some(raw) => match raw.parse::<f32>() {
            Ok(value) => value,
            Err(_) => {
                eprintln!("不透明度不是合法数字: {raw}");
                print_usage();
                return ExitCode::from(2);
            }
        },
        None => saved.last_opacity,
    };

    let target_height = match args.get(2) {
        Some(raw) => match raw.parse::<u32>() {
            Ok(value) => value,
            Err(_) => {
                eprintln!("目标高度不是合法整数: {raw}");
                print_usage();
                return ExitCode::from(2);
            }
        },
        None => saved.last_target_height,
    };

    let output_dir = match storage::gallery_dir(saved.custom_gallery_dir.clone()) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("无法准备输出目录: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = match CompositorService::new() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("合成服务初始化失败: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = service.set_quality_profile(&saved.quality_profile) {
        log::warn!("质量档位设置无效，沿用默认档位: {err}");
    }

    let request = ComposeRequest {
        source_path: PathBuf::from(source),
        output_dir,
        target_height,
        opacity,
    };

    match service.compose(request).await {
        Ok(output_path) => {
            println!("{}", output_path.display());

            saved.last_opacity = opacity;
            saved.last_target_height = target_height;
            if let Err(err) = settings::save_app_settings(&saved) {
                log::warn!("设置保存失败: {err}");
            }

            ExitCode::SUCCESS
        }
        Err(err) if err.is_memory_exhausted() => {
            eprintln!("内存不足，合成未完成，请换一张较小的图片再试 :(");
            log::error!("合成失败 [{}/{}]: {err}", err.code(), err.stage());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("合成失败: {err}");
            log::error!("合成失败 [{}/{}]: {err}", err.code(), err.stage());
            ExitCode::FAILURE
        }
    }
}
