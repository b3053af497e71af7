//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! 所有对外入口（CLI / 上层应用）统一拿到 `Result<T, AppError>`，
//! 按分支即可区分“合成失败”“目录不可用”等场景。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ComposeError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。

use crate::compositor::ComposeError;

/// 应用级统一错误类型
///
/// 库的外层入口均返回此类型，确保调用方收到一致的错误格式。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 蒙版合成流水线错误（加载 / 解码 / 缩放 / 写出）
    #[error("{0}")]
    Compose(#[from] ComposeError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 图库输出目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 设置文件读写或解析失败
    #[error("设置读写失败: {0}")]
    Settings(String),
}
