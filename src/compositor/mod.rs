//! # 蒙版合成模块（compositor）
//!
//! ## 设计思路
//!
//! 该模块将“请求校验 → 文件加载 → 解码缩放 → 蒙版合成 → JPEG 写出”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：承载可注入状态（`CompositorService`），单飞保护与后台派发
//! - `handler`：编排整条处理流水线
//! - `loader`：负责本地文件加载与安全校验
//! - `pipeline`：负责解码、像素限制、等比缩放与黑色蒙版合成
//! - `writer`：负责 JPEG 编码与原子写入
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 实现思路
//!
//! 对外仅暴露必要类型，内部细节保持 `mod` 私有。
//! 调用方通过 `CompositorService` 发起合成，结果在文件写入完成之后
//! 才回到调用方的执行上下文（成功带输出路径，失败带错误分类）。
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! 调用方 (CLI / 上层界面)
//!    ↓
//! service.rs（单飞保护 + spawn_blocking 派发）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（文件存在性 + 体积 + 签名校验）
//!    ├─ pipeline.rs（解码 + 限制检查 + 缩放 + 蒙版）
//!    └─ writer.rs（JPEG 编码 + 临时文件原子落盘）
//!    ↓
//! 返回 ComposeError / 输出文件路径
//! ```
//!
//! ## 分层职责建议
//!
//! - 入参语义变更（不透明度范围、目标高度）优先改 `source.rs`
//! - 配置与策略变更优先改 `config.rs`
//! - 业务流程顺序变更优先改 `handler.rs`
//! - 单阶段行为优化分别改 `loader/pipeline/writer`

mod config;
mod error;
mod handler;
mod loader;
mod pipeline;
mod service;
mod source;
mod writer;

pub use config::{ComposeConfig, ScaleQualityProfile};
pub use error::ComposeError;
pub use service::CompositorService;
pub use source::ComposeRequest;

/// 内部核心编排器，不直接暴露给调用方。
pub(crate) use handler::ComposeHandler;
