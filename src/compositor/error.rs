//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载合成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 其中 `MemoryExhausted` 是唯一需要界面特殊提示的分类：
//! 解码/缩放/合成阶段的内存预算超限与分配失败都会归入这一支，
//! 调用方据此展示专门的“内存不足”提示，其余错误统一按通用失败处理。

/// 蒙版合成统一错误类型。
///
/// 该类型会在库边界被上转为 `AppError`，最终透传给调用方。
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("参数错误：{0}")]
    InvalidInput(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("缩放错误：{0}")]
    Scale(String),

    #[error("内存不足：{0}")]
    MemoryExhausted(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("写入错误：{0}")]
    Write(String),

    #[error("服务不可用：{0}")]
    Busy(String),
}

impl ComposeError {
    /// 稳定错误码，供结构化上报与前端分支使用。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Decode(_) => "E_DECODE",
            Self::Scale(_) => "E_SCALE",
            Self::MemoryExhausted(_) => "E_OOM",
            Self::Encode(_) => "E_ENCODE",
            Self::Write(_) => "E_WRITE",
            Self::Busy(_) => "E_BUSY",
        }
    }

    /// 出错阶段标识，与处理链路的阶段日志一一对应。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "validate",
            Self::Decode(_) => "decode",
            Self::Scale(_) => "scale",
            Self::MemoryExhausted(_) => "alloc",
            Self::Encode(_) => "encode",
            Self::Write(_) => "write",
            Self::Busy(_) => "dispatch",
        }
    }

    /// 是否为需要专门提示的内存不足分类。
    pub fn is_memory_exhausted(&self) -> bool {
        matches!(self, Self::MemoryExhausted(_))
    }
}

impl From<ComposeError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: ComposeError) -> Self {
        error.to_string()
    }
}
