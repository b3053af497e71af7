//! # 壁纸编辑工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                调用方 (CLI / 上层编辑界面)                │
//! │                                                          │
//! │  progress (进度环模型) ── preview (预览状态机)            │
//! │       （界面自行绘制与动画，这里只提供纯状态与几何）      │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ async 调用 (Result<PathBuf, ComposeError>)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (本库)                            │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ compositor ─ 蒙版合成流水线                           │
//! │  │   ├─ service   单飞保护 + 后台派发                     │
//! │  │   ├─ handler   流程编排 + 阶段耗时日志                 │
//! │  │   ├─ loader    本地文件加载 + 签名校验                 │
//! │  │   ├─ pipeline  解码·缩放·蒙版合成                      │
//! │  │   └─ writer    JPEG 编码 + 原子写入                    │
//! │  │                                                       │
//! │  ├─ progress        进度环纯数值模型                      │
//! │  ├─ preview         预览叠层有限状态机                    │
//! │  ├─ storage         图库输出目录 (返回 Result)            │
//! │  └─ settings        编辑器设置持久化 (JSON)               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，聚合各子系统错误 |
//! | [`compositor`] | 解码 → 缩放 → 黑色蒙版合成 → JPEG 写出的完整流水线 |
//! | [`progress`] | 进度环的数值模型：最小可见进度钳制与圆弧角度计算 |
//! | [`preview`] | 预览叠层显示/隐藏的显式状态机，动画期间禁止切换 |
//! | [`storage`] | 图库输出目录的获取与自动创建 |
//! | [`settings`] | 上次使用的不透明度等设置的 JSON 持久化 |

pub mod error;
pub mod compositor;
pub mod preview;
pub mod progress;
pub mod settings;
pub mod storage;
