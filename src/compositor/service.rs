//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `CompositorService` 作为调用方注入状态，替代全局单例函数。
//! 好处：
//! 1. 生命周期清晰（由入口统一管理）
//! 2. 测试可创建独立实例，减少共享状态副作用
//! 3. 后续可扩展多实例或按会话配置
//!
//! 合成涉及阻塞的解码/编码 I/O，绝不允许占用调用方的执行上下文：
//! 每次请求派发到 `spawn_blocking` 工作线程，`await` 在文件写入完成
//! （或失败被捕获）之后才返回，顺序语义与界面预期一致。
//!
//! ## 实现思路
//!
//! 对外仅暴露少量稳定 API：
//! - `compose`：执行完整合成链路（单飞保护）
//! - `set_quality_profile`：切换缩放质量档位
//! - `get_quality_profile`：读取当前档位
//!
//! 单飞保护用 `AtomicBool` 实现：上一次合成未结束时直接返回 `Busy`，
//! 取消不受支持，一旦开始就运行到完成或失败。

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::source::ComposeRequest;
use super::{ComposeConfig, ComposeError, ComposeHandler, ScaleQualityProfile};

/// 蒙版合成服务状态。
///
/// 作为上层注入状态使用，内部持有 `ComposeHandler`。
pub struct CompositorService {
    handler: Arc<ComposeHandler>,
    in_flight: AtomicBool,
}

impl CompositorService {
    /// 使用默认配置创建服务状态。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use wallpaper_editor::compositor::CompositorService;
    ///
    /// let service = CompositorService::new()?;
    /// # Ok::<(), wallpaper_editor::compositor::ComposeError>(())
    /// ```
    pub fn new() -> Result<Self, ComposeError> {
        Self::with_config(ComposeConfig::default())
    }

    /// 使用自定义配置创建服务状态。
    ///
    /// 主要用于测试或后续按场景注入不同策略。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use wallpaper_editor::compositor::{ComposeConfig, CompositorService};
    ///
    /// let mut config = ComposeConfig::default();
    /// config.jpeg_quality = 80;
    /// let service = CompositorService::with_config(config)?;
    /// # Ok::<(), wallpaper_editor::compositor::ComposeError>(())
    /// ```
    pub fn with_config(config: ComposeConfig) -> Result<Self, ComposeError> {
        let handler = ComposeHandler::new(config)?;
        Ok(Self {
            handler: Arc::new(handler),
            in_flight: AtomicBool::new(false),
        })
    }

    /// 执行完整合成流程：加载→解码→缩放→蒙版→写出。
    ///
    /// 成功返回输出文件路径；`await` 返回时文件已经落盘。
    /// 同一服务实例上的并发调用会被单飞保护拒绝（`Busy`）。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use wallpaper_editor::compositor::{ComposeRequest, CompositorService};
    ///
    /// # async fn demo() -> Result<(), wallpaper_editor::compositor::ComposeError> {
    /// let service = CompositorService::new()?;
    /// let output = service
    ///     .compose(ComposeRequest {
    ///         source_path: "C:/tmp/source.png".into(),
    ///         output_dir: "C:/tmp/gallery".into(),
    ///         target_height: 1920,
    ///         opacity: 0.35,
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn compose(&self, request: ComposeRequest) -> Result<PathBuf, ComposeError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ComposeError::Busy("上一次合成尚未结束".to_string()));
        }

        let handler = Arc::clone(&self.handler);
        let join_result = tokio::task::spawn_blocking(move || handler.compose(&request)).await;

        self.in_flight.store(false, Ordering::SeqCst);

        match join_result {
            Ok(result) => result,
            // 工作线程异常终止：在这条流水线上最可能的根因是巨型缓冲分配失败，
            // 统一归入内存不足分类并保证不向上传播崩溃
            Err(join_error) => {
                log::error!("合成工作线程异常终止：{}", join_error);
                Err(ComposeError::MemoryExhausted(
                    "合成工作线程异常终止".to_string(),
                ))
            }
        }
    }

    /// 服务当前是否有合成任务在执行。
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// 设置缩放质量档位。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use wallpaper_editor::compositor::CompositorService;
    ///
    /// let service = CompositorService::new()?;
    /// service.set_quality_profile("speed")?;
    /// # Ok::<(), wallpaper_editor::compositor::ComposeError>(())
    /// ```
    pub fn set_quality_profile(&self, profile: &str) -> Result<(), ComposeError> {
        let profile = ScaleQualityProfile::from_str(profile)?;
        self.handler.set_quality_profile(profile)
    }

    /// 获取当前生效质量档位（字符串）。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use wallpaper_editor::compositor::CompositorService;
    ///
    /// let service = CompositorService::new()?;
    /// let profile = service.get_quality_profile()?;
    /// assert!(matches!(profile.as_str(), "quality" | "balanced" | "speed"));
    /// # Ok::<(), wallpaper_editor::compositor::ComposeError>(())
    /// ```
    pub fn get_quality_profile(&self) -> Result<String, ComposeError> {
        let profile = self.handler.get_quality_profile()?;
        Ok(profile.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tokio::runtime::Runtime;

    #[test]
    fn service_set_and_get_profile_roundtrip() {
        let service = CompositorService::new().expect("service init failed");

        service.set_quality_profile("quality").expect("set quality should succeed");
        let quality = service.get_quality_profile().expect("get profile should succeed");
        assert_eq!(quality, "quality");

        service.set_quality_profile("balanced").expect("set balanced should succeed");
        let balanced = service.get_quality_profile().expect("get profile should succeed");
        assert_eq!(balanced, "balanced");

        service.set_quality_profile("speed").expect("set speed should succeed");
        let speed = service.get_quality_profile().expect("get profile should succeed");
        assert_eq!(speed, "speed");
    }

    #[test]
    fn service_rejects_invalid_profile() {
        let service = CompositorService::new().expect("service init failed");

        let result = service.set_quality_profile("unknown-profile");
        assert!(matches!(result, Err(ComposeError::InvalidInput(_))));
    }

    #[test]
    fn service_releases_guard_after_failure() {
        let service = CompositorService::new().expect("service init failed");
        let runtime = Runtime::new().expect("runtime init failed");

        let request = ComposeRequest {
            source_path: PathBuf::from("/no/such/source.png"),
            output_dir: PathBuf::from("/tmp"),
            target_height: 500,
            opacity: 0.5,
        };

        let first = runtime.block_on(service.compose(request.clone()));
        assert!(matches!(first, Err(ComposeError::Decode(_))));
        assert!(!service.is_busy());

        // 失败之后必须可以立刻重试，而不是卡在 Busy
        let second = runtime.block_on(service.compose(request));
        assert!(matches!(second, Err(ComposeError::Decode(_))));
        assert!(!service.is_busy());
    }

    #[test]
    fn service_profile_concurrent_access_stress() {
        let service = Arc::new(CompositorService::new().expect("service init failed"));

        let workers = 8;
        let iterations = 200;

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let service = Arc::clone(&service);
            handles.push(thread::spawn(move || {
                let profiles = ["quality", "balanced", "speed"];

                for i in 0..iterations {
                    let profile = profiles[(worker_id + i) % profiles.len()];
                    service.set_quality_profile(profile).expect("set profile should succeed");

                    let current = service.get_quality_profile().expect("get profile should succeed");
                    assert!(matches!(current.as_str(), "quality" | "balanced" | "speed"));
                }
            }));
        }

        for handle in handles {
            handle.join().expect("worker thread should not panic");
        }
    }
}
