use crate::models::{AppConfig, AppError};
use crate::services::{ConfigDiffService, CookieController, HttpCookieService, Presenter};
use std::sync::Arc;

/// 应用全局状态
///
/// - controller: Cookie列表与扫码获取
/// - config_diff: 配置对比数据源
pub struct AppState {
    pub config: AppConfig,

    /// Cookie列表控制器: 注册表的唯一所有者
    pub controller: CookieController,

    /// 配置对比服务
    pub config_diff: ConfigDiffService<Arc<HttpCookieService>>,
}

impl AppState {
    /// 初始化应用状态
    ///
    /// 控制器与配置对比共用同一个HTTP客户端 (连接池与令牌)。
    pub fn new(config: AppConfig, presenter: Arc<dyn Presenter>) -> Result<Self, AppError> {
        let service = Arc::new(HttpCookieService::new(config.clone())?);
        let controller = CookieController::new(service.clone(), presenter);
        let config_diff = ConfigDiffService::new(service);

        tracing::info!(
            config = %config.summary_for_logging(),
            "AppState initialized"
        );

        Ok(Self {
            config,
            controller,
            config_diff,
        })
    }
}
