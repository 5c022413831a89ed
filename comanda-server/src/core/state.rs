use crate::core::Config;
use crate::db::Storage;
use crate::orders::{OrderManager, TableOrderResolver};
use shared::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是浅拷贝句柄，Clone 成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | storage | Storage | 嵌入式数据库 (redb) |
/// | orders | OrderManager | 订单生命周期引擎 |
/// | resolver | TableOrderResolver | 桌台最新订单解析 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库
    pub storage: Storage,
    /// 订单生命周期引擎
    pub orders: OrderManager,
    /// 桌台最新订单解析
    pub resolver: TableOrderResolver,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 确保工作目录存在并打开持久化数据库。
    pub fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let storage = Storage::open(config.database_path())
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %config.database_path().display(), "Database opened");

        Ok(Self::with_storage(config.clone(), storage))
    }

    /// 基于内存数据库的状态 (测试和临时运行)
    pub fn in_memory(config: Config) -> Result<Self, AppError> {
        let storage = Storage::open_in_memory()
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Ok(Self::with_storage(config, storage))
    }

    /// 使用现有数据库构造状态
    pub fn with_storage(config: Config, storage: Storage) -> Self {
        let orders = OrderManager::new(storage.clone());
        let resolver = TableOrderResolver::new(storage.clone(), orders.clone());
        Self {
            config,
            storage,
            orders,
            resolver,
        }
    }
}
