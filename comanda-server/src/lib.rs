//! Comanda Server - 餐厅点餐后端
//!
//! # 架构概述
//!
//! 本模块是点餐后端的主入口，提供以下核心功能：
//!
//! - **订单引擎** (`orders`): 订单生命周期、桌台最新订单解析、状态历史
//! - **数据库** (`db`): 嵌入式 redb 存储和各实体仓库
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! comanda-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层和仓库
//! ├── orders/        # 订单生命周期引擎
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use db::Storage;
pub use orders::{OrderManager, TableOrderResolver};
pub use shared::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______                                 __
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
