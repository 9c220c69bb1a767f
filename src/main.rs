use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_service::{
    AppState,
    cache::{CacheStore, RedisCacheStore},
    cache::operations::{user_base::new_user_base_cache, user_profile::new_user_profile_cache},
    config::Config,
    database::{PgUserBaseStore, PgUserProfileStore},
    middleware::log_errors,
    repository::{UserBaseRepository, UserProfileRepository},
    routes,
    service::UserService,
};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'user_service';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // 设置 Redis 客户端
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let cache_store: Arc<dyn CacheStore> =
        Arc::new(RedisCacheStore::new(Arc::new(redis_client)));

    // 组装仓库和服务：缓存与数据库访问都在这里注入
    let user_base_repo = Arc::new(UserBaseRepository::new(
        Arc::new(PgUserBaseStore::new(pool.clone())),
        new_user_base_cache(
            cache_store.clone(),
            config.user_cache_ttl(),
            config.not_found_cache_ttl(),
        ),
    ));
    let user_profile_repo = Arc::new(UserProfileRepository::new(
        Arc::new(PgUserProfileStore::new(pool.clone())),
        new_user_profile_cache(
            cache_store.clone(),
            config.user_cache_ttl(),
            config.not_found_cache_ttl(),
        ),
    ));
    let users = Arc::new(UserService::new(user_base_repo, user_profile_repo));

    // 设置应用状态
    let state = AppState {
        config: config.clone(),
        users,
    };

    // 用户路由
    let router = Router::new()
        .route("/users/create", post(routes::user::create_user))
        .route("/users/by-id", get(routes::user::get_user))
        .route("/users/batch-get", post(routes::user::batch_get_users))
        .route("/users/update", put(routes::user::update_user))
        .route("/users/update-profile", put(routes::user::update_profile))
        .route("/users/by-username", get(routes::user::get_user_by_username))
        .route("/users/by-email", get(routes::user::get_user_by_email))
        .route("/users/by-phone", get(routes::user::get_user_by_phone))
        .layer(axum::middleware::from_fn(log_errors));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        let cors = tower_http::cors::CorsLayer::permissive();
        router.layer(cors)
    };

    // 添加应用状态
    let app = router.with_state(state.clone());

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
