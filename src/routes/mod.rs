// 路由模块

pub mod user;
