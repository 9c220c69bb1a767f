// 服务层
// 在两个实体仓库之上拼装聚合用户视图

pub mod user;

pub use user::{User, UserService};
