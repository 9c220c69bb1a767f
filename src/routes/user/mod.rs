mod handler;
mod model;

pub use handler::{
    batch_get_users, create_user, get_user, get_user_by_email, get_user_by_phone,
    get_user_by_username, update_profile, update_user,
};
