pub mod api;
pub mod recommend;
pub mod view;
