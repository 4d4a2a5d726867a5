pub mod animation;
pub mod videos;
