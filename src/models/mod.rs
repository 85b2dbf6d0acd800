// src/models/mod.rs

pub mod comment;
pub mod follow;
pub mod image;
pub mod interaction;
pub mod post;
pub mod reply;
pub mod user;
