pub mod album;
pub mod artist;
pub mod playlist;
pub mod song;
pub mod user;

