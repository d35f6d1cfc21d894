pub mod broadcast;
pub mod health;
pub mod poll;
pub mod scheduler;
