pub mod health;
pub mod social;
