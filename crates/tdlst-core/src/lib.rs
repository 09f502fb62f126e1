pub mod api;
pub mod config;
pub mod controller;
pub mod filter;
pub mod storage;

pub use tdlst_shared::{
  NewTask,
  Task,
  TaskId,
  TaskPatch,
  User
};
