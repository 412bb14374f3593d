#[macro_use]
extern crate log;

pub mod climate;
pub mod controller;
pub mod energy;
pub mod remote;
pub mod state;
