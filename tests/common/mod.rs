#![allow(dead_code)]

pub mod jornada_helpers;
pub mod utils;
