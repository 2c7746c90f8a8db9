#![allow(dead_code)]

pub mod lambda;
