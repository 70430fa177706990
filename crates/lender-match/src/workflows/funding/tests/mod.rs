mod common;
mod deals;
