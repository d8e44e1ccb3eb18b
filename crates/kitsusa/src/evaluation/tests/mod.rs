mod common;
mod engine;
mod hazard;
