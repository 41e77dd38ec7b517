pub mod app;
pub mod config;
pub mod export;
pub mod mode;
pub mod util;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_model;
