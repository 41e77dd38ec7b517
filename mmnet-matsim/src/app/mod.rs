mod matsim_app;

pub use matsim_app::{MatsimApp, MatsimOperation};
