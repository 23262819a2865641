mod height;

pub use height::*;
