mod axis;
pub mod bins;
pub mod plot;
pub mod render;
