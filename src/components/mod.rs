pub mod banner;
pub mod momentum;
pub mod palette;
