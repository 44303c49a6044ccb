//! RGB colors: hex parsing and Euclidean distance.

mod rgb;

pub use rgb::{Color, MAX_DISTANCE, distance, parse_color};
