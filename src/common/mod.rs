pub mod complex;
pub mod constants;
pub mod mandelbrot;
pub mod number;
pub mod viewport;
