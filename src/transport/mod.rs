/// Directory listing and output-directory helpers.
pub mod fs;
/// NumPy `.npy` array decoding.
pub mod npy;
