pub mod augmentor;
pub mod cli;
pub mod veriform;
