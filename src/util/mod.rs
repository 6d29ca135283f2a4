pub mod cli;
pub mod hash;
pub mod random;
pub mod url;
