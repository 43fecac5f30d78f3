pub mod neighbors;
pub mod system;
