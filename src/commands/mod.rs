pub mod generate;
pub mod verify;

pub use generate::handle_generate;
pub use verify::handle_verify;
