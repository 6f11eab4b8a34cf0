pub(super) mod encode;

pub mod conductor;
pub mod emit;
pub mod normalize;
pub mod operand;
pub mod symbols;

pub use conductor::{assemble, Assembly, Diagnostic};
