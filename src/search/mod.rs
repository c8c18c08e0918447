pub mod context;
pub mod eval;
pub mod nnue;
pub mod ordering;
pub mod picker;
pub mod pst;
#[allow(clippy::module_inception)]
pub mod search;
pub mod see;
pub mod time;
pub mod tt;
