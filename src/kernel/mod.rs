//! Kernel functions and kernel combinators

pub mod bag;
pub mod gauss;
pub mod index;
pub mod linear;
pub mod mkl;
pub mod traits;

pub use self::bag::*;
pub use self::gauss::*;
pub use self::index::*;
pub use self::linear::*;
pub use self::mkl::*;
pub use self::traits::*;
