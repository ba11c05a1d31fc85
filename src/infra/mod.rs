//! Инфраструктурный слой вокруг движка:
//! - генерация ID;
//! - RNG-реализации для перемешивания колоды борда.

pub mod ids;
pub mod rng;

pub use ids::*;
pub use rng::*;
