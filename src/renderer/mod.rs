//! WebGPU rendering module
//!
//! Draws the player and obstacles as textured quads. HUD text and banners
//! live in the DOM, driven by reading the current mode; nothing here
//! mutates simulation state.

pub mod pipeline;
pub mod sprites;
pub mod vertex;

pub use pipeline::{RenderState, SpriteTexture};
