//! Support library for the escubes sample renderer.
//!
//! Everything in here runs without a GL context: procedural shape
//! generation, the mesh data model the renderer uploads from, and a small
//! TGA image decoder. Keeping these GPU-free means they can be unit tested
//! on any machine, headless CI included.

pub mod mesh;
pub mod shapes;
pub mod tga;
