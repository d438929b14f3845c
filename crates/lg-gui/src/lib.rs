//! Desktop window for the LittleGuy simulation.
//!
//! A thin macroquad harness: it polls the mouse, ticks the simulation once
//! per frame, and draws render views and cosmetic particles on a white
//! canvas.

pub mod app;
pub mod input;
pub mod particles;
pub mod render;
pub mod theme;
