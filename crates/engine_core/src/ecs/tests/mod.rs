//! Cross-module scenario tests for the scheduler and the physics system

mod physics_integration;
