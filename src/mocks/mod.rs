//! In-process stand-ins for the engine's collaborators, for tests and local runs

pub mod collaborators;
