pub mod states;
pub mod params;
pub mod world;
pub mod forces;
pub mod integrator;
pub mod contacts;
pub mod body;
pub mod bodies;
pub mod scenario;
pub mod simulator;
