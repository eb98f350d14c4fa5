pub mod linear;
pub mod model;
pub mod normalize;
pub mod objective;
pub mod solve;
pub mod solver;
pub mod solver_factory;
pub mod solvers;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;
