mod common;

mod boundary_conformity;
mod curved_recovery;
mod determinism;
mod no_intersection;
mod plane_cut;
mod tangential_touch;
mod tet_target;
mod unsupported_shapes;
