pub mod coordinate;
pub mod route_stop;
