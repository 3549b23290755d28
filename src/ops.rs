pub mod debug;
pub mod filter;
pub mod lifecycle;
pub mod map;
pub mod map_list;
pub mod observe_on;
pub mod skip_between;
pub mod take;
pub mod tap;
