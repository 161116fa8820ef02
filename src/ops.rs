pub mod complete_status;
pub mod flat_map;
pub mod map;
pub mod observe_on;
pub mod subscribe_on;
