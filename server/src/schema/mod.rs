mod active_motion_table;
mod motion_settings_table;
mod movement_event_table;
mod mover_spline_data_table;
mod mover_table;
mod spline_chain_table;
mod taxi_path_table;

pub use active_motion_table::*;
pub use motion_settings_table::*;
pub use movement_event_table::*;
pub use mover_spline_data_table::*;
pub use mover_table::*;
pub use spline_chain_table::*;
pub use taxi_path_table::*;
