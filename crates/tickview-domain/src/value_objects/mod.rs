pub mod bar;
pub mod catalog;
pub mod plot_time;
pub mod sampling_period;
pub mod tick;
