pub mod listing;
pub mod status_bar;
