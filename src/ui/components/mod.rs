pub mod dashboard;
pub mod profile_overview;
pub mod progress_bar;
pub mod snippet_list;
pub mod stats_sidebar;
pub mod typing_area;
