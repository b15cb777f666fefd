mod heatmap_tests;
mod store_tests;
