mod metrics;

pub use metrics::{geodesic_area_m2, multi_geodesic_area_m2, BboxMetrics};
