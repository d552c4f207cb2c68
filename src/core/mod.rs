// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use distance::{haversine_distance, calculate_bounding_box, is_within_bounding_box, MAX_MATCH_DISTANCE_MILES};
pub use filters::{is_within_match_distance, meets_match_threshold, MIN_MATCH_SCORE};
pub use matcher::{Evaluation, Matcher};
pub use scoring::{
    availability_score, capacity_draw_score, compensation_score, compute_match_score, genre_score,
    location_score, score_breakdown, total_score, weighted_total,
};
