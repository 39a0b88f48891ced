pub mod calibration;
pub mod config;
pub mod dataset;
pub mod injury_risk;
pub mod market_value;
pub mod mock_feed;
pub mod player_impact;
pub mod primitives;
pub mod report;
pub mod report_export;
pub mod state;
pub mod team_shape;
pub mod types;
pub mod win_prob;
pub mod xg;
