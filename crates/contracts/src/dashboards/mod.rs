pub mod d400_operator_performance;
pub mod d401_weekly_km;
