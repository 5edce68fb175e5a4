pub mod analyze_image_use_case;
pub mod capture_snapshot_use_case;
pub mod live_session_use_case;
pub mod pipeline_logger;
pub mod result_formatter;
